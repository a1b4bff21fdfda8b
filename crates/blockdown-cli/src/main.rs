//! bdcli - convert markdown to store blocks and back
//!
//! Usage:
//!   bdcli [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse     Show the blocks a markdown file parses into
//!   render    Render store block JSON back to markdown
//!   fmt       Print the normalised form of a markdown file
//!   check     Verify a markdown file survives a round trip
//!   stats     Show block and span statistics

mod config;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use blockdown_core::wire::{self, IdGenerator, SequentialIds, UuidGenerator};
use blockdown_core::{render, roundtrip_with, Block, Located, Style};
use clap::{ArgAction, Parser as ClapParser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

#[derive(ClapParser)]
#[command(name = "bdcli")]
#[command(about = "Convert markdown to knowledge-store blocks and back")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a markdown file and show its blocks
    Parse {
        file: PathBuf,
        /// Print store block JSON
        #[arg(long)]
        json: bool,
        /// Show every span with its style
        #[arg(long)]
        verbose: bool,
    },
    /// Render a JSON array of store blocks as markdown
    Render { file: PathBuf },
    /// Print the normalised markdown of a file
    Fmt { file: PathBuf },
    /// Check that a file parses the same after render and reparse
    Check { file: PathBuf },
    /// Show document statistics
    Stats { file: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    info!(?config, "loaded configuration");

    match cli.command {
        Command::Parse {
            file,
            json,
            verbose,
        } => {
            let input = read_input(&file)?;
            let located = config.parser().parse_located(&input);
            if json {
                let blocks: Vec<Block> = located.into_iter().map(Located::into_inner).collect();
                println!("{}", to_wire_json(&blocks, &config)?);
            } else if verbose {
                print!("{}", format_verbose(&located, &input));
            } else {
                print!("{}", format_summary(&located));
            }
        }
        Command::Render { file } => {
            let input = read_input(&file)?;
            let blocks = wire::decode_json(&input)
                .with_context(|| format!("failed to decode blocks from '{}'", file.display()))?;
            println!("{}", render(&blocks));
        }
        Command::Fmt { file } => {
            let input = read_input(&file)?;
            println!("{}", render(&config.parser().parse(&input)));
        }
        Command::Check { file } => {
            let input = read_input(&file)?;
            let trip = roundtrip_with(&config.parser(), &input);
            if !trip.is_equivalent() {
                let mismatches = trip.mismatches();
                eprintln!("{} block(s) change on round trip:", mismatches.len());
                for mismatch in &mismatches {
                    eprintln!("  - {mismatch}");
                }
                return Ok(ExitCode::FAILURE);
            }
            println!("ok: {} block(s) round-trip", trip.original.len());
        }
        Command::Stats { file } => {
            let input = read_input(&file)?;
            let blocks = config.parser().parse(&input);
            print!("{}", DocumentStats::new(&blocks, &input));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn to_wire_json(blocks: &[Block], config: &Config) -> Result<String> {
    let mut ids: Box<dyn IdGenerator> = if config.output.sequential_ids {
        Box::new(SequentialIds::default())
    } else {
        Box::new(UuidGenerator)
    };
    let encoded = wire::encode(blocks, ids.as_mut());
    Ok(wire::to_json(&encoded, config.output.pretty)?)
}

// =============================================================================
// Text Output
// =============================================================================

fn format_summary(blocks: &[Located<Block>]) -> String {
    let mut out = format!("Blocks: {}\n", blocks.len());
    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", i + 1, describe_block(&block.node)));
    }
    out
}

fn format_verbose(blocks: &[Located<Block>], input: &str) -> String {
    let mut out = String::new();
    for (i, block) in blocks.iter().enumerate() {
        out.push_str(&format!(
            "[{}] {} @ {}..{}\n",
            i + 1,
            describe_block(&block.node),
            block.span.start,
            block.span.end
        ));
        match &block.node {
            Block::Code(c) => {
                out.push_str(&format!("  Content: {}\n", preview(&c.raw_text, 60)));
            }
            Block::HorizontalRule => {
                out.push_str(&format!("  Source: {}\n", block.span.slice(input).trim()));
            }
            node => {
                for span in node.spans() {
                    out.push_str(&format!("  {:<12} {:?}\n", style_name(span.style), span.text));
                }
            }
        }
    }
    out
}

fn describe_block(block: &Block) -> String {
    match block {
        Block::Heading(h) => format!("Heading (level {}): {}", h.level, preview(&block.plain_text(), 50)),
        Block::Code(c) => format!("Code (lang: {}, {} line(s))", c.language, c.raw_text.lines().count()),
        Block::HorizontalRule => "Rule".to_string(),
        Block::TextLine(_) => {
            let label = match block.kind_name() {
                "bullet" => "Bullet",
                "numbered" => "Numbered",
                "quote" => "Quote",
                _ => "Paragraph",
            };
            format!("{label}: {}", preview(&block.plain_text(), 50))
        }
    }
}

fn style_name(style: Style) -> &'static str {
    match style {
        Style::BOLD_ITALIC => "bold+italic",
        Style::BOLD => "bold",
        Style::ITALIC => "italic",
        _ => "plain",
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut preview: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}

// =============================================================================
// Stats Command
// =============================================================================

#[derive(Debug, Default, PartialEq, Eq)]
struct DocumentStats {
    total_blocks: usize,
    headings: usize,
    paragraphs: usize,
    bullets: usize,
    numbered: usize,
    quotes: usize,
    code_blocks: usize,
    rules: usize,
    plain_spans: usize,
    bold_spans: usize,
    italic_spans: usize,
    bold_italic_spans: usize,
    chars: usize,
    words: usize,
    lines: usize,
}

impl DocumentStats {
    fn new(blocks: &[Block], input: &str) -> Self {
        let mut stats = Self {
            total_blocks: blocks.len(),
            chars: input.chars().count(),
            words: input.split_whitespace().count(),
            lines: input.lines().count(),
            ..Self::default()
        };

        for block in blocks {
            match block.kind_name() {
                "heading" => stats.headings += 1,
                "code" => stats.code_blocks += 1,
                "rule" => stats.rules += 1,
                "bullet" => stats.bullets += 1,
                "numbered" => stats.numbered += 1,
                "quote" => stats.quotes += 1,
                _ => stats.paragraphs += 1,
            }
            for span in block.spans() {
                match span.style {
                    Style::BOLD_ITALIC => stats.bold_italic_spans += 1,
                    Style::BOLD => stats.bold_spans += 1,
                    Style::ITALIC => stats.italic_spans += 1,
                    _ => stats.plain_spans += 1,
                }
            }
        }

        stats
    }
}

impl std::fmt::Display for DocumentStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Document Statistics")?;
        writeln!(f, "-------------------")?;
        writeln!(f, "Blocks:")?;
        writeln!(f, "  Total:          {}", self.total_blocks)?;
        writeln!(f, "  Headings:       {}", self.headings)?;
        writeln!(f, "  Paragraphs:     {}", self.paragraphs)?;
        writeln!(f, "  Bullets:        {}", self.bullets)?;
        writeln!(f, "  Numbered:       {}", self.numbered)?;
        writeln!(f, "  Quotes:         {}", self.quotes)?;
        writeln!(f, "  Code blocks:    {}", self.code_blocks)?;
        writeln!(f, "  Rules:          {}", self.rules)?;
        writeln!(f)?;
        writeln!(f, "Spans:")?;
        writeln!(f, "  Plain:          {}", self.plain_spans)?;
        writeln!(f, "  Bold:           {}", self.bold_spans)?;
        writeln!(f, "  Italic:         {}", self.italic_spans)?;
        writeln!(f, "  Bold+italic:    {}", self.bold_italic_spans)?;
        writeln!(f)?;
        writeln!(f, "Size:")?;
        writeln!(f, "  Characters:     {}", self.chars)?;
        writeln!(f, "  Words (est.):   {}", self.words)?;
        writeln!(f, "  Lines:          {}", self.lines)
    }
}
