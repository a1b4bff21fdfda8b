//! Python bindings for the blockdown converter.
//!
//! Blocks cross the boundary as plain dicts in the store's wire shape, so
//! the result of `markdown_to_blocks` can be sent to the store as is, and
//! blocks fetched from the store can be passed straight to
//! `blocks_to_markdown`.

use blockdown_core::wire::{self, UuidGenerator};
use blockdown_core::{render, tokenize as core_tokenize, Parser as CoreParser};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use pyo3::IntoPyObjectExt;

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn core_parser(default_language: Option<&str>) -> CoreParser {
    match default_language {
        Some(language) => CoreParser::new().with_default_language(language),
        None => CoreParser::new(),
    }
}

/// Split a line of text into styled spans.
///
/// Args:
///     text: Text without block markers
///
/// Returns:
///     list[dict]: One dict per span with `text`, `bold` and `italic`
#[pyfunction]
#[pyo3(text_signature = "(text)")]
fn tokenize<'py>(py: Python<'py>, text: &str) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for span in core_tokenize(text) {
        let dict = PyDict::new(py);
        dict.set_item("text", span.text)?;
        dict.set_item("bold", span.style.bold)?;
        dict.set_item("italic", span.style.italic)?;
        list.append(dict)?;
    }
    Ok(list)
}

/// Convert markdown to store blocks.
///
/// Args:
///     markdown: Markdown document
///     default_language: Language for untagged code fences (default: "text")
///
/// Returns:
///     list[dict]: Store blocks with fresh UUID ids
#[pyfunction]
#[pyo3(signature = (markdown, default_language=None), text_signature = "(markdown, default_language=None)")]
fn markdown_to_blocks(
    py: Python<'_>,
    markdown: &str,
    default_language: Option<&str>,
) -> PyResult<PyObject> {
    let blocks = core_parser(default_language).parse(markdown);
    let encoded = wire::encode(&blocks, &mut UuidGenerator);
    let json = wire::to_json(&encoded, false).map_err(value_error)?;
    let loaded = py.import("json")?.call_method1("loads", (json,))?;
    loaded.into_py_any(py)
}

/// Render store blocks as markdown.
///
/// Unsupported block and token types are skipped.
///
/// Args:
///     blocks: List of store block dicts
///
/// Returns:
///     str: Markdown text
///
/// Raises:
///     ValueError: If the blocks are not JSON-serializable or malformed
#[pyfunction]
#[pyo3(text_signature = "(blocks)")]
fn blocks_to_markdown(py: Python<'_>, blocks: &Bound<'_, PyAny>) -> PyResult<String> {
    let dumped = py.import("json")?.call_method1("dumps", (blocks,))?;
    let json: String = dumped.extract()?;
    let decoded = wire::decode_json(&json).map_err(value_error)?;
    Ok(render(&decoded))
}

/// Parse and re-render markdown into its normalised form.
///
/// Args:
///     markdown: Markdown document
///     default_language: Language for untagged code fences (default: "text")
///
/// Returns:
///     str: Normalised markdown
#[pyfunction]
#[pyo3(signature = (markdown, default_language=None), text_signature = "(markdown, default_language=None)")]
fn normalize(markdown: &str, default_language: Option<&str>) -> String {
    render(&core_parser(default_language).parse(markdown))
}

/// blockdown - markdown to knowledge-store blocks and back.
#[pymodule]
fn pybd(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(markdown_to_blocks, m)?)?;
    m.add_function(wrap_pyfunction!(blocks_to_markdown, m)?)?;
    m.add_function(wrap_pyfunction!(normalize, m)?)?;
    Ok(())
}
