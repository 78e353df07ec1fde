//! Shared output layer for human/JSON parity across all commands.
//!
//! Every command handler builds a serializable report and passes it to
//! [`render`] together with a human renderer:
//!
//! ```ignore
//! render(mode, &report, |r, w| writeln!(w, "{}", r.title))
//! ```

use std::io::{self, Write};

use serde::Serialize;

/// Shared width for human separators.
pub const RULE_WIDTH: usize = 72;

pub fn rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    rule(w)
}

/// Render a left-aligned key/value line.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<8} {}", format!("{key}:"), value.as_ref())
}

/// Format a ratio with a fixed number of decimals.
pub fn fixed(value: f64) -> String {
    format!("{value:.4}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}

/// Render `value` to stdout: pretty JSON, or via `human_fn`.
///
/// # Errors
///
/// Returns an error if serialization or writing to stdout fails.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_to(&mut out, mode, value, human_fn)
}

/// Like [`render`] but into an arbitrary writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn render_to<T: Serialize>(
    out: &mut dyn Write,
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputMode::Human => human_fn(value, out)?,
    }
    Ok(())
}
