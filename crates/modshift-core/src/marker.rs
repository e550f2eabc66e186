//! Blank-line sentinels.
//!
//! The printer regenerates the trivia between top-level statements and drops
//! empty lines while doing so. Before parsing, every empty or whitespace-only
//! line is replaced with a sentinel line comment, which the printer keeps like
//! any other comment; after printing, the sentinel text is deleted again.
//!
//! A sentinel that already occurs in the input is deleted by [`unmark`] as
//! well. Inputs are not checked for it.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Sentinel line written in place of every blank line.
pub const BLANK_LINE_MARKER: &str = "// ... here should be a break line (remove me!) ...";

static BLANK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\n").expect("blank-line pattern must compile"));

/// Replace every empty or whitespace-only line with [`BLANK_LINE_MARKER`].
///
/// The number of lines is unchanged. Carriage returns are expected to be
/// normalised away beforehand (see [`normalize_newlines`]).
pub fn mark(text: &str) -> Cow<'_, str> {
    BLANK_LINE.replace_all(text, format!("{BLANK_LINE_MARKER}\n"))
}

/// Delete every occurrence of [`BLANK_LINE_MARKER`].
pub fn unmark(text: &str) -> String {
    text.replace(BLANK_LINE_MARKER, "")
}

/// Convert `\r\n` line endings to `\n`.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
