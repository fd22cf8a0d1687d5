//! Purpose: Accumulate every failure found during one decode call.
//! Exports: `Errors`.
//! Role: Ordered, append-only list threaded through the recursive engine.
//! Invariants: Order is discovery order; `append` keeps left before right.
//! Invariants: Success means `is_empty()`; rendered text is diagnostics only.
use std::error::Error as StdError;
use std::fmt::{self, Write as _};

use crate::core::error::{Error, ErrorKind};

#[derive(Debug, Default)]
pub struct Errors {
    items: Vec<Error>,
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_err(mut self, err: Error) -> Self {
        self.push(err);
        self
    }

    pub fn with_not_allowed(self, path: impl Into<String>) -> Self {
        self.with_err(Error::not_allowed(path))
    }

    pub fn with_required(self, path: impl Into<String>) -> Self {
        self.with_err(Error::required(path))
    }

    pub fn with_invalid_type(
        self,
        path: impl Into<String>,
        expected: &'static str,
        got: impl Into<String>,
    ) -> Self {
        self.with_err(Error::invalid_type(path, expected, got))
    }

    pub fn push(&mut self, err: Error) {
        self.items.push(err);
    }

    pub fn append(&mut self, mut other: Errors) {
        self.items.append(&mut other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Error] {
        &self.items
    }

    /// Counts entries of one kind.
    pub fn count_kind(&self, kind: ErrorKind) -> usize {
        self.items.iter().filter(|err| err.kind() == kind).count()
    }

    /// Count-only line: "no errors", "1 error" or "N errors".
    pub fn summary(&self) -> String {
        match self.items.len() {
            0 => "no errors".to_string(),
            1 => "1 error".to_string(),
            n => format!("{n} errors"),
        }
    }

    /// Summary line followed by one line per entry with its kind and message.
    pub fn details(&self) -> String {
        let mut out = self.summary();
        if self.items.is_empty() {
            return out;
        }
        out.push_str(":\n");
        for err in &self.items {
            // Fatal kinds already lead their message with the label.
            if err.kind().is_violation() {
                let _ = writeln!(out, " {}: {err}", err.kind().label());
            } else {
                let _ = writeln!(out, " {err}");
            }
        }
        out
    }

    pub fn into_vec(self) -> Vec<Error> {
        self.items
    }
}

impl From<Error> for Errors {
    fn from(err: Error) -> Self {
        Errors::new().with_err(err)
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Extend<Error> for Errors {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// `{}` renders the summary; `{:#}` renders the detailed listing.
impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str(&self.details())
        } else {
            f.write_str(&self.summary())
        }
    }
}

impl StdError for Errors {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.items
            .first()
            .map(|err| err as &(dyn StdError + 'static))
    }
}
