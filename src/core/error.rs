//! Purpose: Model one strict-decoding failure with a stable kind and optional context.
//! Exports: `Error`, `ErrorKind`.
//! Role: Shared vocabulary for violations (data problems) and fatal failures.
//! Invariants: Violations are immutable once built; builders only run at construction.
//! Invariants: `Display` output is for diagnostics, never for programmatic branching.
use std::error::Error as StdError;
use std::fmt;

use crate::json::parse::ParseFailureCategory;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Required field absent, or present with an empty value.
    Required,
    /// Input key with no declared field.
    NotAllowed,
    /// Leaf JSON type does not match the declared type.
    InvalidType,
    /// Malformed JSON where a value was expected.
    Structural,
    /// Caller misuse: non-record root, duplicate wire names, depth exceeded.
    Configuration,
}

impl ErrorKind {
    /// Returns true for the data-validation kinds (Required, NotAllowed, InvalidType).
    pub fn is_violation(self) -> bool {
        matches!(
            self,
            ErrorKind::Required | ErrorKind::NotAllowed | ErrorKind::InvalidType
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Required => "required",
            ErrorKind::NotAllowed => "not-allowed",
            ErrorKind::InvalidType => "invalid-type",
            ErrorKind::Structural => "structural",
            ErrorKind::Configuration => "configuration",
        }
    }
}

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    path: Option<String>,
    message: Option<String>,
    expected: Option<&'static str>,
    got: Option<String>,
    category: Option<ParseFailureCategory>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl Error {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            path: None,
            message: None,
            expected: None,
            got: None,
            category: None,
            source: None,
        }
    }

    pub fn required(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::Required).with_path(path)
    }

    pub fn not_allowed(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotAllowed).with_path(path)
    }

    pub fn invalid_type(
        path: impl Into<String>,
        expected: &'static str,
        got: impl Into<String>,
    ) -> Self {
        let mut err = Self::new(ErrorKind::InvalidType).with_path(path);
        err.expected = Some(expected);
        err.got = Some(got.into());
        err
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Dotted field path; empty string for the root record.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    pub fn got(&self) -> Option<&str> {
        self.got.as_deref()
    }

    /// Parse-failure category, set on Structural errors.
    pub fn category(&self) -> Option<ParseFailureCategory> {
        self.category
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_category(mut self, category: ParseFailureCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.as_deref().unwrap_or("");
        match self.kind {
            ErrorKind::Required => write!(f, "field is required: {path}"),
            ErrorKind::NotAllowed => write!(f, "field is not allowed: {path}"),
            ErrorKind::InvalidType => write!(
                f,
                "invalid type: {path}: expected {}, got {}",
                self.expected.unwrap_or("value"),
                self.got.as_deref().unwrap_or("unknown")
            ),
            ErrorKind::Structural | ErrorKind::Configuration => {
                write!(f, "{}", self.kind.label())?;
                if let Some(message) = &self.message {
                    write!(f, ": {message}")?;
                }
                if !path.is_empty() {
                    write!(f, " (path: {path})")?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn violation_kinds_are_separated_from_fatal_kinds() {
        let cases = [
            (ErrorKind::Required, true),
            (ErrorKind::NotAllowed, true),
            (ErrorKind::InvalidType, true),
            (ErrorKind::Structural, false),
            (ErrorKind::Configuration, false),
        ];

        for (kind, violation) in cases {
            assert_eq!(kind.is_violation(), violation, "{kind:?}");
        }
    }

    #[test]
    fn display_matches_violation_kind() {
        assert_eq!(
            Error::required("Address.Street").to_string(),
            "field is required: Address.Street"
        );
        assert_eq!(
            Error::not_allowed("Nickname").to_string(),
            "field is not allowed: Nickname"
        );
        assert_eq!(
            Error::invalid_type("age", "integer", "string").to_string(),
            "invalid type: age: expected integer, got string"
        );
    }

    #[test]
    fn fatal_display_includes_message_and_path() {
        let err = Error::new(ErrorKind::Configuration)
            .with_path("Node.Next")
            .with_message("maximum nesting depth 4 exceeded");
        assert_eq!(
            err.to_string(),
            "configuration: maximum nesting depth 4 exceeded (path: Node.Next)"
        );
    }
}
