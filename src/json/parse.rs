//! Purpose: Provide the raw-fragment decode entrypoints consumed by the engine.
//! Exports: `JsonKind`, `ScalarError`, `ParseFailureCategory`, `parse_root`,
//!   `parse_object`, `parse_array`, `decode_scalar`, `categorize_error`,
//!   `categorize_message`, `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json usage details.
//! Invariants: Objects keep input key order; a duplicated key keeps its first
//!   position and its last value.
//! Invariants: `null` never reaches serde for scalars; callers keep the current value.
//! Notes: Error wording for violations is owned by callsites so paths stay explicit.

use std::collections::HashMap;
use std::fmt;

use serde::de::{DeserializeOwned, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::error::Category;
use serde_json::value::RawValue;

/// JSON type of a raw fragment, judged from its first significant byte.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub(crate) fn of(raw: &RawValue) -> Self {
        match raw.get().trim_start().as_bytes().first() {
            Some(b'n') => JsonKind::Null,
            Some(b't' | b'f') => JsonKind::Bool,
            Some(b'"') => JsonKind::String,
            Some(b'[') => JsonKind::Array,
            Some(b'{') => JsonKind::Object,
            _ => JsonKind::Number,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            JsonKind::Null => "null",
            JsonKind::Bool => "bool",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        }
    }
}

#[derive(Debug)]
pub enum ScalarError {
    /// The JSON value cannot be stored in the destination; `got` describes it.
    Mismatch { got: String },
    Parse(serde_json::Error),
}

pub(crate) fn parse_root(text: &str) -> Result<&RawValue, serde_json::Error> {
    serde_json::from_str(text)
}

pub(crate) fn parse_object(raw: &RawValue) -> Result<Vec<(String, &RawValue)>, serde_json::Error> {
    let entries: RawEntries<'_> = serde_json::from_str(raw.get())?;
    Ok(entries.0)
}

pub(crate) fn parse_array(raw: &RawValue) -> Result<Vec<&RawValue>, serde_json::Error> {
    serde_json::from_str(raw.get())
}

/// Decodes a scalar leaf. `accepts` is the only JSON kind the destination takes;
/// any other non-null kind is a mismatch without consulting serde.
pub(crate) fn decode_scalar<T: DeserializeOwned>(
    raw: &RawValue,
    accepts: JsonKind,
) -> Result<Option<T>, ScalarError> {
    let kind = JsonKind::of(raw);
    if kind == JsonKind::Null {
        return Ok(None);
    }
    if kind != accepts {
        return Err(ScalarError::Mismatch {
            got: kind.name().to_string(),
        });
    }
    match serde_json::from_str::<T>(raw.get()) {
        Ok(value) => Ok(Some(value)),
        Err(err)
            if err.classify() == Category::Data
                || categorize_error(&err) == ParseFailureCategory::NumericRange =>
        {
            Err(ScalarError::Mismatch {
                got: format!("{} {}", kind.name(), raw.get().trim()),
            })
        }
        Err(err) => Err(ScalarError::Parse(err)),
    }
}

struct RawEntries<'a>(Vec<(String, &'a RawValue)>);

impl<'de> Deserialize<'de> for RawEntries<'de> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(EntriesVisitor)
    }
}

struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = RawEntries<'de>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let capacity = map.size_hint().unwrap_or(0);
        let mut entries: Vec<(String, &'de RawValue)> = Vec::with_capacity(capacity);
        let mut positions: HashMap<String, usize> = HashMap::with_capacity(capacity);
        while let Some((key, value)) = map.next_entry::<String, &'de RawValue>()? {
            match positions.get(&key) {
                Some(&at) => entries[at].1 = value,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, value));
                }
            }
        }
        Ok(RawEntries(entries))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    Eof,
    Utf8,
    NumericRange,
    DepthLimit,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Utf8 => "utf8",
            ParseFailureCategory::NumericRange => "numeric-range",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Eof => ParseFailureCategory::Eof,
        Category::Syntax => match categorize_message(&err.to_string()) {
            ParseFailureCategory::Unknown => ParseFailureCategory::Syntax,
            category => category,
        },
        Category::Data => categorize_message(&err.to_string()),
        Category::Io => ParseFailureCategory::Unknown,
    }
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let message = message.to_ascii_lowercase();
    if message.contains("recursion limit") {
        ParseFailureCategory::DepthLimit
    } else if message.contains("utf-8") || message.contains("utf8") || message.contains("unicode")
    {
        ParseFailureCategory::Utf8
    } else if message.contains("out of range") || message.contains("too large") {
        ParseFailureCategory::NumericRange
    } else if message.contains("eof") {
        ParseFailureCategory::Eof
    } else if message.contains("expected")
        || message.contains("trailing")
        || message.contains("key must be a string")
        || message.contains("invalid")
    {
        ParseFailureCategory::Syntax
    } else {
        ParseFailureCategory::Unknown
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}; line {}, column {}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}
