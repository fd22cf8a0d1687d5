//! Purpose: Recursive strict decode over records, sequences, maps, optionals, and scalars.
//! Exports: `Decoder`, `DecodeOptions`, `DEFAULT_MAX_DEPTH`.
//! Role: Walks the destination's `Target` tree alongside raw JSON fragments and
//!   collects every violation into one `Errors` list.
//! Invariants: No short-circuit; every declared field and every input key is visited.
//! Invariants: Optional storage is allocated exactly when its key is present, even for `null`.
//! Invariants: Structural and configuration failures abort only the current subtree.
use std::collections::HashMap;
use std::str;

use serde_json::value::RawValue;
use tracing::{debug, debug_span, trace, warn};

use crate::core::error::{Error, ErrorKind};
use crate::core::errors::Errors;
use crate::core::policy;
use crate::core::shape::{MapSlot, Record, SequenceSlot, Strict, Target};
use crate::json::parse::{self, JsonKind, ParseFailureCategory, ScalarError};

pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodeOptions {
    pub max_depth: usize,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Decoder {
    options: DecodeOptions,
}

impl Decoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes `bytes` into `dest`, which must be a record.
    pub fn decode<T: Strict + ?Sized>(&self, bytes: &[u8], dest: &mut T) -> Errors {
        let record = match dest.target() {
            Target::Record(record) => record,
            other => {
                let err = Error::new(ErrorKind::Configuration).with_message(format!(
                    "destination must be a record, got {}",
                    target_label(&other)
                ));
                warn!(error = %err, "strict decode rejected destination");
                return Errors::from(err);
            }
        };

        let span = debug_span!("strict_decode", record = record.record_name());
        let _guard = span.enter();

        let text = match str::from_utf8(bytes) {
            Ok(text) => text,
            Err(err) => {
                let message = format!(
                    "input is not valid UTF-8 at byte {}; parse category: {}",
                    err.valid_up_to(),
                    ParseFailureCategory::Utf8.label()
                );
                return Errors::from(
                    Error::new(ErrorKind::Structural)
                        .with_path("")
                        .with_message(message)
                        .with_category(ParseFailureCategory::Utf8)
                        .with_source(err),
                );
            }
        };
        let raw = match parse::parse_root(text) {
            Ok(raw) => raw,
            Err(err) => return Errors::from(structural("", err)),
        };

        let errs = self.decode_record(record, raw, "", 0);
        debug!(errors = errs.len(), "strict decode finished");
        errs
    }

    /// Depth counts record, sequence, and map levels; scalars and optionals add none.
    fn check_depth(&self, path: &str, depth: usize) -> Result<(), Errors> {
        if depth <= self.options.max_depth {
            return Ok(());
        }
        warn!(path, max_depth = self.options.max_depth, "strict decode depth limit hit");
        Err(Errors::from(
            Error::new(ErrorKind::Configuration)
                .with_path(path)
                .with_message(format!(
                    "maximum nesting depth {} exceeded",
                    self.options.max_depth
                )),
        ))
    }

    fn decode_value(
        &self,
        dest: &mut dyn Strict,
        raw: &RawValue,
        path: &str,
        depth: usize,
    ) -> Errors {
        match dest.target() {
            Target::Record(record) => self.decode_record(record, raw, path, depth),
            Target::Scalar(scalar) => match scalar.decode_raw(raw) {
                Ok(()) => Errors::new(),
                Err(ScalarError::Mismatch { got }) => {
                    Errors::new().with_invalid_type(path, scalar.expected(), got)
                }
                Err(ScalarError::Parse(err)) => Errors::from(structural(path, err)),
            },
            Target::Optional(slot) => self.decode_value(slot.allocate(), raw, path, depth),
            Target::Sequence(seq) => self.decode_sequence(seq, raw, path, depth),
            Target::Map(map) => self.decode_map(map, raw, path, depth),
        }
    }

    fn decode_record(
        &self,
        record: &mut dyn Record,
        raw: &RawValue,
        path: &str,
        depth: usize,
    ) -> Errors {
        if let Err(errs) = self.check_depth(path, depth) {
            return errs;
        }
        let mut errs = Errors::new();
        let record_name = record.record_name();
        let fields = record.fields();
        let declared = match policy::wire_index(record_name, fields) {
            Ok(declared) => declared,
            Err(err) => {
                warn!(error = %err, "record field table rejected");
                return errs.with_err(err.with_path(path));
            }
        };

        let entries = match JsonKind::of(raw) {
            // null decodes like {}: nothing present, so required fields still report.
            JsonKind::Null => Vec::new(),
            JsonKind::Object => match parse::parse_object(raw) {
                Ok(entries) => entries,
                Err(err) => return errs.with_err(structural(path, err)),
            },
            other => return errs.with_invalid_type(path, "object", other.name()),
        };
        let present: HashMap<&str, &RawValue> = entries
            .iter()
            .map(|(key, value)| (key.as_str(), *value))
            .collect();

        for (index, field) in fields.iter().enumerate() {
            if field.ignore {
                continue;
            }
            let at = field_path(path, field.wire_name);
            let Some(field_raw) = present.get(field.wire_name).copied() else {
                if field.required {
                    trace!(path = %at, "required field absent");
                    errs.push(Error::required(at));
                }
                continue;
            };
            let Some(slot) = record.field_mut(index) else {
                errs.push(
                    Error::new(ErrorKind::Configuration)
                        .with_path(at)
                        .with_message(format!(
                            "record {record_name} has no storage for field {}",
                            field.ident
                        )),
                );
                continue;
            };

            let nested = self.decode_value(slot, field_raw, &at, depth + 1);
            if !nested.is_empty() {
                errs.append(nested);
                continue;
            }
            let empty = record
                .field_ref(index)
                .is_some_and(|value| value.is_empty_value());
            if field.required && empty {
                trace!(path = %at, "required field empty");
                errs.push(Error::required(at));
            }
        }

        for (key, _) in &entries {
            if !declared.contains_key(key.as_str()) {
                let key_path = field_path(path, key);
                trace!(path = %key_path, "unknown field");
                errs.push(Error::not_allowed(key_path));
            }
        }

        errs
    }

    fn decode_sequence(
        &self,
        seq: &mut dyn SequenceSlot,
        raw: &RawValue,
        path: &str,
        depth: usize,
    ) -> Errors {
        if let Err(errs) = self.check_depth(path, depth) {
            return errs;
        }
        let elements = match JsonKind::of(raw) {
            JsonKind::Null => Vec::new(),
            JsonKind::Array => match parse::parse_array(raw) {
                Ok(elements) => elements,
                Err(err) => return Errors::from(structural(path, err)),
            },
            other => return Errors::new().with_invalid_type(path, "array", other.name()),
        };

        seq.clear();
        let mut errs = Errors::new();
        for (index, element) in elements.into_iter().enumerate() {
            let slot = seq.push_default();
            errs.append(self.decode_element(slot, element, &index_path(path, index), depth + 1));
        }
        errs
    }

    fn decode_map(&self, map: &mut dyn MapSlot, raw: &RawValue, path: &str, depth: usize) -> Errors {
        if let Err(errs) = self.check_depth(path, depth) {
            return errs;
        }
        let entries = match JsonKind::of(raw) {
            JsonKind::Null => Vec::new(),
            JsonKind::Object => match parse::parse_object(raw) {
                Ok(entries) => entries,
                Err(err) => return Errors::from(structural(path, err)),
            },
            other => return Errors::new().with_invalid_type(path, "object", other.name()),
        };

        map.clear();
        let mut errs = Errors::new();
        for (key, value) in entries {
            let entry_path = field_path(path, &key);
            let slot = map.entry_default(key);
            errs.append(self.decode_element(slot, value, &entry_path, depth + 1));
        }
        errs
    }

    /// Collection elements only allocate an optional when the value is not null;
    /// presence alone allocates for record fields.
    fn decode_element(
        &self,
        slot: &mut dyn Strict,
        raw: &RawValue,
        path: &str,
        depth: usize,
    ) -> Errors {
        if JsonKind::of(raw) == JsonKind::Null && matches!(slot.target(), Target::Optional(_)) {
            return Errors::new();
        }
        self.decode_value(slot, raw, path, depth)
    }
}

fn structural(path: &str, err: serde_json::Error) -> Error {
    let context = if path.is_empty() { "<root>" } else { path };
    let message = format!("{err}; {}", parse::hint_for_error(&err, context));
    Error::new(ErrorKind::Structural)
        .with_path(path)
        .with_message(message)
        .with_category(parse::categorize_error(&err))
        .with_source(err)
}

fn target_label(target: &Target<'_>) -> &'static str {
    match target {
        Target::Record(_) => "record",
        Target::Scalar(_) => "scalar",
        Target::Optional(_) => "optional",
        Target::Sequence(_) => "sequence",
        Target::Map(_) => "map",
    }
}

/// Joins a parent path and a wire name with a dot; the root path is empty.
pub(crate) fn field_path(root: &str, name: &str) -> String {
    if root.is_empty() {
        name.to_string()
    } else {
        format!("{root}.{name}")
    }
}

pub(crate) fn index_path(root: &str, index: usize) -> String {
    format!("{root}[{index}]")
}

#[cfg(test)]
mod tests {
    use super::{field_path, index_path, DecodeOptions, Decoder};
    use crate::core::error::ErrorKind;
    use crate::core::policy::{FieldMeta, FieldPolicy};
    use crate::core::shape::{Record, Shaped, ShapeKind, Strict, Target};

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        key: String,
        weight: Option<u32>,
    }

    impl Record for Pair {
        fn record_name(&self) -> &'static str {
            "Pair"
        }

        fn fields(&self) -> &'static [FieldPolicy] {
            static FIELDS: [FieldPolicy; 2] = [
                FieldPolicy::resolve(FieldMeta::new("key", <String as Shaped>::KIND)),
                FieldPolicy::resolve(FieldMeta::new("weight", <Option<u32> as Shaped>::KIND)),
            ];
            &FIELDS
        }

        fn field_mut(&mut self, index: usize) -> Option<&mut dyn Strict> {
            match index {
                0 => Some(&mut self.key as &mut dyn Strict),
                1 => Some(&mut self.weight as &mut dyn Strict),
                _ => None,
            }
        }

        fn field_ref(&self, index: usize) -> Option<&dyn Strict> {
            match index {
                0 => Some(&self.key as &dyn Strict),
                1 => Some(&self.weight as &dyn Strict),
                _ => None,
            }
        }
    }

    impl Shaped for Pair {
        const KIND: ShapeKind = ShapeKind::Record;
    }

    impl Strict for Pair {
        fn target(&mut self) -> Target<'_> {
            Target::Record(self)
        }
    }

    #[test]
    fn paths_join_with_dots_and_indices() {
        assert_eq!(field_path("", "FirstName"), "FirstName");
        assert_eq!(field_path("Address.City", "Name"), "Address.City.Name");
        assert_eq!(index_path("items", 2), "items[2]");
        assert_eq!(field_path(&index_path("items", 0), "name"), "items[0].name");
    }

    #[test]
    fn hand_written_record_decodes() {
        let mut pair = Pair::default();
        let errs = Decoder::default().decode(br#"{"key":"a","weight":3}"#, &mut pair);
        assert!(errs.is_empty(), "{errs:#}");
        assert_eq!(
            pair,
            Pair {
                key: "a".to_string(),
                weight: Some(3)
            }
        );
    }

    #[test]
    fn every_violation_is_collected() {
        let mut pair = Pair::default();
        let errs = Decoder::default().decode(br#"{"weight":"x","extra":1,"more":2}"#, &mut pair);
        let kinds: Vec<_> = errs.iter().map(|err| (err.kind(), err.path())).collect();
        assert_eq!(
            kinds,
            vec![
                (ErrorKind::Required, Some("key")),
                (ErrorKind::InvalidType, Some("weight")),
                (ErrorKind::NotAllowed, Some("extra")),
                (ErrorKind::NotAllowed, Some("more")),
            ]
        );
    }

    #[test]
    fn non_record_destination_is_configuration_error() {
        let mut values: Vec<String> = Vec::new();
        let errs = Decoder::default().decode(br#"["a"]"#, &mut values);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.as_slice()[0].kind(), ErrorKind::Configuration);
        assert!(values.is_empty());
    }

    #[test]
    fn malformed_root_is_structural() {
        let mut pair = Pair::default();
        let errs = Decoder::default().decode(br#"{"key":"#, &mut pair);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.as_slice()[0].kind(), ErrorKind::Structural);
    }

    #[test]
    fn invalid_utf8_is_structural() {
        let mut pair = Pair::default();
        let errs = Decoder::default().decode(&[0xff, b'{', b'}'], &mut pair);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.as_slice()[0].kind(), ErrorKind::Structural);
    }

    #[test]
    fn options_default_to_generous_depth() {
        assert_eq!(DecodeOptions::default().max_depth, super::DEFAULT_MAX_DEPTH);
        assert_eq!(DecodeOptions::new().with_max_depth(4).max_depth, 4);
    }
}
