//! Purpose: Derive per-field decode policy from declarative metadata and static shape.
//! Exports: `FieldMeta`, `FieldPolicy`, `wire_index`.
//! Role: Field Policy Resolver; evaluated in const context by derived records.
//! Invariants: Policy depends only on metadata and `ShapeKind`, never on input.
//! Invariants: Wire names are unique among non-ignored fields of one record.
use std::collections::HashMap;

use crate::core::error::{Error, ErrorKind};
use crate::core::shape::ShapeKind;

/// Field metadata as declared on the record definition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldMeta {
    pub ident: &'static str,
    pub rename: Option<&'static str>,
    pub omit_empty: bool,
    pub ignore: bool,
    pub kind: ShapeKind,
}

impl FieldMeta {
    pub const fn new(ident: &'static str, kind: ShapeKind) -> Self {
        Self {
            ident,
            rename: None,
            omit_empty: false,
            ignore: false,
            kind,
        }
    }

    pub const fn rename(mut self, name: &'static str) -> Self {
        self.rename = Some(name);
        self
    }

    pub const fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    pub const fn ignore(mut self) -> Self {
        self.ignore = true;
        self
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldPolicy {
    pub ident: &'static str,
    pub wire_name: &'static str,
    pub required: bool,
    pub ignore: bool,
    pub kind: ShapeKind,
}

impl FieldPolicy {
    pub const fn resolve(meta: FieldMeta) -> Self {
        let wire_name = match meta.rename {
            Some(name) if !name.is_empty() => name,
            _ => meta.ident,
        };
        let required = if meta.ignore || meta.omit_empty {
            false
        } else {
            match meta.kind {
                ShapeKind::Optional => false,
                ShapeKind::Sequence { optional_elements } => !optional_elements,
                ShapeKind::Record | ShapeKind::Scalar | ShapeKind::Map => true,
            }
        };
        Self {
            ident: meta.ident,
            wire_name,
            required,
            ignore: meta.ignore,
            kind: meta.kind,
        }
    }
}

/// Maps each non-ignored wire name to its field index.
pub fn wire_index(
    record: &str,
    fields: &'static [FieldPolicy],
) -> Result<HashMap<&'static str, usize>, Error> {
    let mut index = HashMap::with_capacity(fields.len());
    for (position, field) in fields.iter().enumerate() {
        if field.ignore {
            continue;
        }
        if let Some(previous) = index.insert(field.wire_name, position) {
            return Err(Error::new(ErrorKind::Configuration).with_message(format!(
                "record {record} declares wire name {:?} on both {} and {}",
                field.wire_name, fields[previous].ident, field.ident
            )));
        }
    }
    Ok(index)
}
