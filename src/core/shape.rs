//! Purpose: Describe target shapes statically and expose them to the engine as a closed set.
//! Exports: `ShapeKind`, `Shaped`, `Strict`, `Target`, `Record`, `Scalar`,
//!   `OptionalSlot`, `SequenceSlot`, `MapSlot`.
//! Role: The engine matches on `Target`; adding a shape kind is a compile error
//!   until every traversal arm handles it.
//! Invariants: `Shaped::KIND` is a compile-time constant so policy tables stay static.
//! Invariants: Slots only write into storage reachable from the value they wrap.
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::value::RawValue;

use crate::core::policy::FieldPolicy;
use crate::json::parse::{self, JsonKind, ScalarError};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeKind {
    Record,
    Scalar,
    Optional,
    Sequence { optional_elements: bool },
    Map,
}

impl ShapeKind {
    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Record => "record",
            ShapeKind::Scalar => "scalar",
            ShapeKind::Optional => "optional",
            ShapeKind::Sequence { .. } => "sequence",
            ShapeKind::Map => "map",
        }
    }
}

/// Static shape information, read by field policy tables.
pub trait Shaped {
    const KIND: ShapeKind;
}

/// Dynamic traversal handle. Object safe so records can hand out `&mut dyn Strict` per field.
pub trait Strict {
    fn target(&mut self) -> Target<'_>;

    /// True when a decoded value counts as "present but empty" for required checks.
    fn is_empty_value(&self) -> bool {
        false
    }
}

pub enum Target<'a> {
    Record(&'a mut dyn Record),
    Scalar(&'a mut dyn Scalar),
    Optional(&'a mut dyn OptionalSlot),
    Sequence(&'a mut dyn SequenceSlot),
    Map(&'a mut dyn MapSlot),
}

/// A record shape: an ordered field table plus access to each field's storage.
///
/// Usually implemented by `#[derive(Strict)]`. `fields()[i]` must describe the
/// storage returned by `field_mut(i)` and `field_ref(i)`; ignored fields may
/// return `None`.
pub trait Record {
    fn record_name(&self) -> &'static str;
    fn fields(&self) -> &'static [FieldPolicy];
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Strict>;
    fn field_ref(&self, index: usize) -> Option<&dyn Strict>;
}

pub trait Scalar {
    /// Human description of the declared type, used in InvalidType reports.
    fn expected(&self) -> &'static str;
    fn decode_raw(&mut self, raw: &RawValue) -> Result<(), ScalarError>;
}

pub trait OptionalSlot {
    /// Stores a fresh default value and returns it for decoding.
    fn allocate(&mut self) -> &mut dyn Strict;
}

pub trait SequenceSlot {
    fn clear(&mut self);
    fn push_default(&mut self) -> &mut dyn Strict;
}

pub trait MapSlot {
    fn clear(&mut self);
    fn entry_default(&mut self, key: String) -> &mut dyn Strict;
}

macro_rules! scalar {
    ($($ty:ty => $expected:literal, $accepts:expr;)*) => {
        $(
            impl Shaped for $ty {
                const KIND: ShapeKind = ShapeKind::Scalar;
            }

            impl Scalar for $ty {
                fn expected(&self) -> &'static str {
                    $expected
                }

                fn decode_raw(&mut self, raw: &RawValue) -> Result<(), ScalarError> {
                    if let Some(value) = parse::decode_scalar::<$ty>(raw, $accepts)? {
                        *self = value;
                    }
                    Ok(())
                }
            }
        )*
    };
}

macro_rules! scalar_strict {
    ($($ty:ty),*) => {
        $(
            impl Strict for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::Scalar(self)
                }
            }
        )*
    };
}

scalar! {
    String => "string", JsonKind::String;
    bool => "bool", JsonKind::Bool;
    i8 => "integer", JsonKind::Number;
    i16 => "integer", JsonKind::Number;
    i32 => "integer", JsonKind::Number;
    i64 => "integer", JsonKind::Number;
    isize => "integer", JsonKind::Number;
    u8 => "unsigned integer", JsonKind::Number;
    u16 => "unsigned integer", JsonKind::Number;
    u32 => "unsigned integer", JsonKind::Number;
    u64 => "unsigned integer", JsonKind::Number;
    usize => "unsigned integer", JsonKind::Number;
    f32 => "number", JsonKind::Number;
    f64 => "number", JsonKind::Number;
}

scalar_strict!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Strict for String {
    fn target(&mut self) -> Target<'_> {
        Target::Scalar(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Shaped> Shaped for Option<T> {
    const KIND: ShapeKind = ShapeKind::Optional;
}

impl<T: Strict + Default> Strict for Option<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Optional(self)
    }

    fn is_empty_value(&self) -> bool {
        match self {
            Some(value) => value.is_empty_value(),
            None => true,
        }
    }
}

impl<T: Strict + Default> OptionalSlot for Option<T> {
    fn allocate(&mut self) -> &mut dyn Strict {
        self.insert(T::default())
    }
}

// Box is transparent: it always holds a value, so it keeps the inner kind.
impl<T: Shaped> Shaped for Box<T> {
    const KIND: ShapeKind = T::KIND;
}

impl<T: Strict> Strict for Box<T> {
    fn target(&mut self) -> Target<'_> {
        (**self).target()
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: Shaped> Shaped for Vec<T> {
    const KIND: ShapeKind = ShapeKind::Sequence {
        optional_elements: matches!(T::KIND, ShapeKind::Optional),
    };
}

impl<T: Strict + Default> Strict for Vec<T> {
    fn target(&mut self) -> Target<'_> {
        Target::Sequence(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Strict + Default> SequenceSlot for Vec<T> {
    fn clear(&mut self) {
        Vec::clear(self);
    }

    fn push_default(&mut self) -> &mut dyn Strict {
        let index = self.len();
        self.push(T::default());
        &mut self[index]
    }
}

impl<T: Shaped> Shaped for BTreeMap<String, T> {
    const KIND: ShapeKind = ShapeKind::Map;
}

impl<T: Strict + Default> Strict for BTreeMap<String, T> {
    fn target(&mut self) -> Target<'_> {
        Target::Map(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Strict + Default> MapSlot for BTreeMap<String, T> {
    fn clear(&mut self) {
        BTreeMap::clear(self);
    }

    fn entry_default(&mut self, key: String) -> &mut dyn Strict {
        self.entry(key).or_default()
    }
}

impl<T: Shaped, S> Shaped for HashMap<String, T, S> {
    const KIND: ShapeKind = ShapeKind::Map;
}

impl<T: Strict + Default, S: BuildHasher> Strict for HashMap<String, T, S> {
    fn target(&mut self) -> Target<'_> {
        Target::Map(self)
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Strict + Default, S: BuildHasher> MapSlot for HashMap<String, T, S> {
    fn clear(&mut self) {
        HashMap::clear(self);
    }

    fn entry_default(&mut self, key: String) -> &mut dyn Strict {
        self.entry(key).or_default()
    }
}
