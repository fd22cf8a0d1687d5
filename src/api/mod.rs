//! Purpose: Define the stable public API boundary for strict decoding.
//! Exports: Entry points, shape traits, field policy types, and the error model.
//! Role: Public, additive-only surface; derive output refers only to paths under here.
//! Invariants: Callers branch on `Errors::is_empty()`, never on rendered text.
//! Invariants: Internal modules remain private and are not directly exposed.

pub use crate::core::engine::{DEFAULT_MAX_DEPTH, DecodeOptions, Decoder};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::errors::Errors;
pub use crate::core::policy::{FieldMeta, FieldPolicy};
pub use crate::core::shape::{
    MapSlot, OptionalSlot, Record, Scalar, SequenceSlot, ShapeKind, Shaped, Strict, Target,
};
pub use crate::json::parse::{ParseFailureCategory, ScalarError};

/// Decodes `bytes` into `dest` with default options.
///
/// An empty result means success. `dest` must be a record; anything else yields a
/// single Configuration error and is left untouched.
pub fn decode<T: Strict + ?Sized>(bytes: &[u8], dest: &mut T) -> Errors {
    Decoder::default().decode(bytes, dest)
}

pub fn decode_with<T: Strict + ?Sized>(
    bytes: &[u8],
    dest: &mut T,
    options: &DecodeOptions,
) -> Errors {
    Decoder::new(options.clone()).decode(bytes, dest)
}

/// Decodes into a fresh `T::default()`; returns the value only when no errors were found.
pub fn from_slice<T: Strict + Default>(bytes: &[u8]) -> Result<T, Errors> {
    let mut dest = T::default();
    let errs = decode(bytes, &mut dest);
    if errs.is_empty() { Ok(dest) } else { Err(errs) }
}

pub fn from_str<T: Strict + Default>(text: &str) -> Result<T, Errors> {
    from_slice(text.as_bytes())
}
