//! Purpose: Strict JSON decoding into typed records.
//! Exports: `api` (entry points, shape traits, errors), `report`, and the `Strict` derive.
//! Role: Library crate; unknown keys and missing or empty required fields are reported,
//!   never silently dropped or zero-filled.
//! Invariants: One call owns its destination and its error list; no shared state across calls.
//! Invariants: All JSON parsing goes through the internal `json` seam.
//!
//! ```
//! use strictjson::Strict;
//!
//! #[derive(Debug, Default, Strict)]
//! struct Account {
//!     #[strict(rename = "id")]
//!     account_id: u64,
//!     #[strict(omit_empty)]
//!     nickname: String,
//! }
//!
//! let account: Account = strictjson::from_str(r#"{"id": 7}"#).map_err(|errs| errs.to_string())?;
//! assert_eq!(account.account_id, 7);
//! assert!(strictjson::from_str::<Account>(r#"{"id": 7, "admin": true}"#).is_err());
//! # Ok::<(), String>(())
//! ```
//!
//! The derive rejects field tables it cannot decode. Two fields on one wire name:
//!
//! ```compile_fail
//! #[derive(strictjson::Strict)]
//! struct Clash {
//!     #[strict(rename = "id")]
//!     first: u64,
//!     id: u64,
//! }
//! ```
//!
//! An unknown attribute key:
//!
//! ```compile_fail
//! #[derive(strictjson::Strict)]
//! struct Typo {
//!     #[strict(omitempty)]
//!     name: String,
//! }
//! ```
//!
//! Generic, tuple, and enum types:
//!
//! ```compile_fail
//! #[derive(strictjson::Strict)]
//! struct Wrapper<T> {
//!     inner: T,
//! }
//! ```
//!
//! ```compile_fail
//! #[derive(strictjson::Strict)]
//! struct Pair(u64, u64);
//! ```
//!
//! ```compile_fail
//! #[derive(strictjson::Strict)]
//! enum Mode {
//!     On,
//!     Off,
//! }
//! ```

pub mod api;
mod core;
mod json;
pub mod report;

pub use api::{Errors, decode, decode_with, from_slice, from_str};

#[cfg(feature = "derive")]
pub use strictjson_derive::Strict;
