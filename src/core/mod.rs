// Core modules implementing shape description, field policy, traversal, and error modeling.
pub mod engine;
pub mod error;
pub mod errors;
pub mod policy;
pub mod shape;
