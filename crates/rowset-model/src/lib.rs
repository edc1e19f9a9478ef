#![forbid(unsafe_code)]

//! `rowset-model` defines the core data layer of the rowset query engine.
//!
//! The crate is intentionally self-contained so it can be reused by:
//! - the relational pipeline (`rowset-engine`)
//! - host applications that only need the value/record layer
//!
//! Values are plain [`serde_json::Value`] trees; everything the engine
//! compares, deduplicates or groups on goes through the deterministic
//! [`canonical_text`] form defined here.

pub mod canonical;
pub mod columns;

mod error;
mod record;
mod value;

pub use canonical::{canonical_row, canonical_text};
pub use error::{QueryError, Result};
pub use record::Record;
pub use value::{compare, plain_text, Kind};

/// The dynamically typed scalar flowing through the engine.
pub use serde_json::Value;
