//! Model types for the fq Firestore CLI.
//!
//! This crate holds the typed pieces a parsed filter is made of ([`KeyPath`],
//! [`Operator`], [`Value`], [`Where`]), Firestore collection/document paths,
//! query ordering, and the JSON shapes accepted as write input.

pub mod document;
pub mod filter;
pub mod order;
pub mod path;
pub mod value;

pub use document::{DocumentError, JsonArray, JsonMap, JsonObject};
pub use filter::{KeyPath, Operator, Where};
pub use order::{Direction, OrderBy};
pub use path::{CollectionPath, DocumentPath, FirestorePath, PathError};
pub use value::Value;
