//! Where-clause parsing, query model and document stores for fq.
//!
//! This crate holds everything the `fq` binary needs that is independent of
//! the transport: the filter expression parser, the [`Query`] builder, the
//! [`DocumentStore`] trait with an in-memory implementation, connection
//! configuration and the emulator hub client.

pub mod config;
pub mod emulator;
pub mod expression;
pub mod query;
pub mod store;

pub use config::{ConfigError, FirestoreConfig, is_emulator_project};
pub use emulator::EmulatorHub;
pub use expression::{ParseError, parse_value, parse_where};
pub use query::Query;
pub use store::{Document, DocumentStore, InMemoryStore, SetMode, StoreError};
