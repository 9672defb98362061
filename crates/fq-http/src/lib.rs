//! Firestore REST v1 client for fq.
//!
//! Implements [`fq_core::DocumentStore`] on top of `reqwest`, against either
//! production Firestore or the local emulator.

pub mod connection;
pub mod datastore;
pub mod serializer;

pub use connection::{Connection, ConnectionBuilder};
pub use datastore::HttpDatastore;
pub use serializer::Serializer;
