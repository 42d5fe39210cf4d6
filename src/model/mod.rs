//! Record types, the in-memory record store and partially-built entities.
//!
//! This is the host model layer the widgets read from: a `ModelRegistry`
//! describing record types, a `Database` holding their records, and
//! `Entity` values reconstructed per request.

pub mod database;
pub mod entity;
pub mod registry;

pub use database::{Database, Record};
pub use entity::{Attr, AttrError, Entity, EntityBuilder};
pub use registry::{ModelKey, ModelRegistry, ModelSchema};
