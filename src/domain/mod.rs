//! Domain Layer
//!
//! Entities, value objects, errors, ports and pure domain services.
//! Nothing in here knows about HTTP, SQLite or the provider's wire format.

pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;
