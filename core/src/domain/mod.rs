//! Entities and value objects shared by the services.

pub mod entities;
pub mod value_objects;
