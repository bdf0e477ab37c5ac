//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! - [`persistence`] - JSON document store for links

pub mod persistence;
