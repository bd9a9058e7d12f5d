//! ld-core: stable foundation for the laser damage workspace.
//!
//! Contains:
//! - units (uom SI types + constructors for laser/material quantities)
//! - numeric (Real + tolerances + float helpers)
//! - ids (run identifiers)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LdError, LdResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
