//! df-core: shared numeric base for the data-driven fluid crates.
//!
//! - `units`: uom SI aliases and constructors used by property reports
//! - `numeric`: float tolerances and the finiteness/divisor guards every
//!   derivation runs through
//! - `error`: the guard failures

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
