//! Transport domain module.
//!
//! - `model`: the closed set of legacy networks (`TransportType`)
//! - `registry`: immutable name → disco identity lookup (`TransportRegistry`)

mod model;
mod registry;

pub use model::TransportType;
pub use registry::{TransportDescriptor, TransportRegistry};
