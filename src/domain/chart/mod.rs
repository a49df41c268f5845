//! Chart aggregate: screen-space value objects and the projector that turns
//! history into geometry.

pub mod projection;
pub mod value_objects;

pub use projection::*;
pub use value_objects::*;
