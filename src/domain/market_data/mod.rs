//! Market data aggregate: per-symbol series, value objects and the ports
//! used to fetch and persist them.

pub mod entities;
pub mod repositories;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use value_objects::*;
