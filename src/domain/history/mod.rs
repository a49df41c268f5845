//! Shared price history: the store every refresh commits into and every
//! frame is drawn from.

pub mod clock;
pub mod snapshot;
pub mod store;

pub use clock::*;
pub use snapshot::*;
pub use store::*;
