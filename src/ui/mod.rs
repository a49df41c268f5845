//! Top bar dropdowns, legend rows and the pointer-press state machine.

pub mod dropdown;
pub mod layout;
pub mod state;

pub use dropdown::*;
pub use layout::*;
pub use state::*;
