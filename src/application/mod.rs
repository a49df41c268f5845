pub mod dashboard;
pub mod refresh;
pub mod render_frame;

pub use dashboard::*;
pub use refresh::*;
pub use render_frame::*;
