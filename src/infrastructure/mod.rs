pub mod http;
pub mod persistence;
pub mod rendering;
pub mod services;

pub use http::*;
pub use persistence::*;
pub use services::*;
