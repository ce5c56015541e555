pub mod controller;
pub mod types;

pub use controller::*;
pub use types::*;
