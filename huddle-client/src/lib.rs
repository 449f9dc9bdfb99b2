mod engine;
mod error;
mod link;
mod surface;

pub use engine::*;
pub use error::*;
pub use link::*;
pub use surface::*;
