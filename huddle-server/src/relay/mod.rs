mod event_sink;
mod relay_service;
mod session_sink;
mod ws_handler;

pub use event_sink::*;
pub use relay_service::*;
pub use session_sink::*;
pub use ws_handler::*;
