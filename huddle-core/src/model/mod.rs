mod conn;
mod peer;
mod room;
mod wire;

pub use conn::ConnId;
pub use peer::PeerId;
pub use room::RoomId;
pub use wire::{ClientEvent, ServerEvent};
