pub mod frame;
pub mod listener;
pub mod registry;
pub mod room;
pub mod stream;
pub mod sweeper;

mod error;

pub use error::{DeliveryFailure, RoomError};
pub use registry::{RegistrySnapshot, RoomRegistry};
pub use room::Room;
pub use stream::ListenerStream;
