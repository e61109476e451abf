pub mod directory;
pub mod error;
pub mod resolver;
pub mod snapshot;

pub use directory::{RoomDirectory, RoomRegistry};
pub use error::SpaceError;
pub use resolver::resolve_target;
pub use snapshot::RoomSnapshot;
