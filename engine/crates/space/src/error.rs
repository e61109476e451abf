#[derive(Debug, thiserror::Error)]
pub enum SpaceError {
    #[error("unknown room: {0}")]
    UnknownRoom(u64),
}
