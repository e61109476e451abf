pub mod cast;

pub use cast::{cast, compose_effects, CastContext, CastRefusal, CastResolution, CastSuccess};
