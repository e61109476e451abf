pub mod actor;
pub mod dispatcher;
pub mod hint;
pub mod npcs;
pub mod supervisor;

pub use actor::{spawn_session, World};
pub use dispatcher::{parse, Command};
pub use npcs::{spawn_npc_host, NpcSpawn};
pub use supervisor::run_supervisor;
