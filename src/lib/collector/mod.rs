//! Point-in-time collectors: stateless readers with no rate or delta
//! semantics. Each returns `Option`/empty on failure so a broken collaborator
//! degrades its own snapshot fields only.

pub mod disk;
pub mod interface;
pub mod memory;
pub mod process;
pub mod temperature;
pub mod uptime;
