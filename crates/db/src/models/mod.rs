//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct
//! matching the database row plus the DTOs used to create it.

pub mod generation_job;
pub mod queue;
pub mod status;
