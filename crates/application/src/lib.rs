//! Application services for staging partial record updates.

#![forbid(unsafe_code)]

mod update_map;
mod update_map_service;

pub use update_map::{UpdateMapError, create_update_map};
pub use update_map_service::UpdateMapService;
