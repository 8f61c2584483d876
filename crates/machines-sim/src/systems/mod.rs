//! Per-frame systems.
//!
//! Systems are plain functions over the registry. They change component
//! values freely but route every spawn and despawn through the registry API.

pub mod cleanup;
pub mod enemy_behavior;
pub mod magnet;
pub mod movement;
pub mod player;
pub mod snapshot;
