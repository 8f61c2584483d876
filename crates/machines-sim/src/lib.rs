//! Combat simulation for Machines of God.
//!
//! Owns the hecs-backed entity registry, the formation manager, the wave
//! orchestrator and the collision engine, and runs them at a fixed tick
//! rate inside a `CombatSession` that produces `FrameSnapshot`s for the
//! render and HUD collaborators.

pub mod collision;
pub mod engine;
pub mod formation;
pub mod registry;
pub mod scenario;
pub mod systems;
pub mod waves;
pub mod weapons;
pub mod world_setup;

pub use engine::CombatSession;
pub use machines_core as core;
