//! Enemy movement for Machines of God.
//!
//! Implements the movement pattern engine (linear, zigzag, pursuit, orbit,
//! bezier, flocking) and the per-kind enemy profile table. Pure functions
//! over plain data, no ECS dependency.

pub mod patterns;
pub mod profiles;
pub mod steering;

pub use machines_core as core;

#[cfg(test)]
mod tests;
