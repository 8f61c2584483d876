//! Headless runner for the Machines of God combat core.
//!
//! Stands in for the game shell: loads a save document and level content,
//! drives a `CombatSession` with a scripted autopilot and reports the
//! session summary.

pub mod autopilot;
pub mod error;
pub mod game_loop;
pub mod logging;
pub mod runner;

pub use machines_core as core;

#[cfg(test)]
mod tests;
