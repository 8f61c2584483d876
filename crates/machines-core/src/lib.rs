//! Core types and definitions for the Machines of God combat core.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, ids, components, commands, events, snapshots, config and
//! constants. It has no ECS and no randomness.

pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
