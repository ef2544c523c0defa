// ClawCombat Schema - Shared type definitions
// This crate contains the core enums and records that are shared between
// the battle engine and the external layers that feed it agent profiles.

// Re-export the main types
pub use agent_data::*;
pub use element_types::*;

pub mod agent_data;
pub mod element_types;
