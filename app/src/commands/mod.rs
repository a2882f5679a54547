//! FILENAME: app/src/commands/mod.rs
// PURPOSE: Exposes all command sub-modules under one API surface.
// CONTEXT: Every command takes the caller-owned AppState, reads one snapshot
// and returns Result<T, String> at the app boundary.

pub mod data;
pub mod drill;
pub mod export;
pub mod filters;
pub mod views;

// Re-export commands so they are accessible via crate::commands::*
pub use data::*;
pub use drill::*;
pub use export::*;
pub use filters::*;
pub use views::*;
