//! Core game module - states, events, config and fundamental helpers.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod hooks;
mod input;
mod plugin;
mod states;
mod tween;

pub use config::*;
pub use error::*;
pub use events::*;
pub use hooks::*;
pub use input::*;
pub use plugin::CorePlugin;
pub use states::*;
pub use tween::*;
