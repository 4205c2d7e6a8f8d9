//! Core game module - states, flow, events, and configuration.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod error;
mod events;
mod flow;
mod plugin;
mod states;

pub use config::*;
pub use error::{load_ron, DataLoadError};
pub use events::*;
pub use flow::{gameplay_running, FlowControl, GameFlow};
pub use plugin::{CorePlugin, PauseLock};
pub use states::*;
