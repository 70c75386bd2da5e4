//! UI rendering module for the TUI application.
//!
//! This module provides the drop zone, the file dialog, the drop-target
//! collaborator, theming, and the runtime that drives them.

pub mod components;
pub mod drop_target;
pub mod main_component;
pub mod runtime;
pub mod theme;
pub mod utils;
