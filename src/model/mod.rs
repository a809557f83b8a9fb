//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (tracks, view mode, UI state)
//! - `cursor`: Wrapping playlist cursor
//! - `playback`: Playback session and request tokens
//! - `app_model`: Main application model with state management methods

mod types;
mod cursor;
mod playback;
mod app_model;

// Re-export all public types for convenient access
pub use types::{TrackRef, UiState, ViewMode};

pub use playback::{PlaybackSession, PlayerPhase, RefreshToken};

pub use app_model::{AppModel, PlayRequest};
