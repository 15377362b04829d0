//! # Pomodori Core Library
//!
//! Core business logic for the Pomodori session timer. The state machines
//! own no threads: the caller drives them by calling `tick()` once per
//! elapsed second, and the CLI binary is a thin presentation layer over
//! this library.
//!
//! ## Architecture
//!
//! - **Interval**: one work+rest cycle with its own elapsed counter and
//!   phase state machine
//! - **Session**: the ordered queue of intervals, auto-advancing as each
//!   one completes, rendering through an injected [`Renderer`]
//! - **Config**: TOML-based user preferences under `~/.config/pomodori/`
//!
//! ## Key Components
//!
//! - [`Interval`], [`Phase`]: leaf state machine
//! - [`Session`], [`SessionConfig`]: session manager and validated settings
//! - [`Event`]: serializable record of every state change
//! - [`Renderer`], [`StatusView`]: display contract for the presentation layer

pub mod config;
pub mod error;
pub mod events;
pub mod render;
pub mod timer;

pub use config::Config;
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use render::{NullRenderer, Renderer, StatusView};
pub use timer::{Interval, Phase, Session, SessionConfig, TickOutcome};
