//! # Core
//!
//! Application plumbing that knows nothing about any specific frontend.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Config (file/env)    │
//!                    │  • Preferences          │
//!                    │  • Action → Effect      │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  headless  │      │    API     │
//!     │ (ratatui)  │      │  render    │      │  handlers  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: `~/.bcr/config.toml` + env + CLI resolution
//! - [`prefs`]: the injected preference store
//! - [`action`]: the `Action` enum and the `update()` reducer

pub mod action;
pub mod config;
pub mod prefs;
