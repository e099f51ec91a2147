//! Read and toggle the current user's system proxy settings.
//!
//! [`settings`] talks to the per-user settings store, [`command`] maps the
//! single command-line token onto those operations.

pub mod command;
pub mod settings;

pub use command::{Command, CommandError, Exit};
pub use settings::{InternetSettings, SettingsError};
