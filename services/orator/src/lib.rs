//! Orator Service Library Crate
//!
//! Everything the `orator` binary needs beyond the core: configuration,
//! the terminal console, microphone and speech bindings, and the menu loop.
//! The binary itself is a thin wrapper around this library.

pub mod cli;
pub mod config;
pub mod console;
pub mod menu;
pub mod speech;
pub mod state;
