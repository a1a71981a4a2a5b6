//! Synchronous command execution library
//!
//! This crate provides a small, blocking interface for running external
//! commands: a cloneable [`Command`] builder, a [`ProcessRunner`] trait as the
//! seam between callers and the operating system, and a [`LocalRunner`] that
//! spawns local processes and captures (or live-streams) their output.

#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod runner;

pub use command::Command;
pub use error::{Error, Result};
pub use runner::{ExitResult, ExitStatus, LocalRunner, OutputMode, ProcessRunner};
