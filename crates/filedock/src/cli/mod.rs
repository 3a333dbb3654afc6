//! CLI module for filedock
//!
//! Each command builds the engines it needs from a [`CommandContext`] and
//! prints either a human table or JSON.

pub mod error;
pub mod output;

pub mod context;

pub mod config;
pub mod convert;
pub mod image;
pub mod records;
pub mod sync;

pub use context::CommandContext;
