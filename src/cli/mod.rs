//! Command-line interface module.

mod args;
pub mod build;
pub mod common;
pub mod import;
pub mod init;
pub mod links;
pub mod prune;
pub mod render;
pub mod validate;

pub use args::{Cli, Commands, RenderFormat};
