//! Core traits for the SambaDNS system
//!
//! - [`CommandExecutor`]: Run the external DNS tool once and capture its output

pub mod command_executor;

pub use command_executor::CommandExecutor;
