//! Adrenaline: send code to an edit service and show the proposed fix
//!
//! This crate provides:
//! - Application configuration (AppConfig)
//! - Instruction presets (FixRequest)
//! - Edit-suggestion providers (EditProvider, OpenAiEditProvider)
//! - The fix pipeline that annotates a proposal against the submitted code
//! - File saving and shell command helpers

pub mod cli;
pub mod command;
pub mod config;
pub mod files;
pub mod fix;
pub mod provider;
pub mod render;
pub mod request;

pub use cli::Cli;
pub use command::{run_command, CommandOutput};
pub use config::AppConfig;
pub use files::save_lines;
pub use fix::{propose_fix, FixError, FixProposal};
pub use provider::{EditProvider, OpenAiEditProvider, ProviderError};
pub use request::FixRequest;
