//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod crypt;
pub mod media;
pub mod password;

pub use account::{handle_account_command, AccountCommands};
pub use crypt::{handle_decrypt, handle_encrypt, handle_hash};
pub use media::handle_classify;
