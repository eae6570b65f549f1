//! Account CLI commands
//!
//! Login, logout, password change and status for the stored account.

use clap::Subcommand;

use crate::config::{CryptPaths, Settings};
use crate::crypto::PBKDF2_ITERATIONS;
use crate::error::CryptResult;
use crate::services::AccountService;

use super::password::{read_new_password, read_password};

/// Account commands, flattened into the top-level command list
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Hash the password and store the account credentials
    Login {
        /// Server-issued account identifier
        #[arg(long)]
        account_id: String,
        /// Server-issued salt for hashing the password
        #[arg(long)]
        password_salt: String,
        /// Server-issued salt for deriving the encryption key
        #[arg(long)]
        key_salt: String,
        /// Password (prompted for when not given)
        #[arg(long, env = "MSGCRYPT_PASSWORD", hide_env_values = true, hide = true)]
        password: Option<String>,
    },
    /// Forget the stored account credentials
    Logout,
    /// Re-hash a new password for the stored account
    #[command(alias = "passwd")]
    ChangePassword {
        /// Server-issued salt for hashing the new password
        #[arg(long)]
        password_salt: String,
        /// New password (prompted for when not given)
        #[arg(long, env = "MSGCRYPT_PASSWORD", hide_env_values = true, hide = true)]
        password: Option<String>,
    },
    /// Show the stored account and where it lives
    Status,
}

/// Handle an account command
pub fn handle_account_command(
    paths: &CryptPaths,
    settings: &mut Settings,
    cmd: AccountCommands,
) -> CryptResult<()> {
    let service = AccountService::new(paths);

    match cmd {
        AccountCommands::Login {
            account_id,
            password_salt,
            key_salt,
            password,
        } => {
            let password = read_password(password, "Password: ")?;
            println!("Hashing password...");
            let account =
                service.login(settings, &account_id, &password, &password_salt, &key_salt)?;
            println!("Logged in as {}", account.account_id);
        }
        AccountCommands::Logout => {
            if service.logout(settings)? {
                println!("Logged out.");
            } else {
                println!("Not logged in.");
            }
        }
        AccountCommands::ChangePassword {
            password_salt,
            password,
        } => {
            let password = read_new_password(password)?;
            println!("Hashing password...");
            service.change_password(settings, &password, &password_salt)?;
            println!("Password changed.");
            println!("Messages encrypted under the old password can no longer be decrypted.");
        }
        AccountCommands::Status => show_status(paths, settings),
    }

    Ok(())
}

fn show_status(paths: &CryptPaths, settings: &Settings) {
    println!("msgcrypt Status");
    println!("===============");
    println!("Settings file: {}", paths.settings_file().display());
    println!();

    match &settings.account {
        Some(account) => {
            println!("Account:      {}", account.account_id);
            println!(
                "Logged in at: {}",
                account.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!();
            println!("Key Derivation:");
            println!("  Algorithm:  PBKDF2-HMAC-SHA1");
            println!("  Iterations: {}", PBKDF2_ITERATIONS);
            println!("  Cipher:     AES-256-CBC");
        }
        None => {
            println!("Not logged in.");
            println!("Run 'msgcrypt login' to store credentials.");
        }
    }
}
