use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use msgcrypt::cli::{
    handle_account_command, handle_classify, handle_decrypt, handle_encrypt, handle_hash,
    AccountCommands,
};
use msgcrypt::config::{CryptPaths, Settings};

#[derive(Parser)]
#[command(
    name = "msgcrypt",
    version,
    about = "End-to-end encryption for cloud-synced messages",
    long_about = "msgcrypt derives a per-account AES-256 key from your password and \
                  encrypts message bodies into opaque envelopes for the sync server. \
                  Only a password hash is stored; the password and key never touch disk."
)]
struct Cli {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Account(AccountCommands),

    /// Encrypt text into an envelope
    #[command(alias = "enc")]
    Encrypt {
        /// Text to encrypt; reads stdin when omitted or "-"
        text: Option<String>,
    },

    /// Decrypt an envelope back into text
    #[command(alias = "dec")]
    Decrypt {
        /// Envelope to decrypt; reads stdin when omitted or "-"
        envelope: Option<String>,
    },

    /// Print the password hash for a salt
    Hash {
        /// Salt for hashing the password
        #[arg(long)]
        salt: String,
        /// Password (prompted for when not given)
        #[arg(long, env = "MSGCRYPT_PASSWORD", hide_env_values = true, hide = true)]
        password: Option<String>,
    },

    /// Detect linked media in message text
    Classify {
        /// Message text
        text: String,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("msgcrypt - end-to-end encryption for cloud-synced messages");
        println!();
        println!("Run 'msgcrypt --help' for usage information.");
        println!("Run 'msgcrypt login' to get started.");
        return Ok(());
    };

    // Only the commands that touch the stored account read config.json
    match command {
        Commands::Account(cmd) => {
            let (paths, mut settings) = load_settings(cli.verbose)?;
            handle_account_command(&paths, &mut settings, cmd)?;
        }
        Commands::Encrypt { text } => {
            let (paths, settings) = load_settings(cli.verbose)?;
            handle_encrypt(&paths, &settings, text)?;
        }
        Commands::Decrypt { envelope } => {
            let (paths, settings) = load_settings(cli.verbose)?;
            handle_decrypt(&paths, &settings, envelope)?;
        }
        Commands::Hash { salt, password } => {
            init_tracing(&Settings::default().log_filter, cli.verbose);
            handle_hash(&salt, password)?;
        }
        Commands::Classify { text, json } => {
            init_tracing(&Settings::default().log_filter, cli.verbose);
            handle_classify(&text, json)?;
        }
    }

    Ok(())
}

fn load_settings(verbose: bool) -> Result<(CryptPaths, Settings)> {
    let paths = CryptPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings.log_filter, verbose);
    Ok((paths, settings))
}

fn init_tracing(log_filter: &str, verbose: bool) {
    let default_filter = if verbose {
        "msgcrypt=debug".to_string()
    } else {
        log_filter.to_string()
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
