//! ChatGen token tool.
//!
//! Produces and inspects the tokens stored as encrypted message bodies, using
//! the same key derivation as the chat client.
//!
//! # Usage
//!
//! ```bash
//! # Encrypt as user1 writing to user2
//! chatgen encrypt --from user1 --to user2 "Hello!"
//!
//! # Decrypt as user2 (argument order does not matter)
//! chatgen decrypt --from user2 --to user1 AAECAwQFBgcICQoLEvS9Pl1dBowbTQHYPnbVQUTKi17Y1w==
//!
//! # Classify a stored body
//! chatgen detect "hello there"
//! ```

use std::io::{self, Write};

use chatgen_crypto::{
    CipherConfig, CipherError, ConversationCipher, DEFAULT_ITERATIONS, DEFAULT_SALT,
    is_likely_encrypted,
};
use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// ChatGen message token tool
#[derive(Parser, Debug)]
#[command(name = "chatgen")]
#[command(about = "Encrypt, decrypt and classify ChatGen message tokens")]
#[command(version)]
struct Args {
    /// PBKDF2 salt shared by every client [default: the deployed salt]
    #[arg(long, global = true)]
    salt: Option<String>,

    /// PBKDF2 iteration count
    #[arg(long, global = true, default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encrypt a message for the conversation between two users
    Encrypt {
        /// Sender id
        #[arg(long)]
        from: String,
        /// Recipient id
        #[arg(long)]
        to: String,
        /// Message text
        text: String,
    },

    /// Decrypt a stored token
    Decrypt {
        /// One participant id
        #[arg(long)]
        from: String,
        /// The other participant id
        #[arg(long)]
        to: String,
        /// Token as stored in the message body
        token: String,
    },

    /// Report whether text looks like a token (heuristic)
    Detect {
        /// Stored message body
        text: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("encryption failed, see log for details")]
    EncryptionFailed,

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

fn cipher(args: &Args) -> Result<ConversationCipher, CliError> {
    let salt = args.salt.as_ref().map_or(DEFAULT_SALT, String::as_bytes);
    let config = CipherConfig::new(salt, args.iterations)?;
    Ok(ConversationCipher::new(config.with_key_cache(false)))
}

fn run(args: &Args, out: &mut impl Write) -> Result<(), CliError> {
    match &args.command {
        Command::Encrypt { from, to, text } => {
            let token = cipher(args)?.encrypt(text, from, to).ok_or(CliError::EncryptionFailed)?;
            writeln!(out, "{token}")?;
        },
        Command::Decrypt { from, to, token } => {
            let plaintext = cipher(args)?.decrypt(token, from, to).inspect_err(|err| {
                tracing::error!(kind = err.kind(), "could not decrypt token");
            })?;
            writeln!(out, "{plaintext}")?;
        },
        Command::Detect { text } => {
            let verdict = if is_likely_encrypted(text) { "encrypted" } else { "plaintext" };
            writeln!(out, "{verdict}")?;
        },
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    tracing::debug!(iterations = args.iterations, "chatgen starting");

    run(&args, &mut io::stdout().lock())?;

    Ok(())
}
