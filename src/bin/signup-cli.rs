use std::time::Duration;

use clap::{Parser, Subcommand};

use flaky_signup::client::SignupClient;
use flaky_signup::resilience::RetryPolicy;
use flaky_signup::signup::{PendingFlag, RecoveryPhrase, SignupForm};

#[derive(Parser)]
#[command(name = "signup-cli")]
#[command(about = "Drive the flaky signup service from the command line", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    /// Per-request timeout in milliseconds.
    #[arg(long, default_value_t = 1500)]
    timeout_ms: u64,

    /// Attempts per call, including the first.
    #[arg(long, default_value_t = 4)]
    attempts: u32,

    /// Seed for retry jitter, to replay a run's timing.
    #[arg(long)]
    jitter_seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the server's flakiness configuration
    Config,
    /// Check whether a display name is taken
    CheckName { name: String },
    /// Submit a signup
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to the password.
        #[arg(long)]
        confirm_password: Option<String>,
        /// Recovery words; repeat the flag for several.
        #[arg(long = "recovery", num_args = 1..)]
        recovery: Vec<String>,
        #[arg(long)]
        display_name: Option<String>,
        #[arg(long, default_value = "passed")]
        captcha: String,
        /// Fill the honeypot field.
        #[arg(long)]
        middle_initial: Option<String>,
        /// Claim a display-name check is still running.
        #[arg(long)]
        pending: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let retry = RetryPolicy {
        max_attempts: cli.attempts,
        ..RetryPolicy::default()
    };
    let mut client = SignupClient::new(&cli.url, Duration::from_millis(cli.timeout_ms), retry)?;
    if let Some(seed) = cli.jitter_seed {
        client = client.with_jitter_seed(seed);
    }

    match cli.command {
        Commands::Config => {
            let config = client.static_config().await?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::CheckName { name } => {
            let taken = client.check_display_name(&name).await?;
            println!("{name}: {}", if taken { "taken" } else { "available" });
        }
        Commands::Submit {
            name,
            email,
            password,
            confirm_password,
            recovery,
            display_name,
            captcha,
            middle_initial,
            pending,
        } => {
            let form = SignupForm {
                name,
                email,
                confirm_password: confirm_password.unwrap_or_else(|| password.clone()),
                password,
                recovery_phrase: (!recovery.is_empty()).then_some(RecoveryPhrase::Words(recovery)),
                display_name,
                captcha: Some(captcha),
                middle_initial,
                display_name_check_pending: pending.then(PendingFlag::pending),
            };
            let outcome = client.submit(&form).await?;
            if !outcome.status.is_success() {
                eprintln!("Error: signup returned status {}", outcome.status);
            }
            println!("{}", serde_json::to_string_pretty(&outcome.body)?);
        }
    }

    Ok(())
}
