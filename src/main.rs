mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::cli::CliInvocation;
use crate::infra::Config;
use std::io::{self, Write};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Config(#[from] crate::infra::ResolveStateDirError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    init_logging();
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = std::env::var("PLANORA_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Command(command) => {
            let config = Config::from_env()?;
            crate::cli::run(command, &config)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} - plan trips against the Planora API\n\nUSAGE:\n  {name} [trips]                          Show your trips and totals (default)\n  {name} trip TRIP_ID                     Show one trip: budget breakdown, hotels, activities\n  {name} plan [PLAN FLAGS]                Create a trip plan, then show it\n  {name} login --email E --password P     Sign in with a password\n  {name} register --username U --email E --password P\n  {name} callback URL                     Finish a sign-in redirect (token, userId, username, email, role, error)\n  {name} callback --provider-session FILE Finish a sign-in from an identity-provider session JSON (- for stdin)\n  {name} whoami                           Print the signed-in user\n  {name} logout\n  {name} --help | --version\n\nPLAN FLAGS:\n  --start-city CITY   Required\n  --start-date DATE   Required, YYYY-MM-DD\n  --end-date DATE     Required, YYYY-MM-DD\n  --budget AMOUNT     Required, greater than 0\n  --travelers N       Default: 1\n  --travel-type TYPE  SOLO|COUPLE|FAMILY (default: SOLO)\n  --plan-type TYPE    BUDGET|BALANCED|COMFORT (default: BALANCED)\n\nENV:\n  PLANORA_API_URL       API base URL (default: http://localhost:8080/api)\n  PLANORA_STATE_DIR     Where the session is kept (default: ~/.planora)\n  PLANORA_TIMEOUT_SECS  Request timeout in seconds (default: 30)\n  PLANORA_LOG           Log filter, e.g. debug (default: warn)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}
