use alert_relay_cli::{run_cli, CliError};
use tracing::error;

fn main() {
    if let Err(e) = run_cli() {
        error!("CLI error: {}", e);
        eprintln!("Error: {}", e);

        let exit_code = match e {
            CliError::Configuration(_) => 1,
            CliError::InvalidPayload { .. } => 2,
            CliError::Layout(_) | CliError::Resolve(_) => 3,
            CliError::Output { .. } => 4,
            CliError::Io(_) => 5,
        };

        std::process::exit(exit_code);
    }
}
