//! CLI module for tripkit.
//!
//! ```ignore
//! use tripkit::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command, &client, &mut std::io::stdout()).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use std::io::{BufRead, Write};

use crate::api::{PlanRequest, SuggestionRequest};
use crate::auth::token;
use crate::client::ApiClient;
use crate::traits::{CredentialSlot, CredentialStore, HttpClient};

/// Environment variable checked for the password before stdin.
pub const PASSWORD_ENV: &str = "TRIPKIT_PASSWORD";

/// Run a parsed command against `client`, writing results to `out`.
pub async fn run_cli_command<H, S, W>(
    command: CliCommand,
    client: &ApiClient<H, S>,
    out: &mut W,
) -> Result<()>
where
    H: HttpClient,
    S: CredentialStore,
    W: Write,
{
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Invalid(message) => bail!("{}\n\n{}", message, USAGE),
        CliCommand::Login { email } => {
            let password = match std::env::var(PASSWORD_ENV) {
                Ok(password) if !password.is_empty() => password,
                _ => {
                    eprint!("Password: ");
                    read_password(std::io::stdin().lock())?
                }
            };
            client.login(&email, &password).await?;
            if client.is_authenticated().await? {
                writeln!(out, "Signed in as {}", email)?;
            } else {
                bail!("The service accepted the login but returned no token");
            }
        }
        CliCommand::Logout => {
            client.logout().await?;
            writeln!(out, "Signed out")?;
        }
        CliCommand::Status => {
            let line = status_line(client.store().get(CredentialSlot::Access).await?.as_deref());
            writeln!(out, "{}", line)?;
        }
        CliCommand::Profile => {
            let profile = client.get_profile().await?;
            print_json(out, &profile)?;
        }
        CliCommand::Plan { destination, days } => {
            let plan = client
                .generate_travel_plan(&PlanRequest::new(destination, days))
                .await?;
            print_json(out, &plan)?;
        }
        CliCommand::Suggest { destination, query } => {
            let advice = client
                .get_travel_suggestions(&SuggestionRequest { destination, query })
                .await?;
            print_json(out, &advice)?;
        }
    }
    Ok(())
}

/// Read one line as the password, without its line ending.
pub fn read_password<R: BufRead>(mut reader: R) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .wrap_err("Failed to read password")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(eyre!("No password given"));
    }
    Ok(password)
}

/// Describe the stored session.
fn status_line(access: Option<&str>) -> String {
    match access {
        None => "Not signed in".to_string(),
        Some(token) => match token::expires_in(token) {
            Some(0) => "Signed in (access token expired; renews on next request)".to_string(),
            Some(secs) => format!("Signed in (access token expires in {}m {}s)", secs / 60, secs % 60),
            None => "Signed in".to_string(),
        },
    }
}

fn print_json<W: Write, T: serde::Serialize>(out: &mut W, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", text)?;
    Ok(())
}
