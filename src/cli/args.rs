//! Command-line argument parsing for the tripkit CLI.

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in; the password is read from stdin
    Login { email: String },
    /// Forget stored credentials
    Logout,
    /// Show whether a session is stored and when it expires
    Status,
    /// Print the signed-in user's profile
    Profile,
    /// Generate an itinerary
    Plan { destination: String, days: u32 },
    /// Ask for travel advice about a destination
    Suggest { destination: String, query: String },
    /// Arguments that do not form a command
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// The first argument is the program name and is skipped. Flags are
/// checked anywhere on the line; otherwise the first word picks the
/// subcommand.
///
/// # Examples
///
/// ```
/// use tripkit::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["tripkit".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match command.as_str() {
        "login" => match rest {
            [email] => CliCommand::Login {
                email: email.clone(),
            },
            _ => CliCommand::Invalid("usage: tripkit login <email>".to_string()),
        },
        "logout" => CliCommand::Logout,
        "status" => CliCommand::Status,
        "profile" => CliCommand::Profile,
        "plan" => match rest {
            [destination, days] => match days.parse::<u32>() {
                Ok(days) => CliCommand::Plan {
                    destination: destination.clone(),
                    days,
                },
                Err(_) => CliCommand::Invalid(format!("not a number of days: {}", days)),
            },
            _ => CliCommand::Invalid("usage: tripkit plan <destination> <days>".to_string()),
        },
        "suggest" => match rest {
            [destination, query @ ..] if !query.is_empty() => CliCommand::Suggest {
                destination: destination.clone(),
                query: query.join(" "),
            },
            _ => CliCommand::Invalid("usage: tripkit suggest <destination> <question...>".to_string()),
        },
        other => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}

/// Usage text for `--help`.
pub const USAGE: &str = "\
Usage: tripkit <command>

Commands:
  login <email>                    Sign in (password read from stdin)
  logout                           Forget stored credentials
  status                           Show the stored session
  profile                          Print your profile
  plan <destination> <days>        Generate an itinerary
  suggest <destination> <question> Ask for travel advice

Options:
  -h, --help       Show this message
  -V, --version    Show version

Environment:
  TRIPKIT_API_URL        Service base URL
  TRIPKIT_TIMEOUT_SECS   Request timeout in seconds
  TRIPKIT_CREDENTIALS    Credentials file path
  RUST_LOG               Log filter (default: tripkit=info)";
