//! Version string for the tripkit CLI.

/// The current version of tripkit, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text printed by `--version`.
pub fn version_line() -> String {
    format!("tripkit {}", VERSION)
}
