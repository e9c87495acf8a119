//! Logging login redirect.

use crate::traits::LoginRedirect;

/// [`LoginRedirect`] for non-browser hosts: there is no page to navigate,
/// so the event is logged and the caller acts on the returned error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        tracing::warn!(target_path = login_path, "Session ended, sign in again");
    }
}
