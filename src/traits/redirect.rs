//! Login redirect side effect.
//!
//! When a session can't be recovered the client hands control back to the
//! embedding application through this trait. The caller still receives an
//! explicit error; the redirect is a notification, not the only signal.

/// Trait for the "send the user back to login" side effect.
pub trait LoginRedirect: Send + Sync {
    /// Invoked once per unrecoverable session failure.
    fn redirect_to_login(&self, login_path: &str);
}
