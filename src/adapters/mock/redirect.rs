//! Redirect recorder for testing.

use std::sync::{Arc, Mutex};

use crate::traits::LoginRedirect;

/// Records every login redirect instead of performing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingRedirect {
    targets: Arc<Mutex<Vec<String>>>,
}

impl RecordingRedirect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of redirects observed.
    pub fn count(&self) -> usize {
        self.targets.lock().unwrap().len()
    }

    /// Redirect targets, in order.
    pub fn targets(&self) -> Vec<String> {
        self.targets.lock().unwrap().clone()
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self, login_path: &str) {
        self.targets.lock().unwrap().push(login_path.to_string());
    }
}
