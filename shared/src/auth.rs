//! Shared-secret access gate.

use tracing::{info, warn};

use crate::{Error, Result};

/// Compare an operator-supplied key with the configured one.
///
/// An empty configured key never matches.
pub fn verify_api_key(input: &str, configured: &str) -> bool {
    !configured.is_empty() && input == configured
}

/// Per-operator session state, owned by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    authenticated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Authenticate with `input`. On mismatch the state is left unchanged.
    pub fn login(&mut self, input: &str, configured: &str) -> Result<()> {
        if verify_api_key(input, configured) {
            self.authenticated = true;
            info!("Operator authenticated");
            Ok(())
        } else {
            warn!("Rejected access key");
            Err(Error::Auth("Invalid access key".to_string()))
        }
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }
}
