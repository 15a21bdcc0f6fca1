//! Password credentials and keyboard-interactive answers

use std::fmt;

/// User and password for an iDRAC login
#[derive(Clone)]
pub struct Credentials {
    /// Login user
    pub user: String,
    password: String,
}

impl Credentials {
    /// Create credentials
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    /// Password used for both password and keyboard-interactive auth
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Responder that answers interactive prompts with this password
    #[must_use]
    pub fn responder(&self) -> PasswordResponder {
        PasswordResponder {
            password: self.password.clone(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Answers keyboard-interactive info requests.
///
/// The iDRAC asks for the password through a single prompt, but servers may
/// send several prompts per request; every one of them receives the password.
#[derive(Clone)]
pub struct PasswordResponder {
    password: String,
}

impl PasswordResponder {
    /// Build the answer list for an info request with `prompts` prompts
    #[must_use]
    pub fn answer(&self, prompts: usize) -> Vec<String> {
        vec![self.password.clone(); prompts]
    }
}

impl fmt::Debug for PasswordResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResponder").finish_non_exhaustive()
    }
}
