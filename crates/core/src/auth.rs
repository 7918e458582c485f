use serde::{Deserialize, Serialize};

/// Caller information forwarded by the authenticating gateway.
///
/// The role is kept as the raw transport value; catalog validation happens in
/// the domain crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
    subject: String,
    role_name: String,
}

impl CallerIdentity {
    /// Creates a caller identity from gateway-supplied values.
    #[must_use]
    pub fn new(subject: impl Into<String>, role_name: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role_name: role_name.into(),
        }
    }

    /// Returns the stable subject of the caller.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the role name the caller acts under.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.role_name.as_str()
    }
}
