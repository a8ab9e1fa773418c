use serde::{Deserialize, Serialize};

/// Caller identity resolved by the surrounding request pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    subject: String,
    is_admin: bool,
}

impl UserIdentity {
    /// Creates a caller identity from authentication data.
    #[must_use]
    pub fn new(subject: impl Into<String>, is_admin: bool) -> Self {
        Self {
            subject: subject.into(),
            is_admin,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns whether the caller may change admin-only fields.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}
