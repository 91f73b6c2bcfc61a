use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Identity under which entries and bills are authored.
///
/// Passed explicitly to every operation that needs to know who is acting;
/// nothing in the crate reads identity from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Result<Self, ValidationError> {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            return Err(ValidationError::MissingSession);
        }
        Ok(Self {
            user_id,
            display_name: None,
            token: None,
            started_at: Utc::now(),
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Converts an optional session into a hard precondition.
    pub fn require(session: Option<&Session>) -> Result<&Session, ValidationError> {
        session.ok_or(ValidationError::MissingSession)
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}
