//! Verified token claims.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::AuthError;

/// Claim mapping decoded from a token whose signature has been verified.
///
/// B2C carries the user's addresses in an `emails` array and the granted
/// scopes in a space-separated `scp` string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    values: Map<String, Value>,
}

impl Claims {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// All email addresses claimed by the token, `emails` first, then `email`.
    pub fn emails(&self) -> Vec<String> {
        let mut emails: Vec<String> = Vec::new();

        let listed = self
            .values
            .get("emails")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str);
        let single = self.get_str("email");

        for email in listed.chain(single) {
            if !emails.iter().any(|known| known == email) {
                emails.push(email.to_string());
            }
        }

        emails
    }

    /// Scopes granted by the `scp` claim.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.get_str("scp").unwrap_or_default().split_whitespace()
    }

    /// Exact, whole-token match against the `scp` claim.
    pub fn has_scope(&self, required: &str) -> bool {
        self.scopes().any(|scope| scope == required)
    }

    pub fn require_scope(&self, required: &str) -> Result<(), AuthError> {
        if self.has_scope(required) {
            Ok(())
        } else {
            Err(AuthError::Unauthorized)
        }
    }

    /// Best human-readable label for the signed-in user.
    pub fn display_name(&self) -> Option<&str> {
        self.get_str("name")
            .or_else(|| self.get_str("given_name"))
            .or_else(|| {
                self.values
                    .get("emails")
                    .and_then(Value::as_array)
                    .and_then(|emails| emails.first())
                    .and_then(Value::as_str)
            })
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
