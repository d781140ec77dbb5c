use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of the authenticated user that owns a set of queues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdentityScope(String);

impl IdentityScope {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        Self::new(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Identity scope cannot be empty".to_string());
        }
        if value.trim() != value {
            return Err("Identity scope cannot have surrounding whitespace".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for IdentityScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<IdentityScope> for String {
    fn from(value: IdentityScope) -> Self {
        value.0
    }
}
