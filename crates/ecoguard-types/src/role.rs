//! Operator roles
//!
//! Identity is established outside the triage engine. Callers hand in an
//! [`OperatorClaim`] that has already been verified; the engine only decides
//! what that role may do.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Citizen reporter; submits analyses, never triages
    User,
    /// Government official working the response console
    Official,
    Admin,
}

impl Role {
    /// May read, dispatch and delete reports
    pub fn can_triage(&self) -> bool {
        matches!(self, Role::Official | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Official => "OFFICIAL",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "OFFICIAL" => Ok(Role::Official),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(ValidationError::UnknownLabel {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

/// A caller identity that has already been verified upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorClaim {
    subject: String,
    role: Role,
}

impl OperatorClaim {
    pub fn verified(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Role {
        self.role
    }
}
