//! Role and status enums.
//!
//! The backend sends these as bare strings. Unknown values are preserved in
//! an `Other` variant instead of failing the whole response.

use serde::{Deserialize, Serialize};

/// Account role returned at login.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Store administrator: console access, no cart.
    Admin,
    /// Shopper: can hold a cart and place orders.
    User,
    /// Any role this client does not know about.
    Other(String),
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ADMIN" => Self::Admin,
            "USER" => Self::User,
            _ => Self::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a low-stock alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertStatus {
    /// Raised and waiting for an admin.
    Open,
    /// Acknowledged by an admin.
    Acked,
    /// Any status this client does not know about.
    Other(String),
}

impl AlertStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "OPEN",
            Self::Acked => "ACKED",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AlertStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "OPEN" => Self::Open,
            "ACKED" => Self::Acked,
            _ => Self::Other(s),
        }
    }
}

impl From<AlertStatus> for String {
    fn from(status: AlertStatus) -> Self {
        match status {
            AlertStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_known_values() {
        let role: Role = serde_json::from_str("\"ADMIN\"").expect("valid role");
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).ok().as_deref(), Some("\"USER\""));
    }

    #[test]
    fn test_role_keeps_unknown_values() {
        let role: Role = serde_json::from_str("\"AUDITOR\"").expect("valid role");
        assert_eq!(role, Role::Other("AUDITOR".to_string()));
        assert_eq!(role.to_string(), "AUDITOR");
    }

    #[test]
    fn test_alert_status_parsing() {
        assert_eq!(AlertStatus::from("OPEN".to_string()), AlertStatus::Open);
        assert_eq!(AlertStatus::from("ACKED".to_string()), AlertStatus::Acked);
        assert_eq!(
            AlertStatus::from("SNOOZED".to_string()).as_str(),
            "SNOOZED"
        );
    }
}
