use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Eu,
    Col,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Eu => "eu",
            Role::Col => "col",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "eu" => Ok(Role::Eu),
            "col" => Ok(Role::Col),
            other => Err(format!("unknown role '{other}'; expected admin, eu or col")),
        }
    }
}

/// A staff account from the static allow-list.
#[derive(Clone, PartialEq, Eq)]
pub struct AllowedUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub avatar_filename: Option<String>,
}

impl fmt::Debug for AllowedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllowedUser")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .field("avatar_filename", &self.avatar_filename)
            .finish()
    }
}

impl AllowedUser {
    #[must_use]
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            role: self.role,
            avatar_filename: self.avatar_filename.clone(),
        }
    }
}

/// The public part of a user, as carried in the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_filename: Option<String>,
}

/// Parses `ALLOWED_USERS`: comma-separated `username:password:role[:avatar]`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if the list is empty or an entry is
/// malformed.
pub fn parse_allowed_users(raw: &str) -> Result<Vec<AllowedUser>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "ALLOWED_USERS".to_string(),
        reason,
    };

    let users = raw
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .enumerate()
        .map(|(idx, entry)| {
            let parts: Vec<&str> = entry.split(':').collect();
            let (username, password, role, avatar) = match parts.as_slice() {
                [username, password, role] => (*username, *password, *role, None),
                [username, password, role, avatar] => (*username, *password, *role, Some(*avatar)),
                _ => {
                    return Err(invalid(format!(
                        "entry {} must be username:password:role[:avatar]",
                        idx + 1
                    )))
                }
            };
            if username.is_empty() || password.is_empty() {
                return Err(invalid(format!(
                    "entry {} has an empty username or password",
                    idx + 1
                )));
            }
            let role = role.parse::<Role>().map_err(invalid)?;
            Ok(AllowedUser {
                username: username.to_string(),
                password: password.to_string(),
                role,
                avatar_filename: avatar.filter(|a| !a.is_empty()).map(ToOwned::to_owned),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if users.is_empty() {
        return Err(invalid("no users configured".to_string()));
    }

    Ok(users)
}
