//! Stored connection parameters

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_port() -> u16 {
    3306
}

/// Parameters needed to open a connection to a database server
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    /// Stable identifier referenced by `QueryRequest::connection_id`
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Database selected when the connection opens
    #[serde(default)]
    pub database: Option<String>,
}

impl ConnectionProfile {
    pub fn new(id: impl Into<String>, host: impl Into<String>, username: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            host: host.into(),
            port: default_port(),
            username: username.into(),
            password: String::new(),
            database: None,
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_defaults_when_deserializing() {
        let profile: ConnectionProfile = serde_json::from_str(
            r#"{"id": "local", "host": "127.0.0.1", "username": "root"}"#,
        )
        .unwrap();

        assert_eq!(profile.port, 3306);
        assert_eq!(profile.database, None);
        assert_eq!(profile.display_name(), "local");
    }

    #[test]
    fn test_debug_omits_password() {
        let mut profile = ConnectionProfile::new("local", "127.0.0.1", "root");
        profile.password = "hunter2".to_string();
        assert!(!format!("{:?}", profile).contains("hunter2"));
    }
}
