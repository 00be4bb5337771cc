//! Credential configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when no credential source is configured
pub const DEFAULT_TOKEN_ENV: &str = "SERVER_BROWSER_TOKEN";

/// Where the bearer token for the listing endpoint comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialConfig {
    /// Endpoint does not require authentication
    None,

    /// Token written directly into the config
    Token {
        /// The bearer token
        token: String,
    },

    /// Token read from an environment variable
    Env {
        /// Variable name
        #[serde(default = "default_env_var")]
        var: String,
    },

    /// Token read from a `key=value` file on every request
    File {
        /// Path to the file
        path: PathBuf,
        /// Key holding the token
        #[serde(default = "default_file_key")]
        key: String,
    },
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self::Env {
            var: default_env_var(),
        }
    }
}

fn default_env_var() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_file_key() -> String {
    "api_token".to_string()
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_credential_config_default() {
        let config = CredentialConfig::default();
        assert_eq!(
            config,
            CredentialConfig::Env {
                var: "SERVER_BROWSER_TOKEN".to_string()
            }
        );
    }

    #[test]
    fn test_credential_config_file_default_key() {
        let config: CredentialConfig =
            serde_yaml::from_str("type: file\npath: /etc/browser.conf\n").unwrap();
        assert_eq!(
            config,
            CredentialConfig::File {
                path: PathBuf::from("/etc/browser.conf"),
                key: "api_token".to_string(),
            }
        );
    }
}
