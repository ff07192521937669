use std::env;

use crate::auth::CognitoIdentityProvider;
use crate::error::{NotebookError, Result};
use crate::remote::GraphQlEndpoint;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "NOTEBOOK_HOST";
    pub const PORT: &str = "NOTEBOOK_PORT";
    /// GraphQL endpoint of the managed notes API
    pub const GRAPHQL_ENDPOINT: &str = "APPSYNC_GRAPHQL_ENDPOINT";
    /// Optional API key sent as `x-api-key` alongside the user's token
    pub const API_KEY: &str = "APPSYNC_API_KEY";
    pub const COGNITO_REGION: &str = "COGNITO_REGION";
    pub const COGNITO_CLIENT_ID: &str = "COGNITO_CLIENT_ID";
    /// Overrides the regional identity endpoint (e.g. a local emulator)
    pub const COGNITO_ENDPOINT: &str = "COGNITO_ENDPOINT";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8080;
    pub const COGNITO_REGION: &str = "us-east-1";
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub graphql_endpoint: String,
    pub api_key: Option<String>,
    pub cognito_endpoint: String,
    pub cognito_client_id: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &str| {
            get(key).ok_or_else(|| NotebookError::Config(format!("{} must be set", key)))
        };

        let port = match get(env_vars::PORT) {
            Some(raw) => raw.parse().map_err(|_| {
                NotebookError::Config(format!("{} must be a valid port, got '{}'", env_vars::PORT, raw))
            })?,
            None => defaults::PORT,
        };

        let region = get(env_vars::COGNITO_REGION).unwrap_or_else(|| defaults::COGNITO_REGION.to_string());
        let cognito_endpoint = get(env_vars::COGNITO_ENDPOINT)
            .unwrap_or_else(|| CognitoIdentityProvider::regional_endpoint(&region));

        Ok(Self {
            host: get(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port,
            graphql_endpoint: require(env_vars::GRAPHQL_ENDPOINT)?,
            api_key: get(env_vars::API_KEY),
            cognito_endpoint,
            cognito_client_id: require(env_vars::COGNITO_CLIENT_ID)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn graphql(&self) -> GraphQlEndpoint {
        GraphQlEndpoint {
            url: self.graphql_endpoint.clone(),
            api_key: self.api_key.clone(),
        }
    }

    pub fn identity_provider(&self) -> CognitoIdentityProvider {
        CognitoIdentityProvider::new(&self.cognito_endpoint, &self.cognito_client_id)
    }
}
