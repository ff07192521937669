//! Cognito user-pool sign-in via the `USER_PASSWORD_AUTH` flow.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use super::{AuthSession, IdentityProvider, check_credentials};
use crate::error::{NotebookError, Result};

const INITIATE_AUTH_TARGET: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

/// Token lifetime assumed when the response omits `ExpiresIn`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

pub struct CognitoIdentityProvider {
    endpoint: String,
    client_id: String,
}

impl CognitoIdentityProvider {
    pub fn new(endpoint: &str, client_id: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
        }
    }

    /// Regional endpoint, e.g. `https://cognito-idp.eu-west-1.amazonaws.com`
    pub fn regional_endpoint(region: &str) -> String {
        format!("https://cognito-idp.{}.amazonaws.com", region)
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession> {
        check_credentials(username, password)?;

        log::info!("[AUTH] Signing in {} at {}", username, self.endpoint);

        let body = json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.client_id,
            "AuthParameters": {
                "USERNAME": username,
                "PASSWORD": password,
            }
        });

        let resp = crate::http::shared_client()
            .post(format!("{}/", self.endpoint))
            .header(reqwest::header::CONTENT_TYPE, AMZ_JSON)
            .header("X-Amz-Target", INITIATE_AUTH_TARGET)
            .body(body.to_string())
            .send()
            .await
            .map_err(|e| NotebookError::Auth(format!("Identity service unreachable: {}", e)))?;

        let status = resp.status();
        let body_text = resp
            .text()
            .await
            .map_err(|e| NotebookError::Auth(format!("Failed to read sign-in response: {}", e)))?;

        let session = parse_initiate_auth(username, status.is_success(), &body_text, Utc::now());
        match &session {
            Ok(s) => log::info!("[AUTH] {} signed in (expires_at: {})", s.username, s.expires_at),
            Err(e) => log::warn!("[AUTH] Sign-in for {} rejected: {}", username, e),
        }
        session
    }
}

/// Turn an `InitiateAuth` response body into a session.
fn parse_initiate_auth(
    username: &str,
    success: bool,
    body: &str,
    now: DateTime<Utc>,
) -> Result<AuthSession> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| NotebookError::Auth(format!("Invalid sign-in response JSON: {}", e)))?;

    if !success {
        let message = json
            .get("message")
            .or_else(|| json.get("Message"))
            .and_then(|v| v.as_str())
            .or_else(|| json.get("__type").and_then(|v| v.as_str()))
            .unwrap_or("Sign-in rejected");
        return Err(NotebookError::Auth(message.to_string()));
    }

    if let Some(challenge) = json.get("ChallengeName").and_then(|v| v.as_str()) {
        return Err(NotebookError::Auth(format!(
            "Additional challenge required: {}",
            challenge
        )));
    }

    let result = json
        .get("AuthenticationResult")
        .ok_or_else(|| NotebookError::Auth("Missing AuthenticationResult".to_string()))?;

    let id_token = result
        .get("IdToken")
        .and_then(|v| v.as_str())
        .ok_or_else(|| NotebookError::Auth("Missing IdToken".to_string()))?
        .to_string();

    let expires_in = result
        .get("ExpiresIn")
        .and_then(|v| v.as_i64())
        .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

    let expires_at = Duration::try_seconds(expires_in)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| NotebookError::Auth(format!("Invalid ExpiresIn: {}", expires_in)))?;

    Ok(AuthSession {
        username: username.to_string(),
        id_token,
        expires_at,
    })
}
