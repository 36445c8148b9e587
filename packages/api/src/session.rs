use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use store::Principal;

use crate::error::ActorError;

/// The authenticated caller: who they are and the token the backend accepts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub principal: Principal,
    pub token: String,
}

/// Client for the backend's session endpoints.
#[derive(Clone, Debug)]
pub struct SessionClient {
    client: reqwest::Client,
    base_url: String,
}

impl SessionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Where to send the browser to sign in.
    pub fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url)
    }

    /// The signed-in identity, or `None` when there is no session.
    pub async fn current(&self) -> Result<Option<Identity>, ActorError> {
        let request = self.client.get(format!("{}/auth/me", self.base_url));
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let response = request
            .send()
            .await
            .map_err(|e| ActorError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => response
                .json::<Option<Identity>>()
                .await
                .map_err(|e| ActorError::Decode(e.to_string())),
            status => Err(ActorError::Rejected(status.to_string())),
        }
    }

    pub async fn logout(&self) -> Result<(), ActorError> {
        let request = self.client.post(format!("{}/auth/logout", self.base_url));
        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        let response = request
            .send()
            .await
            .map_err(|e| ActorError::Transport(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ActorError::Rejected(response.status().to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_url_trims_trailing_slash() {
        let client = SessionClient::new("http://localhost:4943/");
        assert_eq!(client.login_url(), "http://localhost:4943/auth/login");
    }

    #[test]
    fn test_identity_wire_format() {
        let identity: Identity =
            serde_json::from_str(r#"{"principal":"aaaaa-aa","token":"t0k"}"#).unwrap();
        assert_eq!(identity.principal, Principal::new("aaaaa-aa"));
        assert_eq!(identity.token, "t0k");
    }
}
