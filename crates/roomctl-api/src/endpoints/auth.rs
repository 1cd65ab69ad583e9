// Login and identity endpoints
//
// Login is an OAuth2 password grant posted as a form, not JSON.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::{ApiClient, decode};
use crate::error::Error;
use crate::models::{MeResponse, TokenResponse};

impl ApiClient {
    /// Exchange username and password for a bearer token.
    ///
    /// `POST {auth}/login` with form fields `username`, `password`,
    /// `grant_type=password` and empty `scope`, `client_id`, `client_secret`.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<TokenResponse, Error> {
        let url = self.url(&self.paths().auth_path("login"))?;
        debug!(username, "requesting access token");

        let form = [
            ("username", username),
            ("password", password.expose_secret()),
            ("grant_type", "password"),
            ("scope", ""),
            ("client_id", ""),
            ("client_secret", ""),
        ];
        let resp = self.send(self.request(Method::POST, url).form(&form)).await?;
        decode(resp).await
    }

    /// Identity of the current bearer token.
    ///
    /// `GET {auth}/me`
    pub async fn me(&self) -> Result<MeResponse, Error> {
        let url = self.url(&self.paths().auth_path("me"))?;
        self.get(url).await
    }
}
