//! Identity collaborator contracts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{Contract, Presence, Text, Validator};

/// Credentials exchanged for a bearer token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
    pub return_secure_token: bool,
}

impl TokenRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            return_secure_token: true,
        }
    }
}

impl std::fmt::Debug for TokenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("return_secure_token", &self.return_secure_token)
            .finish()
    }
}

impl Contract for TokenRequest {
    const NAME: &'static str = "TokenRequest";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "email", Presence::Required, Text::NonEmpty);
        v.text(obj, "password", Presence::Required, Text::NonEmpty);
        v.boolean(obj, "returnSecureToken", Presence::Required);
    }
}

/// Identity response; only the token is used.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id_token: String,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("id_token", &"***")
            .finish()
    }
}

impl Contract for TokenResponse {
    const NAME: &'static str = "TokenResponse";

    fn check(value: &Value, v: &mut Validator) {
        let Some(obj) = v.object(value) else { return };
        v.text(obj, "idToken", Presence::Required, Text::NonEmpty);
    }
}
