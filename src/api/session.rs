//! Session endpoints: who am I, sign-in entry point, plan checkout.

use super::{ApiClient, ApiError};
use crate::model::User;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct MeEnvelope {
    user: User,
}

#[derive(Debug, Deserialize)]
struct CheckoutEnvelope {
    url: String,
}

impl ApiClient {
    /// Resolve the current session.
    ///
    /// `Ok(None)` means the backend answered but no session exists (401/403);
    /// genuine transport and decode failures still surface as errors so the
    /// caller can distinguish "signed out" from "backend unreachable".
    pub async fn fetch_session(&self) -> Result<Option<User>, ApiError> {
        let url = self.endpoint("auth/me")?;
        match self.get_json::<MeEnvelope>(url).await {
            Ok(envelope) => Ok(Some(envelope.user)),
            Err(ApiError::HttpStatus(401 | 403)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Browser entry point for the Google OAuth flow. Opened externally; the
    /// terminal cannot host the redirect.
    pub fn google_signin_url(&self) -> Result<Url, ApiError> {
        self.endpoint("auth/google")
    }

    /// Create a plan-checkout session and return the hosted payment page URL.
    pub async fn create_checkout_session(&self) -> Result<String, ApiError> {
        let url = self.endpoint("subscriptions/create-checkout-session")?;
        let envelope: CheckoutEnvelope = self.post_json_response(url, &()).await?;
        Ok(envelope.url)
    }
}
