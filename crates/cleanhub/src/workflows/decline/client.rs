use std::fmt;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;

use super::domain::{
    AppointmentId, DeclineAction, DeclineResponseBody, HomeDetailsPatch, HomeId,
};
use super::resolver::DeclineResponseApi;
use super::session::ApiError;

/// HTTP implementation of the decline-response contract. Error-status
/// responses still carry a `DeclineResponseBody`, so the body is parsed
/// regardless of status and only transport problems become `ApiError`.
#[derive(Clone)]
pub struct MarketplaceClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl MarketplaceClient {
    pub fn new(base_url: Url) -> Self {
        Self::with_token(base_url, None)
    }

    pub fn with_token(base_url: Url, token: Option<String>) -> Self {
        let http = Client::builder()
            .user_agent("cleanhub/0.1")
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|err| ApiError(format!("invalid endpoint '{path}': {err}")))
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<DeclineResponseBody, ApiError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request
            .send()
            .await
            .map_err(|err| ApiError(err.to_string()))?;
        let status = response.status();
        response
            .json::<DeclineResponseBody>()
            .await
            .map_err(|err| ApiError(format!("unreadable response ({status}): {err}")))
    }
}

#[async_trait]
impl DeclineResponseApi for MarketplaceClient {
    async fn submit_decline_response(
        &self,
        appointment: AppointmentId,
        action: DeclineAction,
    ) -> Result<DeclineResponseBody, ApiError> {
        let endpoint =
            self.endpoint(&format!("appointments/{}/decline-response", appointment.0))?;
        self.execute(self.http.post(endpoint).json(&json!({ "action": action })))
            .await
    }

    async fn confirm_marketplace_listing(
        &self,
        appointment: AppointmentId,
    ) -> Result<DeclineResponseBody, ApiError> {
        let endpoint =
            self.endpoint(&format!("appointments/{}/confirm-marketplace", appointment.0))?;
        self.execute(self.http.post(endpoint)).await
    }

    async fn update_home_details(
        &self,
        home: HomeId,
        patch: &HomeDetailsPatch,
    ) -> Result<DeclineResponseBody, ApiError> {
        let endpoint = self.endpoint(&format!("user-info/home/{}", home.0))?;
        self.execute(self.http.put(endpoint).json(patch)).await
    }
}
