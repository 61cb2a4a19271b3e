use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;

use crate::error::FrontendError;

/// Status and text body of an account API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiReply {
    pub status: u16,
    pub body: String,
}

impl ApiReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn into_error(self) -> FrontendError {
        FrontendError::Api {
            status: self.status,
            body: self.body,
        }
    }
}

/// Calls the account API on behalf of the signed-in user.
pub struct ApiClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub async fn public(&self) -> Result<ApiReply, FrontendError> {
        send(self.http.get(format!("{}/public", self.endpoint))).await
    }

    pub async fn account_info(&self, access_token: &str) -> Result<ApiReply, FrontendError> {
        send(
            self.http
                .get(format!("{}/acctinfo", self.endpoint))
                .header(AUTHORIZATION, format!("Bearer {access_token}")),
        )
        .await
    }

    pub async fn update_beneficiary(
        &self,
        access_token: &str,
        name: &str,
    ) -> Result<ApiReply, FrontendError> {
        send(
            self.http
                .get(format!("{}/acctupdate", self.endpoint))
                .header(AUTHORIZATION, format!("Bearer {access_token}"))
                .query(&[("name", name)]),
        )
        .await
    }
}

async fn send(request: RequestBuilder) -> Result<ApiReply, FrontendError> {
    let resp = request.send().await?;
    let status = resp.status().as_u16();
    let body = resp.text().await?;
    Ok(ApiReply { status, body })
}
