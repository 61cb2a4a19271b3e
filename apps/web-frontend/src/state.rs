use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::config::FrontendConfig;
use crate::error::FrontendError;
use crate::identity::IdentityClient;
use crate::session::SessionStore;
use crate::templates::Templates;

/// Shared resources for every front-end request
pub struct FrontendState {
    pub config: Arc<FrontendConfig>,
    pub identity: IdentityClient,
    pub api: ApiClient,
    pub templates: Templates,
    pub sessions: Arc<SessionStore>,
}

pub fn build_state(config: FrontendConfig) -> Result<FrontendState, FrontendError> {
    let config = Arc::new(config);
    let http = reqwest::Client::builder()
        .timeout(config.jwks_timeout)
        .build()?;

    Ok(FrontendState {
        identity: IdentityClient::new(http.clone(), config.clone())?,
        api: ApiClient::new(http, config.api_endpoint.clone()),
        templates: Templates::new()?,
        sessions: Arc::new(SessionStore::new()),
        config,
    })
}
