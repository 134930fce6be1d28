//! Subcommand implementations.

pub mod account;
pub mod admin;
pub mod args;
pub mod shop;
pub mod watch;

use secrecy::ExposeSecret;
use vetrina_admin::AdminClient;
use vetrina_client::{ApiClient, ApiError, ClientConfig, ConfigError, auth};
use vetrina_storefront::StorefrontClient;

/// Load configuration, letting `--api-url` override `VETRINA_API_URL`.
pub fn load_config(api_url: Option<&str>) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = api_url {
        config.api_url = ClientConfig::for_url(url)?.api_url;
    }
    Ok(config)
}

/// Clients shared by every subcommand. All of them use one session.
pub struct Context {
    config: ClientConfig,
    api: ApiClient,
    storefront: StorefrontClient,
    admin: AdminClient,
}

impl Context {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        Ok(Self {
            storefront: StorefrontClient::new(api.clone()),
            admin: AdminClient::new(api.clone()),
            config,
            api,
        })
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub const fn storefront(&self) -> &StorefrontClient {
        &self.storefront
    }

    pub const fn admin(&self) -> &AdminClient {
        &self.admin
    }

    /// Sign in with `VETRINA_USERNAME` / `VETRINA_PASSWORD`.
    pub async fn sign_in(&self) -> Result<(), Box<dyn std::error::Error>> {
        let credentials = self.config.require_credentials()?;
        let response = auth::login(
            &self.api,
            &credentials.username,
            credentials.password.expose_secret(),
        )
        .await
        .map_err(|e| e.user_message("Login failed"))?;
        tracing::debug!(role = %response.role, "Signed in for command");
        Ok(())
    }

    /// Continue without an account; the catalog stays browsable.
    pub fn browse_as_guest(&self) {
        auth::enter_as_guest(&self.api);
    }
}
