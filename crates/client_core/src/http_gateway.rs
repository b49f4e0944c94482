use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use serde::{de::DeserializeOwned, Serialize};
use shared::protocol::{Account, AccountPage};
use tracing::debug;
use url::Url;

use crate::{config::Settings, error::GatewayError, AccountsGateway};

pub const DEFAULT_API_BASE_URL: &str =
    "https://webapi.developers.erstegroup.com/api/csas/public/sandbox/v3/";
const API_KEY_HEADER: &str = "WEB-API-key";
const ACCOUNTS_RESOURCE: &str = "transparentAccounts/";

#[derive(Serialize)]
struct AccountsPageQuery<'a> {
    page: u32,
    size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<&'a str>,
}

/// [`AccountsGateway`] backed by the public transparent accounts REST API.
pub struct HttpAccountsGateway {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    filter: Option<String>,
}

impl HttpAccountsGateway {
    pub fn new(base_url: &str, api_key: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs.max(1)))
            .build()?;
        let mut gateway = Self::with_client(http, &settings.api_base_url, settings.api_key.clone())?;
        gateway.filter = settings.filter.clone();
        Ok(gateway)
    }

    fn with_client(
        http: Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let api_key = api_key.into();
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
            api_key: (!api_key.is_empty()).then_some(api_key),
            filter: None,
        })
    }

    /// Narrows page listings to accounts matching `filter`.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn accounts_url(&self) -> Result<Url, GatewayError> {
        Ok(self.base_url.join(ACCOUNTS_RESOURCE)?)
    }

    fn account_url(&self, id: &str) -> Result<Url, GatewayError> {
        let mut url = self.accounts_url()?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    async fn get_json<T, Q>(&self, url: Url, query: Option<&Q>) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let resource = url.path().to_string();
        debug!(%url, "requesting accounts api");

        let mut request = self
            .http
            .get(url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::status(status.as_u16(), resource));
        }

        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(GatewayError::EmptyBody { resource });
        }
        serde_json::from_slice(&body).map_err(|source| GatewayError::Decode { resource, source })
    }
}

#[async_trait]
impl AccountsGateway for HttpAccountsGateway {
    async fn fetch_accounts_page(
        &self,
        page_index: u32,
        page_size: u32,
    ) -> Result<AccountPage, GatewayError> {
        let query = AccountsPageQuery {
            page: page_index,
            size: page_size,
            filter: self.filter.as_deref(),
        };
        self.get_json(self.accounts_url()?, Some(&query)).await
    }

    async fn fetch_account_by_id(&self, id: &str) -> Result<Account, GatewayError> {
        self.get_json::<_, ()>(self.account_url(id)?, None).await
    }
}

/// Parses the base URL, appending the trailing slash `Url::join` needs to
/// keep the last path segment.
fn normalize_base_url(raw: &str) -> Result<Url, GatewayError> {
    let raw = raw.trim();
    let url = if raw.ends_with('/') {
        Url::parse(raw)?
    } else {
        Url::parse(&format!("{raw}/"))?
    };
    if url.cannot_be_a_base() {
        return Err(GatewayError::UnsupportedBaseUrl(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
#[path = "tests/http_gateway_tests.rs"]
mod tests;
