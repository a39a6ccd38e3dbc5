use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use crate::providers::he::error::HeProviderError;

/// Browser User-Agent the console expects.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/67.0.3396.99 Safari/537.36";

/// Cookie-carrying connection to the console plus the login flag.
///
/// Every request gets the browser User-Agent and a Referer pointing at the
/// console origin. Nothing is retried here: network failures, timeouts and
/// non-2xx statuses all come back as `HeProviderError::Transport`.
pub struct Session {
    client: Client,
    base_url: String,
    authenticated: bool,
}

impl Session {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HeProviderError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        let referer = HeaderValue::from_str(&format!("{base_url}/"))
            .map_err(|e| HeProviderError::InvalidInput(format!("base url {base_url}: {e}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(REFERER, referer);

        let client = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            authenticated: false,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }

    pub async fn get(&self, path: &str) -> Result<String, HeProviderError> {
        debug!(method = "GET", path, "console request");
        self.send(self.client.get(self.url(path))).await
    }

    pub async fn get_query<Q>(&self, path: &str, query: &Q) -> Result<String, HeProviderError>
    where
        Q: Serialize + ?Sized,
    {
        debug!(method = "GET", path, "console request");
        self.send(self.client.get(self.url(path)).query(query)).await
    }

    pub async fn post<F>(&self, path: &str, form: &F) -> Result<String, HeProviderError>
    where
        F: Serialize + ?Sized,
    {
        debug!(method = "POST", path, "console request");
        self.send(self.client.post(self.url(path)).form(form)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, HeProviderError> {
        let response = request.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
