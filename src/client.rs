//! Authenticated JSON client for one remote service.
//!
//! Each service gets its own [`ApiClient`] holding the base URL and bearer
//! token — there is no process-wide session state. All helpers map network
//! failures and non-2xx replies to [`Error::Transport`], keeping whatever
//! the remote said in the message.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// HTTP client bound to a single base URL and bearer token.
pub struct ApiClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// Build a client. `insecure_tls` disables certificate verification and
    /// must stay off outside lab controllers with self-signed certs.
    pub fn new(base_url: &str, token: &str, insecure_tls: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_tls)
            .build()
            .map_err(|e| Error::transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http,
        })
    }

    /// GET `path` and deserialize the JSON reply.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.execute(self.http.get(join(&self.base_url, path)), path).await?;
        Ok(resp.json().await?)
    }

    /// POST `path` with no body and deserialize the JSON reply.
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.execute(self.http.post(join(&self.base_url, path)), path).await?;
        Ok(resp.json().await?)
    }

    /// POST a JSON body and deserialize the reply.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let req = self.http.post(join(&self.base_url, path)).json(body);
        let resp = self.execute(req, path).await?;
        Ok(resp.json().await?)
    }

    /// POST a JSON body, caring only that the remote accepted it.
    pub async fn post_json_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<()> {
        let req = self.http.post(join(&self.base_url, path)).json(body);
        self.execute(req, path).await?;
        Ok(())
    }

    /// POST with no body, caring only that the remote accepted it.
    pub async fn post_unit(&self, path: &str) -> Result<()> {
        self.execute(self.http.post(join(&self.base_url, path)), path).await?;
        Ok(())
    }

    /// DELETE `path`.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.http.delete(join(&self.base_url, path)), path).await?;
        Ok(())
    }

    async fn execute(
        &self,
        req: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response> {
        let resp = req.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(Error::Transport {
            status: Some(status.as_u16()),
            message: format!("{path}: {status}: {}", body.trim()),
        })
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base, path.trim_start_matches('/'))
}
