//! Native HTTP transport: `reqwest` with a cookie jar that survives between
//! invocations.

use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use modconsole_shared::{
    client::{ApiRequest, ApiResponse, Method, Transport},
    ApiError,
};
use reqwest::{
    cookie::{CookieStore, Jar},
    header, Url,
};

/// Run `fut`, failing with [`ApiError::Timeout`] once `budget` is spent.
pub async fn with_deadline<T, F>(budget: Duration, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout {
            seconds: budget.as_secs(),
        }),
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() || err.is_body() {
        ApiError::InvalidResponseShape(err.to_string())
    } else {
        ApiError::NetworkUnreachable(err.to_string())
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

pub struct ReqwestTransport {
    client: reqwest::Client,
    base: String,
    origin: Url,
    jar: Arc<Jar>,
    cookie_file: Option<PathBuf>,
}

impl ReqwestTransport {
    /// Transport whose cookies live only as long as the process.
    pub fn new(base: impl Into<String>) -> Result<Self> {
        Self::build(base.into(), None)
    }

    /// Transport that loads cookies from `path` and writes them back after
    /// every exchange.
    pub fn with_cookie_file(base: impl Into<String>, path: impl Into<PathBuf>) -> Result<Self> {
        Self::build(base.into(), Some(path.into()))
    }

    fn build(base: String, cookie_file: Option<PathBuf>) -> Result<Self> {
        let base = base.trim_end_matches('/').to_string();
        let origin = Url::parse(&base).with_context(|| format!("invalid API base URL: {base}"))?;
        let jar = Arc::new(Jar::default());
        if let Some(path) = cookie_file.as_deref() {
            load_cookies(&jar, &origin, path);
        }
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("failed to build http client")?;

        Ok(Self {
            client,
            base,
            origin,
            jar,
            cookie_file,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Cookie header the next request to the API would carry.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.origin)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    async fn persist_cookies(&self) {
        let Some(path) = self.cookie_file.as_deref() else {
            return;
        };
        let result = match self.cookie_header() {
            Some(header) => write_file(path, &header).await,
            None => match tokio::fs::remove_file(path).await {
                Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err),
                _ => Ok(()),
            },
        };
        if let Err(err) = result {
            tracing::warn!(path = %path.display(), "failed to persist cookies: {err}");
        }
    }
}

fn load_cookies(jar: &Jar, origin: &Url, path: &Path) {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return,
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to read cookies: {err}");
            return;
        },
    };
    for pair in raw.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
        jar.add_cookie_str(pair, origin);
    }
}

async fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = request.url(&self.base);
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = with_deadline(request.timeout, async {
            let response = builder.send().await.map_err(map_reqwest_error)?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.map_err(map_reqwest_error)?;
            Ok(ApiResponse {
                status,
                content_type,
                body,
            })
        })
        .await?;

        self.persist_cookies().await;
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_after_fifteen_seconds() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(20)).await;
            Ok::<_, ApiError>(())
        };
        let started = tokio::time::Instant::now();

        let err = with_deadline(Duration::from_secs(15), slow)
            .await
            .expect_err("must time out");

        assert_eq!(err, ApiError::Timeout { seconds: 15 });
        assert_eq!(started.elapsed(), Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn fast_call_is_untouched() {
        let fast = async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok::<_, ApiError>(7)
        };
        assert_eq!(with_deadline(Duration::from_secs(15), fast).await, Ok(7));
    }

    #[test]
    fn rejects_unparsable_base() {
        assert!(ReqwestTransport::new("not a url").is_err());
    }
}
