use std::rc::Rc;

use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use modconsole_shared::{
    client::{ApiRequest, ApiResponse, Method},
    ApiError, ModerationApi, Transport,
};
#[cfg(not(feature = "mock"))]
use modconsole_shared::RemoteClient;
use wasm_bindgen::JsValue;
use web_sys::{AbortController, RequestCredentials};

#[cfg(not(feature = "mock"))]
use crate::config::API_BASE;

/// `fetch`-backed transport. Cookies ride along with every call and the
/// request is aborted once its time budget is spent.
#[cfg_attr(feature = "mock", allow(dead_code, reason = "mock builds never hit the network"))]
#[derive(Debug, Clone)]
pub struct GlooTransport {
    base: String,
}

#[cfg_attr(feature = "mock", allow(dead_code, reason = "mock builds never hit the network"))]
impl GlooTransport {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
        }
    }
}

fn network_error(err: impl std::fmt::Display) -> ApiError {
    ApiError::NetworkUnreachable(err.to_string())
}

fn builder_for(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    }
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = request.url(&self.base);
        let budget = request.timeout;
        let controller =
            AbortController::new().map_err(|err| network_error(format!("{err:?}")))?;
        let signal = controller.signal();

        let builder = builder_for(request.method, &url)
            .credentials(RequestCredentials::Include)
            .abort_signal(Some(&signal))
            .header("Accept", "application/json");
        let outgoing = match &request.body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(network_error)?;

        let exchange = Box::pin(async move {
            let response = outgoing.send().await.map_err(network_error)?;
            let status = response.status();
            let content_type = response.headers().get("content-type");
            let body = response.text().await.map_err(network_error)?;
            Ok(ApiResponse {
                status,
                content_type,
                body,
            })
        });
        let millis = u32::try_from(budget.as_millis()).unwrap_or(u32::MAX);
        let deadline = TimeoutFuture::new(millis);

        match select(exchange, deadline).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => {
                controller.abort();
                Err(ApiError::Timeout {
                    seconds: budget.as_secs(),
                })
            },
        }
    }
}

/// The data source the console talks to: the backend, or the seeded mock
/// data when built with `--features mock`.
#[cfg(not(feature = "mock"))]
pub fn app_api() -> Rc<dyn ModerationApi> {
    Rc::new(RemoteClient::new(GlooTransport::new(API_BASE)))
}

#[cfg(feature = "mock")]
pub fn app_api() -> Rc<dyn ModerationApi> {
    use modconsole_shared::{persist::IdentityCache, MockModerationApi};

    let api = MockModerationApi::seeded();
    let api = match crate::storage::LocalStorageIdentityCache.load() {
        Some(identity) if identity.is_moderator => api.with_session(identity),
        _ => api,
    };
    Rc::new(api)
}

pub fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}
