//! HTTP client for a remote observation agent.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tokio::net::TcpStream;

use crate::detection::Runtime;
use crate::error::{Result, WatcherError};
use crate::protocol::{
    ErrorBody, ObservationSnapshot, ObserveRequest, API_KEY_HEADER, DEFAULT_PORT, OBSERVE_PATH,
};

/// Upper bound on establishing a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound on a single observation call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that can report the runtimes installed on one host.
#[async_trait]
pub trait RuntimeSource: Send + Sync {
    /// Found runtimes on the host.
    async fn observe_runtimes(&self) -> Result<Vec<Runtime>>;

    /// Release the connection. Safe to call more than once.
    async fn close(&mut self);
}

/// Opens [`RuntimeSource`]s for hosts.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str, api_key: Option<&str>) -> Result<Box<dyn RuntimeSource>>;
}

/// Connects to real agents over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteConnector;

#[async_trait]
impl Connector for RemoteConnector {
    async fn connect(&self, host: &str, api_key: Option<&str>) -> Result<Box<dyn RuntimeSource>> {
        let client = RemoteClient::connect(host, api_key).await?;
        Ok(Box::new(client))
    }
}

/// A connection to one observation agent.
#[derive(Debug)]
pub struct RemoteClient {
    host: String,
    observe_url: Url,
    api_key: Option<String>,
    http: Option<reqwest::Client>,
}

impl RemoteClient {
    /// Connect to the agent at `host`.
    ///
    /// `host` may be `name`, `name:port` or a full `http://` URL; without a
    /// scheme or port the default agent port is assumed. Fails fast when the
    /// host cannot be reached within [`CONNECT_TIMEOUT`].
    pub async fn connect(host: &str, api_key: Option<&str>) -> Result<Self> {
        let base = normalize_base_url(host)?;
        check_reachable(host, &base).await?;

        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WatcherError::Connect {
                host: host.to_string(),
                message: e.to_string(),
            })?;

        let observe_url = base.join(OBSERVE_PATH).map_err(|e| WatcherError::Connect {
            host: host.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Connected to {}", observe_url);

        Ok(Self {
            host: host.to_string(),
            observe_url,
            api_key: api_key.map(str::to_string),
            http: Some(http),
        })
    }

    /// Fetch the full snapshot, limited to `filter` when it is not empty.
    pub async fn observe(&self, filter: &[String]) -> Result<ObservationSnapshot> {
        let http = self.http.as_ref().ok_or(WatcherError::ClientClosed)?;

        let mut request = http
            .post(self.observe_url.clone())
            .json(&ObserveRequest::filtered(filter));
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ObservationSnapshot>()
                .await
                .map_err(|e| WatcherError::Rpc {
                    status: status.as_u16(),
                    message: format!("invalid response: {}", e),
                });
        }

        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => WatcherError::Unauthenticated { message },
            StatusCode::FORBIDDEN => WatcherError::PermissionDenied { message },
            _ => WatcherError::Rpc {
                status: status.as_u16(),
                message,
            },
        })
    }

    /// Found runtimes on the host.
    pub async fn observe_runtimes(&self) -> Result<Vec<Runtime>> {
        self.observe_filtered(&[]).await
    }

    /// Found runtimes on the host, limited to the named ones.
    pub async fn observe_filtered(&self, filter: &[String]) -> Result<Vec<Runtime>> {
        let snapshot = self.observe(filter).await?;
        Ok(snapshot
            .runtimes
            .into_iter()
            .filter(Runtime::is_found)
            .collect())
    }

    /// A single runtime by name, reported as not found when absent.
    pub async fn observe_runtime(&self, name: &str) -> Result<Runtime> {
        let runtimes = self.observe_runtimes().await?;
        Ok(runtimes
            .into_iter()
            .find(|r| r.name() == name)
            .unwrap_or_else(|| Runtime::not_found(name)))
    }

    /// Drop the underlying HTTP client. Later calls fail with `ClientClosed`.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            tracing::debug!("Closed connection to {}", self.host);
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> WatcherError {
        if e.is_timeout() {
            WatcherError::Timeout {
                host: self.host.clone(),
            }
        } else {
            WatcherError::Connect {
                host: self.host.clone(),
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl RuntimeSource for RemoteClient {
    async fn observe_runtimes(&self) -> Result<Vec<Runtime>> {
        RemoteClient::observe_runtimes(self).await
    }

    async fn close(&mut self) {
        RemoteClient::close(self);
    }
}

/// Turn a user-supplied host into the agent's base URL.
///
/// A bare `name` or `name:port` gets an `http://` scheme, and the default
/// agent port when no port is given. Explicit URLs are kept as they are.
pub fn normalize_base_url(host: &str) -> Result<Url> {
    let trimmed = host.trim();
    let has_scheme = trimmed.contains("://");
    let candidate = if has_scheme {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let mut url = Url::parse(&candidate).map_err(|e| WatcherError::Connect {
        host: host.to_string(),
        message: format!("invalid address: {}", e),
    })?;

    if url.host_str().is_none() {
        return Err(WatcherError::Connect {
            host: host.to_string(),
            message: "invalid address: missing host".to_string(),
        });
    }

    if !has_scheme && !has_explicit_port(trimmed) {
        // only fails for URLs that cannot carry a port, which http URLs can
        let _ = url.set_port(Some(DEFAULT_PORT));
    }

    Ok(url)
}

/// Whether a scheme-less host carries its own `:port` suffix.
///
/// `Url::port` hides ports equal to the scheme default, so this looks at the
/// raw text instead.
fn has_explicit_port(host: &str) -> bool {
    let authority = host.split('/').next().unwrap_or_default();
    let after_bracket = match authority.rfind(']') {
        Some(idx) => &authority[idx + 1..],
        None => authority,
    };
    match after_bracket.rsplit_once(':') {
        Some((_, port)) => !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

async fn check_reachable(host: &str, base: &Url) -> Result<()> {
    let (Some(name), Some(port)) = (base.host_str(), base.port_or_known_default()) else {
        return Err(WatcherError::Connect {
            host: host.to_string(),
            message: "invalid address".to_string(),
        });
    };
    let authority = format!("{}:{}", name, port);

    match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(&authority)).await {
        Ok(Ok(_stream)) => Ok(()),
        Ok(Err(e)) => Err(WatcherError::Connect {
            host: host.to_string(),
            message: e.to_string(),
        }),
        Err(_) => Err(WatcherError::Timeout {
            host: host.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn snapshot_body() -> serde_json::Value {
        json!({
            "runtimes": [
                {"name": "java", "version": "17.0.8", "path": "/usr/bin/java", "found": true},
                {"name": "go", "version": "1.21.5", "path": "/usr/local/go/bin/go", "found": true},
                {"name": "redis", "version": "", "path": "", "found": false}
            ],
            "system_info": {"hostname": "web-1", "os": "linux", "kernel": "6.1.0"},
            "timestamp": 1700000000
        })
    }

    #[test]
    fn bare_host_gets_scheme_and_default_port() {
        let url = normalize_base_url("server1").unwrap();
        assert_eq!(url.as_str(), "http://server1:9090/");
    }

    #[test]
    fn host_with_port_gets_scheme() {
        let url = normalize_base_url("10.0.0.5:7000").unwrap();
        assert_eq!(url.as_str(), "http://10.0.0.5:7000/");
    }

    #[test]
    fn explicit_default_http_port_is_kept() {
        let url = normalize_base_url("server1:80").unwrap();
        assert_eq!(url.port_or_known_default(), Some(80));
        assert_eq!(url.as_str(), "http://server1/");

        let url = normalize_base_url("[::1]:80").unwrap();
        assert_eq!(url.port_or_known_default(), Some(80));
    }

    #[test]
    fn explicit_port_detection() {
        assert!(has_explicit_port("server1:80"));
        assert!(has_explicit_port("[::1]:9090"));
        assert!(!has_explicit_port("server1"));
        assert!(!has_explicit_port("[::1]"));
        assert!(!has_explicit_port("server1:"));
    }

    #[test]
    fn explicit_url_is_kept() {
        let url = normalize_base_url("https://agents.example.com").unwrap();
        assert_eq!(url.as_str(), "https://agents.example.com/");
    }

    #[test]
    fn ipv6_host() {
        let url = normalize_base_url("[::1]:9090").unwrap();
        assert_eq!(url.host_str(), Some("[::1]"));
        assert_eq!(url.port(), Some(9090));
    }

    #[test]
    fn invalid_host_is_connect_error() {
        assert!(matches!(
            normalize_base_url("http://").unwrap_err(),
            WatcherError::Connect { .. }
        ));
    }

    #[tokio::test]
    async fn observe_runtimes_sends_key_and_maps_found() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(OBSERVE_PATH)
                    .header(API_KEY_HEADER, "secret");
                then.status(200).json_body(snapshot_body());
            })
            .await;

        let client = RemoteClient::connect(&server.address().to_string(), Some("secret"))
            .await
            .unwrap();
        let runtimes = client.observe_runtimes().await.unwrap();

        mock.assert_async().await;
        let names: Vec<_> = runtimes.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["java", "go"]);
    }

    #[tokio::test]
    async fn observe_filtered_sends_filter() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path(OBSERVE_PATH)
                    .json_body(json!({"runtime_filter": ["go"]}));
                then.status(200).json_body(snapshot_body());
            })
            .await;

        let client = RemoteClient::connect(&server.base_url(), None).await.unwrap();
        client.observe_filtered(&["go".to_string()]).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn observe_runtime_by_name() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(OBSERVE_PATH);
                then.status(200).json_body(snapshot_body());
            })
            .await;

        let client = RemoteClient::connect(&server.base_url(), None).await.unwrap();

        let go = client.observe_runtime("go").await.unwrap();
        assert_eq!(go.version(), Some("1.21.5"));

        let redis = client.observe_runtime("redis").await.unwrap();
        assert!(!redis.is_found());

        let nginx = client.observe_runtime("nginx").await.unwrap();
        assert!(!nginx.is_found());
        assert_eq!(nginx.name(), "nginx");
    }

    #[tokio::test]
    async fn unauthorized_maps_to_unauthenticated() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(OBSERVE_PATH);
                then.status(401)
                    .json_body(json!({"code": "unauthenticated", "message": "missing API key"}));
            })
            .await;

        let client = RemoteClient::connect(&server.base_url(), None).await.unwrap();
        let err = client.observe_runtimes().await.unwrap_err();

        assert!(
            matches!(err, WatcherError::Unauthenticated { ref message } if message == "missing API key")
        );
    }

    #[tokio::test]
    async fn forbidden_maps_to_permission_denied() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(OBSERVE_PATH);
                then.status(403)
                    .json_body(json!({"code": "permission_denied", "message": "invalid API key"}));
            })
            .await;

        let client = RemoteClient::connect(&server.base_url(), Some("wrong"))
            .await
            .unwrap();
        let err = client.observe_runtimes().await.unwrap_err();

        assert!(matches!(err, WatcherError::PermissionDenied { .. }));
    }

    #[tokio::test]
    async fn other_status_maps_to_rpc() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path(OBSERVE_PATH);
                then.status(500).body("boom");
            })
            .await;

        let client = RemoteClient::connect(&server.base_url(), None).await.unwrap();
        let err = client.observe_runtimes().await.unwrap_err();

        assert!(matches!(err, WatcherError::Rpc { status: 500, .. }));
    }

    #[tokio::test]
    async fn calls_after_close_fail() {
        let server = MockServer::start_async().await;
        let mut client = RemoteClient::connect(&server.base_url(), None).await.unwrap();

        client.close();
        client.close();

        assert!(matches!(
            client.observe_runtimes().await.unwrap_err(),
            WatcherError::ClientClosed
        ));
    }

    #[tokio::test]
    async fn unreachable_host_fails_to_connect() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = RemoteClient::connect(&addr.to_string(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, WatcherError::Connect { .. }));
    }
}
