//! HTTP transport shared by the catalog and library clients

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ApiError;

const USER_AGENT: &str = concat!("shelfctl/", env!("CARGO_PKG_VERSION"));

/// Transport-level settings, resolved from `[http]` in the config file
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Resend idempotent requests once after a connect failure
    pub retry_on_connect_failure: bool,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(30),
            write_timeout: Duration::from_secs(30),
            retry_on_connect_failure: true,
        }
    }
}

/// A configured HTTP client. Cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    retry_on_connect_failure: bool,
}

impl Transport {
    pub fn new(settings: &HttpSettings) -> Result<Self, ApiError> {
        Self::from_builder(client_builder(settings), settings.retry_on_connect_failure)
    }

    fn from_builder(
        builder: ClientBuilder,
        retry_on_connect_failure: bool,
    ) -> Result<Self, ApiError> {
        let client = builder.build().map_err(ApiError::Client)?;
        Ok(Self {
            client,
            retry_on_connect_failure,
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request, logging it and classifying transport failures.
    ///
    /// Non-2xx responses are returned as-is; status mapping belongs to the caller.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let request = request.build().map_err(ApiError::Client)?;
        let method = request.method().clone();
        let url = request.url().clone();

        let retry = if self.retry_on_connect_failure && is_idempotent(&method) {
            request.try_clone()
        } else {
            None
        };

        debug!(%method, %url, "sending request");

        let result = match self.client.execute(request).await {
            Err(err) if err.is_connect() => match retry {
                Some(again) => {
                    debug!(%method, %url, "connect failed, retrying once");
                    self.client.execute(again).await
                }
                None => Err(err),
            },
            other => other,
        };

        match result {
            Ok(response) => {
                debug!(status = response.status().as_u16(), %url, "received response");
                Ok(response)
            }
            Err(err) => {
                let err = ApiError::network(err);
                warn!(%method, %url, error = %err, "request failed");
                Err(err)
            }
        }
    }
}

fn client_builder(settings: &HttpSettings) -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    // reqwest has no write timeout, so the three budgets form one deadline
    let deadline = settings.connect_timeout + settings.read_timeout + settings.write_timeout;

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .read_timeout(settings.read_timeout)
        .timeout(deadline)
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::PUT | Method::DELETE | Method::HEAD)
}

/// Read a JSON body, treating an empty body or a bare `null` as `EmptyResponse`.
pub async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await.map_err(ApiError::network)?;
    let body = body.trim();
    if body.is_empty() || body == "null" {
        return Err(ApiError::EmptyResponse);
    }
    Ok(serde_json::from_str(body)?)
}

/// Join a base URL and a path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkKind;
    use reqwest::dns::{Addrs, Name, Resolve, Resolving};
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    const FLAKY_URL: &str = "http://library.test/api/books";

    /// Points the first lookup at a closed port and every later one at `live`
    struct FlakyResolver {
        lookups: Arc<AtomicUsize>,
        closed: SocketAddr,
        live: SocketAddr,
    }

    impl Resolve for FlakyResolver {
        fn resolve(&self, _name: Name) -> Resolving {
            let addr = if self.lookups.fetch_add(1, Ordering::SeqCst) == 0 {
                self.closed
            } else {
                self.live
            };
            Box::pin(async move {
                let addrs: Addrs = Box::new(std::iter::once(addr));
                Ok::<_, Box<dyn std::error::Error + Send + Sync>>(addrs)
            })
        }
    }

    async fn flaky_transport(live: SocketAddr, retry: bool) -> (Transport, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let closed = listener.local_addr().unwrap();
        drop(listener);

        let lookups = Arc::new(AtomicUsize::new(0));
        let resolver = FlakyResolver {
            lookups: lookups.clone(),
            closed,
            live,
        };
        let builder = client_builder(&fast_settings())
            .no_proxy()
            .dns_resolver(Arc::new(resolver));
        (Transport::from_builder(builder, retry).unwrap(), lookups)
    }

    fn fast_settings() -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_millis(200),
            read_timeout: Duration::from_millis(200),
            write_timeout: Duration::from_millis(200),
            retry_on_connect_failure: true,
        }
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8080/", "/api/books"),
            "http://localhost:8080/api/books"
        );
        assert_eq!(
            join_url("https://www.googleapis.com/books/v1", "volumes"),
            "https://www.googleapis.com/books/v1/volumes"
        );
    }

    #[tokio::test]
    async fn test_sends_json_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = Transport::new(&fast_settings()).unwrap();
        let url = join_url(&server.url(), "/health");
        let response = transport
            .send(transport.client().get(&url))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_decode_empty_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let transport = Transport::new(&fast_settings()).unwrap();
        let url = join_url(&server.url(), "/empty");
        let response = transport.send(transport.client().get(&url)).await.unwrap();
        let result: Result<serde_json::Value, _> = decode(response).await;

        assert!(matches!(result, Err(ApiError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_read_timeout_is_classified() {
        // Accepts connections but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let transport = Transport::new(&fast_settings()).unwrap();
        let url = format!("http://{}/health", addr);
        let err = transport
            .send(transport.client().get(&url))
            .await
            .unwrap_err();

        match err {
            ApiError::Network { kind, .. } => assert_eq!(kind, NetworkKind::Timeout),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_classified() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = Transport::new(&fast_settings()).unwrap();
        let url = format!("http://{}/health", addr);
        let err = transport
            .send(transport.client().get(&url))
            .await
            .unwrap_err();

        match err {
            ApiError::Network { kind, .. } => assert_eq!(kind, NetworkKind::ConnectionRefused),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn test_only_idempotent_methods_are_retried() {
        assert!(is_idempotent(&Method::GET));
        assert!(is_idempotent(&Method::PUT));
        assert!(is_idempotent(&Method::DELETE));
        assert!(!is_idempotent(&Method::POST));
        assert!(!is_idempotent(&Method::PATCH));
    }

    #[tokio::test]
    async fn test_get_is_resent_once_after_connect_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/books")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let live = server.host_with_port().parse().unwrap();
        let (transport, lookups) = flaky_transport(live, true).await;
        let response = transport
            .send(transport.client().get(FLAKY_URL))
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_is_never_resent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/books")
            .with_status(201)
            .with_body("{}")
            .expect(0)
            .create_async()
            .await;

        let live = server.host_with_port().parse().unwrap();
        let (transport, lookups) = flaky_transport(live, true).await;
        let err = transport
            .send(transport.client().post(FLAKY_URL).body("{}"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Network {
                kind: NetworkKind::ConnectionRefused,
                ..
            }
        ));
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_no_resend_when_retry_disabled() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/books")
            .expect(0)
            .create_async()
            .await;

        let live = server.host_with_port().parse().unwrap();
        let (transport, lookups) = flaky_transport(live, false).await;
        let err = transport
            .send(transport.client().get(FLAKY_URL))
            .await
            .unwrap_err();

        assert_eq!(err.code(), "connection_refused");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
        mock.assert_async().await;
    }
}
