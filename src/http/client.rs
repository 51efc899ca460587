//! Low-level HTTP client: `ExchangeHttp`.
//!
//! One method per REST endpoint. Returns wire types (conversion to domain types
//! happens in the domain sub-clients). Internal to the crate; `DashboardClient`
//! wraps this.

use crate::domain::kline::wire::KlineRow;
use crate::domain::orderbook::wire::DepthResponse;
use crate::error::HttpError;
use crate::http::retry::RetryPolicy;
use crate::shared::Interval;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Low-level HTTP client for the exchange's public market-data API.
#[derive(Clone)]
pub struct ExchangeHttp {
    base_url: String,
    client: Client,
    retry: RetryPolicy,
}

impl ExchangeHttp {
    pub fn new(base_url: &str, retry: RetryPolicy) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            retry,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Klines ───────────────────────────────────────────────────────────

    pub(crate) fn klines_url(
        &self,
        symbol: &str,
        interval: Interval,
        start_ms: i64,
        end_ms: i64,
        limit: u32,
    ) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&startTime={}&endTime={}&limit={}",
            self.base_url,
            urlencoding::encode(symbol),
            interval.as_str(),
            start_ms,
            end_ms,
            limit
        )
    }

    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: Interval,
        start_ms: i64,
        end_ms: i64,
        limit: u32,
    ) -> Result<Vec<KlineRow>, HttpError> {
        let url = self.klines_url(symbol, interval, start_ms, end_ms, limit);
        self.get(&url).await
    }

    // ── Depth ────────────────────────────────────────────────────────────

    pub(crate) fn depth_url(&self, symbol: &str, limit: u32) -> String {
        format!(
            "{}/api/v3/depth?symbol={}&limit={}",
            self.base_url,
            urlencoding::encode(symbol),
            limit
        )
    }

    pub async fn get_depth(&self, symbol: &str, limit: u32) -> Result<DepthResponse, HttpError> {
        let url = self.depth_url(symbol, limit);
        self.get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let Some(config) = self.retry.config() else {
            return self.do_request(url).await;
        };

        let mut attempt = 0;
        loop {
            let err = match self.do_request::<T>(url).await {
                Ok(resp) => return Ok(resp),
                Err(e) => e,
            };

            let retryable = match &err {
                HttpError::ServerError { status, .. } => config.retries_status(*status),
                HttpError::RateLimited { .. } | HttpError::Timeout => true,
                HttpError::Reqwest(re) => re.is_connect() || re.is_timeout() || re.is_request(),
                _ => false,
            };
            if !retryable {
                return Err(err);
            }
            if attempt >= config.max_retries {
                return Err(HttpError::MaxRetriesExceeded {
                    attempts: attempt + 1,
                    last_error: err.to_string(),
                });
            }

            let delay = match &err {
                HttpError::RateLimited { retry_after_ms: Some(ms) } => config.clamp_hint(*ms),
                _ => config.delay_for_attempt(attempt),
            };
            tracing::debug!(
                attempt = attempt + 1,
                max = config.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying {}",
                url
            );
            futures_timer::Delay::new(delay).await;
            attempt += 1;
        }
    }

    async fn do_request<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let retry_after_ms = resp
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 | 403 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            // 418 is the exchange's ban response after ignoring 429s.
            418 | 429 => Err(HttpError::RateLimited { retry_after_ms }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

/// `Retry-After` in whole seconds, as milliseconds.
fn parse_retry_after(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok().map(|s| s.saturating_mul(1000))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::http::retry::RetryConfig;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Two daily klines, 2024-05-01 and 2024-05-02.
    pub(crate) const KLINES_BODY: &str = concat!(
        r#"[[1714521600000,"100.0","110.0","95.0","105.0","50.0",1714607999999,"0",1,"0","0","0"],"#,
        r#"[1714608000000,"105.0","108.0","101.0","102.0","40.0",1714694399999,"0",1,"0","0","0"]]"#
    );

    /// A canned response: status, extra header lines (`name: value\r\n`), body.
    pub(crate) type Canned = (u16, &'static str, &'static str);

    /// Answer one request per connection with the canned responses in order.
    /// The handle yields how many requests were served.
    pub(crate) async fn serve(responses: Vec<Canned>) -> (String, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let mut served = 0;
            for (status, headers, body) in responses {
                let (mut tcp, _) = listener.accept().await.unwrap();
                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = tcp.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&chunk[..n]);
                }
                let response = format!(
                    "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n{}\r\n{}",
                    status,
                    body.len(),
                    headers,
                    body
                );
                tcp.write_all(response.as_bytes()).await.unwrap();
                let _ = tcp.shutdown().await;
                served += 1;
            }
            served
        });

        (base_url, handle)
    }

    pub(crate) fn fast_retry() -> RetryPolicy {
        RetryPolicy::Custom(
            RetryConfig {
                initial_delay: Duration::from_millis(5),
                ..RetryConfig::default()
            }
            .without_jitter()
            .with_max_retries(2),
        )
    }

    fn http() -> ExchangeHttp {
        ExchangeHttp::new("https://api.example.com/", RetryPolicy::None).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(http().base_url(), "https://api.example.com");
    }

    #[test]
    fn test_klines_url() {
        let url = http().klines_url("BTCUSDT", Interval::Day1, 1, 2, 1000);
        assert_eq!(
            url,
            "https://api.example.com/api/v3/klines?symbol=BTCUSDT&interval=1d&startTime=1&endTime=2&limit=1000"
        );
    }

    #[test]
    fn test_depth_url() {
        assert_eq!(
            http().depth_url("ETHUSDT", 5),
            "https://api.example.com/api/v3/depth?symbol=ETHUSDT&limit=5"
        );
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("3"), Some(3000));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
    }

    #[tokio::test]
    async fn test_server_error_then_success_retries_once() {
        let (base, server) = serve(vec![(503, "", "busy"), (200, "", KLINES_BODY)]).await;
        let http = ExchangeHttp::new(&base, fast_retry()).unwrap();

        let rows = http.get_klines("BTCUSDT", Interval::Day1, 0, 1, 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].open, "100.0");
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rate_limit_hint_is_honoured() {
        let (base, server) =
            serve(vec![(429, "retry-after: 0\r\n", ""), (200, "", KLINES_BODY)]).await;
        let http = ExchangeHttp::new(&base, fast_retry()).unwrap();

        assert!(http.get_klines("BTCUSDT", Interval::Day1, 0, 1, 10).await.is_ok());
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let (base, server) = serve(vec![(503, "", "a"), (503, "", "b"), (503, "", "c")]).await;
        let http = ExchangeHttp::new(&base, fast_retry()).unwrap();

        let err = http.get_depth("BTCUSDT", 5).await.unwrap_err();
        match err {
            HttpError::MaxRetriesExceeded { attempts, last_error } => {
                assert_eq!(attempts, 3);
                assert!(last_error.contains("503"));
            }
            other => panic!("expected MaxRetriesExceeded, got {:?}", other),
        }
        assert_eq!(server.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (base, server) = serve(vec![(404, "", "no such route")]).await;
        let http = ExchangeHttp::new(&base, fast_retry()).unwrap();

        let err = http.get_depth("BTCUSDT", 5).await.unwrap_err();
        assert!(matches!(err, HttpError::NotFound(ref body) if body == "no such route"));
        assert_eq!(server.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let (base, server) = serve(vec![
            (401, "", ""),
            (418, "", ""),
            (429, "retry-after: 2\r\n", ""),
            (400, "", r#"{"code":-1121,"msg":"Invalid symbol."}"#),
            (500, "", "oops"),
        ])
        .await;
        let http = ExchangeHttp::new(&base, RetryPolicy::None).unwrap();

        let mut errors = Vec::new();
        for _ in 0..5 {
            errors.push(http.get_depth("BTCUSDT", 5).await.unwrap_err());
        }
        assert!(matches!(errors[0], HttpError::Unauthorized));
        assert!(matches!(errors[1], HttpError::RateLimited { retry_after_ms: None }));
        assert!(matches!(errors[2], HttpError::RateLimited { retry_after_ms: Some(2000) }));
        assert!(matches!(errors[3], HttpError::BadRequest(ref body) if body.contains("-1121")));
        assert!(matches!(errors[4], HttpError::ServerError { status: 500, .. }));
        assert_eq!(server.await.unwrap(), 5);
    }
}
