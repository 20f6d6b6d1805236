//! HTTP recording fetcher.
//!
//! Downloads MAT files from the CWRU bearing data center. Connection errors,
//! timeouts, HTTP 429 and 5xx responses are retried with exponential backoff;
//! anything else fails immediately.

use super::provider::{AcquisitionError, RecordingFetcher};
use std::time::Duration;

/// How hard to try before giving up on a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): base, 2×base, 4×base, ...
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Run `op` until it succeeds, fails permanently, or the retry budget is spent.
pub fn with_retries<F>(policy: &RetryPolicy, url: &str, mut op: F) -> Result<Vec<u8>, AcquisitionError>
where
    F: FnMut() -> Result<Vec<u8>, AcquisitionError>,
{
    let mut last_error = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let delay = policy.backoff(attempt);
            log::warn!(
                "retrying {url} in {delay:?} (attempt {}/{})",
                attempt + 1,
                policy.max_retries + 1
            );
            std::thread::sleep(delay);
        }

        match op() {
            Ok(bytes) => return Ok(bytes),
            Err(e) if e.is_transient() => last_error = Some(e),
            Err(e) => return Err(e),
        }
    }

    Err(AcquisitionError::RetriesExhausted {
        url: url.to_string(),
        attempts: policy.max_retries + 1,
        last: Box::new(
            last_error.unwrap_or_else(|| AcquisitionError::NetworkUnreachable("no attempt made".into())),
        ),
    })
}

/// Blocking HTTP fetcher.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(policy: RetryPolicy) -> Result<Self, AcquisitionError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(policy.timeout)
            .user_agent(concat!("cwru/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AcquisitionError::Client(e.to_string()))?;

        Ok(Self { client, policy })
    }

    /// A single GET, classified into our error taxonomy.
    fn get_once(&self, url: &str) -> Result<Vec<u8>, AcquisitionError> {
        let resp = self.client.get(url).send().map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                AcquisitionError::NetworkUnreachable(e.to_string())
            } else {
                AcquisitionError::Client(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AcquisitionError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(AcquisitionError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .map_err(|e| AcquisitionError::NetworkUnreachable(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl RecordingFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, AcquisitionError> {
        with_retries(&self.policy, url, || self.get_once(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Answer every request on a local port with the same canned response.
    /// Returns the URL to fetch and a request counter.
    fn serve(status_line: &'static str, body: &'static [u8]) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/files/97.mat", listener.local_addr().unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                {
                    let mut reader = BufReader::new(&stream);
                    let mut line = String::new();
                    loop {
                        line.clear();
                        match reader.read_line(&mut line) {
                            Ok(0) | Err(_) => break,
                            Ok(_) if line == "\r\n" => break,
                            Ok(_) => {}
                        }
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                let head = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(body);
                let _ = stream.flush();
            }
        });

        (url, hits)
    }

    fn instant_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::ZERO,
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn backoff_doubles() {
        let p = RetryPolicy::default();
        assert_eq!(p.backoff(1), Duration::from_millis(500));
        assert_eq!(p.backoff(2), Duration::from_millis(1000));
        assert_eq!(p.backoff(3), Duration::from_millis(2000));
    }

    #[test]
    fn transient_failures_are_retried() {
        let calls = Cell::new(0);
        let result = with_retries(&instant_policy(3), "http://x/1.mat", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(AcquisitionError::NetworkUnreachable("reset".into()))
            } else {
                Ok(vec![1, 2, 3])
            }
        });
        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn permanent_failure_stops_immediately() {
        let calls = Cell::new(0);
        let result = with_retries(&instant_policy(3), "http://x/1.mat", || {
            calls.set(calls.get() + 1);
            Err(AcquisitionError::NotFound {
                url: "http://x/1.mat".into(),
            })
        });
        assert!(matches!(result, Err(AcquisitionError::NotFound { .. })));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn budget_exhaustion_reports_attempts() {
        let calls = Cell::new(0);
        let result = with_retries(&instant_policy(2), "http://x/1.mat", || {
            calls.set(calls.get() + 1);
            Err(AcquisitionError::HttpStatus {
                url: "http://x/1.mat".into(),
                status: 503,
            })
        });
        assert_eq!(calls.get(), 3);
        match result {
            Err(AcquisitionError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, AcquisitionError::HttpStatus { status: 503, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn ok_response_returns_body() {
        let (url, hits) = serve("200 OK", b"MATLAB 5.0 MAT-file");
        let fetcher = HttpFetcher::new(instant_policy(2)).unwrap();
        assert_eq!(fetcher.fetch(&url).unwrap(), b"MATLAB 5.0 MAT-file");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn http_404_is_not_found_without_retry() {
        let (url, hits) = serve("404 Not Found", b"");
        let fetcher = HttpFetcher::new(instant_policy(3)).unwrap();
        match fetcher.fetch(&url) {
            Err(AcquisitionError::NotFound { url: missing }) => assert_eq!(missing, url),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn http_503_is_retried_until_the_budget_runs_out() {
        let (url, hits) = serve("503 Service Unavailable", b"");
        let fetcher = HttpFetcher::new(instant_policy(1)).unwrap();
        match fetcher.fetch(&url) {
            Err(AcquisitionError::RetriesExhausted { attempts, last, .. }) => {
                assert_eq!(attempts, 2);
                assert!(matches!(*last, AcquisitionError::HttpStatus { status: 503, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn http_429_is_retried() {
        let (url, hits) = serve("429 Too Many Requests", b"");
        let fetcher = HttpFetcher::new(instant_policy(2)).unwrap();
        assert!(matches!(
            fetcher.fetch(&url),
            Err(AcquisitionError::RetriesExhausted { attempts: 3, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn http_403_fails_immediately() {
        let (url, hits) = serve("403 Forbidden", b"");
        let fetcher = HttpFetcher::new(instant_policy(3)).unwrap();
        assert!(matches!(
            fetcher.fetch(&url),
            Err(AcquisitionError::HttpStatus { status: 403, .. })
        ));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
