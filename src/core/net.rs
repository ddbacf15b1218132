// src/core/net.rs
//
// HTTP GET with bounded retry and mirror fallback.
//
// Each fetch walks two candidate urls (reader mirror and direct, order set by
// `mirror_first`). Every candidate gets its own retry budget; only when all of
// them are spent does the caller see a single FetchError.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Url;
use tracing::{debug, warn};

use super::pace;
use crate::config::options::NetOptions;
use crate::error::{FetchError, TransportError};

/// A single GET. Non-success statuses are errors.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        (**self).get(url)
    }
}

/// Blocking reqwest client.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(net: &NetOptions) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(net.user_agent.as_str())
            .timeout(Duration::from_secs(net.timeout_secs))
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, TransportError> {
        let network = |e: reqwest::Error| TransportError::Network {
            url: url.to_string(),
            message: e.to_string(),
        };
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,text/plain;q=0.9,*/*;q=0.8")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status { url: url.to_string(), status: status.as_u16() });
        }
        resp.text().map_err(network)
    }
}

/// Reader-proxy rewrite of `url`; `None` when `url` is not an absolute http(s) url.
pub fn mirror_url(prefix: &str, url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }
    Some(format!("{prefix}{url}"))
}

/// Always two entries. A mirror that cannot be computed degrades to `url`.
pub fn candidates(url: &str, net: &NetOptions) -> [String; 2] {
    let mirror = mirror_url(&net.mirror_prefix, url).unwrap_or_else(|| url.to_string());
    if net.mirror_first {
        [mirror, url.to_string()]
    } else {
        [url.to_string(), mirror]
    }
}

pub struct Fetcher<T> {
    transport: T,
    net: NetOptions,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, net: NetOptions) -> Self {
        Self { transport, net }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let max = self.net.max_retries.max(1);
        let cands = candidates(url, &self.net);
        let mut attempts = 0u32;
        let mut last = None;

        for (i, cand) in cands.iter().enumerate() {
            // degraded mirror: same url twice, one budget is enough
            if i > 0 && cands[i - 1] == *cand {
                continue;
            }
            for attempt in 1..=max {
                attempts += 1;
                match self.transport.get(cand) {
                    Ok(body) => {
                        debug!(url = %cand, attempt, bytes = body.len(), "fetched");
                        return Ok(body);
                    }
                    Err(e) => {
                        debug!(url = %cand, attempt, error = %e, "attempt failed");
                        last = Some(e);
                        if attempt < max {
                            pace::pause(self.net.retry_base_ms * u64::from(attempt));
                        }
                    }
                }
            }
            warn!(url = %cand, retries = max, "candidate exhausted");
        }

        let last = last.unwrap_or_else(|| TransportError::Network {
            url: url.to_string(),
            message: "no attempt made".into(),
        });
        Err(FetchError { url: url.to_string(), attempts, last })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Fails every url except the ones listed in `ok`.
    struct Scripted {
        ok: Vec<(String, String)>,
        calls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn failing() -> Self {
            Self { ok: Vec::new(), calls: RefCell::new(Vec::new()) }
        }
        fn serving(url: &str, body: &str) -> Self {
            Self { ok: vec![(url.into(), body.into())], calls: RefCell::new(Vec::new()) }
        }
    }

    impl Transport for Scripted {
        fn get(&self, url: &str) -> Result<String, TransportError> {
            self.calls.borrow_mut().push(url.to_string());
            self.ok
                .iter()
                .find(|(u, _)| u == url)
                .map(|(_, b)| b.clone())
                .ok_or(TransportError::Status { url: url.into(), status: 503 })
        }
    }

    fn net(mirror_first: bool, max_retries: u32) -> NetOptions {
        NetOptions { mirror_first, max_retries, retry_base_ms: 0, ..NetOptions::default() }
    }

    const URL: &str = "https://shop.example/best/toys";

    #[test]
    fn mirror_rewrites_absolute_urls_only() {
        assert_eq!(
            mirror_url("https://r.jina.ai/", URL).as_deref(),
            Some("https://r.jina.ai/https://shop.example/best/toys")
        );
        assert_eq!(mirror_url("https://r.jina.ai/", "not a url"), None);
        assert_eq!(mirror_url("https://r.jina.ai/", "ftp://host/x"), None);
    }

    #[test]
    fn candidate_order_follows_policy() {
        let [a, b] = candidates(URL, &net(true, 2));
        assert!(a.starts_with("https://r.jina.ai/"));
        assert_eq!(b, URL);

        let [a, b] = candidates(URL, &net(false, 2));
        assert_eq!(a, URL);
        assert!(b.starts_with("https://r.jina.ai/"));
    }

    #[test]
    fn exhausts_both_candidates_before_failing() {
        let f = Fetcher::new(Scripted::failing(), net(true, 2));
        let err = f.fetch(URL).unwrap_err();
        assert_eq!(err.attempts, 4);
        assert_eq!(f.transport().calls.borrow().len(), 4);
        assert!(matches!(err.last, TransportError::Status { status: 503, .. }));

        let calls = f.transport().calls.borrow();
        assert!(calls[0].starts_with("https://r.jina.ai/"));
        assert!(calls[1].starts_with("https://r.jina.ai/"));
        assert_eq!(calls[2], URL);
        assert_eq!(calls[3], URL);
    }

    #[test]
    fn falls_through_to_direct_url() {
        let f = Fetcher::new(Scripted::serving(URL, "<html>ok</html>"), net(true, 2));
        assert_eq!(f.fetch(URL).unwrap(), "<html>ok</html>");
        assert_eq!(f.transport().calls.borrow().len(), 3);
    }

    #[test]
    fn stops_at_first_success() {
        let mirror = format!("https://r.jina.ai/{URL}");
        let f = Fetcher::new(Scripted::serving(&mirror, "md"), net(true, 3));
        assert_eq!(f.fetch(URL).unwrap(), "md");
        assert_eq!(f.transport().calls.borrow().len(), 1);
    }

    #[test]
    fn malformed_url_is_not_fetched_twice() {
        let f = Fetcher::new(Scripted::failing(), net(true, 2));
        let err = f.fetch("relative/path").unwrap_err();
        assert_eq!(err.attempts, 2);
        assert!(f.transport().calls.borrow().iter().all(|u| u == "relative/path"));
    }
}
