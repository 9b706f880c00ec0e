//! Native HTTP transport for the command-line client.
//! The browser build uses XHR through `platform::web` instead.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::ajax::{Method, PreparedRequest, Response, Transport};

/// Blocking reqwest transport with a cookie jar, so a `login` carries its
/// session into the calls that follow.
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
    rt: tokio::runtime::Runtime,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout_ms: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("building http client")?;
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building tokio runtime")?;
        Ok(ReqwestTransport {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            rt,
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    async fn execute(&self, request: PreparedRequest) -> Result<Response, reqwest::Error> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Head => reqwest::Method::HEAD,
        };
        let mut rb = self.client.request(method, self.url(&request.url));
        for (name, value) in &request.headers {
            rb = rb.header(name, value);
        }
        if let Some(body) = request.body {
            rb = rb.body(body);
        }
        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(Response { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: PreparedRequest, done: Box<dyn FnOnce(Response)>) {
        let label = format!("{} {}", request.method, request.url);
        let resp = match self.rt.block_on(self.execute(request)) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("[pg][net] {label} failed: {e}");
                Response::new(0, "")
            }
        };
        done(resp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_the_base() {
        let t = ReqwestTransport::new("http://pg.local:8080/", 1000).unwrap();
        assert_eq!(t.url("/api/device"), "http://pg.local:8080/api/device");
        assert_eq!(t.url("https://other/x"), "https://other/x");
    }
}
