//! XMLHttpRequest-style AJAX client.
//!
//! An [`AjaxRequest`] describes one call; [`send`] serializes it, hands it to
//! a [`Transport`] and dispatches the completion to exactly one of the
//! success/error callbacks. Statuses in `[200, 400)` count as success.

use crate::debug::{self, cat};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Options => "OPTIONS",
            Method::Head => "HEAD",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Insertion-ordered key/value pairs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Params(Vec::new())
    }

    /// Add a pair; any `Display` value is accepted (numbers, bools).
    pub fn with(mut self, key: &str, value: impl std::fmt::Display) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl std::fmt::Display) {
        self.0.push((key.to_string(), value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) {
        self.0.retain(|(k, _)| k != key);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Request payload: a prebuilt string or pairs to form-encode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Form(Params),
}

impl Body {
    pub fn encode(&self) -> String {
        match self {
            Body::Text(s) => s.clone(),
            Body::Form(p) => encode_params(p),
        }
    }
}

/// `encodeURIComponent` over keys and values, joined with `&`.
pub fn encode_params(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Percent-encode like `encodeURIComponent` (which leaves `!'()*` alone).
pub fn encode_component(s: &str) -> String {
    urlencoding::encode(s)
        .replace("%21", "!")
        .replace("%27", "'")
        .replace("%28", "(")
        .replace("%29", ")")
        .replace("%2A", "*")
}

/// Completed exchange. Status 0 means the request never got a response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Response {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        is_success(self.status)
    }
}

/// Success classification used by [`send`]. Redirect statuses count as
/// success here; [`crate::api`] narrows that to 2xx.
pub fn is_success(status: u16) -> bool {
    (200..400).contains(&status)
}

/// Wire-level request handed to a [`Transport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl PreparedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// URL without the query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    /// Decoded query parameters.
    pub fn query(&self) -> Params {
        self.url
            .split_once('?')
            .map(|(_, q)| decode_pairs(q))
            .unwrap_or_default()
    }

    /// Decoded form body.
    pub fn form(&self) -> Params {
        self.body.as_deref().map(decode_pairs).unwrap_or_default()
    }
}

/// Inverse of [`encode_params`]; malformed escapes are kept verbatim.
pub fn decode_pairs(s: &str) -> Params {
    s.split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(k), decode_component(v))
        })
        .collect()
}

fn decode_component(s: &str) -> String {
    urlencoding::decode(s)
        .map(|c| c.into_owned())
        .unwrap_or_else(|_| s.to_string())
}

/// Something that can carry one request and report its completion once.
///
/// Implementations must call `done` at most once. A request that never
/// completes simply never calls back.
pub trait Transport {
    fn send(&self, request: PreparedRequest, done: Box<dyn FnOnce(Response)>);
}

pub type SuccessCallback = Box<dyn FnOnce(&str, &Response)>;
pub type ErrorCallback = Box<dyn FnOnce(&Response)>;

/// One AJAX call.
pub struct AjaxRequest {
    pub method: Method,
    pub url: String,
    pub params: Params,
    pub data: Option<Body>,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    success: SuccessCallback,
    error: ErrorCallback,
}

impl std::fmt::Debug for AjaxRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AjaxRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("params", &self.params)
            .field("data", &self.data)
            .finish()
    }
}

impl AjaxRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        AjaxRequest {
            method,
            url: url.into(),
            params: Params::new(),
            data: None,
            content_type: FORM_CONTENT_TYPE.to_string(),
            headers: Vec::new(),
            success: Box::new(|_, _| {}),
            error: Box::new(|_| {}),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Query-string additions, appended regardless of method.
    pub fn params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn data(mut self, data: Body) -> Self {
        self.data = Some(data);
        self
    }

    pub fn form(self, params: Params) -> Self {
        self.data(Body::Form(params))
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn on_success(mut self, f: impl FnOnce(&str, &Response) + 'static) -> Self {
        self.success = Box::new(f);
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&Response) + 'static) -> Self {
        self.error = Box::new(f);
        self
    }

    /// Split into the wire request and the two callbacks.
    pub fn prepare(self) -> (PreparedRequest, SuccessCallback, ErrorCallback) {
        let query = encode_params(&self.params);
        let url = if query.is_empty() {
            self.url
        } else if self.url.contains('?') {
            format!("{}&{}", self.url, query)
        } else {
            format!("{}?{}", self.url, query)
        };

        let mut headers = vec![
            ("Content-Type".to_string(), self.content_type),
            ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
        ];
        headers.extend(self.headers);

        let body = match self.method {
            Method::Get | Method::Head | Method::Delete => None,
            _ => Some(self.data.map(|d| d.encode()).unwrap_or_default()),
        };

        (
            PreparedRequest {
                method: self.method,
                url,
                headers,
                body,
            },
            self.success,
            self.error,
        )
    }
}

/// Fire `request` over `transport`.
pub fn send<T: Transport + ?Sized>(transport: &T, request: AjaxRequest) {
    let (prepared, success, error) = request.prepare();
    debug::log(cat::AJAX, format!("{} {}", prepared.method, prepared.url));
    let label = format!("{} {}", prepared.method, prepared.path());
    transport.send(
        prepared,
        Box::new(move |resp: Response| {
            debug::log(cat::AJAX, format!("{label} -> {}", resp.status));
            if resp.is_success() {
                success(&resp.body, &resp);
            } else {
                if resp.status == 0 {
                    log::warn!("[ajax] {label} failed without a response");
                }
                error(&resp);
            }
        }),
    );
}
