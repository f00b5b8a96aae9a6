//! HTTP transport seam.
//!
//! The API client describes each round trip as an [`ApiRequest`] and gets
//! back an [`ApiResponse`]; [`ReqwestTransport`] is the production
//! implementation. Status codes are NOT interpreted here: any response,
//! including 4xx/5xx, is `Ok`. Only a missing response is an error.

use async_trait::async_trait;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, LOCATION, SET_COOKIE};
use reqwest::{Client, Method, redirect};
use sitemirror_core::{MirrorError, Result};

/// Body encodings the mirror server accepts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// `multipart/form-data` text fields, in order.
    Multipart(Vec<(String, String)>),
}

impl RequestBody {
    pub fn form<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Multipart(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Value of a multipart field, if present.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Self::Multipart(fields) => fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            Self::Empty => None,
        }
    }
}

/// One outgoing request, fully resolved.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    /// Query parameters, URL-encoded by the transport.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub follow_redirects: bool,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            follow_redirects: true,
        }
    }

    /// Value of a header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets a header, replacing any existing value with the same name.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// The parts of a response the client layer looks at.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub set_cookie: Vec<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn html(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_content_type("text/html; charset=utf-8")
            .with_body(body.into().into_bytes())
    }

    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status)
            .with_content_type("application/json")
            .with_body(value.to_string().into_bytes())
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_set_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie.push(cookie.into());
        self
    }

    pub fn with_content_disposition(mut self, value: impl Into<String>) -> Self {
        self.content_disposition = Some(value.into());
        self
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Value of the named cookie from the `Set-Cookie` headers.
    ///
    /// Empty values (cookie deletion) are treated as absent.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookie.iter().find_map(|header| {
            let pair = header.split(';').next()?.trim();
            let (key, value) = pair.split_once('=')?;
            (key.trim() == name && !value.trim().is_empty()).then(|| value.trim().to_string())
        })
    }
}

/// Performs exactly one HTTP round trip per call.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends the request.
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: A response arrived, whatever its status
    /// - `Err(MirrorError::Connectivity)`: No response was received
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// reqwest-backed transport.
///
/// Holds one client that follows redirects and one that does not, since
/// login needs to see the server's redirect and its cookies. No timeout is
/// configured; reqwest's defaults apply.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    no_redirect_client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let no_redirect_client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .map_err(|e| MirrorError::internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client: Client::new(),
            no_redirect_client,
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        let mut builder = client.request(request.method.clone(), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let RequestBody::Multipart(fields) = request.body {
            let form = fields
                .into_iter()
                .fold(reqwest::multipart::Form::new(), |form, (k, v)| form.text(k, v));
            builder = builder.multipart(form);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| MirrorError::connectivity(format!("Request failed: {err}")))?;

        let header_text = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let status = response.status().as_u16();
        let content_type = header_text(CONTENT_TYPE);
        let location = header_text(LOCATION);
        let content_disposition = header_text(CONTENT_DISPOSITION);
        let set_cookie = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|err| MirrorError::connectivity(format!("Failed to read response body: {err}")))?
            .to_vec();

        Ok(ApiResponse {
            status,
            content_type,
            location,
            set_cookie,
            content_disposition,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_lookup() {
        let response = ApiResponse::new(302)
            .with_set_cookie("theme=dark; Path=/")
            .with_set_cookie("session=abc.def; HttpOnly; Path=/");
        assert_eq!(response.cookie("session").as_deref(), Some("abc.def"));
        assert_eq!(response.cookie("missing"), None);

        let cleared = ApiResponse::new(302).with_set_cookie("session=; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        assert_eq!(cleared.cookie("session"), None);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut request = ApiRequest::new(Method::GET, "http://x/");
        request.set_header("Authorization", "Bearer a");
        request.set_header("authorization", "Bearer b");
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header("AUTHORIZATION"), Some("Bearer b"));
    }

    #[test]
    fn test_json_detection() {
        assert!(ApiResponse::new(200).with_content_type("application/json; charset=utf-8").is_json());
        assert!(!ApiResponse::html(200, "<p>").is_json());
        assert!(!ApiResponse::new(200).is_json());
    }
}
