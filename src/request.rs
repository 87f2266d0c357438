use {
    crate::{
        canonical::{canonicalize_query_to_string, query_string_to_pairs},
        constants::*,
        SigningError,
    },
    bytes::Bytes,
    derive_builder::Builder,
    http::{request::Parts, Method, Uri},
};

/// Everything about an HTTP request that goes into its signature.
///
/// Query parameters are held decoded; they are encoded exactly once while canonicalizing. Headers keep the order and
/// spelling the caller gave them. The payload is the exact byte sequence that will be transmitted, and it is hashed
/// as-is.
///
/// ```
/// # use sigv4_request_signer::RequestDescriptor;
/// # use http::Method;
/// let descriptor = RequestDescriptor::builder()
///     .method(Method::GET)
///     .path("/")
///     .query_param("Param2", "value2")
///     .query_param("Param1", "value1")
///     .header("Host", "example.amazonaws.com")
///     .build()
///     .unwrap();
/// assert_eq!(descriptor.path_and_query(), "/?Param1=value1&Param2=value2");
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// The request method, e.g. `POST`.
    method: Method,

    /// The URI path as it appears on the wire (already percent-encoded). An empty path is treated as `/`.
    #[builder(setter(into), default = "\"/\".to_string()")]
    path: String,

    /// Decoded query parameters.
    #[builder(setter(custom), default)]
    query: Vec<(String, String)>,

    /// Header name/value pairs.
    #[builder(setter(custom), default)]
    headers: Vec<(String, String)>,

    /// The exact bytes of the body.
    #[builder(setter(into), default)]
    payload: Bytes,
}

impl RequestDescriptor {
    /// Create a [RequestDescriptorBuilder] to construct a [RequestDescriptor].
    #[inline]
    pub fn builder() -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::default()
    }

    /// Create a descriptor from the parts of an [http::Request] and its body.
    ///
    /// The query string is decoded (`+` is a space). If the request has no `Host` header, the authority of the URI
    /// is used in its place, which is what HTTP clients send.
    pub fn from_http_request_parts(parts: &Parts, body: Bytes) -> Result<Self, SigningError> {
        let query = match parts.uri.query() {
            Some(query) => query_string_to_pairs(query)?,
            None => Vec::new(),
        };

        // Repeated headers fold into one comma-separated value.
        let mut headers = Vec::with_capacity(parts.headers.keys_len() + 1);
        for name in parts.headers.keys() {
            let mut values = Vec::new();
            for value in parts.headers.get_all(name) {
                let value = value.to_str().map_err(|_| {
                    SigningError::MalformedHeader(format!("Header '{}' has a value that is not visible ASCII", name))
                })?;
                values.push(value.trim_matches(|c: char| c == ' ' || c == '\t'));
            }
            headers.push((name.as_str().to_string(), values.join(",")));
        }

        if !parts.headers.contains_key(HDR_HOST) {
            if let Some(host) = host_from_uri(&parts.uri) {
                headers.push((HDR_HOST.to_string(), host));
            }
        }

        Ok(Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            query,
            headers,
            payload: body,
        })
    }

    /// Retrieve the request method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Retrieve the wire URI path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Retrieve the decoded query parameters.
    #[inline]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Retrieve the headers.
    #[inline]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Retrieve the value of the first header matching `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.trim().eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    /// Retrieve the payload.
    #[inline]
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    /// The path followed by the encoded query string, suitable for the request line of the transmitted request.
    pub fn path_and_query(&self) -> String {
        let path = if self.path.is_empty() {
            "/"
        } else {
            self.path.as_str()
        };

        if self.query.is_empty() {
            path.to_string()
        } else {
            format!("{}?{}", path, canonicalize_query_to_string(&self.query))
        }
    }
}

/// The `Host` header an HTTP client sends for `uri`: no userinfo, and the port only when it is not the scheme's
/// default.
fn host_from_uri(uri: &Uri) -> Option<String> {
    let host = uri.host()?;
    let default_port = match uri.scheme_str() {
        Some("http") => Some(80),
        Some("https") => Some(443),
        _ => None,
    };

    match uri.port_u16() {
        Some(port) if Some(port) != default_port => Some(format!("{}:{}", host, port)),
        _ => Some(host.to_string()),
    }
}

impl RequestDescriptorBuilder {
    /// Append a header. Headers are kept in the order they are added.
    pub fn header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.get_or_insert_with(Vec::new).push((name.into(), value.into()));
        self
    }

    /// Append a decoded query parameter.
    pub fn query_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.query.get_or_insert_with(Vec::new).push((key.into(), value.into()));
        self
    }

    /// Set the payload from text. The text is encoded as UTF-8 here, once; the resulting bytes are both hashed and
    /// sent.
    pub fn text_payload(&mut self, text: &str) -> &mut Self {
        self.payload = Some(Bytes::copy_from_slice(text.as_bytes()));
        self
    }
}
