//! Canonicalization functionality for signature generation and validation.
//!
//! This includes the header, URI path and query string canonicalization functions, as well as the ability to create
//! an AWS SigV4 canonical request.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{
        constants::*,
        crypto::{sha256, sha256_hex},
        SigningError, SigningOptions,
    },
    encoding::{label::encoding_from_whatwg_label, types::DecoderTrap},
    http::{header::HeaderName, Method},
    lazy_static::lazy_static,
    log::trace,
    qualifier_attr::qualifiers,
    regex::Regex,
    std::{
        borrow::Cow,
        collections::{btree_map::Entry, BTreeMap},
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

lazy_static! {
    /// Multiple slash pattern for condensing URIs
    static ref MULTISLASH: Regex = Regex::new("//+").unwrap();

    /// Media types whose bodies are UTF-8 JSON by definition.
    static ref JSON_MEDIA_TYPE: Regex =
        Regex::new(r"^application/(?:json|x-amz-json-\d+\.\d+|[a-z0-9._-]+\+json)$").unwrap();
}

/// Headers that are signed whenever they are present, regardless of the caller's selection.
const ALWAYS_SIGNED: [&str; 3] = [HDR_HOST, HDR_X_AMZ_DATE, HDR_X_AMZ_SECURITY_TOKEN];

/// A canonicalized request for AWS SigV4.
///
/// This is mainly used internally for generating the canonical request for signing, but is
/// exposed for testing and debugging purposes.
///
/// **The stability of this struct is not guaranteed.** The fields and methods are subject to
/// change in minor/patch versions.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone)]
struct CanonicalRequest {
    /// The HTTP method for the request (e.g., "GET", "POST", etc.)
    request_method: String,

    /// The canonicalized path from the HTTP request. This is guaranteed to be ASCII.
    canonical_path: String,

    /// The canonical query string: encoded `key=value` pairs, sorted, joined with `&`.
    canonical_query: String,

    /// The canonical header block and signed header list.
    headers: CanonicalHeaders,

    /// The lowercase hex SHA-256 hash of the payload.
    payload_sha256: String,
}

impl CanonicalRequest {
    /// Create a CanonicalRequest from the pieces of a request descriptor. The headers must already have been
    /// canonicalized and the payload is hashed exactly as given.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(
        method: &Method,
        path: &str,
        query: &[(String, String)],
        headers: CanonicalHeaders,
        payload: &[u8],
        options: SigningOptions,
    ) -> Result<Self, SigningError> {
        validate_request_method(method)?;
        let canonical_path = canonicalize_uri_path(path, options.s3)?;
        let canonical_query = canonicalize_query_to_string(query);
        let payload_sha256 = sha256_hex(payload);

        Ok(Self {
            request_method: method.as_str().to_string(),
            canonical_path,
            canonical_query,
            headers,
            payload_sha256,
        })
    }

    /// Retrieve the HTTP request method.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Retrieve the canonicalized URI path from the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Retrieve the canonical query string.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_query_string(&self) -> &str {
        &self.canonical_query
    }

    /// Retrieve the canonical headers.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn headers(&self) -> &CanonicalHeaders {
        &self.headers
    }

    /// Retrieve the SHA-256 hash of the payload.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn payload_sha256(&self) -> &str {
        &self.payload_sha256
    }

    /// Get the [canonical request to hash](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html)
    /// for the request.
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request(&self) -> String {
        let mut result = String::with_capacity(
            self.request_method.len()
                + self.canonical_path.len()
                + self.canonical_query.len()
                + self.headers.canonical_headers().len()
                + self.headers.signed_headers().len()
                + SHA256_HEX_LENGTH
                + 5,
        );
        result.push_str(self.request_method());
        result.push('\n');
        result.push_str(self.canonical_path());
        result.push('\n');
        result.push_str(self.canonical_query_string());
        result.push('\n');
        result.push_str(self.headers.canonical_headers());
        result.push('\n');
        result.push_str(self.headers.signed_headers());
        result.push('\n');
        result.push_str(self.payload_sha256());

        trace!("Canonical request:\n{}", result);

        result
    }

    /// Get the SHA-256 hash of the [canonical request](https://docs.aws.amazon.com/general/latest/gr/sigv4-create-canonical-request.html).
    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request_sha256(&self) -> [u8; SHA256_OUTPUT_LEN] {
        sha256(self.canonical_request().as_bytes())
    }
}

impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CanonicalRequest")
            .field("request_method", &self.request_method)
            .field("canonical_path", &self.canonical_path)
            .field("canonical_query", &self.canonical_query)
            .field("signed_headers", &self.headers.signed_headers())
            .field("payload_sha256", &self.payload_sha256)
            .finish()
    }
}

/// The canonical header block (`name:value\n` per signed header, sorted by name) and the matching
/// semicolon-delimited signed header list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanonicalHeaders {
    /// `name:value\n` lines, including the newline after the last header.
    canonical: String,

    /// The lowercased header names, in the same order, joined by `;`.
    signed_headers: String,
}

impl CanonicalHeaders {
    /// Select the headers to sign from an already-normalized header map (see [`normalize_headers`]).
    ///
    /// `host`, `x-amz-date` and `x-amz-security-token` are always signed when present. `host` and every header the
    /// selection lists as required must be present.
    pub fn new<S>(headers: &BTreeMap<String, String>, selection: &S) -> Result<Self, SigningError>
    where
        S: SignedHeaderSelection + ?Sized,
    {
        if !headers.contains_key(HDR_HOST) {
            return Err(SigningError::MissingRequiredHeader("'host' must be present in the request.".to_string()));
        }

        for header in selection.required() {
            let header_lower = header.to_ascii_lowercase();
            if !headers.contains_key(&header_lower) {
                return Err(SigningError::MissingRequiredHeader(format!(
                    "'{}' must be present in the request.",
                    header
                )));
            }
        }

        // BTreeMap keys iterate in byte order, which is code point order for these ASCII names.
        let names = headers.keys().filter(|name| is_signed(name, selection)).map(String::as_str).collect::<Vec<_>>();
        Ok(Self::build(headers, &names))
    }

    /// Build the canonical headers for exactly the named headers, as listed in a request's `SignedHeaders`. Every
    /// named header must be present.
    pub fn for_signed_names<N>(headers: &BTreeMap<String, String>, names: &[N]) -> Result<Self, SigningError>
    where
        N: AsRef<str>,
    {
        let mut names = names.iter().map(|n| n.as_ref()).collect::<Vec<&str>>();
        names.sort_unstable();
        names.dedup();

        for name in names.iter() {
            if !headers.contains_key(*name) {
                return Err(SigningError::MissingRequiredHeader(format!(
                    "Signed header '{}' is not present in the request.",
                    name
                )));
            }
        }

        Ok(Self::build(headers, &names))
    }

    fn build(headers: &BTreeMap<String, String>, names: &[&str]) -> Self {
        let mut canonical = String::new();
        for name in names {
            canonical.push_str(name);
            canonical.push(':');
            canonical.push_str(&headers[*name]);
            canonical.push('\n');
        }

        Self {
            canonical,
            signed_headers: names.join(";"),
        }
    }

    /// The `name:value\n` block.
    #[inline]
    pub fn canonical_headers(&self) -> &str {
        &self.canonical
    }

    /// The semicolon-delimited signed header list.
    #[inline]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }
}

fn is_signed<S>(name: &str, selection: &S) -> bool
where
    S: SignedHeaderSelection + ?Sized,
{
    ALWAYS_SIGNED.contains(&name)
        || selection.required().iter().any(|h| h.eq_ignore_ascii_case(name))
        || selection.if_in_request().iter().any(|h| h.eq_ignore_ascii_case(name))
        || selection.prefixes().iter().any(|p| name.starts_with(p.to_ascii_lowercase().as_str()))
}

/// Trait for telling the signer which headers to sign in addition to the standard AWS SigV4 headers (`host`,
/// `x-amz-date`, and `x-amz-security-token` when temporary credentials are used).
pub trait SignedHeaderSelection {
    /// Return the headers that must be present in the request; they are always signed.
    fn required(&self) -> &[Cow<'_, str>];

    /// Return the headers that are signed if they are present in the request.
    fn if_in_request(&self) -> &[Cow<'_, str>];

    /// Return the prefixes; any header in the request with one of these prefixes is signed.
    fn prefixes(&self) -> &[Cow<'_, str>];
}

/// Static implementation of [SignedHeaderSelection] that uses slices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSignedHeaderSelection<'a> {
    /// Headers that must be present and signed.
    required: &'a [Cow<'a, str>],

    /// Headers that are signed if they are present in the request.
    if_in_request: &'a [Cow<'a, str>],

    /// Prefixes of headers that are signed if present in the request.
    prefixes: &'a [Cow<'a, str>],
}

impl<'a> SignedHeaderSelection for SliceSignedHeaderSelection<'a> {
    #[inline(always)]
    fn required(&self) -> &[Cow<'_, str>] {
        self.required
    }

    #[inline(always)]
    fn if_in_request(&self) -> &[Cow<'_, str>] {
        self.if_in_request
    }

    #[inline(always)]
    fn prefixes(&self) -> &[Cow<'_, str>] {
        self.prefixes
    }
}

impl<'a> SliceSignedHeaderSelection<'a> {
    /// Create a new `SliceSignedHeaderSelection` structure from the provided data.
    pub const fn new(
        required: &'a [Cow<'a, str>],
        if_in_request: &'a [Cow<'a, str>],
        prefixes: &'a [Cow<'a, str>],
    ) -> Self {
        SliceSignedHeaderSelection {
            required,
            if_in_request,
            prefixes,
        }
    }
}

/// SignedHeaderSelection from constant slices.
pub type ConstSignedHeaderSelection = SliceSignedHeaderSelection<'static>;

/// Constant [`SignedHeaderSelection`] value to use when only the standard SigV4 headers are signed.
pub const NO_ADDITIONAL_SIGNED_HEADERS: ConstSignedHeaderSelection = ConstSignedHeaderSelection::new(&[], &[], &[]);

const JSON_TARGET_REQUIRED: &[Cow<'static, str>] = &[Cow::Borrowed(HDR_CONTENT_TYPE), Cow::Borrowed(HDR_X_AMZ_TARGET)];

/// Constant [`SignedHeaderSelection`] for JSON target-action services (DynamoDB, Translate, ...): `content-type`
/// and `x-amz-target` must be present and are signed along with `host` and `x-amz-date`.
pub const JSON_TARGET_SIGNED_HEADERS: ConstSignedHeaderSelection =
    ConstSignedHeaderSelection::new(JSON_TARGET_REQUIRED, &[], &[]);

const EVERY_PREFIX: &[Cow<'static, str>] = &[Cow::Borrowed("")];

/// Constant [`SignedHeaderSelection`] that signs every header in the request.
pub const SIGN_ALL_HEADERS: ConstSignedHeaderSelection = ConstSignedHeaderSelection::new(&[], &[], EVERY_PREFIX);

/// `SignedHeaderSelection` that can be dynamically changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VecSignedHeaderSelection {
    /// Headers that must be present and signed.
    required: Vec<Cow<'static, str>>,

    /// Headers that are signed if they are present in the request.
    if_in_request: Vec<Cow<'static, str>>,

    /// Prefixes of headers that are signed if present in the request.
    prefixes: Vec<Cow<'static, str>>,
}

impl SignedHeaderSelection for VecSignedHeaderSelection {
    #[inline(always)]
    fn required(&self) -> &[Cow<'_, str>] {
        &self.required
    }

    #[inline(always)]
    fn if_in_request(&self) -> &[Cow<'_, str>] {
        &self.if_in_request
    }

    #[inline(always)]
    fn prefixes(&self) -> &[Cow<'_, str>] {
        &self.prefixes
    }
}

impl VecSignedHeaderSelection {
    /// Create a new `VecSignedHeaderSelection` structure from the provided data.
    pub fn new<A, B, C>(required: &[&A], if_in_request: &[&B], prefixes: &[&C]) -> Self
    where
        for<'a> &'a A: Into<String>,
        for<'b> &'b B: Into<String>,
        for<'c> &'c C: Into<String>,
        A: ?Sized,
        B: ?Sized,
        C: ?Sized,
    {
        let required = required.iter().map(|s| Cow::Owned((*s).into())).collect();
        let if_in_request = if_in_request.iter().map(|s| Cow::Owned((*s).into())).collect();
        let prefixes = prefixes.iter().map(|s| Cow::Owned((*s).into())).collect();

        VecSignedHeaderSelection {
            required,
            if_in_request,
            prefixes,
        }
    }

    /// Add a header that must be present and signed.
    pub fn add_required(&mut self, header: &str) {
        if !self.required.iter().any(|h| h.eq_ignore_ascii_case(header)) {
            self.required.push(Cow::Owned(header.to_string()));
        }
    }

    /// Add a header that is signed if it is present in the request.
    pub fn add_if_in_request(&mut self, header: &str) {
        if !self.if_in_request.iter().any(|h| h.eq_ignore_ascii_case(header)) {
            self.if_in_request.push(Cow::Owned(header.to_string()));
        }
    }

    /// Add a prefix; headers with this prefix are signed if they are present in the request.
    pub fn add_prefix(&mut self, prefix: &str) {
        if !self.prefixes.iter().any(|h| h.eq_ignore_ascii_case(prefix)) {
            self.prefixes.push(Cow::Owned(prefix.to_string()));
        }
    }

    /// Remove a required header.
    pub fn remove_required(&mut self, header: &str) {
        self.required.retain(|h| !h.eq_ignore_ascii_case(header));
    }

    /// Remove a header that is signed if it is present in the request.
    pub fn remove_if_in_request(&mut self, header: &str) {
        self.if_in_request.retain(|h| !h.eq_ignore_ascii_case(header));
    }

    /// Remove a prefix.
    pub fn remove_prefix(&mut self, prefix: &str) {
        self.prefixes.retain(|h| !h.eq_ignore_ascii_case(prefix));
    }
}

/// Indicates whether we are normalizing a URI path element or a query string element. This is used to create the
/// correct error message.
enum UriElement {
    /// URI element represents a path
    Path,

    /// URI element represents a query string
    Query,
}

/// The Content-Type header value, along with the character set (if specified).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
struct ContentTypeCharset {
    /// The content type of the body, lowercased.
    pub content_type: String,

    /// The encoding (charset) of the body.
    pub charset: Option<String>,
}

/// Convert query parameters to the canonical query string: each key and value is URI-encoded, the pairs are sorted by
/// key and then value, and joined with `&`.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_query_to_string(query_parameters: &[(String, String)]) -> String {
    let mut results = query_parameters.iter().map(|(k, v)| (uri_encode(k), uri_encode(v))).collect::<Vec<_>>();
    results.sort_unstable();
    results.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join("&")
}

/// Normalizes the specified URI path, removing redundant slashes and relative path components (unless performing S3
/// canonicalization).
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn canonicalize_uri_path(uri_path: &str, s3: bool) -> Result<String, SigningError> {
    // Special case: empty path is converted to '/'; also short-circuit the usual '/' path here.
    if uri_path.is_empty() || uri_path == "/" {
        return Ok("/".to_string());
    }

    // All other paths must be abolute.
    if !uri_path.starts_with('/') {
        return Err(SigningError::InvalidURIPath(format!("Path is not absolute: {}", uri_path)));
    }

    let uri_path = if s3 {
        Cow::Borrowed(uri_path)
    } else {
        // Replace double slashes; this makes it easier to handle slashes at the end.
        MULTISLASH.replace_all(uri_path, "/")
    };

    // Examine each path component for relative directories.
    let mut components: Vec<String> = uri_path.split('/').map(|s| s.to_string()).collect();
    let mut i = 1; // Ignore the leading "/"
    while i < components.len() {
        let component = normalize_uri_path_component(&components[i])?;

        if component == "." && !s3 {
            // Relative path: current directory; remove this.
            components.remove(i);

            // Don't increment i; with the deletion, we're now pointing to the next element in the path.
        } else if component == ".." && !s3 {
            // Relative path: parent directory.  Remove this and the previous component.

            if i <= 1 {
                // This isn't allowed at the beginning!
                return Err(SigningError::InvalidURIPath(format!(
                    "Relative path entry '..' navigates above root: {}",
                    uri_path
                )));
            }

            components.remove(i - 1);
            components.remove(i - 1);

            // Since we've deleted two components, we need to back up one to examine what's now the next component.
            i -= 1;
        } else {
            // Leave it alone; proceed to the next component.
            components[i] = component;
            i += 1;
        }
    }

    match components.len() {
        0 | 1 => Ok("/".to_string()),
        _ => Ok(components.join("/")),
    }
}

/// Get the content type and character set declared by a `Content-Type` header value.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn get_content_type_and_charset(content_type: &str) -> ContentTypeCharset {
    let mut parts = content_type.split(';').map(str::trim);
    let media_type = parts.next().unwrap_or_default().to_ascii_lowercase();

    for option in parts {
        let mut opt_parts = option.splitn(2, '=');
        let opt_name = opt_parts.next().unwrap_or_default().trim();
        if opt_name.eq_ignore_ascii_case(CHARSET) {
            if let Some(opt_value) = opt_parts.next() {
                return ContentTypeCharset {
                    content_type: media_type,
                    charset: Some(opt_value.trim().trim_matches('"').to_string()),
                };
            }
        }
    }

    ContentTypeCharset {
        content_type: media_type,
        charset: None,
    }
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.
#[inline(always)]
pub fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Lowercase and trim each header name, normalize each value, and return the headers sorted by name.
///
/// Header names must be valid HTTP tokens after trimming. Header values may contain only visible ASCII, spaces and
/// tabs; leading and trailing whitespace is removed and runs of spaces are reduced to a single space. Two headers
/// whose names normalize identically are rejected.
pub fn normalize_headers<K, V>(headers: &[(K, V)]) -> Result<BTreeMap<String, String>, SigningError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut result = BTreeMap::new();
    for (name, value) in headers {
        let name = normalize_header_name(name.as_ref())?;
        let value = normalize_header_value(value.as_ref())?;

        match result.entry(name) {
            Entry::Occupied(e) => {
                return Err(SigningError::DuplicateHeader(format!(
                    "Header '{}' appears more than once after normalization.",
                    e.key()
                )))
            }
            Entry::Vacant(e) => {
                e.insert(value);
            }
        }
    }

    Ok(result)
}

/// Trim and lowercase a header name, making sure the result is a valid HTTP header name.
pub fn normalize_header_name(name: &str) -> Result<String, SigningError> {
    let name = name.trim().to_ascii_lowercase();
    if HeaderName::from_bytes(name.as_bytes()).is_err() {
        return Err(SigningError::MalformedHeader(format!("Invalid header name: '{}'", name)));
    }

    Ok(name)
}

/// Normalizes a header value by trimming whitespace and converting multiple spaces to a single space.
pub fn normalize_header_value(value: &str) -> Result<String, SigningError> {
    if let Some(c) = value.bytes().find(|c| !(*c == b'\t' || (b' '..=b'~').contains(c))) {
        return Err(SigningError::MalformedHeader(format!("Invalid character in header value: {:#04x}", c)));
    }

    let mut result = String::with_capacity(value.len());
    let mut last_was_space = false;

    for c in value.trim_matches(|c| c == ' ' || c == '\t').chars() {
        if c == ' ' {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    Ok(result)
}

/// Normalize a single element (key or value from key=value) of a query string that is already percent-encoded.
pub fn normalize_query_string_element(element: &str) -> Result<String, SigningError> {
    normalize_uri_element(element, UriElement::Query)
}

/// Normalizes a path element of a URI.
pub fn normalize_uri_path_component(path: &str) -> Result<String, SigningError> {
    normalize_uri_element(path, UriElement::Path)
}

/// Normalize the URI or query string according to RFC 3986.  This performs the following operations:
/// * Alpha, digit, and the symbols `-`, `.`, `_`, and `~` (unreserved characters) are left alone.
/// * Characters outside this range are percent-encoded.
/// * Percent-encoded values are upper-cased (`%2a` becomes `%2A`)
/// * Percent-encoded values in the unreserved space (`%41`-`%5A`, `%61`-`%7A`, `%30`-`%39`, `%2D`, `%2E`, `%5F`,
///   `%7E`) are converted to normal characters.
///
/// If a percent encoding is incomplete, an error is returned.
fn normalize_uri_element(uri_el: &str, uri_el_type: UriElement) -> Result<String, SigningError> {
    let path_component = uri_el.as_bytes();
    let mut i = 0;
    let mut result = String::with_capacity(path_component.len());

    while i < path_component.len() {
        let c = path_component[i];

        if is_rfc3986_unreserved(c) {
            result.push(c as char);
            i += 1;
        } else if c == b'%' {
            if i + 2 >= path_component.len() {
                // % encoding would go beyond end of string.
                return Err(match uri_el_type {
                    UriElement::Path => SigningError::InvalidURIPath(MSG_INCOMPLETE_TRAILING_ESCAPE.to_string()),
                    UriElement::Query => SigningError::MalformedQueryString(MSG_INCOMPLETE_TRAILING_ESCAPE.to_string()),
                });
            }

            let hex_digits = &path_component[i + 1..i + 3];
            match hex::decode(hex_digits) {
                Ok(value) => {
                    let c = value[0];

                    if is_rfc3986_unreserved(c) {
                        result.push(c as char);
                    } else {
                        // Rewrite the hex-escape so it's always upper-cased.
                        push_escaped(&mut result, c);
                    }
                    i += 3;
                }
                Err(_) => {
                    let message = format!("{}{}{}", MSG_ILLEGAL_HEX_CHAR, hex_digits[0] as char, hex_digits[1] as char);
                    return Err(match uri_el_type {
                        UriElement::Path => SigningError::InvalidURIPath(message),
                        UriElement::Query => SigningError::MalformedQueryString(message),
                    });
                }
            }
        } else if c == b'+' {
            // Plus-encoded space. Convert this to %20.
            result.push_str("%20");
            i += 1;
        } else {
            // Character should have been encoded.
            push_escaped(&mut result, c);
            i += 1;
        }
    }

    Ok(result)
}

/// Parse a wire query string (`a=b&c=d`, already percent-encoded) into decoded key/value pairs. `+` decodes to a
/// space. Decoded keys and values must be UTF-8.
pub fn query_string_to_pairs(query_string: &str) -> Result<Vec<(String, String)>, SigningError> {
    let mut result = Vec::new();

    for component in query_string.split('&') {
        if component.is_empty() {
            // Empty component; skip it.
            continue;
        }

        // Split the parameter into key and value portions on the '='
        let (key, value) = component.split_once('=').unwrap_or((component, ""));
        result.push((unescape_query_element(key)?, unescape_query_element(value)?));
    }

    Ok(result)
}

/// Convert a byte to uppercase hex representation.
#[inline(always)]
pub const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]]
}

#[inline(always)]
fn push_escaped(result: &mut String, b: u8) {
    let hex = u8_to_upper_hex(b);
    result.push('%');
    result.push(hex[0] as char);
    result.push(hex[1] as char);
}

/// Percent-encode every byte of `s` (as UTF-8) outside the RFC 3986 unreserved set, using uppercase hex digits.
pub fn uri_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.bytes() {
        if is_rfc3986_unreserved(c) {
            result.push(c as char);
        } else {
            push_escaped(&mut result, c);
        }
    }
    result
}

/// Unescapes a percent-encoded query string element, returning an error for malformed escapes or non-UTF-8 results.
fn unescape_query_element(s: &str) -> Result<String, SigningError> {
    let bytes = s.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                if i + 2 >= bytes.len() {
                    return Err(SigningError::MalformedQueryString(MSG_INCOMPLETE_TRAILING_ESCAPE.to_string()));
                }

                let hex_digits = &bytes[i + 1..i + 3];
                match hex::decode(hex_digits) {
                    Ok(value) => result.push(value[0]),
                    Err(_) => {
                        return Err(SigningError::MalformedQueryString(format!(
                            "{}{}{}",
                            MSG_ILLEGAL_HEX_CHAR, hex_digits[0] as char, hex_digits[1] as char
                        )))
                    }
                }
                i += 3;
            }
            b'+' => {
                result.push(b' ');
                i += 1;
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    String::from_utf8(result).map_err(|_| {
        SigningError::MalformedQueryString(format!("Query string element does not decode to UTF-8: {}", s))
    })
}

/// Make sure the request method is an uppercase HTTP token, e.g. `GET` or `POST`.
#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn validate_request_method(method: &Method) -> Result<(), SigningError> {
    if method.as_str().bytes().any(|c| c.is_ascii_lowercase()) {
        return Err(SigningError::InvalidRequestMethod(format!("Invalid request method: {}", method)));
    }

    Ok(())
}

/// Make sure the payload decodes in the character set its `Content-Type` declares.
///
/// JSON media types are UTF-8 by definition. Payloads without a declared or implied character set are opaque bytes
/// and are not checked. Nothing is re-encoded: the payload is hashed exactly as it will be sent.
pub fn validate_payload_encoding(content_type: Option<&str>, payload: &[u8]) -> Result<(), SigningError> {
    let content_type = match content_type {
        Some(content_type) => get_content_type_and_charset(content_type),
        None => return Ok(()),
    };

    let charset = match content_type.charset {
        Some(ref charset) => charset.as_str(),
        None if JSON_MEDIA_TYPE.is_match(&content_type.content_type) => {
            trace!("Payload of type {} is implicitly UTF-8", content_type.content_type);
            "utf-8"
        }
        None => return Ok(()),
    };

    let encoding = match encoding_from_whatwg_label(charset) {
        Some(encoding) => encoding,
        None => {
            return Err(SigningError::EncodingMismatch(format!(
                "{} payload uses unsupported charset '{}'",
                content_type.content_type, charset
            )))
        }
    };

    if encoding.decode(payload, DecoderTrap::Strict).is_err() {
        return Err(SigningError::EncodingMismatch(format!(
            "Invalid payload data encountered decoding {} with charset '{}'",
            content_type.content_type,
            encoding.whatwg_name().unwrap_or(encoding.name())
        )));
    }

    Ok(())
}
