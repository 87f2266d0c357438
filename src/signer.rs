//! AWS SigV4 request signing.
//!
//! This implements the client side of the AWS [SigV4](http://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
//! algorithm: canonical request, string to sign, signature and the `Authorization` header.

use {
    crate::{
        canonical::{normalize_header_value, normalize_headers, validate_payload_encoding, CanonicalRequest},
        constants::*,
        crypto::{hmac_sha256, sha256, sha256_hex},
        CanonicalHeaders, CredentialScope, Credentials, KSecretKey, KSigningKey, RequestDescriptor,
        SignedHeaderSelection, SigningError, SigningOptions,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    http::{
        header::{HeaderName, HeaderValue},
        HeaderMap,
    },
    log::{debug, trace},
};

/// Build the string to sign: algorithm, timestamp, credential scope and the hex SHA-256 of the canonical request,
/// separated by newlines.
pub fn string_to_sign(amz_date: &str, scope: &CredentialScope, canonical_request_sha256: &[u8]) -> String {
    let scope = scope.to_string();
    let capacity = AWS4_HMAC_SHA256.len() + ISO8601_UTC_LENGTH + scope.len() + SHA256_HEX_LENGTH + 3;
    let mut result = String::with_capacity(capacity);
    result.push_str(AWS4_HMAC_SHA256);
    result.push('\n');
    result.push_str(amz_date);
    result.push('\n');
    result.push_str(&scope);
    result.push('\n');
    result.push_str(&hex::encode(canonical_request_sha256));

    trace!("String to sign:\n{}", result);
    result
}

/// Compute the lowercase hex signature of a string to sign.
pub fn calculate_signature(signing_key: &KSigningKey, string_to_sign: &str) -> String {
    let key: &[u8; SHA256_OUTPUT_LEN] = signing_key.as_ref();
    hex::encode(hmac_sha256(key, string_to_sign.as_bytes()))
}

/// Compose the `Authorization` header value.
pub fn compose_authorization(
    access_key_id: &str,
    scope: &CredentialScope,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{} {}={}/{}, {}={}, {}={}",
        AWS4_HMAC_SHA256, CREDENTIAL, access_key_id, scope, SIGNED_HEADERS, signed_headers, SIGNATURE, signature
    )
}

/// The result of signing a request: the headers to attach, plus the intermediate artifacts for debugging.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    canonical_request: String,
    string_to_sign: String,
    signature: String,
    signed_headers: String,
    payload_sha256: String,
    headers: Vec<(&'static str, String)>,
}

impl SignedRequest {
    /// The canonical request that was hashed.
    #[inline]
    pub fn canonical_request(&self) -> &str {
        &self.canonical_request
    }

    /// The string that was signed.
    #[inline]
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// The lowercase hex signature.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The semicolon-delimited list of signed headers.
    #[inline]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// The lowercase hex SHA-256 of the payload that was signed.
    #[inline]
    pub fn payload_sha256(&self) -> &str {
        &self.payload_sha256
    }

    /// The `Authorization` header value.
    pub fn authorization(&self) -> &str {
        self.header(HDR_AUTHORIZATION).unwrap_or_default()
    }

    /// The value of one of the headers to transmit, by lowercase name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| *n == name).map(|(_, v)| v.as_str())
    }

    /// The headers to transmit with the request, in order: `content-type` and `x-amz-target` when the request has
    /// them, then `x-amz-date`, `x-amz-security-token` for temporary credentials, and `authorization`. `host` is
    /// left to the transport.
    #[inline]
    pub fn headers(&self) -> &[(&'static str, String)] {
        &self.headers
    }

    /// Insert the headers into an [http::HeaderMap], replacing any existing values.
    pub fn apply_to(&self, header_map: &mut HeaderMap) -> Result<(), SigningError> {
        for (name, value) in &self.headers {
            let value = HeaderValue::from_str(value)
                .map_err(|_| SigningError::MalformedHeader(format!("Invalid value for header '{}'", name)))?;
            header_map.insert(HeaderName::from_static(*name), value);
        }

        Ok(())
    }

    /// Make sure the body about to be sent is the exact byte sequence that was signed.
    pub fn check_body(&self, body: &[u8]) -> Result<(), SigningError> {
        let actual = sha256_hex(body);
        if actual != self.payload_sha256 {
            debug!("check_body: signed payload hash {} but body hashes to {}", self.payload_sha256, actual);
            return Err(SigningError::EncodingMismatch(format!(
                "Body to send hashes to {}, but the signed payload hash is {}",
                actual, self.payload_sha256
            )));
        }

        Ok(())
    }
}

/// Signs requests for one region and service.
///
/// A signer holds no credentials and no mutable state; it is safe to share between threads and to sign any number
/// of requests concurrently.
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
pub struct SigV4Signer {
    /// The region to scope signatures to, e.g. `us-west-2`.
    #[builder(setter(into))]
    region: String,

    /// The service to scope signatures to, e.g. `dynamodb`.
    #[builder(setter(into))]
    service: String,

    /// Canonicalization options.
    #[builder(default)]
    options: SigningOptions,
}

impl SigV4Signer {
    /// Create a signer with the default options.
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            options: SigningOptions::default(),
        }
    }

    /// Create a [SigV4SignerBuilder] to construct a [SigV4Signer].
    #[inline]
    pub fn builder() -> SigV4SignerBuilder {
        SigV4SignerBuilder::default()
    }

    /// Retrieve the region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the service.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Retrieve the options.
    #[inline]
    pub fn options(&self) -> SigningOptions {
        self.options
    }

    /// The credential scope for a request signed at `timestamp`.
    pub fn scope(&self, timestamp: &DateTime<Utc>) -> CredentialScope {
        CredentialScope::for_timestamp(timestamp, &self.region, &self.service)
    }

    /// Sign a request.
    ///
    /// The descriptor is not modified. If it already carries an `x-amz-date` header, it must match `timestamp`;
    /// otherwise one is added to the signed headers. Same for `x-amz-security-token` when the credentials have a
    /// session token.
    pub fn sign<S>(
        &self,
        descriptor: &RequestDescriptor,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
        selection: &S,
    ) -> Result<SignedRequest, SigningError>
    where
        S: SignedHeaderSelection + ?Sized,
    {
        credentials.validate()?;
        let secret = KSecretKey::try_from(credentials)?;
        let signing_key = self.scope(&timestamp).signing_key(&secret);
        self.sign_with_key(
            descriptor,
            credentials.access_key_id(),
            credentials.session_token(),
            &signing_key,
            timestamp,
            selection,
        )
    }

    /// Sign a request with an already-derived signing key.
    ///
    /// The key must have been derived for the UTC date of `timestamp` and this signer's region and service. Keys are
    /// only valid for a single day, so callers caching them must rotate at midnight UTC.
    pub fn sign_with_key<S>(
        &self,
        descriptor: &RequestDescriptor,
        access_key_id: &str,
        session_token: Option<&str>,
        signing_key: &KSigningKey,
        timestamp: DateTime<Utc>,
        selection: &S,
    ) -> Result<SignedRequest, SigningError>
    where
        S: SignedHeaderSelection + ?Sized,
    {
        if access_key_id.is_empty() {
            return Err(SigningError::MissingCredential("Access key id is empty".to_string()));
        }

        let amz_date = timestamp.format(ISO8601_COMPACT_FORMAT).to_string();
        let mut headers = normalize_headers(descriptor.headers())?;

        match headers.get(HDR_X_AMZ_DATE) {
            Some(existing) if *existing != amz_date => {
                return Err(SigningError::TimestampMismatch(format!(
                    "Request has x-amz-date {} but is being signed at {}",
                    existing, amz_date
                )))
            }
            Some(_) => (),
            None => {
                headers.insert(HDR_X_AMZ_DATE.to_string(), amz_date.clone());
            }
        }

        let session_token = match session_token {
            Some(token) => {
                let token = normalize_header_value(token)?;
                match headers.get(HDR_X_AMZ_SECURITY_TOKEN) {
                    Some(existing) if *existing != token => {
                        return Err(SigningError::MalformedHeader(
                            "Request has an x-amz-security-token header that differs from the session token"
                                .to_string(),
                        ))
                    }
                    Some(_) => (),
                    None => {
                        headers.insert(HDR_X_AMZ_SECURITY_TOKEN.to_string(), token.clone());
                    }
                }
                Some(token)
            }
            None => None,
        };

        validate_payload_encoding(headers.get(HDR_CONTENT_TYPE).map(String::as_str), descriptor.payload())?;

        let canonical_headers = CanonicalHeaders::new(&headers, selection)?;
        let creq = CanonicalRequest::new(
            descriptor.method(),
            descriptor.path(),
            descriptor.query(),
            canonical_headers,
            descriptor.payload(),
            self.options,
        )?;

        let canonical_request = creq.canonical_request();
        let scope = self.scope(&timestamp);
        let string_to_sign = string_to_sign(&amz_date, &scope, &sha256(canonical_request.as_bytes()));
        let signature = calculate_signature(signing_key, &string_to_sign);
        let signed_headers = creq.headers().signed_headers().to_string();
        let authorization = compose_authorization(access_key_id, &scope, &signed_headers, &signature);

        let mut out_headers = Vec::with_capacity(5);
        for name in [HDR_CONTENT_TYPE, HDR_X_AMZ_TARGET] {
            if let Some(value) = headers.get(name) {
                out_headers.push((name, value.clone()));
            }
        }
        out_headers.push((HDR_X_AMZ_DATE, amz_date));
        if let Some(token) = session_token {
            out_headers.push((HDR_X_AMZ_SECURITY_TOKEN, token));
        }
        out_headers.push((HDR_AUTHORIZATION, authorization));

        Ok(SignedRequest {
            canonical_request,
            string_to_sign,
            signature,
            signed_headers,
            payload_sha256: creq.payload_sha256().to_string(),
            headers: out_headers,
        })
    }
}
