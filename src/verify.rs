//! AWS SigV4 signature verification.
//!
//! Recomputes the signature of a request that carries an `Authorization` header and compares it in constant time.
//! This is the counterpart of [SigV4Signer][crate::SigV4Signer], used by tests and by services that want to check
//! requests signed by this crate.

use {
    crate::{
        canonical::{normalize_headers, CanonicalRequest},
        chronoutil::parse_iso8601,
        constants::*,
        signer::{calculate_signature, string_to_sign},
        CanonicalHeaders, CredentialScope, KSigningKey, RequestDescriptor, SigningError, SigningOptions,
    },
    chrono::{DateTime, Duration, Utc},
    log::{debug, trace},
    std::{collections::HashMap, error::Error, str::FromStr},
    subtle::ConstantTimeEq,
};

/// Options for [verify_request].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VerifyOptions {
    /// The allowed difference between the request timestamp and the server timestamp.
    pub allowed_mismatch: Duration,

    /// Canonicalization options; these must match the ones the request was signed with.
    pub signing: SigningOptions,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            allowed_mismatch: Duration::minutes(ALLOWED_MISMATCH_MINUTES),
            signing: SigningOptions::default(),
        }
    }
}

/// The parameters of an `AWS4-HMAC-SHA256` `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationHeader {
    /// The credential: `access_key/date/region/service/aws4_request`.
    pub credential: String,

    /// The signed header names, in the order given.
    pub signed_headers: Vec<String>,

    /// The hex signature.
    pub signature: String,
}

impl FromStr for AuthorizationHeader {
    type Err = SigningError;

    fn from_str(auth_header: &str) -> Result<Self, SigningError> {
        let auth_header = auth_header.trim();

        // The header must start with the algorithm.
        let (algorithm, parameters) = auth_header.split_once(' ').unwrap_or((auth_header, ""));
        if algorithm != AWS4_HMAC_SHA256 {
            return Err(SigningError::IncompleteSignature(format!("{}'{}'.", MSG_UNSUPPORTED_ALGORITHM, algorithm)));
        }

        // Split the parameters by commas; trim each one; then split into key=value pairs.
        let mut parameter_map = HashMap::new();
        for parameter in parameters.split(',').map(str::trim) {
            // Needed if we have no parameters at all; this loop will always run at least once.
            if parameter.is_empty() {
                continue;
            }

            let (key, value) = parameter.split_once('=').ok_or_else(|| {
                SigningError::IncompleteSignature(format!(
                    "'{}' not a valid key=value pair (missing equal-sign) in Authorization header: '{}'",
                    parameter, auth_header
                ))
            })?;

            // Use the last value for each key; overwriting is ok.
            parameter_map.insert(key, value);
        }

        let mut missing_messages = Vec::new();
        let credential = parameter_map.get(CREDENTIAL);
        if credential.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_CREDENTIAL);
        }

        let signature = parameter_map.get(SIGNATURE);
        if signature.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNATURE);
        }

        let signed_headers = parameter_map.get(SIGNED_HEADERS);
        if signed_headers.is_none() {
            missing_messages.push(MSG_AUTH_HEADER_REQ_SIGNED_HEADERS);
        }

        match (credential, signed_headers, signature) {
            (Some(credential), Some(signed_headers), Some(signature)) => Ok(Self {
                credential: credential.to_string(),
                signed_headers: signed_headers.split(';').map(|h| h.to_ascii_lowercase()).collect(),
                signature: signature.to_string(),
            }),
            _ => {
                let mut message = missing_messages.join(" ");
                message.push_str(&format!(" Authorization={}", auth_header));
                Err(SigningError::IncompleteSignature(message))
            }
        }
    }
}

/// What a successful verification established about the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedRequest {
    access_key_id: String,
    scope: CredentialScope,
    request_timestamp: DateTime<Utc>,
    session_token: Option<String>,
}

impl VerifiedRequest {
    /// The access key id that signed the request.
    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// The credential scope of the signature.
    #[inline]
    pub fn scope(&self) -> &CredentialScope {
        &self.scope
    }

    /// The timestamp the request was signed at.
    #[inline]
    pub fn request_timestamp(&self) -> DateTime<Utc> {
        self.request_timestamp
    }

    /// The session token sent with the request, if any.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }
}

/// Verify the SigV4 signature on a request.
///
/// `get_signing_key` is called with the access key id and credential scope once the request has passed every check
/// that does not need the key. Errors it returns that are [SigningError]s are passed through; anything else becomes
/// [SigningError::InternalServiceError].
pub fn verify_request<F>(
    descriptor: &RequestDescriptor,
    region: &str,
    service: &str,
    server_timestamp: DateTime<Utc>,
    options: VerifyOptions,
    get_signing_key: F,
) -> Result<VerifiedRequest, SigningError>
where
    F: FnOnce(&str, &CredentialScope) -> Result<KSigningKey, Box<dyn Error + Send + Sync>>,
{
    let headers = normalize_headers(descriptor.headers())?;

    let auth = match headers.get(HDR_AUTHORIZATION) {
        Some(auth) => AuthorizationHeader::from_str(auth)?,
        None => return Err(SigningError::MissingAuthenticationToken(MSG_REQUEST_MISSING_AUTH_TOKEN.to_string())),
    };

    let request_timestamp = match headers.get(HDR_X_AMZ_DATE) {
        Some(amz_date) => parse_iso8601(amz_date).ok_or_else(|| {
            SigningError::IncompleteSignature(format!(
                "Date must be in ISO-8601 'basic format'. Got '{}'. See http://en.wikipedia.org/wiki/ISO_8601",
                amz_date
            ))
        })?,
        None => {
            return Err(SigningError::IncompleteSignature(
                "Authorization header requires existence of a valid 'X-Amz-Date' header.".to_string(),
            ))
        }
    };

    let (access_key_id, scope) = prevalidate(&auth, region, service, request_timestamp, server_timestamp, options)?;

    let canonical_headers = CanonicalHeaders::for_signed_names(&headers, &auth.signed_headers)?;
    let creq = CanonicalRequest::new(
        descriptor.method(),
        descriptor.path(),
        descriptor.query(),
        canonical_headers,
        descriptor.payload(),
        options.signing,
    )?;

    let amz_date = request_timestamp.format(ISO8601_COMPACT_FORMAT).to_string();
    let string_to_sign = string_to_sign(&amz_date, &scope, &creq.canonical_request_sha256());

    let signing_key = match get_signing_key(access_key_id, &scope) {
        Ok(key) => {
            trace!("verify_request: got signing key");
            key
        }
        Err(e) => {
            debug!("verify_request: error getting signing key: {}", e);
            return Err(SigningError::from(e));
        }
    };

    let expected_signature = calculate_signature(&signing_key, &string_to_sign);
    let is_equal: bool = auth.signature.as_bytes().ct_eq(expected_signature.as_bytes()).into();
    if !is_equal {
        trace!("Signature mismatch: expected '{}', got '{}'", expected_signature, auth.signature);
        return Err(SigningError::SignatureDoesNotMatch(Some(MSG_REQUEST_SIGNATURE_MISMATCH.to_string())));
    }

    Ok(VerifiedRequest {
        access_key_id: access_key_id.to_string(),
        scope,
        request_timestamp,
        session_token: headers.get(HDR_X_AMZ_SECURITY_TOKEN).cloned(),
    })
}

/// Check the request timestamp, the credential format and scope, and that `host` is signed.
fn prevalidate<'a>(
    auth: &'a AuthorizationHeader,
    region: &str,
    service: &str,
    req_ts: DateTime<Utc>,
    server_timestamp: DateTime<Utc>,
    options: VerifyOptions,
) -> Result<(&'a str, CredentialScope), SigningError> {
    let allowed_mismatch = options.allowed_mismatch;
    let min_ts = server_timestamp.checked_sub_signed(allowed_mismatch).unwrap_or(server_timestamp);
    let max_ts = server_timestamp.checked_add_signed(allowed_mismatch).unwrap_or(server_timestamp);

    // Make sure date isn't expired...
    if req_ts < min_ts {
        trace!("prevalidate: request timestamp {} is before minimum timestamp {}", req_ts, min_ts);
        return Err(SigningError::SignatureDoesNotMatch(Some(format!(
            "Signature expired: {} is now earlier than {} ({} - {}.)",
            req_ts.format(ISO8601_COMPACT_FORMAT),
            min_ts.format(ISO8601_COMPACT_FORMAT),
            server_timestamp.format(ISO8601_COMPACT_FORMAT),
            duration_to_string(allowed_mismatch)
        ))));
    }

    // ... or too far into the future.
    if req_ts > max_ts {
        trace!("prevalidate: request timestamp {} is after maximum timestamp {}", req_ts, max_ts);
        return Err(SigningError::SignatureDoesNotMatch(Some(format!(
            "Signature not yet current: {} is still later than {} ({} + {}.)",
            req_ts.format(ISO8601_COMPACT_FORMAT),
            max_ts.format(ISO8601_COMPACT_FORMAT),
            server_timestamp.format(ISO8601_COMPACT_FORMAT),
            duration_to_string(allowed_mismatch)
        ))));
    }

    // Credential must have exactly five elements.
    let credential_parts = auth.credential.split('/').collect::<Vec<&str>>();
    if credential_parts.len() != 5 {
        trace!("prevalidate: credential has {} parts, expected 5", credential_parts.len());
        return Err(SigningError::IncompleteSignature(format!(
            "{} got '{}'",
            MSG_CREDENTIAL_MUST_HAVE_FIVE_PARTS, auth.credential
        )));
    }

    let access_key_id = credential_parts[0];
    let cscope_date = credential_parts[1];
    let cscope_region = credential_parts[2];
    let cscope_service = credential_parts[3];
    let cscope_term = credential_parts[4];

    // Credential scope must be correct for the region/service/date.
    let mut cscope_errors = Vec::new();
    if cscope_region != region {
        trace!("prevalidate: credential region '{}' does not match expected region '{}'", cscope_region, region);
        cscope_errors.push(format!("Credential should be scoped to a valid region, not '{}'.", cscope_region));
    }

    if cscope_service != service {
        trace!("prevalidate: credential service '{}' does not match expected service '{}'", cscope_service, service);
        cscope_errors.push(format!("Credential should be scoped to correct service: '{}'.", service));
    }

    if cscope_term != AWS4_REQUEST {
        trace!(
            "prevalidate: credential terminator '{}' does not match expected terminator '{}'",
            cscope_term,
            AWS4_REQUEST
        );
        cscope_errors.push(format!(
            "Credential should be scoped with a valid terminator: 'aws4_request', not '{}'.",
            cscope_term
        ));
    }

    let expected_cscope_date = req_ts.format(ISO8601_DATE_FORMAT).to_string();
    if cscope_date != expected_cscope_date {
        trace!(
            "prevalidate: credential date '{}' does not match expected date '{}'",
            cscope_date,
            expected_cscope_date
        );
        cscope_errors.push(format!(
            "Date in Credential scope does not match YYYYMMDD from ISO-8601 version of date from HTTP: '{}' != '{}', \
             from '{}'.",
            cscope_date,
            expected_cscope_date,
            req_ts.format(ISO8601_COMPACT_FORMAT)
        ));
    }

    if !cscope_errors.is_empty() {
        return Err(SigningError::SignatureDoesNotMatch(Some(cscope_errors.join(" "))));
    }

    // SignedHeaders must include "host".
    if !auth.signed_headers.iter().any(|h| h == HDR_HOST) {
        return Err(SigningError::SignatureDoesNotMatch(Some(
            "'Host' must be a 'SignedHeader' in the AWS Authorization.".to_string(),
        )));
    }

    // ... and "x-amz-date", since that is the timestamp checked above.
    if !auth.signed_headers.iter().any(|h| h == HDR_X_AMZ_DATE) {
        return Err(SigningError::SignatureDoesNotMatch(Some(
            "'X-Amz-Date' must be a 'SignedHeader' in the AWS Authorization.".to_string(),
        )));
    }

    Ok((access_key_id, CredentialScope::new(req_ts.date_naive(), region, service)))
}

fn duration_to_string(duration: Duration) -> String {
    let secs = duration.num_seconds();
    if secs % 60 == 0 {
        format!("{} min", duration.num_minutes())
    } else {
        format!("{} sec", secs)
    }
}
