use {
    crate::constants::*,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Error returned when an attempt at signing (or verifying) an AWS SigV4 request fails.
///
/// Every error is raised before any signature is produced; a failed call never yields a
/// partial signature.
#[derive(Debug)]
#[non_exhaustive]
pub enum SigningError {
    /// Two headers normalize to the same lowercased name.
    DuplicateHeader(/* message */ String),

    /// The payload does not decode in the character set its `Content-Type` declares, or the declared character set
    /// is unknown. The bytes hashed must be the bytes sent; this crate refuses to re-encode them.
    EncodingMismatch(/* message */ String),

    /// The `Authorization` header does not conform to AWS standards. Sample messages:
    /// `Authorization header requires 'Credential' parameter.`
    /// `Unsupported AWS 'algorithm': 'AWS4-HMAC-SHA512'`
    IncompleteSignature(/* message */ String),

    /// Verification failed because the signing key could not be obtained.
    InternalServiceError(Box<dyn Error + Send + Sync>),

    /// The request method is not an uppercase HTTP token.
    InvalidRequestMethod(/* message */ String),

    /// The URI path includes invalid components. This can be a malformed hex encoding (e.g. `%0J`), a non-absolute
    /// URI path (`foo/bar`), or a URI path that attempts to navigate above the root (`/x/../../../y`).
    InvalidURIPath(/* message */ String),

    /// A header was malformed -- the name was empty or not a valid token, the value contained control characters,
    /// or the header could not be parsed (e.g., the `x-amz-date` header is not a valid date).
    MalformedHeader(/* message */ String),

    /// A query string was malformed -- an escape sequence was incomplete or a decoded value was not UTF-8.
    ///
    /// `Incomplete trailing escape % sequence`
    MalformedQueryString(/* message */ String),

    /// The request has no `Authorization` header to verify.
    MissingAuthenticationToken(/* message */ String),

    /// The access key id or secret access key is absent or empty.
    MissingCredential(/* message */ String),

    /// The request is missing a header that must be signed.
    MissingRequiredHeader(/* message */ String),

    /// Signature did not match the calculated signature value, was outside the allowed clock skew, or was scoped
    /// to the wrong date/region/service.
    /// Example messages:
    /// `The request signature we calculated does not match the signature you provided. Check your AWS Secret Access Key and signing method. Consult the service documentation for details.`
    /// `Signature expired: 20210502T144040Z is now earlier than 20210502T173143Z (20210502T174643Z - 15 min.)`
    SignatureDoesNotMatch(Option</* message */ String>),

    /// The request carries an `x-amz-date` header that differs from the timestamp used to sign it.
    TimestampMismatch(/* message */ String),
}

impl SigningError {
    /// The AWS-style error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateHeader(_) => ERR_CODE_DUPLICATE_HEADER,
            Self::EncodingMismatch(_) => ERR_CODE_ENCODING_MISMATCH,
            Self::IncompleteSignature(_) => ERR_CODE_INCOMPLETE_SIGNATURE,
            Self::InternalServiceError(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::InvalidRequestMethod(_) => ERR_CODE_INVALID_REQUEST_METHOD,
            Self::InvalidURIPath(_) => ERR_CODE_INVALID_URI_PATH,
            Self::MalformedHeader(_) => ERR_CODE_MALFORMED_HEADER,
            Self::MalformedQueryString(_) => ERR_CODE_MALFORMED_QUERY_STRING,
            Self::MissingAuthenticationToken(_) => ERR_CODE_MISSING_AUTHENTICATION_TOKEN,
            Self::MissingCredential(_) => ERR_CODE_MISSING_CREDENTIAL,
            Self::MissingRequiredHeader(_) => ERR_CODE_MISSING_REQUIRED_HEADER,
            Self::SignatureDoesNotMatch(_) => ERR_CODE_SIGNATURE_DOES_NOT_MATCH,
            Self::TimestampMismatch(_) => ERR_CODE_TIMESTAMP_MISMATCH,
        }
    }
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::DuplicateHeader(msg) => f.write_str(msg),
            Self::EncodingMismatch(msg) => f.write_str(msg),
            Self::IncompleteSignature(msg) => f.write_str(msg),
            Self::InternalServiceError(ref e) => Display::fmt(e, f),
            Self::InvalidRequestMethod(msg) => f.write_str(msg),
            Self::InvalidURIPath(msg) => f.write_str(msg),
            Self::MalformedHeader(msg) => f.write_str(msg),
            Self::MalformedQueryString(msg) => f.write_str(msg),
            Self::MissingAuthenticationToken(msg) => f.write_str(msg),
            Self::MissingCredential(msg) => f.write_str(msg),
            Self::MissingRequiredHeader(msg) => f.write_str(msg),
            Self::SignatureDoesNotMatch(msg) => {
                if let Some(msg) = msg {
                    f.write_str(msg)
                } else {
                    Ok(())
                }
            }
            Self::TimestampMismatch(msg) => f.write_str(msg),
        }
    }
}

impl Error for SigningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InternalServiceError(ref e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<Box<dyn Error + Send + Sync>> for SigningError {
    fn from(e: Box<dyn Error + Send + Sync>) -> SigningError {
        match e.downcast::<SigningError>() {
            Ok(sig_err) => *sig_err,
            Err(e) => SigningError::InternalServiceError(e),
        }
    }
}
