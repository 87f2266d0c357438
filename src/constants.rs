//! Common constants used throughout the crate.
//!
//! This was consolidated here so the signer and the verifier agree on every header name,
//! format string and error code. If a value is spelled incorrectly, at least it can be fixed
//! in one spot.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically. (This can be a bit hard with comments, etc.)

/// Default allowed timestamp mismatch in minutes.
pub(crate) const ALLOWED_MISMATCH_MINUTES: i64 = 15;

/// Content-Type used by the JSON target-action protocol, version 1.0 (e.g. DynamoDB).
pub const APPLICATION_X_AMZ_JSON_1_0: &str = "application/x-amz-json-1.0";

/// Content-Type used by the JSON target-action protocol, version 1.1 (e.g. Translate).
pub const APPLICATION_X_AMZ_JSON_1_1: &str = "application/x-amz-json-1.1";

/// Algorithm for AWS SigV4
pub(crate) const AWS4_HMAC_SHA256: &str = "AWS4-HMAC-SHA256";

/// Prefix prepended to the raw secret key to form the `kDate` HMAC key.
pub(crate) const AWS4_PREFIX: &[u8] = b"AWS4";

/// String included at the end of the AWS SigV4 credential scope
pub(crate) const AWS4_REQUEST: &str = "aws4_request";

/// Content-Type parameter for specifying the character set
pub(crate) const CHARSET: &str = "charset";

/// Authorization header parameter for the access key and credential scope
pub(crate) const CREDENTIAL: &str = "Credential";

/// Environment variable holding the access key id.
pub(crate) const ENV_AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";

/// Environment variable holding the secret access key.
pub(crate) const ENV_AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";

/// Environment variable holding the session token for temporary credentials.
pub(crate) const ENV_AWS_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Error code: DuplicateHeader
pub(crate) const ERR_CODE_DUPLICATE_HEADER: &str = "DuplicateHeader";

/// Error code: EncodingMismatch
pub(crate) const ERR_CODE_ENCODING_MISMATCH: &str = "EncodingMismatch";

/// Error code: IncompleteSignature
pub(crate) const ERR_CODE_INCOMPLETE_SIGNATURE: &str = "IncompleteSignature";

/// Error code: InternalFailure
pub(crate) const ERR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Error code: InvalidRequestMethod (non-AWS standard)
pub(crate) const ERR_CODE_INVALID_REQUEST_METHOD: &str = "InvalidRequestMethod";

/// Error code: InvalidURIPath
pub(crate) const ERR_CODE_INVALID_URI_PATH: &str = "InvalidURIPath";

/// Error code: MalformedHeader
pub(crate) const ERR_CODE_MALFORMED_HEADER: &str = "MalformedHeader";

/// Error code: MalformedQueryString
pub(crate) const ERR_CODE_MALFORMED_QUERY_STRING: &str = "MalformedQueryString";

/// Error code: MissingAuthenticationToken
pub(crate) const ERR_CODE_MISSING_AUTHENTICATION_TOKEN: &str = "MissingAuthenticationToken";

/// Error code: MissingCredential
pub(crate) const ERR_CODE_MISSING_CREDENTIAL: &str = "MissingCredential";

/// Error code: MissingRequiredHeader
pub(crate) const ERR_CODE_MISSING_REQUIRED_HEADER: &str = "MissingRequiredHeader";

/// Error code: SignatureDoesNotMatch
pub(crate) const ERR_CODE_SIGNATURE_DOES_NOT_MATCH: &str = "SignatureDoesNotMatch";

/// Error code: TimestampMismatch
pub(crate) const ERR_CODE_TIMESTAMP_MISMATCH: &str = "TimestampMismatch";

/// Header for `authorization`
pub(crate) const HDR_AUTHORIZATION: &str = "authorization";

/// Header for `content-type`
pub(crate) const HDR_CONTENT_TYPE: &str = "content-type";

/// Header for `host`
pub(crate) const HDR_HOST: &str = "host";

/// Header for delivering the request timestamp
pub(crate) const HDR_X_AMZ_DATE: &str = "x-amz-date";

/// Header for delivering the session token
pub(crate) const HDR_X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";

/// Header naming the target action of a JSON protocol request
pub(crate) const HDR_X_AMZ_TARGET: &str = "x-amz-target";

/// Uppercase hex digits.
pub(crate) const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// Compact ISO8601 format used for the string to sign and the `x-amz-date` header.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Short date format used in the credential scope.
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Length of an ISO8601 date string in the UTC time zone.
pub(crate) const ISO8601_UTC_LENGTH: usize = 16;

/// Error message: `"Authorization header requires 'Credential' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_CREDENTIAL: &str = "Authorization header requires 'Credential' parameter.";

/// Error message: `"Authorization header requires 'Signature' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_SIGNATURE: &str = "Authorization header requires 'Signature' parameter.";

/// Error message: `"Authorization header requires 'SignedHeaders' parameter."`
pub(crate) const MSG_AUTH_HEADER_REQ_SIGNED_HEADERS: &str = "Authorization header requires 'SignedHeaders' parameter.";

/// Error message: `"Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term,"`
pub(crate) const MSG_CREDENTIAL_MUST_HAVE_FIVE_PARTS: &str =
    "Credential must have exactly 5 slash-delimited elements, e.g. keyid/date/region/service/term,";

/// Error message: `"Illegal hex character in escape % pattern: %"`
pub(crate) const MSG_ILLEGAL_HEX_CHAR: &str = "Illegal hex character in escape % pattern: %";

/// Error message: `"Incomplete trailing escape % sequence"`
pub(crate) const MSG_INCOMPLETE_TRAILING_ESCAPE: &str = "Incomplete trailing escape % sequence";

/// Error message: `"Request is missing Authentication Token"`
pub(crate) const MSG_REQUEST_MISSING_AUTH_TOKEN: &str = "Request is missing Authentication Token";

/// Error message: `"The request signature we calculated does not match the signature you provided. Check your AWS Secret Access Key and signing method. Consult the service documentation for details."`
pub(crate) const MSG_REQUEST_SIGNATURE_MISMATCH: &str = "The request signature we calculated does not match the signature you provided. Check your AWS Secret Access Key and signing method. Consult the service documentation for details.";

/// Error message: `"Unsupported AWS 'algorithm': "`
pub(crate) const MSG_UNSUPPORTED_ALGORITHM: &str = "Unsupported AWS 'algorithm': ";

/// SHA-256 of an empty string.
pub const SHA256_EMPTY: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Length of a SHA-256 hex string.
pub(crate) const SHA256_HEX_LENGTH: usize = SHA256_EMPTY.len();

/// The length of a SHA-256 digest in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

/// Authorization header parameter for the signature itself
pub(crate) const SIGNATURE: &str = "Signature";

/// Authorization header parameter specifying the signed headers
pub(crate) const SIGNED_HEADERS: &str = "SignedHeaders";

/// The region to use for testing.
#[cfg(test)]
pub(crate) const TEST_REGION: &str = "us-east-1";

/// The service to use for testing.
#[cfg(test)]
pub(crate) const TEST_SERVICE: &str = "service";
