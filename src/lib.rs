//! The `sigv4_request_signer` crate signs HTTP requests to AWS services with
//! [Signature Version 4](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html), without pulling in
//! an AWS SDK. It produces the `Authorization` header (and the `x-amz-date` and, for temporary credentials,
//! `x-amz-security-token` headers) for a request; sending the request is up to you.
//!
//! The signer never reads credentials from the environment or a clock on its own: credentials, region, service and
//! the signing time are all passed in, so identical inputs always produce identical signatures.
//!
//! # Workflow
//! 1. Describe the request with a [`RequestDescriptor`] (or convert an [`http::Request`] with
//!    [`sign_http_request`]). The payload is the exact byte sequence you will send.
//! 2. Sign it with a [`SigV4Signer`] (or [`sign_request`]), choosing which headers to sign with a
//!    [`SignedHeaderSelection`].
//! 3. Attach [`SignedRequest::headers`] to the outgoing request, e.g. with [`SignedRequest::apply_to`].
//!
//! Services that speak the JSON target-action protocol (DynamoDB, Translate, ...) can use [`JsonTargetService`],
//! which builds the descriptor as well.
//!
//! ## Example
//! ```rust
//! use chrono::{DateTime, Utc};
//! use sigv4_request_signer::{Credentials, JsonTargetService};
//!
//! let dynamodb = JsonTargetService::builder()
//!     .service("dynamodb")
//!     .region("us-west-2")
//!     .target_prefix("DynamoDB_20120810")
//!     .build()
//!     .unwrap();
//!
//! let credentials = Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
//!
//! // Normally this would be Utc::now().
//! let timestamp = DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap();
//!
//! let payload = r#"{"KeySchema": [{"KeyType": "HASH","AttributeName": "Id"}],"TableName": "TestTable","AttributeDefinitions": [{"AttributeName": "Id","AttributeType": "S"}],"ProvisionedThroughput": {"WriteCapacityUnits": 5,"ReadCapacityUnits": 5}}"#;
//! let (descriptor, signed) = dynamodb.sign("CreateTable", payload, &credentials, timestamp).unwrap();
//!
//! assert_eq!(
//!     signed.authorization(),
//!     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-west-2/dynamodb/aws4_request, \
//!      SignedHeaders=content-type;host;x-amz-date;x-amz-target, \
//!      Signature=b2cb20e6581cc9d8709cc4ca03cc55cde3abf28c2cad5e39f2b9e43b48cc5d82"
//! );
//! assert_eq!(signed.header("x-amz-date"), Some("20150830T123600Z"));
//!
//! // Send descriptor.payload() to dynamodb.endpoint() with signed.headers() attached.
//! assert_eq!(&descriptor.payload()[..], payload.as_bytes());
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

#[cfg(any(doc, feature = "unstable"))]
pub mod canonical;
#[cfg(not(any(doc, feature = "unstable")))]
mod canonical;

mod chronoutil;
mod constants;
mod credentials;
mod crypto;
mod error;
mod request;
mod scope;
mod service;
mod signature;
mod signer;
mod signing_key;
mod verify;

pub use crate::{
    canonical::{
        is_rfc3986_unreserved, normalize_header_name, normalize_header_value, normalize_headers,
        normalize_query_string_element, normalize_uri_path_component, query_string_to_pairs, u8_to_upper_hex,
        uri_encode, validate_payload_encoding, CanonicalHeaders, ConstSignedHeaderSelection, SignedHeaderSelection,
        SliceSignedHeaderSelection, VecSignedHeaderSelection, JSON_TARGET_SIGNED_HEADERS,
        NO_ADDITIONAL_SIGNED_HEADERS, SIGN_ALL_HEADERS,
    },
    constants::{APPLICATION_X_AMZ_JSON_1_0, APPLICATION_X_AMZ_JSON_1_1, SHA256_EMPTY},
    credentials::Credentials,
    error::SigningError,
    request::{RequestDescriptor, RequestDescriptorBuilder, RequestDescriptorBuilderError},
    scope::CredentialScope,
    service::{JsonTargetService, JsonTargetServiceBuilder, JsonTargetServiceBuilderError},
    signature::{sign_http_request, sign_request, SigningOptions},
    signer::{
        calculate_signature, compose_authorization, string_to_sign, SigV4Signer, SigV4SignerBuilder,
        SigV4SignerBuilderError, SignedRequest,
    },
    signing_key::{KDateKey, KRegionKey, KSecretKey, KServiceKey, KSigningKey},
    verify::{verify_request, AuthorizationHeader, VerifiedRequest, VerifyOptions},
};
