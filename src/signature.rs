use {
    crate::{Credentials, RequestDescriptor, SigV4Signer, SignedHeaderSelection, SignedRequest, SigningError},
    bytes::Bytes,
    chrono::{DateTime, Utc},
    http::request::Request,
    log::debug,
};

/// Options that can be used to configure the signer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SigningOptions {
    /// Canonicalize requests according to S3 rules.
    pub s3: bool,
}

impl SigningOptions {
    /// Create a `SigningOptions` suitable for use with S3-type authentication.
    ///
    /// This sets `s3` to `true`, resulting in AWS SigV4S3-style canonicalization: the URI path is used as-is,
    /// without collapsing slashes or removing `.` and `..` segments.
    pub const S3: Self = Self {
        s3: true,
    };
}

/// Sign an AWS SigV4 request described by a [RequestDescriptor].
///
/// # Parameters
/// * `descriptor` - The request to sign. It must have a `Host` header.
/// * `credentials` - The credentials to sign with.
/// * `region` - The AWS region the request is sent to.
/// * `service` - The AWS service the request is sent to.
/// * `timestamp` - The signing time, usually `Utc::now()`. This becomes the `x-amz-date` header and fixes the date of
///   the credential scope.
/// * `selection` - The headers to sign in addition to the default SigV4 headers. If none, use
///   [`NO_ADDITIONAL_SIGNED_HEADERS`][crate::NO_ADDITIONAL_SIGNED_HEADERS].
/// * `options` - [`SigningOptions`] that affect canonicalization. For most services, use
///   `SigningOptions::default()`.
pub fn sign_request<S>(
    descriptor: &RequestDescriptor,
    credentials: &Credentials,
    region: &str,
    service: &str,
    timestamp: DateTime<Utc>,
    selection: &S,
    options: SigningOptions,
) -> Result<SignedRequest, SigningError>
where
    S: SignedHeaderSelection + ?Sized,
{
    let signer = SigV4Signer::builder()
        .region(region)
        .service(service)
        .options(options)
        .build()
        .map_err(|e| SigningError::InternalServiceError(Box::new(e)))?;
    signer.sign(descriptor, credentials, timestamp, selection)
}

/// Sign an HTTP [`Request`] in place.
///
/// The body is collected into [`Bytes`]; the returned request carries exactly the bytes that were hashed, along with
/// the `x-amz-date`, `authorization` and (for temporary credentials) `x-amz-security-token` headers. If the request
/// has no `Host` header, the host of its URI is signed, with the port only when it is not the scheme's default.
/// Repeated headers are signed as one comma-separated value.
pub fn sign_http_request<B, S>(
    request: Request<B>,
    credentials: &Credentials,
    region: &str,
    service: &str,
    timestamp: DateTime<Utc>,
    selection: &S,
    options: SigningOptions,
) -> Result<Request<Bytes>, SigningError>
where
    B: Into<Bytes>,
    S: SignedHeaderSelection + ?Sized,
{
    let (mut parts, body) = request.into_parts();
    let body: Bytes = body.into();
    let descriptor = RequestDescriptor::from_http_request_parts(&parts, body.clone())?;

    let signed = match sign_request(&descriptor, credentials, region, service, timestamp, selection, options) {
        Ok(signed) => signed,
        Err(e) => {
            debug!("sign_http_request: failed to sign {} {}: {}", parts.method, parts.uri, e);
            return Err(e);
        }
    };

    signed.apply_to(&mut parts.headers)?;
    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use {
        crate::{
            constants::*, sign_http_request, sign_request, Credentials, RequestDescriptor, SigningOptions,
            NO_ADDITIONAL_SIGNED_HEADERS, SIGN_ALL_HEADERS,
        },
        chrono::{DateTime, Utc},
        http::{Method, Request},
    };

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    #[test_log::test]
    fn test_sign_http_request() {
        let timestamp = DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri("https://example.amazonaws.com/?Param2=value2&Param1=value1")
            .body(Vec::<u8>::new())
            .unwrap();
        let creds = Credentials::new("AKIDEXAMPLE", SECRET);

        let signed = sign_http_request(
            request,
            &creds,
            TEST_REGION,
            TEST_SERVICE,
            timestamp,
            &NO_ADDITIONAL_SIGNED_HEADERS,
            SigningOptions::default(),
        )
        .unwrap();

        assert_eq!(signed.headers().get("x-amz-date").unwrap(), "20150830T123600Z");
        assert_eq!(
            signed.headers().get("authorization").unwrap(),
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/service/aws4_request, SignedHeaders=host;x-amz-date, Signature=b97d918cfa904a5beff61c982a1b6f458b799221646efd99d3219ec94cdf2500"
        );
        assert!(signed.body().is_empty());
    }

    #[test_log::test]
    fn test_sign_http_request_with_repeated_unsigned_header() {
        let timestamp = DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri("https://example.amazonaws.com/")
            .header("Accept", "text/plain")
            .header("Accept", "application/json")
            .body("")
            .unwrap();
        let creds = Credentials::new("AKIDEXAMPLE", SECRET);

        let signed = sign_http_request(
            request,
            &creds,
            TEST_REGION,
            TEST_SERVICE,
            timestamp,
            &NO_ADDITIONAL_SIGNED_HEADERS,
            SigningOptions::default(),
        )
        .unwrap();

        assert!(signed.headers().get("authorization").unwrap().to_str().unwrap().ends_with(
            "SignedHeaders=host;x-amz-date, Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31"
        ));
        let accept = signed.headers().get_all("accept").iter().collect::<Vec<_>>();
        assert_eq!(accept, vec!["text/plain", "application/json"]);
        assert!(signed.body().is_empty());
    }

    #[test_log::test]
    fn test_sign_http_request_signs_folded_values() {
        let timestamp = DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap();
        let request = Request::builder()
            .method(Method::GET)
            .uri("https://example.amazonaws.com/")
            .header("X-Amz-Meta-Tag", "a")
            .header("X-Amz-Meta-Tag", "b")
            .body(Vec::<u8>::new())
            .unwrap();
        let creds = Credentials::new("AKIDEXAMPLE", SECRET);

        let (selection, options) = (&SIGN_ALL_HEADERS, SigningOptions::default());
        let signed =
            sign_http_request(request, &creds, TEST_REGION, TEST_SERVICE, timestamp, selection, options).unwrap();
        let authorization = signed.headers().get("authorization").unwrap().to_str().unwrap();
        assert!(authorization.contains("SignedHeaders=host;x-amz-date;x-amz-meta-tag,"));

        let rd = RequestDescriptor::builder()
            .method(Method::GET)
            .header("Host", "example.amazonaws.com")
            .header("X-Amz-Meta-Tag", "a,b")
            .build()
            .unwrap();
        let expected = sign_request(&rd, &creds, TEST_REGION, TEST_SERVICE, timestamp, selection, options).unwrap();
        assert!(expected.canonical_request().contains("\nx-amz-meta-tag:a,b\n"));
        assert_eq!(authorization, expected.authorization());
    }

    #[test_log::test]
    fn test_sign_request() {
        let timestamp = DateTime::<Utc>::from_timestamp(1440938160, 0).unwrap();
        let rd = RequestDescriptor::builder()
            .method(Method::GET)
            .header("Host", "example.amazonaws.com")
            .build()
            .unwrap();
        let creds = Credentials::new("AKIDEXAMPLE", SECRET);
        let selection = &NO_ADDITIONAL_SIGNED_HEADERS;
        let signed =
            sign_request(&rd, &creds, TEST_REGION, TEST_SERVICE, timestamp, selection, SigningOptions::S3).unwrap();
        assert_eq!(signed.signature(), "5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31");
    }
}
