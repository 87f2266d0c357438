use {
    crate::{
        constants::*, Credentials, RequestDescriptor, SigV4Signer, SignedRequest, SigningError,
        JSON_TARGET_SIGNED_HEADERS,
    },
    bytes::Bytes,
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    http::Method,
};

/// Request template for AWS services that use the JSON target-action protocol, such as DynamoDB and Translate.
///
/// Every request is a `POST /` whose `x-amz-target` header names the action and whose body is the JSON argument.
///
/// ```
/// # use sigv4_request_signer::{JsonTargetService, APPLICATION_X_AMZ_JSON_1_1};
/// let translate = JsonTargetService::builder()
///     .service("translate")
///     .region("us-west-2")
///     .content_type(APPLICATION_X_AMZ_JSON_1_1)
///     .target_prefix("AWSShineFrontendService_20170701")
///     .build()
///     .unwrap();
/// assert_eq!(translate.endpoint(), "https://translate.us-west-2.amazonaws.com/");
/// ```
#[derive(Builder, Clone, Debug, PartialEq, Eq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct JsonTargetService {
    /// The service name used in the credential scope, e.g. `dynamodb`.
    #[builder(setter(into))]
    service: String,

    /// The region, e.g. `us-west-2`.
    #[builder(setter(into))]
    region: String,

    /// The host to send requests to; defaults to `<service>.<region>.amazonaws.com`.
    #[builder(setter(into, strip_option), default)]
    host: Option<String>,

    /// The `Content-Type` of requests.
    #[builder(setter(into), default = "APPLICATION_X_AMZ_JSON_1_0.to_string()")]
    content_type: String,

    /// The prefix of the `x-amz-target` header, e.g. `DynamoDB_20120810`.
    #[builder(setter(into))]
    target_prefix: String,
}

impl JsonTargetServiceBuilder {
    fn validate(&self) -> Result<(), String> {
        let fields = [("service", &self.service), ("region", &self.region), ("target_prefix", &self.target_prefix)];
        for (name, value) in fields {
            if let Some(value) = value {
                if value.is_empty() {
                    return Err(format!("{} must not be empty", name));
                }
            }
        }

        Ok(())
    }
}

impl JsonTargetService {
    /// Create a [JsonTargetServiceBuilder] to construct a [JsonTargetService].
    #[inline]
    pub fn builder() -> JsonTargetServiceBuilder {
        JsonTargetServiceBuilder::default()
    }

    /// Retrieve the service name.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Retrieve the region.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the `Content-Type` of requests.
    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Retrieve the `x-amz-target` prefix.
    #[inline]
    pub fn target_prefix(&self) -> &str {
        &self.target_prefix
    }

    /// The host requests are sent to.
    pub fn host(&self) -> String {
        match self.host {
            Some(ref host) => host.clone(),
            None => format!("{}.{}.amazonaws.com", self.service, self.region),
        }
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> String {
        format!("https://{}/", self.host())
    }

    /// The `x-amz-target` value for an action.
    pub fn target(&self, action: &str) -> String {
        format!("{}.{}", self.target_prefix, action)
    }

    /// A signer for this service's region and service name.
    pub fn signer(&self) -> SigV4Signer {
        SigV4Signer::new(&self.region, &self.service)
    }

    /// Describe a request invoking `action` with a JSON payload. The payload bytes are used as-is.
    pub fn descriptor(&self, action: &str, payload: impl Into<Bytes>) -> Result<RequestDescriptor, SigningError> {
        RequestDescriptor::builder()
            .method(Method::POST)
            .path("/")
            .header(HDR_CONTENT_TYPE, self.content_type.as_str())
            .header(HDR_HOST, self.host())
            .header(HDR_X_AMZ_TARGET, self.target(action))
            .payload(payload)
            .build()
            .map_err(|e| SigningError::InternalServiceError(Box::new(e)))
    }

    /// Describe and sign a request invoking `action`. The descriptor is returned alongside the signature so the
    /// transport sends the same bytes that were hashed.
    pub fn sign(
        &self,
        action: &str,
        payload: impl Into<Bytes>,
        credentials: &Credentials,
        timestamp: DateTime<Utc>,
    ) -> Result<(RequestDescriptor, SignedRequest), SigningError> {
        let descriptor = self.descriptor(action, payload)?;
        let signed = self.signer().sign(&descriptor, credentials, timestamp, &JSON_TARGET_SIGNED_HEADERS)?;
        Ok((descriptor, signed))
    }
}
