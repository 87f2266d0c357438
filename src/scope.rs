use {
    crate::{constants::*, KSecretKey, KSigningKey, SigningError},
    chrono::{DateTime, NaiveDate, Utc},
    std::{
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// The credential scope binding a signature to a date, region and service: `YYYYMMDD/region/service/aws4_request`.
///
/// The date must be the UTC date of the request timestamp, since that is the scope the server reconstructs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CredentialScope {
    date: NaiveDate,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Create a new credential scope.
    pub fn new(date: NaiveDate, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            date,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Create the credential scope for a request signed at `timestamp`.
    pub fn for_timestamp(timestamp: &DateTime<Utc>, region: impl Into<String>, service: impl Into<String>) -> Self {
        Self::new(timestamp.date_naive(), region, service)
    }

    /// Retrieve the date of the scope.
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Retrieve the region of the scope.
    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Retrieve the service of the scope.
    #[inline]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Derive the signing key for this scope.
    pub fn signing_key(&self, secret: &KSecretKey) -> KSigningKey {
        secret.to_ksigning(self.date, &self.region, &self.service)
    }
}

impl Display for CredentialScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}/{}/{}", self.date.format(ISO8601_DATE_FORMAT), self.region, self.service, AWS4_REQUEST)
    }
}

impl FromStr for CredentialScope {
    type Err = SigningError;

    /// Parse a `YYYYMMDD/region/service/aws4_request` credential scope.
    fn from_str(s: &str) -> Result<Self, SigningError> {
        let parts = s.split('/').collect::<Vec<&str>>();
        if parts.len() != 4 {
            return Err(SigningError::IncompleteSignature(format!(
                "Credential scope must have exactly 4 slash-delimited elements, e.g. date/region/service/term, got '{}'",
                s
            )));
        }

        if parts[3] != AWS4_REQUEST {
            return Err(SigningError::SignatureDoesNotMatch(Some(format!(
                "Credential should be scoped with a valid terminator: 'aws4_request', not '{}'.",
                parts[3]
            ))));
        }

        let date = NaiveDate::parse_from_str(parts[0], ISO8601_DATE_FORMAT).map_err(|_| {
            SigningError::IncompleteSignature(format!(
                "Credential scope date must be in YYYYMMDD format: '{}'",
                parts[0]
            ))
        })?;

        Ok(Self::new(date, parts[1], parts[2]))
    }
}
