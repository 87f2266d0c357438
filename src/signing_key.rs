use {
    crate::{constants::*, crypto::hmac_sha256, Credentials, SigningError},
    chrono::NaiveDate,
    std::{
        fmt::{Debug, Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
    zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing},
};

/// Print only the type name of a key; key material never reaches a log line.
macro_rules! redacted_fmt {
    ($key_type:ident) => {
        impl Debug for $key_type {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(stringify!($key_type))
            }
        }

        impl Display for $key_type {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str(stringify!($key_type))
            }
        }
    };
}

/// A 32-byte key produced by one HMAC-SHA256 step of the derivation chain.
macro_rules! derived_key {
    ($(#[$meta:meta])* $key_type:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
        pub struct $key_type {
            key: [u8; SHA256_OUTPUT_LEN],
        }

        impl AsRef<[u8; SHA256_OUTPUT_LEN]> for $key_type {
            fn as_ref(&self) -> &[u8; SHA256_OUTPUT_LEN] {
                &self.key
            }
        }

        redacted_fmt!($key_type);
    };
}

/// The raw AWS secret access key (`kSecret`), held with its `AWS4` prefix so it can key the first HMAC directly.
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    prefixed_key: Zeroizing<Vec<u8>>,
}

redacted_fmt!(KSecretKey);

derived_key!(
    /// `kDate = HMAC("AWS4" + kSecret, "YYYYMMDD")`
    KDateKey
);

derived_key!(
    /// `kRegion = HMAC(kDate, region)`
    KRegionKey
);

derived_key!(
    /// `kService = HMAC(kRegion, service)`
    KServiceKey
);

derived_key!(
    /// `kSigning = HMAC(kService, "aws4_request")`, the key that signs the string to sign.
    ///
    /// The same secret, date, region and service always give the same `KSigningKey`, so a caller may keep one for
    /// the rest of the UTC day instead of deriving it for every request.
    KSigningKey
);

impl AsRef<[u8]> for KSecretKey {
    fn as_ref(&self) -> &[u8] {
        &self.prefixed_key[AWS4_PREFIX.len()..]
    }
}

impl FromStr for KSecretKey {
    type Err = SigningError;

    /// Wrap a secret access key. An empty secret is a [SigningError::MissingCredential].
    fn from_str(secret: &str) -> Result<Self, SigningError> {
        if secret.is_empty() {
            return Err(SigningError::MissingCredential("Secret access key is empty".to_string()));
        }

        let mut prefixed_key = Zeroizing::new(Vec::with_capacity(AWS4_PREFIX.len() + secret.len()));
        prefixed_key.extend_from_slice(AWS4_PREFIX);
        prefixed_key.extend_from_slice(secret.as_bytes());

        Ok(Self {
            prefixed_key,
        })
    }
}

impl TryFrom<&Credentials> for KSecretKey {
    type Error = SigningError;

    fn try_from(credentials: &Credentials) -> Result<Self, SigningError> {
        Self::from_str(credentials.secret_access_key())
    }
}

impl KSecretKey {
    /// Derive `kDate`. The date is rendered `YYYYMMDD`.
    pub fn to_kdate(&self, date: NaiveDate) -> KDateKey {
        let date = Zeroizing::new(date.format(ISO8601_DATE_FORMAT).to_string());
        KDateKey {
            key: hmac_sha256(&self.prefixed_key, date.as_bytes()),
        }
    }

    /// Derive `kRegion` through `kDate`.
    pub fn to_kregion(&self, date: NaiveDate, region: &str) -> KRegionKey {
        self.to_kdate(date).to_kregion(region)
    }

    /// Derive `kService` through `kDate` and `kRegion`.
    pub fn to_kservice(&self, date: NaiveDate, region: &str, service: &str) -> KServiceKey {
        self.to_kregion(date, region).to_kservice(service)
    }

    /// Derive the signing key for a date, region and service.
    pub fn to_ksigning(&self, date: NaiveDate, region: &str, service: &str) -> KSigningKey {
        self.to_kservice(date, region, service).to_ksigning()
    }
}

impl KDateKey {
    /// Derive `kRegion`.
    pub fn to_kregion(&self, region: &str) -> KRegionKey {
        KRegionKey {
            key: hmac_sha256(&self.key, region.as_bytes()),
        }
    }

    /// Derive `kService` through `kRegion`.
    pub fn to_kservice(&self, region: &str, service: &str) -> KServiceKey {
        self.to_kregion(region).to_kservice(service)
    }

    /// Derive the signing key for a region and service on this key's date.
    pub fn to_ksigning(&self, region: &str, service: &str) -> KSigningKey {
        self.to_kservice(region, service).to_ksigning()
    }
}

impl KRegionKey {
    /// Derive `kService`.
    pub fn to_kservice(&self, service: &str) -> KServiceKey {
        KServiceKey {
            key: hmac_sha256(&self.key, service.as_bytes()),
        }
    }

    /// Derive the signing key for a service.
    pub fn to_ksigning(&self, service: &str) -> KSigningKey {
        self.to_kservice(service).to_ksigning()
    }
}

impl KServiceKey {
    /// Derive the signing key by hashing in the `aws4_request` terminator.
    pub fn to_ksigning(&self) -> KSigningKey {
        KSigningKey {
            key: hmac_sha256(&self.key, AWS4_REQUEST.as_bytes()),
        }
    }
}

impl KSigningKey {
    /// Wrap raw signing key bytes obtained elsewhere, e.g. from a key cache or a key service.
    pub fn from_bytes(key: [u8; SHA256_OUTPUT_LEN]) -> Self {
        Self {
            key,
        }
    }

    /// Lowercase hex rendering of the key. This is for debugging only; the signing key is never transmitted.
    pub fn to_hex(&self) -> String {
        hex::encode(self.key)
    }
}

#[cfg(test)]
mod tests {
    use {
        crate::{constants::*, Credentials, KSecretKey, KSigningKey},
        chrono::NaiveDate,
        std::str::FromStr,
    };

    const SECRET: &str = "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY";

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 8, d).unwrap()
    }

    #[test_log::test]
    fn test_derivation_chain() {
        let secret = KSecretKey::from_str(SECRET).unwrap();
        assert_eq!(secret.as_ref(), SECRET.as_bytes());

        let kdate = secret.to_kdate(day(30));
        let kregion = kdate.to_kregion("us-east-1");
        let kservice = kregion.to_kservice("example");
        let ksigning = kservice.to_ksigning();

        for (step, expected) in [
            (hex::encode(kdate.as_ref()), "0138c7a6cbd60aa727b2f653a522567439dfb9f3e72b21f9b25941a42f04a7cd"),
            (hex::encode(kregion.as_ref()), "f33d5808504bf34812e5fade63308b424b244c59189be2a591dd2282c7cb563f"),
            (hex::encode(kservice.as_ref()), "c60cc4b1d034c757348f2c673004c18908bba9a46fa1db87a98350f27e7b2df6"),
            (ksigning.to_hex(), "431cc9ef5876287dbb925d4ba4629f459002ad1d26b7c751601bb204e11718b8"),
        ] {
            assert_eq!(step, expected);
        }

        // Shortcuts land on the same keys.
        assert_eq!(secret.to_kregion(day(30), "us-east-1"), kregion);
        assert_eq!(secret.to_kservice(day(30), "us-east-1", "example"), kservice);
        assert_eq!(secret.to_ksigning(day(30), "us-east-1", "example"), ksigning);
        assert_eq!(kdate.to_kservice("us-east-1", "example"), kservice);
        assert_eq!(kdate.to_ksigning("us-east-1", "example"), ksigning);
        assert_eq!(kregion.to_ksigning("example"), ksigning);
        assert_eq!(KSigningKey::from_bytes(*ksigning.as_ref()), ksigning);
    }

    #[test_log::test]
    fn test_keys_are_redacted() {
        let secret = KSecretKey::from_str(SECRET).unwrap();
        let kdate = secret.to_kdate(day(30));
        let kregion = kdate.to_kregion(TEST_REGION);
        let kservice = kregion.to_kservice(TEST_SERVICE);
        let ksigning = kservice.to_ksigning();

        assert_eq!(format!("{:?} {}", secret, secret), "KSecretKey KSecretKey");
        assert_eq!(format!("{:?} {}", kdate, kdate), "KDateKey KDateKey");
        assert_eq!(format!("{:?} {}", kregion, kregion), "KRegionKey KRegionKey");
        assert_eq!(format!("{:?} {}", kservice, kservice), "KServiceKey KServiceKey");
        assert_eq!(format!("{:?} {}", ksigning, ksigning), "KSigningKey KSigningKey");
    }

    #[test_log::test]
    fn test_signing_key_scoping() {
        let secret = KSecretKey::from_str(SECRET).unwrap();
        let base = secret.to_ksigning(day(30), TEST_REGION, TEST_SERVICE);
        assert_eq!(base.to_hex(), "938127b5336810ddb6a5d6af445fcac9e371f9ed418ed386b022aed82901be75");
        assert_eq!(base, base.clone());

        // Stable across repeated derivations...
        for _ in 0..3 {
            assert_eq!(secret.to_ksigning(day(30), TEST_REGION, TEST_SERVICE), base);
        }

        // ... and different when any part of the scope or the secret changes.
        assert_ne!(secret.to_ksigning(day(31), TEST_REGION, TEST_SERVICE), base);
        assert_ne!(secret.to_ksigning(day(30), "us-west-2", TEST_SERVICE), base);
        assert_ne!(secret.to_ksigning(day(30), TEST_REGION, "dynamodb"), base);

        let other = KSecretKey::from_str("wJalrXUtnFEMI/K7MDENG+bPxRfiCZEXAMPLEKEY").unwrap();
        assert_ne!(other, secret);
        assert_ne!(other.to_ksigning(day(30), TEST_REGION, TEST_SERVICE), base);
    }

    #[test_log::test]
    fn test_secret_from_credentials() {
        let creds = Credentials::new("AKIDEXAMPLE", SECRET);
        let secret = KSecretKey::try_from(&creds).unwrap();
        assert_eq!(secret, KSecretKey::from_str(SECRET).unwrap());

        let e = KSecretKey::from_str("").unwrap_err();
        assert_eq!(e.error_code(), "MissingCredential");
    }
}
