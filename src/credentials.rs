use {
    crate::{constants::*, SigningError},
    std::fmt::{Debug, Formatter, Result as FmtResult},
    zeroize::Zeroizing,
};

/// AWS credentials used to sign a request.
///
/// The secret access key and session token are zeroed in memory when the `Credentials` are dropped. The signer never
/// reads credentials from the environment on its own; callers that want the usual environment variables call
/// [`Credentials::from_env`] explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: Zeroizing<String>,
    session_token: Option<Zeroizing<String>>,
}

impl Credentials {
    /// Create long-term credentials from an access key id and secret access key.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: Zeroizing::new(secret_access_key.into()),
            session_token: None,
        }
    }

    /// Attach a session token, turning these into temporary credentials.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(Zeroizing::new(session_token.into()));
        self
    }

    /// Load credentials from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and (optionally) `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Result<Self, SigningError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load credentials through an arbitrary variable lookup function, using the same variable names as
    /// [`from_env`][Self::from_env].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SigningError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_key_id = lookup(ENV_AWS_ACCESS_KEY_ID).filter(|s| !s.is_empty()).ok_or_else(|| {
            SigningError::MissingCredential(format!("{} is not set", ENV_AWS_ACCESS_KEY_ID))
        })?;
        let secret_access_key =
            Zeroizing::new(lookup(ENV_AWS_SECRET_ACCESS_KEY).filter(|s| !s.is_empty()).ok_or_else(|| {
                SigningError::MissingCredential(format!("{} is not set", ENV_AWS_SECRET_ACCESS_KEY))
            })?);
        let session_token = lookup(ENV_AWS_SESSION_TOKEN).filter(|s| !s.is_empty()).map(Zeroizing::new);

        Ok(Self {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }

    /// Retrieve the access key id.
    #[inline]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Retrieve the secret access key.
    #[inline]
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Retrieve the session token, if any.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_ref().map(|t| t.as_str())
    }

    /// Make sure neither the access key id nor the secret access key is empty.
    pub(crate) fn validate(&self) -> Result<(), SigningError> {
        if self.access_key_id.is_empty() {
            return Err(SigningError::MissingCredential("Access key id is empty".to_string()));
        }

        if self.secret_access_key.is_empty() {
            return Err(SigningError::MissingCredential("Secret access key is empty".to_string()));
        }

        Ok(())
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}
