use std::fmt;

/// Opaque bearer token issued by the backend at login.
///
/// Its presence is the sole signed-in predicate. The token value is redacted
/// from `Debug` output so it never lands in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Restore a credential from storage, treating blank values as absent.
    #[must_use]
    pub fn from_stored(raw: Option<String>) -> Option<Self> {
        raw.filter(|token| !token.trim().is_empty()).map(Self)
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_stored_value_is_absent() {
        assert!(Credential::from_stored(None).is_none());
        assert!(Credential::from_stored(Some("   ".into())).is_none());
        let cred = Credential::from_stored(Some("tok-1".into())).unwrap();
        assert_eq!(cred.token(), "tok-1");
    }

    #[test]
    fn debug_redacts_token() {
        let cred = Credential::new("secret-token");
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("secret-token"));
    }
}
