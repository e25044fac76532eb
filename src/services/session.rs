use std::sync::RwLock;

/// Holds the content-API auth token for one caller.
///
/// Set after login, cleared on logout or when the content API answers 401.
/// Anything that needs the token takes a `&SessionContext` instead of
/// reading it from some ambient store.
#[derive(Debug, Default)]
pub struct SessionContext {
    token: RwLock<Option<String>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = (!token.trim().is_empty()).then_some(token);
        Self {
            token: RwLock::new(token),
        }
    }

    /// Parses `Token <v>` or `Bearer <v>`; anything else yields an
    /// unauthenticated session.
    pub fn from_authorization(header: Option<&str>) -> Self {
        let token = header.and_then(|h| {
            let h = h.trim();
            h.strip_prefix("Token ")
                .or_else(|| h.strip_prefix("Bearer "))
                .map(str::trim)
        });
        match token {
            Some(t) => Self::with_token(t),
            None => Self::new(),
        }
    }

    pub fn token(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = (!token.trim().is_empty()).then_some(token);
    }

    pub fn clear(&self) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.take().is_some() {
            tracing::info!("session cleared");
        }
    }

    /// Header value for the content API, which expects DRF-style tokens.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| format!("Token {t}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let session = SessionContext::new();
        assert!(!session.is_authenticated());
        session.set("abc");
        assert_eq!(session.authorization_header().as_deref(), Some("Token abc"));
        session.clear();
        assert!(!session.is_authenticated());
        assert_eq!(session.authorization_header(), None);
    }

    #[test]
    fn test_from_authorization() {
        assert_eq!(
            SessionContext::from_authorization(Some("Token xyz")).token().as_deref(),
            Some("xyz")
        );
        assert_eq!(
            SessionContext::from_authorization(Some("Bearer xyz")).token().as_deref(),
            Some("xyz")
        );
        assert!(!SessionContext::from_authorization(Some("Basic abc")).is_authenticated());
        assert!(!SessionContext::from_authorization(Some("Token   ")).is_authenticated());
        assert!(!SessionContext::from_authorization(None).is_authenticated());
    }
}
