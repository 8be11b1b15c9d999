use std::sync::RwLock;

/// Supplies the authentication token at call time.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Scheme used in the `Authorization` header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TokenType {
    #[default]
    Bearer,
    Basic,
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TokenType::Bearer => "Bearer",
                TokenType::Basic => "Basic",
            }
        )
    }
}

impl std::str::FromStr for TokenType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bearer" => Ok(TokenType::Bearer),
            "basic" => Ok(TokenType::Basic),
            _ => Err(()),
        }
    }
}

/// In-memory token that can be replaced after login or cleared on logout.
#[derive(Debug, Default)]
pub struct TokenStore {
    token: RwLock<Option<String>>,
}

impl TokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.into());
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl TokenSource for TokenStore {
    fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .filter(|t| !t.is_empty())
    }
}

impl TokenSource for Option<String> {
    fn token(&self) -> Option<String> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::{TokenSource, TokenStore};

    #[test]
    fn token_store_set_and_clear() {
        let store = TokenStore::empty();
        assert_eq!(store.token(), None);
        store.set("abc");
        assert_eq!(store.token().as_deref(), Some("abc"));
        store.clear();
        assert_eq!(store.token(), None);
        store.set("");
        assert_eq!(store.token(), None);
    }
}
