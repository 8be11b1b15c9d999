//! Base-URL providers shared by endpoint trees.

use std::sync::RwLock;

/// Supplies the API base URL. Read each time a request URL is resolved.
pub trait ServerProvider: Send + Sync {
    fn api(&self) -> String;
}

/// A base URL that can be switched at runtime, e.g. between staging and
/// production.
#[derive(Debug)]
pub struct Server {
    api: RwLock<String>,
}

impl Server {
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: RwLock::new(api.into()),
        }
    }

    pub fn set_api(&self, api: impl Into<String>) {
        let mut guard = self.api.write().unwrap_or_else(|e| e.into_inner());
        *guard = api.into();
    }
}

impl ServerProvider for Server {
    fn api(&self) -> String {
        self.api.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl ServerProvider for String {
    fn api(&self) -> String {
        self.clone()
    }
}

impl ServerProvider for &'static str {
    fn api(&self) -> String {
        self.to_string()
    }
}
