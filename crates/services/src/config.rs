use std::env;

/// Default number of completion lookups kept in flight per snapshot load.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

/// Connection settings for the program backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub fetch_concurrency: usize,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_fetch_concurrency(mut self, limit: usize) -> Self {
        self.fetch_concurrency = limit.max(1);
        self
    }

    /// Read `MINDFUL_API_URL`, `MINDFUL_API_TOKEN` and `MINDFUL_FETCH_CONCURRENCY`.
    ///
    /// Returns `None` when no API URL is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let base_url = lookup("MINDFUL_API_URL")?;
        if base_url.trim().is_empty() {
            return None;
        }

        let mut config = Self::new(base_url.trim());
        if let Some(token) = lookup("MINDFUL_API_TOKEN").filter(|t| !t.trim().is_empty()) {
            config = config.with_token(token.trim());
        }
        if let Some(limit) = lookup("MINDFUL_FETCH_CONCURRENCY")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
        {
            config = config.with_fetch_concurrency(limit);
        }
        Some(config)
    }

    /// Absolute URL for an API path such as `programs/7`.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
