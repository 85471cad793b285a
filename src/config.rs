use std::time::Duration;

/// Process configuration read from the environment (and `.env`, when present).
///
/// Missing API keys are not errors here; each adapter reports its own missing
/// credential when an operation first needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub alpha_vantage_api_key: String,
    pub fmp_api_key: String,
    pub tavily_api_key: String,
    pub openai_api_key: String,
    pub openai_model: Option<String>,
    pub x_access_token: String,
    pub db_path: String,
    pub post_delay: Duration,
    pub search_timeout: Duration,
    pub dry_run: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            alpha_vantage_api_key: String::new(),
            fmp_api_key: String::new(),
            tavily_api_key: String::new(),
            openai_api_key: String::new(),
            openai_model: None,
            x_access_token: String::new(),
            db_path: "./moverwatch.db".into(),
            post_delay: Duration::from_secs(5),
            search_timeout: Duration::from_secs(15),
            dry_run: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let secs = |key: &str, fallback: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(fallback)
        };

        Self {
            alpha_vantage_api_key: lookup("ALPHA_VANTAGE_API_KEY").unwrap_or_default(),
            fmp_api_key: lookup("FMP_API_KEY").unwrap_or_default(),
            tavily_api_key: lookup("TAVILY_API_KEY").unwrap_or_default(),
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or_default(),
            openai_model: lookup("OPENAI_MODEL").filter(|m| !m.trim().is_empty()),
            x_access_token: lookup("X_ACCESS_TOKEN").unwrap_or_default(),
            db_path: lookup("MOVERWATCH_DB").unwrap_or(defaults.db_path),
            post_delay: secs("MOVERWATCH_POST_DELAY_SECS", defaults.post_delay),
            search_timeout: secs("MOVERWATCH_SEARCH_TIMEOUT_SECS", defaults.search_timeout),
            dry_run: lookup("MOVERWATCH_DRY_RUN")
                .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}
