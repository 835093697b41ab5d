use std::time::Duration;

use crate::config::SearchConfig;
use crate::providers::{EdamamCredentials, ProviderFactory};
use crate::{HttpClient, MealSearch, SearchError};

/// Builder for configuring a [`MealSearch`]
///
/// Anything not set explicitly falls back to [`SearchConfig::default`].
#[derive(Debug, Default)]
pub struct MealSearchBuilder {
    config: Option<SearchConfig>,
    mealdb_base_url: Option<String>,
    edamam_base_url: Option<String>,
    edamam_credentials: Option<EdamamCredentials>,
    timeout: Option<Duration>,
}

impl MealSearchBuilder {
    /// Start from a loaded configuration
    ///
    /// # Example
    /// ```no_run
    /// use meal_search::{MealSearch, SearchConfig};
    ///
    /// let config = SearchConfig::load()?;
    /// let search = MealSearch::builder().config(config).build()?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the TheMealDB API root (e.g. a proxy or a test server)
    pub fn mealdb_base_url(mut self, url: impl Into<String>) -> Self {
        self.mealdb_base_url = Some(url.into());
        self
    }

    /// Override the Edamam API root
    pub fn edamam_base_url(mut self, url: impl Into<String>) -> Self {
        self.edamam_base_url = Some(url.into());
        self
    }

    /// Set the Edamam application id and key
    ///
    /// Blank values leave Edamam unconfigured, which silently disables it.
    ///
    /// # Example
    /// ```
    /// use meal_search::MealSearch;
    ///
    /// let builder = MealSearch::builder().edamam_credentials("app-id", "app-key");
    /// ```
    pub fn edamam_credentials(mut self, app_id: &str, app_key: &str) -> Self {
        self.edamam_credentials = EdamamCredentials::from_parts(Some(app_id), Some(app_key));
        self
    }

    /// Set the per-request timeout
    ///
    /// # Example
    /// ```
    /// use meal_search::MealSearch;
    /// use std::time::Duration;
    ///
    /// let builder = MealSearch::builder().timeout(Duration::from_secs(5));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Build the configured [`MealSearch`]
    ///
    /// # Errors
    /// Returns `SearchError::RequestError` if the HTTP client cannot be created.
    pub fn build(self) -> Result<MealSearch, SearchError> {
        let mut config = self.config.unwrap_or_default();

        if let Some(url) = self.mealdb_base_url {
            config.mealdb.base_url = url;
        }
        if let Some(url) = self.edamam_base_url {
            config.edamam.base_url = url;
        }
        if let Some(credentials) = self.edamam_credentials {
            config.edamam.app_id = Some(credentials.app_id().to_string());
            config.edamam.app_key = Some(credentials.app_key().to_string());
        }

        let timeout = effective_timeout(self.timeout, &config);
        let client = HttpClient::new(Some(timeout))?;
        let providers = ProviderFactory::create_all(&config, &client)?;
        Ok(MealSearch::new(providers))
    }
}

/// An explicit builder timeout wins over the configured milliseconds
fn effective_timeout(timeout: Option<Duration>, config: &SearchConfig) -> Duration {
    timeout.unwrap_or_else(|| config.timeout())
}
