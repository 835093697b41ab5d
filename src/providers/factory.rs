use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::providers::{EdamamProvider, MealDbProvider, RecipeProvider};

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &SearchConfig,
        client: &HttpClient,
    ) -> Result<Box<dyn RecipeProvider>, SearchError> {
        match provider_name {
            "mealdb" => Ok(Box::new(MealDbProvider::new(
                client.clone(),
                config.mealdb.base_url.clone(),
            ))),
            "edamam" => Ok(Box::new(EdamamProvider::new(
                client.clone(),
                config.edamam.base_url.clone(),
                config.edamam.credentials(),
            ))),
            _ => Err(SearchError::BuilderError(format!(
                "Unknown provider: {}",
                provider_name
            ))),
        }
    }

    /// Create every available provider. TheMealDB always comes first, so its
    /// results precede Edamam's.
    pub fn create_all(
        config: &SearchConfig,
        client: &HttpClient,
    ) -> Result<Vec<Box<dyn RecipeProvider>>, SearchError> {
        Self::available_providers()
            .into_iter()
            .map(|name| Self::create(name, config, client))
            .collect()
    }

    /// List all available provider names, in result order
    pub fn available_providers() -> Vec<&'static str> {
        vec!["mealdb", "edamam"]
    }
}
