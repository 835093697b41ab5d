mod edamam;
mod factory;
mod mealdb;

pub use edamam::{EdamamCredentials, EdamamProvider, MIN_FIBER_PER_SERVING_G};
pub use factory::ProviderFactory;
pub use mealdb::{MealDbProvider, MAX_INGREDIENT_SLOTS};

use async_trait::async_trait;

use crate::error::SearchError;
use crate::model::{Meal, SearchFilters};

/// Unified trait for all recipe search providers
#[async_trait]
pub trait RecipeProvider: Send + Sync {
    /// Get the provider name (e.g., "mealdb", "edamam")
    fn provider_name(&self) -> &str;

    /// Search the provider and normalize every hit into a [`Meal`].
    ///
    /// A blank query returns an empty list without touching the network.
    /// Any request or decoding failure fails the whole call.
    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Meal>, SearchError>;
}
