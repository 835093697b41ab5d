//! Recipe search for meal planning.
//!
//! Queries TheMealDB and Edamam at the same time, normalizes both into
//! [`Meal`] records, and merges them into one deduplicated list. A provider
//! that fails or times out only loses its own results.
//!
//! ```no_run
//! use meal_search::{search_meals, SearchFilters};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), meal_search::SearchError> {
//! let filters = SearchFilters { low_carb: true, ..Default::default() };
//! for meal in search_meals("chicken", Some(&filters)).await? {
//!     println!("{} ({})", meal.title, meal.source);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod builder;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod providers;

pub use aggregator::{dedup_meals, merge_outcomes, MealSearch, ProviderOutcome};
pub use builder::MealSearchBuilder;
pub use config::SearchConfig;
pub use error::SearchError;
pub use http::{HttpClient, QueryParams, QueryValue};
pub use model::{Meal, MealSource, NutritionSummary, SearchFilters};
pub use providers::{EdamamCredentials, EdamamProvider, MealDbProvider, RecipeProvider};

/// Search every configured provider for `query`.
///
/// Configuration comes from `config.toml` and `MEALPLAN__*` environment
/// variables (see [`SearchConfig::load`]). Provider failures are not errors:
/// this only fails if the configuration cannot be loaded or is invalid.
pub async fn search_meals(
    query: &str,
    filters: Option<&SearchFilters>,
) -> Result<Vec<Meal>, SearchError> {
    let config = SearchConfig::load()?;
    let search = MealSearch::from_config(&config)?;
    Ok(search.search(query, filters).await)
}

/// Look up a single TheMealDB meal by id using the loaded configuration.
pub async fn lookup_meal(id: &str) -> Result<Option<Meal>, SearchError> {
    let config = SearchConfig::load()?;
    let client = HttpClient::new(Some(config.timeout()))?;
    MealDbProvider::new(client, config.mealdb.base_url)
        .lookup_by_id(id)
        .await
}
