use std::collections::HashSet;

use futures::future::join_all;
use log::{debug, info, warn};

use crate::builder::MealSearchBuilder;
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::http::HttpClient;
use crate::model::{Meal, SearchFilters};
use crate::providers::{ProviderFactory, RecipeProvider};

/// How one provider branch of a search ended
#[derive(Debug)]
pub enum ProviderOutcome {
    Fulfilled { provider: String, meals: Vec<Meal> },
    Failed { provider: String, reason: SearchError },
}

impl ProviderOutcome {
    pub fn settle(provider: &str, result: Result<Vec<Meal>, SearchError>) -> Self {
        let provider = provider.to_string();
        match result {
            Ok(meals) => ProviderOutcome::Fulfilled { provider, meals },
            Err(reason) => ProviderOutcome::Failed { provider, reason },
        }
    }

    pub fn provider(&self) -> &str {
        match self {
            ProviderOutcome::Fulfilled { provider, .. } | ProviderOutcome::Failed { provider, .. } => {
                provider
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProviderOutcome::Failed { .. })
    }
}

/// Concatenate fulfilled outcomes in the given order and drop duplicates.
///
/// Failed outcomes contribute nothing.
pub fn merge_outcomes(outcomes: Vec<ProviderOutcome>) -> Vec<Meal> {
    let mut merged = Vec::new();
    for outcome in outcomes {
        match outcome {
            ProviderOutcome::Fulfilled { provider, meals } => {
                debug!("{} contributed {} meals", provider, meals.len());
                merged.extend(meals);
            }
            ProviderOutcome::Failed { provider, reason } => {
                warn!("Provider {} failed, skipping its results: {}", provider, reason);
            }
        }
    }
    dedup_meals(merged)
}

/// Keep the first meal for every [`Meal::dedup_key`], preserving order.
/// Meals without an id or title are dropped.
pub fn dedup_meals(meals: impl IntoIterator<Item = Meal>) -> Vec<Meal> {
    let mut seen = HashSet::new();
    meals
        .into_iter()
        .filter(|meal| {
            if !meal.is_complete() {
                debug!("Dropping {} meal without id or title", meal.source);
                return false;
            }
            seen.insert(meal.dedup_key())
        })
        .collect()
}

/// Searches every configured provider at once and merges what comes back.
pub struct MealSearch {
    providers: Vec<Box<dyn RecipeProvider>>,
}

impl MealSearch {
    /// Results are ordered by the position of their provider in `providers`
    pub fn new(providers: Vec<Box<dyn RecipeProvider>>) -> Self {
        MealSearch { providers }
    }

    pub fn builder() -> MealSearchBuilder {
        MealSearchBuilder::default()
    }

    /// Create the providers listed in a loaded configuration
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = HttpClient::new(Some(config.timeout()))?;
        let providers = ProviderFactory::create_all(config, &client)?;
        Ok(Self::new(providers))
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.provider_name()).collect()
    }

    /// Query every provider concurrently and wait for all of them to finish.
    pub async fn search_outcomes(
        &self,
        query: &str,
        filters: &SearchFilters,
    ) -> Vec<ProviderOutcome> {
        join_all(self.providers.iter().map(|provider| async move {
            let result = provider.search(query, filters).await;
            ProviderOutcome::settle(provider.provider_name(), result)
        }))
        .await
    }

    /// Best-effort search across all providers.
    ///
    /// A failing provider only removes its own results; this never fails.
    pub async fn search(&self, query: &str, filters: Option<&SearchFilters>) -> Vec<Meal> {
        let filters = filters.copied().unwrap_or_default();
        let outcomes = self.search_outcomes(query, &filters).await;

        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        let meals = merge_outcomes(outcomes);
        info!(
            "Search for {:?} returned {} meals ({} of {} providers failed)",
            query,
            meals.len(),
            failed,
            self.providers.len()
        );
        meals
    }
}
