use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::error::SearchError;
use crate::http::{HttpClient, QueryParams};
use crate::model::{Meal, MealSource, NutritionSummary, SearchFilters};
use crate::providers::RecipeProvider;

/// Fiber floor applied by the `high_fiber` filter, grams per serving.
pub const MIN_FIBER_PER_SERVING_G: u32 = 5;

const RECIPE_SEARCH_PATH: &str = "/api/recipes/v2";
const NUTRITION_DETAILS_PATH: &str = "/api/nutrition-details";

const ENERGY_KCAL: &str = "ENERC_KCAL";
const CARBS: &str = "CHOCDF";
const PROTEIN: &str = "PROCNT";
const FAT: &str = "FAT";
const FIBER: &str = "FIBTG";

/// Edamam application id and key
#[derive(Clone, PartialEq, Eq)]
pub struct EdamamCredentials {
    app_id: String,
    app_key: String,
}

impl EdamamCredentials {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Self {
        EdamamCredentials {
            app_id: app_id.into(),
            app_key: app_key.into(),
        }
    }

    /// Both parts must be present and non-blank
    pub fn from_parts(app_id: Option<&str>, app_key: Option<&str>) -> Option<Self> {
        let app_id = app_id.map(str::trim).filter(|v| !v.is_empty())?;
        let app_key = app_key.map(str::trim).filter(|v| !v.is_empty())?;
        Some(Self::new(app_id, app_key))
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    fn apply(&self, query: &mut QueryParams) {
        query.insert("app_id", &self.app_id);
        query.insert("app_key", &self.app_key);
    }
}

// Keep the key out of logs
impl fmt::Debug for EdamamCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdamamCredentials")
            .field("app_id", &self.app_id)
            .field("app_key", &"***")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    recipe: RawRecipe,
}

#[derive(Debug, Deserialize)]
struct Nutrient {
    quantity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecipe {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "cuisineType", default)]
    cuisine_type: Option<Vec<String>>,
    #[serde(rename = "healthLabels", default)]
    health_labels: Option<Vec<String>>,
    #[serde(rename = "ingredientLines", default)]
    ingredient_lines: Option<Vec<String>>,
    #[serde(rename = "totalNutrients", default)]
    total_nutrients: Option<HashMap<String, Nutrient>>,
    #[serde(rename = "yield", default)]
    servings: Option<f64>,
}

/// Divide a recipe total by the serving count. Missing total or a missing/zero
/// serving count yields `None`, never zero.
fn per_serving(total: Option<f64>, servings: Option<f64>) -> Option<f64> {
    match (total, servings) {
        (Some(total), Some(servings)) if servings != 0.0 => Some(total / servings),
        _ => None,
    }
}

impl From<RawRecipe> for Meal {
    fn from(raw: RawRecipe) -> Self {
        let nutrients = raw.total_nutrients.unwrap_or_default();
        let nutrient = |code: &str| {
            let total = nutrients.get(code).and_then(|n| n.quantity);
            per_serving(total, raw.servings)
        };

        Meal {
            calories: nutrient(ENERGY_KCAL),
            carbs: nutrient(CARBS),
            protein: nutrient(PROTEIN),
            fat: nutrient(FAT),
            fiber: nutrient(FIBER),
            id: raw.uri,
            title: raw.label.trim().to_string(),
            image: raw.image.unwrap_or_default(),
            source: MealSource::Edamam,
            url: raw.url,
            cuisine: raw.cuisine_type.and_then(|types| types.into_iter().next()),
            tags: raw.health_labels.unwrap_or_default(),
            ingredients: raw.ingredient_lines.unwrap_or_default(),
            instructions: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NutritionResponse {
    calories: Option<f64>,
    #[serde(rename = "totalNutrients", default)]
    total_nutrients: HashMap<String, Nutrient>,
}

impl From<NutritionResponse> for NutritionSummary {
    fn from(response: NutritionResponse) -> Self {
        let quantity = |code: &str| response.total_nutrients.get(code).and_then(|n| n.quantity);

        NutritionSummary {
            calories: response.calories.unwrap_or_default().round(),
            carbs: quantity(CARBS).unwrap_or_default().round(),
            fiber: quantity(FIBER).map(f64::round),
        }
    }
}

/// Edamam Recipe Search v2.
///
/// Without credentials every call returns an empty result instead of failing,
/// so the application keeps working with TheMealDB alone.
pub struct EdamamProvider {
    client: HttpClient,
    base_url: String,
    credentials: Option<EdamamCredentials>,
}

impl EdamamProvider {
    pub fn new(
        client: HttpClient,
        base_url: impl Into<String>,
        credentials: Option<EdamamCredentials>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        EdamamProvider {
            client,
            base_url,
            credentials,
        }
    }

    fn search_params(
        &self,
        credentials: &EdamamCredentials,
        query: &str,
        filters: &SearchFilters,
    ) -> QueryParams {
        let mut params = QueryParams::new().with("type", "public").with("q", query);
        credentials.apply(&mut params);

        if filters.low_carb {
            params.insert("diet", "low-carb");
        }
        if filters.low_glycemic {
            params.insert("health", "low-glycemic");
        }
        if filters.high_fiber {
            params.insert(format!("nutrients[{}][gte]", FIBER), MIN_FIBER_PER_SERVING_G);
        }
        if !filters.is_empty() {
            debug!("Edamam search filtered by {:?}", filters);
        }
        params
    }

    /// Analyze ingredient lines with the Edamam nutrition-details endpoint.
    ///
    /// Returns `Ok(None)` when credentials are missing or there is nothing to analyze.
    pub async fn analyze_nutrition(
        &self,
        lines: &[String],
    ) -> Result<Option<NutritionSummary>, SearchError> {
        let Some(credentials) = &self.credentials else {
            debug!("Edamam credentials not configured, skipping nutrition analysis");
            return Ok(None);
        };

        let lines: Vec<&str> = lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Ok(None);
        }

        let mut params = QueryParams::new();
        credentials.apply(&mut params);
        let url = format!("{}{}", self.base_url, NUTRITION_DETAILS_PATH);
        let response: NutritionResponse = self
            .client
            .post_json(&url, &params, &json!({ "ingr": lines }))
            .await?;

        Ok(Some(response.into()))
    }
}

#[async_trait]
impl RecipeProvider for EdamamProvider {
    fn provider_name(&self) -> &str {
        "edamam"
    }

    async fn search(&self, query: &str, filters: &SearchFilters) -> Result<Vec<Meal>, SearchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let Some(credentials) = &self.credentials else {
            debug!("Edamam credentials not configured, skipping search");
            return Ok(Vec::new());
        };

        let url = format!("{}{}", self.base_url, RECIPE_SEARCH_PATH);
        let params = self.search_params(credentials, query, filters);
        let response: SearchResponse = self.client.get_json(&url, &params).await?;

        let meals: Vec<Meal> = response
            .hits
            .into_iter()
            .map(|hit| Meal::from(hit.recipe))
            .collect();
        debug!("Edamam returned {} recipes", meals.len());
        Ok(meals)
    }
}
