use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::SearchError;
use crate::http::{HttpClient, QueryParams};
use crate::model::{Meal, MealSource, SearchFilters};
use crate::providers::RecipeProvider;

/// TheMealDB exposes `strIngredient1..=20` / `strMeasure1..=20`.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

const MEAL_PAGE_URL: &str = "https://www.themealdb.com/meal";

#[derive(Debug, Deserialize)]
struct MealsResponse {
    #[serde(default)]
    meals: Option<Vec<Option<RawMeal>>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct RawMeal {
    #[serde(rename = "idMeal", default)]
    id: Option<RawId>,
    #[serde(rename = "strMeal", default)]
    title: Option<String>,
    #[serde(rename = "strMealThumb", default)]
    thumbnail: Option<String>,
    #[serde(rename = "strArea", default)]
    area: Option<String>,
    #[serde(rename = "strCategory", default)]
    category: Option<String>,
    #[serde(rename = "strTags", default)]
    tags: Option<String>,
    #[serde(rename = "strInstructions", default)]
    instructions: Option<String>,
    // strIngredientN / strMeasureN and everything else
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
struct IngredientSlot {
    ingredient: String,
    measure: String,
}

impl IngredientSlot {
    fn line(&self) -> Option<String> {
        if self.ingredient.is_empty() {
            None
        } else if self.measure.is_empty() {
            Some(self.ingredient.clone())
        } else {
            Some(format!("{} {}", self.measure, self.ingredient))
        }
    }
}

fn trimmed_field(fields: &HashMap<String, Value>, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Read the numbered ingredient/measure pairs into fixed slots (index 0 is `strIngredient1`).
fn ingredient_slots(fields: &HashMap<String, Value>) -> [IngredientSlot; MAX_INGREDIENT_SLOTS] {
    std::array::from_fn(|i| IngredientSlot {
        ingredient: trimmed_field(fields, &format!("strIngredient{}", i + 1)),
        measure: trimmed_field(fields, &format!("strMeasure{}", i + 1)),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_steps(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_tags(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<RawMeal> for Meal {
    fn from(raw: RawMeal) -> Self {
        let id = match raw.id {
            Some(RawId::Text(id)) => id.trim().to_string(),
            Some(RawId::Number(id)) => id.to_string(),
            None => String::new(),
        };
        let ingredients = ingredient_slots(&raw.fields)
            .iter()
            .filter_map(IngredientSlot::line)
            .collect();
        let url = (!id.is_empty()).then(|| format!("{}/{}", MEAL_PAGE_URL, id));

        Meal {
            url,
            title: raw.title.unwrap_or_default().trim().to_string(),
            image: raw.thumbnail.unwrap_or_default(),
            source: MealSource::MealDb,
            cuisine: non_blank(raw.area).or_else(|| non_blank(raw.category)),
            tags: raw.tags.as_deref().map(split_tags).unwrap_or_default(),
            ingredients,
            instructions: raw.instructions.as_deref().map(split_steps).unwrap_or_default(),
            id,
            ..Default::default()
        }
    }
}

/// Name search against TheMealDB. Filters are ignored.
pub struct MealDbProvider {
    client: HttpClient,
    base_url: String,
}

impl MealDbProvider {
    pub fn new(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        MealDbProvider { client, base_url }
    }

    /// Fetch a single meal by its TheMealDB id
    pub async fn lookup_by_id(&self, id: &str) -> Result<Option<Meal>, SearchError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }

        let query = QueryParams::new().with("i", id);
        let meals = self.fetch("lookup.php", &query).await?;
        Ok(meals.into_iter().next())
    }

    async fn fetch(&self, endpoint: &str, query: &QueryParams) -> Result<Vec<Meal>, SearchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response: MealsResponse = self.client.get_json(&url, query).await?;

        let meals: Vec<Meal> = response
            .meals
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .map(Meal::from)
            .collect();
        debug!("TheMealDB {} returned {} meals", endpoint, meals.len());
        Ok(meals)
    }
}

#[async_trait]
impl RecipeProvider for MealDbProvider {
    fn provider_name(&self) -> &str {
        "mealdb"
    }

    async fn search(&self, query: &str, _filters: &SearchFilters) -> Result<Vec<Meal>, SearchError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let params = QueryParams::new().with("s", query);
        self.fetch("search.php", &params).await
    }
}
