use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a meal record came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSource {
    /// TheMealDB name/ingredient lookup
    MealDb,
    /// Edamam nutrition-aware recipe search
    Edamam,
    /// Created by the user inside the application
    #[default]
    Local,
}

impl MealSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSource::MealDb => "mealdb",
            MealSource::Edamam => "edamam",
            MealSource::Local => "local",
        }
    }
}

impl fmt::Display for MealSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recipe normalized from any provider.
///
/// Nutrient values are always per serving. Providers that report recipe
/// totals divide by the serving count before building the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    /// Provider-assigned identifier or canonical URI, unique within `source`
    pub id: String,
    pub title: String,
    /// Image URL (empty if the provider has none)
    #[serde(default)]
    pub image: String,
    pub source: MealSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    /// Dietary and health labels
    #[serde(default)]
    pub tags: Vec<String>,
    /// One "quantity ingredient" line per entry
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// One preparation step per entry
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}

impl Meal {
    /// Key used to drop duplicate results: lowercased title plus source.
    pub fn dedup_key(&self) -> String {
        format!("{}|{}", self.title.trim().to_lowercase(), self.source)
    }

    /// A record may only be shown if it has both an id and a title
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.title.trim().is_empty()
    }
}

/// Optional dietary filters. Only the Edamam provider honours them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilters {
    /// Restrict to the "low-carb" diet category
    pub low_carb: bool,
    /// Require at least 5 g of fiber per serving
    pub high_fiber: bool,
    /// Restrict to the "low-glycemic" health label
    pub low_glycemic: bool,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        !(self.low_carb || self.high_fiber || self.low_glycemic)
    }
}

/// Nutrition totals for a list of ingredient lines, rounded to whole units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionSummary {
    pub calories: f64,
    /// grams
    pub carbs: f64,
    /// grams
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
}
