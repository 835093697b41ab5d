//! Search both recipe providers from the command line
//!
//! ```text
//! RUST_LOG=debug cargo run --example search -- chicken --low-carb
//! ```
//!
//! Edamam is only queried when `EDAMAM_APP_ID` and `EDAMAM_APP_KEY`
//! (or `MEALPLAN__EDAMAM__APP_ID` / `MEALPLAN__EDAMAM__APP_KEY`) are set.

use meal_search::{search_meals, SearchFilters};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut query = Vec::new();
    let mut filters = SearchFilters::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--low-carb" => filters.low_carb = true,
            "--high-fiber" => filters.high_fiber = true,
            "--low-glycemic" => filters.low_glycemic = true,
            _ => query.push(arg),
        }
    }
    let query = query.join(" ");
    if query.trim().is_empty() {
        return Err("Usage: search <query> [--low-carb] [--high-fiber] [--low-glycemic]".into());
    }

    let meals = search_meals(&query, Some(&filters)).await?;
    println!("{} results for {:?}", meals.len(), query);
    for meal in &meals {
        let calories = meal
            .calories
            .map(|kcal| format!("{:.0} kcal/serving", kcal))
            .unwrap_or_else(|| "calories n/a".to_string());
        println!("[{}] {} ({})", meal.source, meal.title, calories);
        if let Some(url) = &meal.url {
            println!("    {}", url);
        }
    }

    Ok(())
}
