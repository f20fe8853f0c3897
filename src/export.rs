use anyhow::Result;
use chrono::Utc;
use serde_json::json;

use crate::models::MealPlan;

/// Export encodings for a plan. PDF rendering is left to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    /// Parse a format label, falling back to JSON for anything unknown.
    pub fn parse(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "text" => ExportFormat::Text,
            _ => ExportFormat::Json,
        }
    }
}

/// A client-side downloadable artifact. No server round-trip is involved;
/// the caller hands the contents to whatever download mechanism it has.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

pub fn export_plan(plan: &MealPlan, format: ExportFormat) -> Result<ExportArtifact> {
    match format {
        ExportFormat::Json => export_json(plan),
        ExportFormat::Text => Ok(export_text(plan)),
    }
}

fn export_json(plan: &MealPlan) -> Result<ExportArtifact> {
    let mut data = serde_json::to_value(plan)?;
    if let Some(obj) = data.as_object_mut() {
        obj.insert("exportedAt".to_string(), json!(Utc::now()));
        obj.insert("format".to_string(), json!("json"));
    }

    Ok(ExportArtifact {
        file_name: format!("meal-plan-{}.json", Utc::now().format("%Y-%m-%d")),
        mime_type: "application/json",
        contents: serde_json::to_string_pretty(&data)?,
    })
}

fn export_text(plan: &MealPlan) -> ExportArtifact {
    let mut text = String::from("MEAL PLAN\n");
    text.push_str(&format!(
        "Generated: {}\n",
        plan.created_at.format("%Y-%m-%d")
    ));
    text.push_str(&format!("Days: {}\n", plan.days));
    text.push_str(&format!(
        "Average Calories/Day: {}\n\n",
        plan.avg_calories_per_day
    ));

    for day in 1..=plan.days {
        text.push_str(&format!("DAY {day}\n"));
        text.push_str(&format!("{}\n", "=".repeat(20)));

        if let Some(day_meals) = plan.meals.get(&format!("day{day}")) {
            for (meal_type, meal) in day_meals {
                if let Some(meal) = meal {
                    text.push_str(&format!(
                        "{}: {}\n",
                        meal_type.as_str().to_uppercase(),
                        meal.recipe.name_or_default()
                    ));
                    text.push_str(&format!(
                        "  Prep time: {}\n",
                        meal.recipe.cooking_time.as_deref().unwrap_or("N/A")
                    ));
                    text.push_str(&format!("  Servings: {}\n", meal.servings));
                    text.push_str(&format!(
                        "  Estimated calories: {}\n\n",
                        meal.estimated_calories
                    ));
                }
            }
        }

        text.push('\n');
    }

    ExportArtifact {
        file_name: format!("meal-plan-{}.txt", Utc::now().format("%Y-%m-%d")),
        mime_type: "text/plain",
        contents: text,
    }
}
