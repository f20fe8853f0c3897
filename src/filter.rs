use crate::models::{MealType, RecipeRecord};

const BREAKFAST_MARKERS: &[&str] = &[
    "breakfast",
    "morning",
    "pancake",
    "omelette",
    "cereal",
    "toast",
];

const LUNCH_MARKERS: &[&str] = &[
    "lunch",
    "salad",
    "sandwich",
    "bowl",
    "wrap",
    "soup",
    "pasta",
    "rice",
    "chicken",
    "fish",
    "beef",
    "vegetable",
];

// Names carrying these markers are never treated as lunch via the
// catch-all branch.
const LUNCH_EXCLUSIONS: &[&str] = &[
    "breakfast",
    "morning",
    "pancake",
    "cereal",
    "dinner",
    "evening",
    "dessert",
    "cake",
    "cookie",
];

/// Keep the recipes suitable for a meal slot, preserving input order.
///
/// The rules are deliberately heuristic and lunch is deliberately the
/// catch-all bucket. Missing names and categories match as empty strings;
/// a missing prep time counts as 30 minutes.
pub fn filter_by_meal_type(recipes: &[RecipeRecord], meal_type: MealType) -> Vec<RecipeRecord> {
    recipes
        .iter()
        .filter(|recipe| is_suitable(recipe, meal_type))
        .cloned()
        .collect()
}

fn is_suitable(recipe: &RecipeRecord, meal_type: MealType) -> bool {
    let name = recipe.name.as_deref().unwrap_or("").to_lowercase();
    let category = recipe.category.as_deref().unwrap_or("").to_lowercase();
    let ready_minutes = recipe.ready_minutes_or_default();

    let name_has = |markers: &[&str]| markers.iter().any(|m| name.contains(m));

    match meal_type {
        MealType::Breakfast => name_has(BREAKFAST_MARKERS) || ready_minutes <= 30,
        MealType::Lunch => {
            name_has(LUNCH_MARKERS)
                || category.contains("main")
                || (!name_has(LUNCH_EXCLUSIONS) && ready_minutes <= 60)
        }
        MealType::Dinner => {
            name.contains("dinner")
                || name.contains("main")
                || category.contains("main")
                || (!name.contains("snack") && !name.contains("dessert"))
        }
        MealType::Snack => {
            name.contains("snack")
                || name.contains("bite")
                || ready_minutes <= 20
                || category.contains("snack")
                || category.contains("appetizer")
        }
    }
}
