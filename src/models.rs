use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One meal slot within a day of a plan.
///
/// The derived `Ord` follows declaration order, so a `BTreeMap` keyed by
/// meal type iterates breakfast, lunch, dinner, snack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary profile read from the user document.
///
/// Every field is optional; the core never rejects a malformed profile and
/// instead defaults at the accessor level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Free-text dietary preferences (e.g. "Vegetarian, Keto")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<String>,
    /// Free-text allergy list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
    /// Free-text disliked foods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disliked_foods: Option<String>,
    /// Meals per day, nominally 2-6
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals_per_day: Option<u32>,
    /// Cooking time preference (e.g. "quick", "any")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time_preference: Option<String>,
}

impl UserProfile {
    pub fn meals_per_day_or_default(&self) -> u32 {
        self.meals_per_day.unwrap_or(3)
    }

    /// Meal slots implied by the profile: three for `meals_per_day <= 3`,
    /// four (including a snack) otherwise.
    pub fn meal_slots(&self) -> Vec<MealType> {
        if self.meals_per_day_or_default() > 3 {
            vec![
                MealType::Breakfast,
                MealType::Lunch,
                MealType::Dinner,
                MealType::Snack,
            ]
        } else {
            vec![MealType::Breakfast, MealType::Lunch, MealType::Dinner]
        }
    }

    /// Stable fingerprint of the dietary fields, used in cache keys.
    ///
    /// First 8 hex chars of a sha256 over the fields that influence
    /// generation.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.dietary_preferences.as_deref().unwrap_or(""));
        hasher.update("|");
        hasher.update(self.allergies.as_deref().unwrap_or(""));
        hasher.update("|");
        hasher.update(self.disliked_foods.as_deref().unwrap_or(""));
        hasher.update("|");
        hasher.update(self.meals_per_day_or_default().to_string());
        let digest = hasher.finalize();
        let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        hex[..8].to_string()
    }

    /// Case-insensitive substring check against the dietary preferences.
    pub fn prefers(&self, keyword: &str) -> bool {
        self.dietary_preferences
            .as_deref()
            .map(|d| d.to_lowercase().contains(keyword))
            .unwrap_or(false)
    }
}

/// A candidate recipe as returned by the recipe search API.
///
/// Fields other than `id` are treated as optional everywhere; derivations
/// go through the `*_or_default` accessors so the defaulting policy lives
/// in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Time to prepare, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_in_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    /// Display label like "10 min"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooking_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetarian: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegan: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gluten_free: Option<bool>,
    /// Health score, 0-100
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_score: Option<f64>,
}

impl RecipeRecord {
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown recipe")
    }

    pub fn ready_minutes_or_default(&self) -> u32 {
        self.ready_in_minutes.unwrap_or(30)
    }

    pub fn servings_or_default(&self) -> u32 {
        self.servings.unwrap_or(1)
    }
}

/// A recipe assigned to a slot of a plan, with derived servings and a
/// derived calorie estimate. Owned by the containing plan and recreated on
/// every replace.
///
/// Invariant: `recipe.servings` is always `None` here — the derived
/// `servings` below replaces it, so the flattened JSON carries exactly one
/// `servings` key and round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    #[serde(flatten)]
    pub recipe: RecipeRecord,
    pub meal_type: MealType,
    pub servings: u32,
    pub estimated_calories: u32,
}

/// Meals for a single day, keyed by slot. A 3-meal profile produces a map
/// without a snack key; a slot that could not be filled is `None`.
pub type DayMeals = BTreeMap<MealType, Option<PlannedMeal>>;

/// A generated multi-day meal plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub days: u32,
    /// Day key (`day1`..`dayN`) to that day's slots
    pub meals: BTreeMap<String, DayMeals>,
    pub total_calories: u32,
    pub avg_calories_per_day: u32,
    /// Profile snapshot the plan was generated from
    pub user_profile: UserProfile,
}

impl MealPlan {
    /// Sum of all non-null slot calories across the whole plan.
    pub fn compute_total_calories(&self) -> u32 {
        self.meals
            .values()
            .flat_map(|day| day.values())
            .filter_map(|meal| meal.as_ref())
            .map(|meal| meal.estimated_calories)
            .sum()
    }

    /// Recompute both aggregates from scratch.
    pub fn recompute_calories(&mut self) {
        self.total_calories = self.compute_total_calories();
        self.avg_calories_per_day = if self.days == 0 {
            0
        } else {
            (f64::from(self.total_calories) / f64::from(self.days)).round() as u32
        };
    }
}

/// A plan written to the saved-plans store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlan {
    #[serde(flatten)]
    pub plan: MealPlan,
    pub saved_at: DateTime<Utc>,
    /// Human-readable display name
    pub name: String,
}
