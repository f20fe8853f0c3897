//! Canned meals and plans substituted when live recipe search yields
//! nothing usable.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::{DayMeals, MealPlan, MealType, PlannedMeal, RecipeRecord, UserProfile};

struct CannedMeal {
    name: &'static str,
    cooking_time: &'static str,
    ready_in_minutes: u32,
    difficulty: &'static str,
    estimated_calories: u32,
    image: &'static str,
}

fn canned(meal_type: MealType) -> &'static CannedMeal {
    match meal_type {
        MealType::Breakfast => &CannedMeal {
            name: "Healthy Oatmeal Bowl",
            cooking_time: "10 min",
            ready_in_minutes: 10,
            difficulty: "Easy",
            estimated_calories: 320,
            image: "https://images.unsplash.com/photo-1571091718767-18b5b1457add?w=400",
        },
        MealType::Lunch => &CannedMeal {
            name: "Mediterranean Salad",
            cooking_time: "15 min",
            ready_in_minutes: 15,
            difficulty: "Easy",
            estimated_calories: 450,
            image: "https://images.unsplash.com/photo-1512621776951-a57141f2eefd?w=400",
        },
        MealType::Dinner => &CannedMeal {
            name: "Grilled Protein with Vegetables",
            cooking_time: "30 min",
            ready_in_minutes: 30,
            difficulty: "Medium",
            estimated_calories: 580,
            image: "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?w=400",
        },
        MealType::Snack => &CannedMeal {
            name: "Healthy Mixed Nuts",
            cooking_time: "0 min",
            ready_in_minutes: 0,
            difficulty: "Easy",
            estimated_calories: 180,
            image: "https://images.unsplash.com/photo-1599599810769-bcde5a160d32?w=400",
        },
    }
}

/// The canned recipe for a meal type, as a plain search-result record.
/// Used when the recipe search itself fails.
pub fn default_recipe_for(meal_type: MealType) -> RecipeRecord {
    let meal = canned(meal_type);
    RecipeRecord {
        id: format!(
            "default-{}-{}",
            meal_type,
            Utc::now().timestamp_millis()
        ),
        name: Some(meal.name.to_string()),
        image: Some(meal.image.to_string()),
        category: None,
        ready_in_minutes: Some(meal.ready_in_minutes),
        servings: Some(1),
        cooking_time: Some(meal.cooking_time.to_string()),
        difficulty: Some(meal.difficulty.to_string()),
        vegetarian: None,
        vegan: None,
        gluten_free: None,
        health_score: None,
    }
}

/// The canned planned meal for a slot, with its fixed calorie value.
/// Used when filtering leaves nothing for the slot.
pub fn default_meal_for(meal_type: MealType) -> PlannedMeal {
    let calories = canned(meal_type).estimated_calories;
    let mut recipe = default_recipe_for(meal_type);
    // The planned meal owns the servings value; see `PlannedMeal`.
    recipe.servings = None;
    PlannedMeal {
        recipe,
        meal_type,
        servings: 1,
        estimated_calories: calories,
    }
}

/// A fully canned plan, used when generation fails outright.
pub fn default_plan(profile: &UserProfile, days: u32) -> MealPlan {
    let slots = profile.meal_slots();
    let mut meals = BTreeMap::new();
    for day in 1..=days {
        let day_meals: DayMeals = slots
            .iter()
            .map(|&slot| (slot, Some(default_meal_for(slot))))
            .collect();
        meals.insert(format!("day{day}"), day_meals);
    }

    let mut plan = MealPlan {
        id: format!("default_{}", Utc::now().timestamp_millis()),
        created_at: Utc::now(),
        days,
        meals,
        total_calories: 0,
        avg_calories_per_day: 0,
        user_profile: profile.clone(),
    };
    plan.recompute_calories();
    plan
}
