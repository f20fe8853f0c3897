mod common;

use common::recipe;
use dinefit_planner::filter::filter_by_meal_type;
use dinefit_planner::{MealType, RecipeRecord};

#[test]
fn breakfast_matches_markers_or_quick_prep() {
    let recipes = vec![
        recipe("a", "Fluffy Pancake Tower", 45),
        recipe("b", "Slow Braised Lamb", 120),
        recipe("c", "Quick Scramble", 15),
    ];

    let filtered = filter_by_meal_type(&recipes, MealType::Breakfast);
    let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn lunch_is_the_catch_all_but_excludes_marked_names() {
    let recipes = vec![
        recipe("salad", "Garden Salad", 10),
        recipe("cake", "Chocolate Cake", 20),
        recipe("plain", "Stuffed Peppers", 50),
        recipe("slow", "Weekend Stew", 180),
    ];

    let filtered = filter_by_meal_type(&recipes, MealType::Lunch);
    let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    // Cake carries a dessert marker; the stew is too slow for the
    // catch-all branch and has no lunch marker.
    assert_eq!(ids, vec!["salad", "plain"]);
}

#[test]
fn lunch_accepts_main_category_regardless_of_name() {
    let mut slow_main = recipe("m", "Weekend Stew", 180);
    slow_main.category = Some("Main course".to_string());

    let filtered = filter_by_meal_type(&[slow_main], MealType::Lunch);
    assert_eq!(filtered.len(), 1);
}

#[test]
fn dinner_excludes_snacks_and_desserts() {
    let recipes = vec![
        recipe("roast", "Sunday Roast", 90),
        recipe("snack", "Snack Platter", 10),
        recipe("dessert", "Dessert Trio", 25),
        recipe("main", "Main Event Snack", 30),
    ];

    let filtered = filter_by_meal_type(&recipes, MealType::Dinner);
    let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    // "Main Event Snack" survives through the explicit "main" marker even
    // though the exclusion branch would reject it.
    assert_eq!(ids, vec!["roast", "main"]);
}

#[test]
fn snack_matches_name_time_or_category() {
    let mut appetizer = recipe("app", "Stuffed Mushrooms", 40);
    appetizer.category = Some("Appetizer".to_string());

    let recipes = vec![
        recipe("bite", "Energy Bites", 35),
        recipe("fast", "Cucumber Rounds", 5),
        recipe("slow", "Braised Shanks", 150),
        appetizer,
    ];

    let filtered = filter_by_meal_type(&recipes, MealType::Snack);
    let ids: Vec<&str> = filtered.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["bite", "fast", "app"]);
}

#[test]
fn missing_fields_default_rather_than_reject() {
    // No name, no category, no prep time: defaults to 30 minutes, which
    // qualifies for breakfast and the lunch catch-all.
    let bare = RecipeRecord {
        id: "bare".to_string(),
        ..Default::default()
    };

    assert_eq!(filter_by_meal_type(&[bare.clone()], MealType::Breakfast).len(), 1);
    assert_eq!(filter_by_meal_type(&[bare.clone()], MealType::Lunch).len(), 1);
    assert_eq!(filter_by_meal_type(&[bare.clone()], MealType::Dinner).len(), 1);
    assert_eq!(filter_by_meal_type(&[bare], MealType::Snack).len(), 0);
}

#[test]
fn filtering_is_pure_and_order_preserving() {
    let recipes = vec![
        recipe("z", "Zucchini Soup", 30),
        recipe("a", "Avocado Wrap", 10),
        recipe("m", "Minestrone Soup", 45),
    ];

    let first = filter_by_meal_type(&recipes, MealType::Lunch);
    let second = filter_by_meal_type(&recipes, MealType::Lunch);
    assert_eq!(first, second);

    let ids: Vec<&str> = first.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["z", "a", "m"]);
}
