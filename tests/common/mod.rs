#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use dinefit_planner::{
    MealPlannerService, RecipeRecord, RecipeSource, SavedPlansStore, UserProfile,
};

pub fn recipe(id: &str, name: &str, ready_in_minutes: u32) -> RecipeRecord {
    RecipeRecord {
        id: id.to_string(),
        name: Some(name.to_string()),
        ready_in_minutes: Some(ready_in_minutes),
        ..Default::default()
    }
}

/// A small catalog with candidates for every meal slot.
pub fn pantry() -> Vec<RecipeRecord> {
    vec![
        recipe("r1", "Blueberry Pancake Stack", 20),
        recipe("r2", "Morning Oat Toast", 10),
        recipe("r3", "Chicken Salad Bowl", 25),
        recipe("r4", "Beef Dinner Roast", 90),
        recipe("r5", "Hearty Vegetable Soup", 40),
        recipe("r6", "Trail Mix Bites", 5),
    ]
}

/// Returns the same recipe list for every query and counts searches.
pub struct StaticSource {
    recipes: Vec<RecipeRecord>,
    calls: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(recipes: Vec<RecipeRecord>) -> Self {
        Self {
            recipes,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl RecipeSource for StaticSource {
    async fn search(&self, _query: &str, _profile: &UserProfile) -> Result<Vec<RecipeRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.recipes.clone())
    }

    async fn get_details(&self, id: &str) -> Result<RecipeRecord> {
        self.recipes
            .iter()
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("recipe not found: {id}"))
    }
}

/// Routes meal-specific queries to one list and the broadened
/// "healthy meal" retry to another, recording every query it sees.
pub struct TwoStageSource {
    specific: Vec<RecipeRecord>,
    broadened: Vec<RecipeRecord>,
    queries: Arc<Mutex<Vec<String>>>,
}

impl TwoStageSource {
    pub fn new(specific: Vec<RecipeRecord>, broadened: Vec<RecipeRecord>) -> Self {
        Self {
            specific,
            broadened,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn query_log(&self) -> Arc<Mutex<Vec<String>>> {
        self.queries.clone()
    }
}

#[async_trait]
impl RecipeSource for TwoStageSource {
    async fn search(&self, query: &str, _profile: &UserProfile) -> Result<Vec<RecipeRecord>> {
        self.queries.lock().unwrap().push(query.to_string());
        if query == "healthy meal" {
            Ok(self.broadened.clone())
        } else {
            Ok(self.specific.clone())
        }
    }

    async fn get_details(&self, id: &str) -> Result<RecipeRecord> {
        self.specific
            .iter()
            .chain(self.broadened.iter())
            .find(|recipe| recipe.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("recipe not found: {id}"))
    }
}

/// Always returns zero results; empty is valid, not an error.
pub struct EmptySource;

#[async_trait]
impl RecipeSource for EmptySource {
    async fn search(&self, _query: &str, _profile: &UserProfile) -> Result<Vec<RecipeRecord>> {
        Ok(Vec::new())
    }

    async fn get_details(&self, id: &str) -> Result<RecipeRecord> {
        bail!("recipe not found: {id}")
    }
}

/// Always fails, standing in for an unreachable recipe API.
pub struct FailingSource;

#[async_trait]
impl RecipeSource for FailingSource {
    async fn search(&self, _query: &str, _profile: &UserProfile) -> Result<Vec<RecipeRecord>> {
        bail!("recipe search unavailable")
    }

    async fn get_details(&self, _id: &str) -> Result<RecipeRecord> {
        bail!("recipe search unavailable")
    }
}

/// A planner over the given source with a throwaway store. The TempDir
/// must outlive the service.
pub fn service<S: RecipeSource>(source: S) -> (MealPlannerService<S>, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SavedPlansStore::new(dir.path().join("saved-meal-plans.json"));
    (MealPlannerService::with_seed(source, store, 42), dir)
}

pub fn three_meal_profile() -> UserProfile {
    UserProfile {
        meals_per_day: Some(3),
        ..Default::default()
    }
}

pub fn four_meal_profile() -> UserProfile {
    UserProfile {
        meals_per_day: Some(4),
        ..Default::default()
    }
}
