use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{Local, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::defaults;
use crate::export::{self, ExportArtifact, ExportFormat};
use crate::filter::filter_by_meal_type;
use crate::models::{DayMeals, MealPlan, MealType, PlannedMeal, RecipeRecord, SavedPlan, UserProfile};
use crate::remote::RemotePlanStore;
use crate::source::RecipeSource;
use crate::store::SavedPlansStore;

const PLAN_TTL: Duration = Duration::from_secs(3600);
const RECIPE_LIST_TTL: Duration = Duration::from_secs(1800);

/// Query used when the meal-specific search filters down to nothing.
const BROADENED_QUERY: &str = "healthy meal";

/// Meal-plan generator, mutator and persistence front.
///
/// Owns the plan/recipe caches, the active-plans registry and the
/// saved-plans store; the recipe source and an optional remote mirror are
/// injected. Single interactive session semantics: nothing here is
/// synchronized and the last completed write to a plan id wins.
pub struct MealPlannerService<S> {
    source: S,
    plan_cache: TtlCache<MealPlan>,
    recipe_cache: TtlCache<Vec<RecipeRecord>>,
    active_plans: HashMap<String, MealPlan>,
    store: SavedPlansStore,
    remote: Option<RemotePlanStore>,
    rng: StdRng,
}

impl<S: RecipeSource> MealPlannerService<S> {
    pub fn new(source: S, store: SavedPlansStore) -> Self {
        Self::build(source, store, StdRng::from_entropy())
    }

    /// Construct with a fixed RNG seed so recipe selection is
    /// reproducible.
    pub fn with_seed(source: S, store: SavedPlansStore, seed: u64) -> Self {
        Self::build(source, store, StdRng::seed_from_u64(seed))
    }

    pub fn with_remote(mut self, remote: RemotePlanStore) -> Self {
        self.remote = Some(remote);
        self
    }

    fn build(source: S, store: SavedPlansStore, rng: StdRng) -> Self {
        Self {
            source,
            plan_cache: TtlCache::new(),
            recipe_cache: TtlCache::new(),
            active_plans: HashMap::new(),
            store,
            remote: None,
            rng,
        }
    }

    /// Generate a meal plan for `days` days (nominally 1-7).
    ///
    /// Repeated calls with the same profile and day count inside the cache
    /// window return the cached plan untouched. Generation never fails:
    /// adapter errors degrade to canned recipes per slot, and anything
    /// worse degrades to the full default plan.
    pub async fn generate(&mut self, profile: &UserProfile, days: u32) -> MealPlan {
        match self.generate_inner(profile, days).await {
            Ok(plan) => plan,
            Err(err) => {
                warn!(%err, "meal plan generation failed, using default plan");
                defaults::default_plan(profile, days)
            }
        }
    }

    async fn generate_inner(&mut self, profile: &UserProfile, days: u32) -> Result<MealPlan> {
        let plan_id = plan_id(profile, days);

        if let Some(plan) = self.plan_cache.get(&plan_id) {
            debug!(%plan_id, "returning cached meal plan");
            return Ok(plan);
        }

        info!(days, "generating meal plan");

        let mut meals = BTreeMap::new();
        for day in 1..=days {
            let day_meals = self.generate_day(profile).await;
            meals.insert(format!("day{day}"), day_meals);
        }

        let mut plan = MealPlan {
            id: plan_id.clone(),
            created_at: Utc::now(),
            days,
            meals,
            total_calories: 0,
            avg_calories_per_day: 0,
            user_profile: profile.clone(),
        };
        plan.recompute_calories();

        self.plan_cache.set(&plan_id, plan.clone(), PLAN_TTL);
        self.active_plans.insert(plan_id, plan.clone());

        info!(
            days,
            avg_calories = plan.avg_calories_per_day,
            "meal plan generated"
        );
        Ok(plan)
    }

    async fn generate_day(&mut self, profile: &UserProfile) -> DayMeals {
        let mut day_meals = DayMeals::new();

        for slot in profile.meal_slots() {
            let candidates = self.recipes_for_meal_type(slot, profile).await;

            let meal = if candidates.is_empty() {
                debug!(meal_type = %slot, "no suitable recipes, using canned meal");
                defaults::default_meal_for(slot)
            } else {
                // Pick among the top three so repeated generations vary.
                let top = candidates.len().min(3);
                let pick = self.rng.gen_range(0..top);
                annotate(candidates[pick].clone(), slot)
            };

            day_meals.insert(slot, Some(meal));
        }

        day_meals
    }

    /// Recipes suitable for a slot, cached for 30 minutes per profile
    /// fingerprint. An adapter failure yields the canned recipe instead.
    async fn recipes_for_meal_type(
        &mut self,
        meal_type: MealType,
        profile: &UserProfile,
    ) -> Vec<RecipeRecord> {
        let cache_key = format!("meal_{}_{}", meal_type, profile.fingerprint());
        if let Some(cached) = self.recipe_cache.get(&cache_key) {
            return cached;
        }

        match self.search_and_filter(meal_type, profile).await {
            Ok(recipes) => {
                self.recipe_cache
                    .set(cache_key, recipes.clone(), RECIPE_LIST_TTL);
                recipes
            }
            Err(err) => {
                warn!(meal_type = %meal_type, %err, "recipe search failed, using canned recipes");
                vec![defaults::default_recipe_for(meal_type)]
            }
        }
    }

    async fn search_and_filter(
        &mut self,
        meal_type: MealType,
        profile: &UserProfile,
    ) -> Result<Vec<RecipeRecord>> {
        let query = build_query(meal_type, profile);
        debug!(meal_type = %meal_type, %query, "searching recipes");

        let recipes = self.source.search(&query, profile).await?;
        let suitable = filter_by_meal_type(&recipes, meal_type);
        if !suitable.is_empty() {
            return Ok(suitable);
        }

        // Required second stage: retry once with a broad, non-diet-specific
        // query before giving the slot up to canned data.
        debug!(meal_type = %meal_type, "no suitable recipes, broadening search");
        let broader = self.source.search(BROADENED_QUERY, profile).await?;
        Ok(filter_by_meal_type(&broader, meal_type))
    }

    /// Replace a single slot of an existing plan with a fresh pick.
    ///
    /// The current occupant is excluded from the candidate pool unless the
    /// exclusion empties it. Aggregates are recomputed from scratch and the
    /// plan is re-persisted under the same id.
    pub async fn replace_meal(
        &mut self,
        plan_id: &str,
        day: u32,
        meal_type: MealType,
        profile: &UserProfile,
    ) -> Result<MealPlan> {
        let Some(mut plan) = self.lookup_plan(plan_id) else {
            bail!("meal plan not found: {plan_id}");
        };

        let day_key = format!("day{day}");
        let Some(day_meals) = plan.meals.get(&day_key) else {
            bail!("day {day} not found in plan {plan_id}");
        };
        let Some(current) = day_meals.get(&meal_type) else {
            bail!("{meal_type} is not a slot of plan {plan_id}");
        };
        let current_id = current.as_ref().map(|meal| meal.recipe.id.clone());

        debug!(plan_id, day, meal_type = %meal_type, "replacing meal");

        let candidates = self.recipes_for_meal_type(meal_type, profile).await;
        let replacement = if candidates.is_empty() {
            defaults::default_meal_for(meal_type)
        } else {
            let mut pool: Vec<&RecipeRecord> = candidates
                .iter()
                .filter(|recipe| Some(&recipe.id) != current_id.as_ref())
                .collect();
            if pool.is_empty() {
                pool = candidates.iter().collect();
            }
            let pick = self.rng.gen_range(0..pool.len());
            annotate((*pool[pick]).clone(), meal_type)
        };

        if let Some(slot) = plan
            .meals
            .get_mut(&day_key)
            .and_then(|meals| meals.get_mut(&meal_type))
        {
            *slot = Some(replacement);
        }
        plan.recompute_calories();

        self.plan_cache.set(plan_id, plan.clone(), PLAN_TTL);
        self.active_plans.insert(plan_id.to_string(), plan.clone());

        info!(plan_id, day, meal_type = %meal_type, "meal replaced");
        Ok(plan)
    }

    /// Save a plan into the keyed store, overwriting any previous save of
    /// the same id, and mirror it remotely when a remote store is attached.
    /// The remote write is best effort; the local copy is authoritative.
    pub async fn save_plan(&mut self, plan_id: &str) -> Result<SavedPlan> {
        let Some(plan) = self.lookup_plan(plan_id) else {
            bail!("meal plan not found: {plan_id}");
        };

        let saved = SavedPlan {
            plan,
            saved_at: Utc::now(),
            name: format!("Meal Plan - {}", Local::now().format("%m/%d/%Y")),
        };
        self.store.insert(plan_id, &saved)?;

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.put_plan(plan_id, &saved).await {
                warn!(plan_id, %err, "remote save failed, plan kept locally");
            }
        }

        info!(plan_id, "meal plan saved");
        Ok(saved)
    }

    /// All saved plans, keyed by plan id.
    pub fn saved_plans(&self) -> HashMap<String, SavedPlan> {
        self.store.load()
    }

    /// Delete a saved plan and evict every cache entry referencing it so
    /// the id cannot resurrect through a cache hit.
    pub async fn delete_plan(&mut self, plan_id: &str) -> Result<()> {
        self.store.remove(plan_id)?;
        self.plan_cache.remove(plan_id);
        self.active_plans.remove(plan_id);

        if let Some(remote) = &self.remote {
            if let Err(err) = remote.delete_plan(plan_id).await {
                warn!(plan_id, %err, "remote delete failed");
            }
        }

        info!(plan_id, "meal plan deleted");
        Ok(())
    }

    /// Remove every saved plan and drop all cached plans.
    pub fn clear_all_plans(&mut self) -> Result<()> {
        self.store.clear()?;
        self.plan_cache.clear();
        self.active_plans.clear();
        info!("all meal plans cleared");
        Ok(())
    }

    /// Export an active or cached plan as a downloadable artifact.
    pub fn export_plan(&mut self, plan_id: &str, format: ExportFormat) -> Result<ExportArtifact> {
        let Some(plan) = self.lookup_plan(plan_id) else {
            bail!("meal plan not found: {plan_id}");
        };
        export::export_plan(&plan, format)
    }

    /// Look up a plan by id in the registry, then the cache.
    pub fn get_plan(&mut self, plan_id: &str) -> Option<MealPlan> {
        self.lookup_plan(plan_id)
    }

    fn lookup_plan(&mut self, plan_id: &str) -> Option<MealPlan> {
        self.active_plans
            .get(plan_id)
            .cloned()
            .or_else(|| self.plan_cache.get(plan_id))
    }
}

/// Deterministic plan id: profile fingerprint, day count and an
/// hour-granular freshness component, so regenerations within the cache
/// window share an id.
fn plan_id(profile: &UserProfile, days: u32) -> String {
    let bucket = Utc::now().timestamp() / 3600;
    format!("plan_{}_{}d_{}", profile.fingerprint(), days, bucket)
}

fn build_query(meal_type: MealType, profile: &UserProfile) -> String {
    let mut query = match meal_type {
        MealType::Breakfast => "breakfast healthy morning meal",
        MealType::Lunch => "lunch healthy midday meal",
        MealType::Dinner => "dinner healthy evening meal",
        MealType::Snack => "healthy snack light meal",
    }
    .to_string();

    if profile.prefers("vegetarian") {
        query.push_str(" vegetarian");
    }
    if profile.prefers("vegan") {
        query.push_str(" vegan");
    }
    if profile.prefers("keto") {
        query.push_str(" keto low-carb");
    }
    if profile.prefers("paleo") {
        query.push_str(" paleo");
    }

    query
}

fn annotate(mut recipe: RecipeRecord, meal_type: MealType) -> PlannedMeal {
    let servings = derive_servings(&recipe, meal_type);
    let estimated_calories = estimate_calories(&recipe, meal_type);
    // The derived count supersedes the recipe's own; the planned meal must
    // carry a single servings value.
    recipe.servings = None;
    PlannedMeal {
        recipe,
        meal_type,
        servings,
        estimated_calories,
    }
}

/// Calorie estimate from the meal-type base and coarse recipe signals,
/// floored at 150.
pub fn estimate_calories(recipe: &RecipeRecord, meal_type: MealType) -> u32 {
    let mut calories: i32 = match meal_type {
        MealType::Breakfast => 350,
        MealType::Lunch => 500,
        MealType::Dinner => 600,
        MealType::Snack => 200,
    };

    if recipe.health_score.unwrap_or(0.0) > 80.0 {
        calories -= 50;
    }
    if recipe.vegetarian.unwrap_or(false) {
        calories -= 30;
    }
    if recipe.vegan.unwrap_or(false) {
        calories -= 50;
    }
    if recipe.ready_minutes_or_default() > 60 {
        calories += 100;
    }

    calories.max(150) as u32
}

/// Recipe servings as-is, except snacks which are halved (minimum 1).
pub fn derive_servings(recipe: &RecipeRecord, meal_type: MealType) -> u32 {
    let base = recipe.servings_or_default();
    match meal_type {
        MealType::Snack => (base / 2).max(1),
        _ => base,
    }
}
