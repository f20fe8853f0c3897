//! Meal-plan generation and caching core for the DineFit recipe app.
//!
//! The planner turns heterogeneous, partially-unreliable recipe search
//! results into structured multi-day meal plans: rule-based meal-type
//! filtering, TTL-cached generation, single-slot replacement, a keyed
//! saved-plans store and JSON/text export. Recipe search itself and the
//! identity provider are external collaborators behind the
//! [`source::RecipeSource`] trait and the optional [`remote`] mirror.

pub mod cache;
pub mod defaults;
pub mod export;
pub mod filter;
pub mod models;
pub mod planner;
pub mod remote;
pub mod source;
pub mod store;

pub use export::{ExportArtifact, ExportFormat};
pub use models::{DayMeals, MealPlan, MealType, PlannedMeal, RecipeRecord, SavedPlan, UserProfile};
pub use planner::MealPlannerService;
pub use source::RecipeSource;
pub use store::SavedPlansStore;
