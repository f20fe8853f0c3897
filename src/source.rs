use anyhow::Result;
use async_trait::async_trait;

use crate::models::{RecipeRecord, UserProfile};

/// Boundary to the external recipe search service.
///
/// Implementations may fail or return nothing; an empty result is valid
/// and is not an error. The planner treats this collaborator as
/// unreliable and degrades to canned data when it misbehaves.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Free-text search for candidate recipes, biased by the profile.
    async fn search(&self, query: &str, profile: &UserProfile) -> Result<Vec<RecipeRecord>>;

    /// Fetch the full record for a single recipe.
    async fn get_details(&self, id: &str) -> Result<RecipeRecord>;
}
