use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::models::SavedPlan;

/// Remote mirror for saved plans, backed by an Appwrite Databases
/// collection.
///
/// The local store stays the source of truth; this client only mirrors
/// writes so a signed-in user's saved plans survive the device. Documents
/// are keyed by plan id and carry the serialized plan in a `payload`
/// attribute.
#[derive(Clone)]
pub struct RemotePlanStore {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_id: String,
}

impl RemotePlanStore {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            project_id: project_id.into(),
            api_key: api_key.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }

    fn documents_base(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
    }

    /// Create or overwrite the document for a saved plan.
    pub async fn put_plan(&self, plan_id: &str, plan: &SavedPlan) -> Result<()> {
        let data = json!({
            "planId": plan_id,
            "name": plan.name,
            "savedAt": plan.saved_at,
            "payload": serde_json::to_string(plan)?,
        });

        let url = self.documents_base();
        let resp = self
            .request(self.client.post(&url))
            .json(&json!({ "documentId": plan_id, "data": data }))
            .send()
            .await?;

        // An existing document answers the create with a conflict; update
        // it in place instead.
        if resp.status() == StatusCode::CONFLICT {
            let url = format!("{}/{}", self.documents_base(), plan_id);
            let resp = self
                .request(self.client.patch(&url))
                .json(&json!({ "data": data }))
                .send()
                .await?;
            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(anyhow!("PATCH {} failed: {} - {}", plan_id, status, body));
            }
            return Ok(());
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("POST {} failed: {} - {}", plan_id, status, body));
        }

        Ok(())
    }

    /// Delete the document for a plan id. A missing document is fine.
    pub async fn delete_plan(&self, plan_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.documents_base(), plan_id);
        let resp = self.request(self.client.delete(&url)).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(anyhow!("DELETE {} failed: {} - {}", plan_id, status, body));
        }

        Ok(())
    }
}
