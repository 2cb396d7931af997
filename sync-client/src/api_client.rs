use anyhow::{anyhow, Result};
use log::*;
use serde_json::{json, Value};

/// API version header sent with every request; must match a version the
/// backend build exposes.
const API_VERSION: &str = "0.4.0";

/// Credentials and token state for one logged-in user.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub token: String,
}

pub async fn login(
    client: &reqwest::Client,
    base_url: &str,
    email: &str,
    password: &str,
) -> Result<AuthenticatedUser> {
    let response = client
        .post(format!("{}/session", base_url))
        .header("x-version", API_VERSION)
        .json(&json!({"email": email, "password": password}))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(anyhow!("Login failed with status {}", response.status()));
    }

    let body: Value = response.json().await?;
    let data = &body["data"];

    let token = data["token"]
        .as_str()
        .ok_or_else(|| anyhow!("Login response missing token"))?
        .to_owned();
    let user_id = data["user"]["id"]
        .as_str()
        .ok_or_else(|| anyhow!("Login response missing user id"))?
        .to_owned();

    Ok(AuthenticatedUser { user_id, token })
}

/// Thin REST client for mutation scenarios. When a client id is attached,
/// it rides along as `X-Client-Id` on every mutation so the issuing stream
/// is excluded from the broadcast echo.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    client_id: Option<String>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: String, token: String) -> Self {
        Self {
            http,
            base_url,
            token,
            client_id: None,
        }
    }

    /// Tags subsequent mutations with the stream's effective client id, as
    /// captured from the `connected` handshake.
    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.to_owned());
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("x-version", API_VERSION)
            .bearer_auth(&self.token);

        if let Some(client_id) = &self.client_id {
            builder = builder.header("x-client-id", client_id);
        }

        builder
    }

    async fn unwrap_data(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        let body: Value = response.json().await?;

        if !status.is_success() {
            return Err(anyhow!("Request failed with {}: {}", status, body));
        }

        Ok(body.get("data").cloned().unwrap_or(body))
    }

    pub async fn create_section(&self, name: &str) -> Result<Value> {
        debug!("Creating section {name:?}");

        let response = self
            .request(reqwest::Method::POST, "/sections")
            .json(&json!({"name": name, "folder_id": null, "position": 0}))
            .send()
            .await?;

        Self::unwrap_data(response).await
    }

    pub async fn create_task(
        &self,
        section_id: &str,
        title: &str,
        position: i32,
    ) -> Result<Value> {
        debug!("Creating task {title:?} at position {position}");

        let response = self
            .request(reqwest::Method::POST, "/tasks")
            .json(&json!({
                "section_id": section_id,
                "parent_id": null,
                "title": title,
                "notes": null,
                "status": "todo",
                "due_by": null,
                "position": position,
                "tag_ids": [],
            }))
            .send()
            .await?;

        Self::unwrap_data(response).await
    }

    pub async fn update_task(&self, task: &Value) -> Result<Value> {
        let id = task["id"]
            .as_str()
            .ok_or_else(|| anyhow!("Task missing id"))?;

        let response = self
            .request(reqwest::Method::PUT, &format!("/tasks/{id}"))
            .json(task)
            .send()
            .await?;

        Self::unwrap_data(response).await
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<Value> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/tasks/{task_id}"))
            .send()
            .await?;

        Self::unwrap_data(response).await
    }

    /// Bulk rank reassignment; `updates` pairs task ids with their new
    /// zero-based positions.
    pub async fn reorder_tasks(&self, updates: &[(String, i32)]) -> Result<Value> {
        let updates: Vec<Value> = updates
            .iter()
            .map(|(id, position)| json!({"id": id, "position": position}))
            .collect();

        let response = self
            .request(reqwest::Method::PUT, "/tasks/reorder")
            .json(&json!({ "updates": updates }))
            .send()
            .await?;

        Self::unwrap_data(response).await
    }

    pub async fn list_tasks(&self, section_id: &str) -> Result<Vec<Value>> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/tasks?section_id={section_id}&sort_by=position&sort_order=asc"),
            )
            .send()
            .await?;

        let data = Self::unwrap_data(response).await?;
        data.as_array()
            .cloned()
            .ok_or_else(|| anyhow!("Expected a task array, got {data}"))
    }
}
