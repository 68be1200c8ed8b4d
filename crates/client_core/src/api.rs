//! The remote recipe API seam and its reqwest implementation.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{PlannedMeal, PlannedMealId, Recipe},
    protocol::{RecipeQuery, PLANNED_MEAL_PATH, RECIPES_PATH},
};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[async_trait]
pub trait RecipeApi: Send + Sync {
    async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>>;
    async fn list_planned_meals(&self) -> Result<Vec<PlannedMeal>>;
    async fn add_planned_meal(&self, recipe: &Recipe) -> Result<()>;
    async fn remove_planned_meal(&self, id: &PlannedMealId) -> Result<()>;
}

pub struct HttpRecipeApi {
    http: Client,
    base_url: Url,
}

impl HttpRecipeApi {
    pub fn new(base_url: &str, timeout: Duration) -> std::result::Result<Self, ClientError> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::HttpClient)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // http(s) urls always have a path to extend; checked in parse_base_url.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    async fn send(
        &self,
        endpoint: &Url,
        request: reqwest::RequestBuilder,
    ) -> std::result::Result<Response, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?;
        let status = response.status();
        debug!(endpoint = %endpoint, status = status.as_u16(), "recipe api response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &Url,
        response: Response,
    ) -> std::result::Result<T, ClientError> {
        response.json().await.map_err(|source| ClientError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

#[async_trait]
impl RecipeApi for HttpRecipeApi {
    async fn list_recipes(&self, query: &RecipeQuery) -> Result<Vec<Recipe>> {
        let endpoint = self.endpoint(&[RECIPES_PATH]);
        let response = self
            .send(&endpoint, self.http.get(endpoint.clone()).query(query))
            .await?;
        Ok(Self::decode(&endpoint, response).await?)
    }

    async fn list_planned_meals(&self) -> Result<Vec<PlannedMeal>> {
        let endpoint = self.endpoint(&[PLANNED_MEAL_PATH]);
        let response = self.send(&endpoint, self.http.get(endpoint.clone())).await?;
        Ok(Self::decode(&endpoint, response).await?)
    }

    async fn add_planned_meal(&self, recipe: &Recipe) -> Result<()> {
        let endpoint = self.endpoint(&[PLANNED_MEAL_PATH]);
        self.send(&endpoint, self.http.post(endpoint.clone()).json(recipe))
            .await?;
        Ok(())
    }

    async fn remove_planned_meal(&self, id: &PlannedMealId) -> Result<()> {
        let endpoint = self.endpoint(&[PLANNED_MEAL_PATH, id.as_str()]);
        self.send(&endpoint, self.http.delete(endpoint.clone()))
            .await?;
        Ok(())
    }
}

fn parse_base_url(raw: &str) -> std::result::Result<Url, ClientError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|err| ClientError::InvalidBaseUrl {
        url: trimmed.to_string(),
        reason: err.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "scheme must be http or https".to_string(),
        });
    }
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl {
            url: trimmed.to_string(),
            reason: "url cannot carry a path".to_string(),
        });
    }
    Ok(url)
}

fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                return message.clone();
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_string()
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
