//! Directus REST implementation of [`CollectionGateway`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{CollectionGateway, GatewayError, GatewayResult, ItemPage, ItemQuery};
use crate::models::user::{SessionUser, SESSION_FIELDS};

/// `{ "data": ..., "meta": ... }` envelope wrapping every Directus response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Default, Deserialize)]
struct Meta {
    filter_count: Option<u64>,
    total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    message: String,
}

/// Tokens issued by `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires: Option<u64>,
}

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// HTTP client for one Directus instance, optionally bound to a user token.
#[derive(Debug, Clone)]
pub struct DirectusGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl DirectusGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Same connection pool, authenticated as the holder of `token`.
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.into()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// System collections (`directus_users`, ...) live at the root, the rest under `/items`.
    fn collection_path(collection: &str) -> String {
        match collection.strip_prefix("directus_") {
            Some(system) => format!("/{system}"),
            None => format!("/items/{collection}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn check_status(response: Response) -> GatewayResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.errors.into_iter().next())
            .map(|e| e.message)
            .unwrap_or_else(|| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("unknown").to_string()
                } else {
                    text
                }
            });
        Err(GatewayError::Status {
            status: status.as_u16(),
            message,
        })
    }

    /// Read an envelope; an empty body (204) yields an envelope without data.
    async fn read_envelope<T: DeserializeOwned>(response: Response) -> GatewayResult<Envelope<T>> {
        let response = Self::check_status(response).await?;
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Envelope {
                data: None,
                meta: None,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn query_params(query: &ItemQuery) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if !query.filter.is_match_all() {
            params.push(("filter", query.filter.to_json().to_string()));
        }
        if !query.sort.is_empty() {
            let sort: Vec<String> = query.sort.iter().map(ToString::to_string).collect();
            params.push(("sort", sort.join(",")));
        }
        if let Some(page) = query.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }
        if !query.fields.is_empty() {
            params.push(("fields", query.fields.join(",")));
        }
        if query.want_total_count {
            params.push(("meta", "filter_count".to_string()));
        }
        params
    }

    /// `GET /users/me` with the role expanded to `{id, name}`.
    pub async fn current_user(&self) -> GatewayResult<SessionUser> {
        let req = self
            .client
            .get(self.url("/users/me"))
            .query(&[("fields", SESSION_FIELDS.join(","))]);
        let envelope: Envelope<SessionUser> =
            Self::read_envelope(self.authorize(req).send().await?).await?;
        envelope
            .data
            .ok_or_else(|| GatewayError::InvalidResponse("Missing session user".into()))
    }

    /// Liveness of the Directus instance.
    pub async fn ping(&self) -> GatewayResult<()> {
        let response = self.client.get(self.url("/server/ping")).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    pub async fn login(&self, email: &str, password: &str) -> GatewayResult<AuthTokens> {
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&body)
            .send()
            .await?;
        let envelope: Envelope<AuthTokens> = Self::read_envelope(response).await?;
        envelope
            .data
            .ok_or_else(|| GatewayError::InvalidResponse("Missing login data".into()))
    }

    pub async fn register_user(&self, registration: &Registration) -> GatewayResult<()> {
        let response = self
            .client
            .post(self.url("/users/register"))
            .json(registration)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CollectionGateway for DirectusGateway {
    async fn query(&self, collection: &str, query: &ItemQuery) -> GatewayResult<Option<ItemPage>> {
        let req = self
            .client
            .get(self.url(&Self::collection_path(collection)))
            .query(&Self::query_params(query));
        let envelope: Envelope<Vec<Value>> =
            Self::read_envelope(self.authorize(req).send().await?).await?;

        let Some(items) = envelope.data else {
            return Ok(None);
        };
        let meta = envelope.meta.unwrap_or_default();
        let total_count = if query.want_total_count {
            meta.filter_count.or(meta.total_count)
        } else {
            None
        };
        Ok(Some(ItemPage { items, total_count }))
    }

    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: &[&str],
    ) -> GatewayResult<Option<Value>> {
        let path = format!("{}/{id}", Self::collection_path(collection));
        let mut req = self.client.get(self.url(&path));
        if !fields.is_empty() {
            req = req.query(&[("fields", fields.join(","))]);
        }
        let response = self.authorize(req).send().await?;

        // Directus answers 403 for items that do not exist as well as for forbidden ones.
        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::FORBIDDEN
        ) {
            return Ok(None);
        }
        let envelope: Envelope<Value> = Self::read_envelope(response).await?;
        Ok(envelope.data.filter(|v| !v.is_null()))
    }

    async fn create(&self, collection: &str, item: &Value) -> GatewayResult<Value> {
        let req = self
            .client
            .post(self.url(&Self::collection_path(collection)))
            .json(item);
        let envelope: Envelope<Value> =
            Self::read_envelope(self.authorize(req).send().await?).await?;
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    async fn update(&self, collection: &str, id: &str, item: &Value) -> GatewayResult<Value> {
        let path = format!("{}/{id}", Self::collection_path(collection));
        let req = self.client.patch(self.url(&path)).json(item);
        let envelope: Envelope<Value> =
            Self::read_envelope(self.authorize(req).send().await?).await?;
        Ok(envelope.data.unwrap_or(Value::Null))
    }

    async fn delete(&self, collection: &str, ids: &[String]) -> GatewayResult<()> {
        let req = self
            .client
            .delete(self.url(&Self::collection_path(collection)))
            .json(ids);
        Self::check_status(self.authorize(req).send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Predicate, SortKey};

    #[test]
    fn collection_paths() {
        assert_eq!(DirectusGateway::collection_path("books"), "/items/books");
        assert_eq!(DirectusGateway::collection_path("directus_users"), "/users");
    }

    #[test]
    fn base_url_is_trimmed() {
        let gw = DirectusGateway::new("http://cms.local:8055/", Duration::from_secs(5)).unwrap();
        assert_eq!(gw.base_url(), "http://cms.local:8055");
        assert_eq!(gw.token(), None);
        assert_eq!(gw.with_token("abc").token(), Some("abc"));
    }

    #[test]
    fn query_params_encode_directus_conventions() {
        let q = ItemQuery::new()
            .filter(Predicate::And(vec![Predicate::eq("genre", "Horror")]))
            .sort(SortKey::desc("publication_date"))
            .page(2, 6)
            .fields(["id", "genre"])
            .with_total_count();
        let params = DirectusGateway::query_params(&q);
        assert_eq!(
            params,
            vec![
                ("filter", r#"{"_and":[{"genre":{"_eq":"Horror"}}]}"#.to_string()),
                ("sort", "-publication_date".to_string()),
                ("page", "2".to_string()),
                ("limit", "6".to_string()),
                ("fields", "id,genre".to_string()),
                ("meta", "filter_count".to_string()),
            ]
        );
    }

    #[test]
    fn match_all_query_sends_no_filter() {
        let params = DirectusGateway::query_params(&ItemQuery::new().unlimited());
        assert_eq!(params, vec![("limit", "-1".to_string())]);
    }
}
