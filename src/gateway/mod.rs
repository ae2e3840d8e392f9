//! Remote collection gateway: the seam between the listing core and the
//! collection store that owns persistence, auth and permissions.

pub mod directus;
pub mod query;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use directus::DirectusGateway;
pub use query::{Condition, FilterOp, Predicate, SortKey};

/// Errors raised while talking to the collection store.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Collection store returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A paged/filtered read against a collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemQuery {
    pub filter: Predicate,
    pub sort: Vec<SortKey>,
    pub page: Option<u64>,
    /// Page size; `-1` asks for every matching item.
    pub limit: Option<i64>,
    pub fields: Vec<String>,
    pub want_total_count: bool,
}

impl ItemQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Predicate) -> Self {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, key: SortKey) -> Self {
        self.sort.push(key);
        self
    }

    pub fn page(mut self, page: u64, limit: u64) -> Self {
        self.page = Some(page);
        self.limit = Some(i64::try_from(limit).unwrap_or(i64::MAX));
        self
    }

    pub fn unlimited(mut self) -> Self {
        self.page = None;
        self.limit = Some(-1);
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_total_count(mut self) -> Self {
        self.want_total_count = true;
        self
    }
}

/// Items returned by a query plus the matching total when it was requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPage {
    pub items: Vec<Value>,
    pub total_count: Option<u64>,
}

impl ItemPage {
    /// Decode every item into `T`; a single malformed item fails the page.
    pub fn decode<T: DeserializeOwned>(self) -> GatewayResult<Vec<T>> {
        self.items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(GatewayError::from))
            .collect()
    }
}

/// Operations the listing core consumes from the collection store.
#[async_trait]
pub trait CollectionGateway: Send + Sync {
    /// Execute a read. `Ok(None)` means the store answered without a result envelope.
    async fn query(&self, collection: &str, query: &ItemQuery) -> GatewayResult<Option<ItemPage>>;

    async fn get_by_id(
        &self,
        collection: &str,
        id: &str,
        fields: &[&str],
    ) -> GatewayResult<Option<Value>>;

    async fn create(&self, collection: &str, item: &Value) -> GatewayResult<Value>;

    async fn update(&self, collection: &str, id: &str, item: &Value) -> GatewayResult<Value>;

    async fn delete(&self, collection: &str, ids: &[String]) -> GatewayResult<()>;
}
