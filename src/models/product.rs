use crate::core::DocumentId;
use crate::entity::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: DocumentId,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub price: f64,

    pub stock: i32,

    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub reviews: Vec<Review>,
}

/// Review embedded in a product. Has no identity of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub rating: i32,

    pub created_at: DateTime<Utc>,

    pub user_id: DocumentId,

    /// Fields the schema does not know about, kept as-is.
    #[serde(flatten)]
    pub extra_elements: Map<String, Value>,
}

impl Product {
    pub fn new(name: &str, price: f64, stock: i32) -> Self {
        Self {
            id: DocumentId::generate(),
            name: name.to_string(),
            description: None,
            price,
            stock,
            created_at: Utc::now(),
            reviews: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_review(mut self, review: Review) -> Self {
        self.reviews.push(review);
        self
    }
}

impl Review {
    pub fn new(user_id: DocumentId, rating: i32, comment: &str) -> Self {
        Self {
            comment: Some(comment.to_string()),
            rating,
            created_at: Utc::now(),
            user_id,
            extra_elements: Map::new(),
        }
    }

    /// Attach a field outside the declared schema.
    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra_elements.insert(key.to_string(), value.into());
        self
    }
}

impl Entity for Product {
    const KIND: &'static str = "Product";

    fn id(&self) -> DocumentId {
        self.id
    }
}
