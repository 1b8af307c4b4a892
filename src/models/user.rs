use crate::core::DocumentId;
use crate::entity::Entity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", default)]
    pub id: DocumentId,

    #[serde(rename = "username")]
    pub user_name: String,

    #[serde(rename = "passwordHash")]
    pub password_hash: String,

    pub email: String,
}

impl User {
    /// New user with a pre-assigned id.
    pub fn new(user_name: &str, password_hash: &str, email: &str) -> Self {
        Self {
            id: DocumentId::generate(),
            user_name: user_name.to_string(),
            password_hash: password_hash.to_string(),
            email: email.to_string(),
        }
    }
}

impl Entity for User {
    const KIND: &'static str = "User";

    fn id(&self) -> DocumentId {
        self.id
    }
}
