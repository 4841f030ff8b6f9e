use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `?id=` query parameter shared by the update and delete endpoints.
#[derive(Debug, Deserialize, ToSchema)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
