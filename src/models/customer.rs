use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::validators::PHONE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCustomer {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Unique contact address
    #[validate(email, length(max = 254))]
    pub email: String,
    /// Optional phone number, e.g. "+1234567890" or "123-456-7890"
    #[validate(length(max = 20), regex(path = *PHONE_REGEX))]
    pub phone: Option<String>,
}
