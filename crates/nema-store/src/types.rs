// FastSchema wire envelopes
//
// Every FastSchema response wraps its payload in a `data` field.

use nema_core::Eat;
use serde::{Deserialize, Serialize};

/// Paginated list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse {
    pub data: ListData,
}

/// Pagination info and items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub last_page: u64,
    #[serde(default)]
    pub items: Option<Vec<Eat>>,
}

impl ListData {
    pub fn into_items(self) -> Vec<Eat> {
        self.items.unwrap_or_default()
    }
}

/// Single record response; `data` is null for a missing record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SingleResponse<T> {
    pub data: Option<T>,
}

/// Authentication payload
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub login: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub data: LoginData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
}
