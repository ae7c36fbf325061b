use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::KeysetSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub user_type: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub mobile: Option<String>,
    /// Argon2id hash; never leaves the service
    #[serde(skip_serializing, default)]
    pub password: String,
    pub verified_at: Option<NaiveDateTime>,
    pub verified_at_order: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
    pub created_at_order: Option<i64>,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_at_order: Option<i64>,
    pub deleted_at: Option<NaiveDateTime>,
    pub deleted_at_order: Option<i64>,
}

impl User {
    pub const TABLE: &'static str = "users";

    pub const ADMIN: &'static str = "admin";
    pub const DEFAULT_TYPE: &'static str = "user";

    /// Columns a client may write; `password` is hashed before it is stored
    pub const WRITABLE: &'static [&'static str] = &[
        "type",
        "first_name",
        "middle_name",
        "last_name",
        "email",
        "mobile",
    ];

    pub const REQUIRED: &'static [&'static str] = &["type", "first_name", "last_name", "email", "password"];

    pub const KEYSET: KeysetSpec = KeysetSpec {
        table: Self::TABLE,
        name_columns: &["first_name", "middle_name", "last_name"],
        find_columns: &["first_name", "middle_name", "last_name", "email", "mobile"],
        order_column: "created_at_order",
    };
}
