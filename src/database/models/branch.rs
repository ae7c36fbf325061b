use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::KeysetSpec;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Branch {
    pub id: i64,
    pub name: String,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub opening: String,
    pub closing: String,
    pub created_at: Option<NaiveDateTime>,
    pub created_at_order: Option<i64>,
    pub updated_at: Option<NaiveDateTime>,
    pub updated_at_order: Option<i64>,
    pub deleted_at: Option<NaiveDateTime>,
    pub deleted_at_order: Option<i64>,
}

impl Branch {
    pub const TABLE: &'static str = "branches";

    /// Columns a client may write
    pub const WRITABLE: &'static [&'static str] = &[
        "name",
        "address_line_1",
        "address_line_2",
        "city",
        "state",
        "zip_code",
        "opening",
        "closing",
    ];

    pub const REQUIRED: &'static [&'static str] = &["name", "zip_code", "city", "state", "opening", "closing"];

    pub const KEYSET: KeysetSpec = KeysetSpec {
        table: Self::TABLE,
        name_columns: &["name"],
        find_columns: &[
            "name",
            "opening",
            "closing",
            "address_line_1",
            "address_line_2",
            "city",
            "state",
        ],
        order_column: "created_at_order",
    };
}
