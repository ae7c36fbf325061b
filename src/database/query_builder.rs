use chrono::NaiveDateTime;
use sqlx::{postgres::PgArguments, Arguments};

use crate::database::manager::DatabaseError;
use crate::database::stamp::Stamp;

/// A bound value. Every user-supplied value reaches the database through one
/// of these, never through the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    /// Text-typed NULL, for optional text columns
    Null,
    Int(i64),
    Timestamp(NaiveDateTime),
}

impl From<&str> for Param {
    fn from(s: &str) -> Self {
        Param::Text(s.to_string())
    }
}

impl From<String> for Param {
    fn from(s: String) -> Self {
        Param::Text(s)
    }
}

impl From<i64> for Param {
    fn from(i: i64) -> Self {
        Param::Int(i)
    }
}

/// Column/value pairs for an INSERT or UPDATE
pub type Fields = Vec<(&'static str, Param)>;

/// Columns the data-access layer owns; callers can never write them directly
pub const BOOKKEEPING_COLUMNS: &[&str] = &[
    "id",
    "created_at",
    "created_at_order",
    "updated_at",
    "updated_at_order",
    "deleted_at",
    "deleted_at_order",
];

#[derive(Debug, Clone, PartialEq)]
pub struct SqlQuery {
    pub sql: String,
    pub params: Vec<Param>,
}

impl SqlQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: vec![],
        }
    }

    /// Append a value and return its `$n` placeholder
    pub fn bind(&mut self, param: impl Into<Param>) -> String {
        self.params.push(param.into());
        format!("${}", self.params.len())
    }

    pub fn arguments(&self) -> PgArguments {
        let mut args = PgArguments::default();
        for param in &self.params {
            match param {
                Param::Text(s) => args.add(s.clone()),
                Param::Null => args.add(None::<String>),
                Param::Int(i) => args.add(*i),
                Param::Timestamp(t) => args.add(*t),
            }
        }
        args
    }

    /// `INSERT INTO "table" (...) VALUES (...) RETURNING "id"`
    pub fn insert(table: &str, fields: &[(&'static str, Param)]) -> Result<Self, DatabaseError> {
        if fields.is_empty() {
            return Err(DatabaseError::EmptyData(table.to_string()));
        }

        let mut query = SqlQuery::new("");
        let mut columns = Vec::with_capacity(fields.len());
        let mut placeholders = Vec::with_capacity(fields.len());
        for (column, value) in fields {
            columns.push(quote_identifier(column)?);
            placeholders.push(query.bind(value.clone()));
        }

        query.sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING \"id\"",
            quote_identifier(table)?,
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(query)
    }

    /// `UPDATE "table" SET ... WHERE "id" = $n AND "deleted_at" IS NULL`
    pub fn update_live(table: &str, id: i64, fields: &[(&'static str, Param)]) -> Result<Self, DatabaseError> {
        if fields.is_empty() {
            return Err(DatabaseError::EmptyData(table.to_string()));
        }

        let mut query = SqlQuery::new("");
        let mut assignments = Vec::with_capacity(fields.len());
        for (column, value) in fields {
            let column = quote_identifier(column)?;
            assignments.push(format!("{} = {}", column, query.bind(value.clone())));
        }
        let id_placeholder = query.bind(id);

        query.sql = format!(
            "UPDATE {} SET {} WHERE \"id\" = {} AND \"deleted_at\" IS NULL",
            quote_identifier(table)?,
            assignments.join(", "),
            id_placeholder
        );
        Ok(query)
    }

    /// Soft delete: stamps the deleted and updated pairs on a live row
    pub fn soft_delete(table: &str, id: i64, stamp: Stamp) -> Result<Self, DatabaseError> {
        let fields: Fields = vec![
            ("updated_at", Param::Timestamp(stamp.at)),
            ("updated_at_order", Param::Int(stamp.order)),
            ("deleted_at", Param::Timestamp(stamp.at)),
            ("deleted_at_order", Param::Int(stamp.order)),
        ];
        Self::update_live(table, id, &fields)
    }

    /// `SELECT * FROM "table" WHERE "id" = $1 AND "deleted_at" IS NULL`
    pub fn find_live(table: &str, id: i64) -> Result<Self, DatabaseError> {
        let mut query = SqlQuery::new("");
        let placeholder = query.bind(id);
        query.sql = format!(
            "SELECT * FROM {} WHERE \"id\" = {} AND \"deleted_at\" IS NULL",
            quote_identifier(table)?,
            placeholder
        );
        Ok(query)
    }

    /// `SELECT * FROM "table" WHERE "column" = $1`, optionally live rows only
    pub fn find_by(table: &str, column: &str, value: impl Into<Param>, live_only: bool) -> Result<Self, DatabaseError> {
        let mut query = SqlQuery::new("");
        let placeholder = query.bind(value);
        query.sql = format!(
            "SELECT * FROM {} WHERE {} = {}{}",
            quote_identifier(table)?,
            quote_identifier(column)?,
            placeholder,
            if live_only { " AND \"deleted_at\" IS NULL" } else { "" }
        );
        Ok(query)
    }

    /// Every live row, newest first
    pub fn all_live(table: &str) -> Result<Self, DatabaseError> {
        Ok(SqlQuery::new(format!(
            "SELECT * FROM {} WHERE \"deleted_at\" IS NULL ORDER BY \"created_at_order\" DESC",
            quote_identifier(table)?
        )))
    }

    pub fn count_live(table: &str) -> Result<Self, DatabaseError> {
        Ok(SqlQuery::new(format!(
            "SELECT COUNT(*) FROM {} WHERE \"deleted_at\" IS NULL",
            quote_identifier(table)?
        )))
    }
}

/// Drop caller-supplied bookkeeping columns, then append the stamped pairs
pub fn stamp_fields(fields: Fields, stamp: Stamp, pairs: &[(&'static str, &'static str)]) -> Fields {
    let mut fields: Fields = fields
        .into_iter()
        .filter(|(column, _)| !BOOKKEEPING_COLUMNS.contains(column))
        .collect();
    for (at_column, order_column) in pairs {
        fields.push((at_column, Param::Timestamp(stamp.at)));
        fields.push((order_column, Param::Int(stamp.order)));
    }
    fields
}

/// Identifiers are lower-case snake_case only, then double-quoted
pub fn quote_identifier(name: &str) -> Result<String, DatabaseError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if !valid_start || !valid_rest || name.len() > 63 {
        return Err(DatabaseError::InvalidIdentifier(name.to_string()));
    }
    Ok(format!("\"{}\"", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> Stamp {
        let at = NaiveDate::from_ymd_opt(2024, 3, 5)
            .and_then(|d| d.and_hms_opt(10, 15, 0))
            .unwrap();
        Stamp::from_naive(at)
    }

    #[test]
    fn quotes_valid_identifiers() {
        assert_eq!(quote_identifier("branches").unwrap(), "\"branches\"");
        assert_eq!(quote_identifier("address_line_1").unwrap(), "\"address_line_1\"");
    }

    #[test]
    fn rejects_hostile_identifiers() {
        for bad in ["", "1abc", "Branches", "name\"; DROP TABLE users; --", "a b", "name-x"] {
            assert!(quote_identifier(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn insert_binds_every_value() {
        let fields: Fields = vec![("name", Param::from("Main")), ("city", Param::from("Makati"))];
        let q = SqlQuery::insert("branches", &fields).unwrap();
        assert_eq!(
            q.sql,
            "INSERT INTO \"branches\" (\"name\", \"city\") VALUES ($1, $2) RETURNING \"id\""
        );
        assert_eq!(q.params, vec![Param::from("Main"), Param::from("Makati")]);
    }

    #[test]
    fn insert_requires_columns() {
        assert!(matches!(SqlQuery::insert("branches", &[]), Err(DatabaseError::EmptyData(_))));
    }

    #[test]
    fn update_targets_live_row_by_id() {
        let fields: Fields = vec![("name", Param::from("Renamed"))];
        let q = SqlQuery::update_live("branches", 7, &fields).unwrap();
        assert_eq!(
            q.sql,
            "UPDATE \"branches\" SET \"name\" = $1 WHERE \"id\" = $2 AND \"deleted_at\" IS NULL"
        );
        assert_eq!(q.params, vec![Param::from("Renamed"), Param::Int(7)]);
    }

    #[test]
    fn soft_delete_stamps_both_pairs() {
        let s = stamp();
        let q = SqlQuery::soft_delete("branches", 3, s).unwrap();
        assert!(q.sql.starts_with("UPDATE \"branches\" SET \"updated_at\" = $1, \"updated_at_order\" = $2, \"deleted_at\" = $3, \"deleted_at_order\" = $4"));
        assert!(q.sql.ends_with("WHERE \"id\" = $5 AND \"deleted_at\" IS NULL"));
        assert_eq!(q.params[1], Param::Int(20240305101500));
        assert_eq!(q.params[3], Param::Int(20240305101500));
        assert_eq!(q.params[4], Param::Int(3));
    }

    #[test]
    fn stamping_replaces_caller_bookkeeping() {
        let fields: Fields = vec![
            ("name", Param::from("Main")),
            ("created_at_order", Param::Int(1)),
            ("id", Param::Int(99)),
        ];
        let stamped = stamp_fields(fields, stamp(), &[("created_at", "created_at_order")]);
        let columns: Vec<&str> = stamped.iter().map(|(c, _)| *c).collect();
        assert_eq!(columns, vec!["name", "created_at", "created_at_order"]);
        assert_eq!(stamped[2].1, Param::Int(20240305101500));
    }

    #[test]
    fn find_by_binds_the_lookup_value() {
        let q = SqlQuery::find_by("users", "email", "ada@example.com", true).unwrap();
        assert_eq!(
            q.sql,
            "SELECT * FROM \"users\" WHERE \"email\" = $1 AND \"deleted_at\" IS NULL"
        );
        assert_eq!(q.params, vec![Param::from("ada@example.com")]);

        let all = SqlQuery::find_by("users", "email", "ada@example.com", false).unwrap();
        assert!(!all.sql.contains("deleted_at"));
        assert!(SqlQuery::find_by("users", "email\" OR 1=1", "x", true).is_err());
    }

    #[test]
    fn reads_filter_deleted_rows() {
        assert!(SqlQuery::find_live("branches", 1).unwrap().sql.contains("\"deleted_at\" IS NULL"));
        assert!(SqlQuery::all_live("branches").unwrap().sql.contains("\"deleted_at\" IS NULL"));
        assert!(SqlQuery::count_live("users").unwrap().sql.contains("\"deleted_at\" IS NULL"));
    }
}
