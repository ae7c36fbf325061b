// One-shot DDL. Statements run in order and the first failure aborts the run;
// nothing is recorded about which statements have already been applied.

use tracing::info;

use crate::database::manager::{Database, DatabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub name: &'static str,
    pub sql: &'static str,
}

pub const STATEMENTS: &[Statement] = &[
    Statement {
        name: "create_users_table",
        sql: r#"CREATE TABLE users (
            id BIGSERIAL PRIMARY KEY,
            type VARCHAR(255) NOT NULL,
            first_name VARCHAR(255) NOT NULL,
            middle_name VARCHAR(255) NULL,
            last_name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            mobile VARCHAR(255) NULL,
            password VARCHAR(255) NOT NULL,
            verified_at TIMESTAMP NULL,
            verified_at_order BIGINT NULL,
            created_at TIMESTAMP NULL,
            created_at_order BIGINT NULL,
            updated_at TIMESTAMP NULL,
            updated_at_order BIGINT NULL,
            deleted_at TIMESTAMP NULL,
            deleted_at_order BIGINT NULL
        )"#,
    },
    Statement {
        name: "create_branches_table",
        sql: r#"CREATE TABLE branches (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            address_line_1 VARCHAR(255) NULL,
            address_line_2 VARCHAR(255) NULL,
            city VARCHAR(255) NOT NULL,
            state VARCHAR(255) NOT NULL,
            zip_code VARCHAR(32) NOT NULL,
            opening VARCHAR(64) NOT NULL,
            closing VARCHAR(64) NOT NULL,
            created_at TIMESTAMP NULL,
            created_at_order BIGINT NULL,
            updated_at TIMESTAMP NULL,
            updated_at_order BIGINT NULL,
            deleted_at TIMESTAMP NULL,
            deleted_at_order BIGINT NULL
        )"#,
    },
    Statement {
        name: "index_branches_created_at_order",
        sql: "CREATE INDEX branches_created_at_order_idx ON branches (created_at_order DESC)",
    },
    Statement {
        name: "index_users_created_at_order",
        sql: "CREATE INDEX users_created_at_order_idx ON users (created_at_order DESC)",
    },
];

pub fn find(name: &str) -> Option<&'static Statement> {
    STATEMENTS.iter().find(|statement| statement.name == name)
}

/// Resolve what to run: one named statement, or all of them in order
pub fn plan(only: Option<&str>) -> Result<Vec<&'static Statement>, DatabaseError> {
    match only {
        Some(name) => find(name)
            .map(|statement| vec![statement])
            .ok_or_else(|| DatabaseError::UnknownStatement(name.to_string())),
        None => Ok(STATEMENTS.iter().collect()),
    }
}

pub async fn run(db: &Database, only: Option<&str>) -> Result<Vec<&'static str>, DatabaseError> {
    let mut applied = Vec::new();
    for statement in plan(only)? {
        let mut conn = db.pool().acquire().await?;
        sqlx::query(statement.sql).execute(&mut *conn).await?;
        info!("Applied {}", statement.name);
        applied.push(statement.name);
    }
    Ok(applied)
}
