use crate::cli::{utils, OutputFormat};
use crate::database::migration::STATEMENTS;

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<(&str, String)> = STATEMENTS
        .iter()
        .map(|statement| (statement.name, first_line(statement.sql)))
        .collect();
    utils::output_table(output_format, "statements", &rows)
}

fn first_line(sql: &str) -> String {
    sql.lines().next().unwrap_or_default().trim_end_matches('(').trim().to_string()
}
