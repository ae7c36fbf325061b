/// Which way to walk from the cursor. Pages are always returned newest first;
/// `Next` continues towards older rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Direction {
    /// Only the exact string "next" selects `Next`; anything else walks back
    pub fn parse(value: &str) -> Self {
        if value == "next" {
            Direction::Next
        } else {
            Direction::Previous
        }
    }

    pub fn to_sql(&self) -> &'static str {
        match self {
            Direction::Next => "<",
            Direction::Previous => ">",
        }
    }
}

/// Static description of a keyset-paginated table
#[derive(Debug, Clone, Copy)]
pub struct KeysetSpec {
    pub table: &'static str,
    /// Matched by the `name` filter (any column may contain it)
    pub name_columns: &'static [&'static str],
    /// Matched by the `find` filter (any column may contain it)
    pub find_columns: &'static [&'static str],
    pub order_column: &'static str,
}

/// A validated page request
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPage {
    pub direction: Direction,
    /// Order-column value to continue from
    pub last: i64,
    pub show: i64,
    pub name: String,
    pub find: String,
}
