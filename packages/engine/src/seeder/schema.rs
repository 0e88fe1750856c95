// packages/engine/src/seeder/schema.rs
//! Column layout of the `contexts` table
//!
//! CREATE, INSERT and SELECT statements are all rendered from [`COLUMNS`],
//! so their column sets and order cannot drift apart.

/// Table populated by the seeder
pub const TABLE_NAME: &str = "contexts";

/// A data column (the `id` identity column is implicit)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
}

const fn column(name: &'static str, sql_type: &'static str) -> Column {
    Column { name, sql_type }
}

/// Data columns in insertion order
pub const COLUMNS: [Column; 8] = [
    column("state_vector", "TEXT"),
    column("temporal_index", "INTEGER"),
    column("entropy", "REAL"),
    column("synaptic_weight", "REAL"),
    column("hash", "TEXT"),
    column("coordinates", "TEXT"),
    column("is_entangled", "BOOLEAN"),
    column("timestamp", "DATETIME"),
];

fn column_names() -> Vec<&'static str> {
    COLUMNS.iter().map(|c| c.name).collect()
}

/// `CREATE TABLE IF NOT EXISTS contexts (...)`
pub fn create_table_sql() -> String {
    let columns = COLUMNS
        .iter()
        .map(|c| format!("{} {}", c.name, c.sql_type))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "CREATE TABLE IF NOT EXISTS {} (id INTEGER PRIMARY KEY AUTOINCREMENT, {})",
        TABLE_NAME, columns
    )
}

/// Single-row insert with one positional parameter per column
pub fn insert_sql() -> String {
    let placeholders = vec!["?"; COLUMNS.len()].join(", ");

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        TABLE_NAME,
        column_names().join(", "),
        placeholders
    )
}

/// Select every row, identity first, in insertion order
pub fn select_sql() -> String {
    format!(
        "SELECT id, {} FROM {} ORDER BY id",
        column_names().join(", "),
        TABLE_NAME
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn between<'a>(sql: &'a str, open: &str, close: &str) -> &'a str {
        let start = sql.find(open).unwrap() + open.len();
        let end = sql[start..].find(close).unwrap() + start;
        &sql[start..end]
    }

    #[test]
    fn test_create_and_insert_columns_match() {
        let create = create_table_sql();
        let insert = insert_sql();

        let created: Vec<&str> = between(&create, "AUTOINCREMENT, ", ")")
            .split(", ")
            .map(|def| def.split(' ').next().unwrap())
            .collect();
        let inserted: Vec<&str> = between(&insert, "contexts (", ")").split(", ").collect();

        assert_eq!(created, inserted);
        assert_eq!(inserted.len(), COLUMNS.len());
    }

    #[test]
    fn test_placeholder_count() {
        let insert = insert_sql();
        assert_eq!(insert.matches('?').count(), COLUMNS.len());
    }

    #[test]
    fn test_create_is_idempotent_statement() {
        assert!(create_table_sql().starts_with("CREATE TABLE IF NOT EXISTS contexts"));
    }
}
