//! SQL text helpers for the MySQL gateway

/// Schemas hidden from database listings
pub const SYSTEM_DATABASES: &[&str] = &["information_schema", "mysql", "performance_schema", "sys"];

pub fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES
        .iter()
        .any(|system| system.eq_ignore_ascii_case(name))
}

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

pub fn use_database_sql(database: &str) -> String {
    format!("USE {}", quote_identifier(database))
}

/// Append `LIMIT`/`OFFSET` for zero-based `page` of `page_size` rows.
///
/// Trailing semicolons and whitespace are dropped first so the clause lands
/// inside the statement.
pub fn paginated_sql(sql: &str, page: u32, page_size: u32) -> String {
    let statement = sql.trim_end().trim_end_matches(';').trim_end();
    let offset = u64::from(page) * u64::from(page_size);
    format!("{} LIMIT {} OFFSET {}", statement, page_size, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paginated_sql() {
        assert_eq!(
            paginated_sql("SELECT * FROM users", 0, 25),
            "SELECT * FROM users LIMIT 25 OFFSET 0"
        );
        assert_eq!(
            paginated_sql("SELECT * FROM users;\n", 3, 10),
            "SELECT * FROM users LIMIT 10 OFFSET 30"
        );
    }

    #[test]
    fn test_paginated_sql_offset_does_not_overflow() {
        assert_eq!(
            paginated_sql("SELECT 1", u32::MAX, 2),
            format!("SELECT 1 LIMIT 2 OFFSET {}", u64::from(u32::MAX) * 2)
        );
    }

    #[test]
    fn test_use_database_quotes_name() {
        assert_eq!(use_database_sql("shop"), "USE `shop`");
        assert_eq!(use_database_sql("we`ird"), "USE `we``ird`");
    }

    #[test]
    fn test_system_databases() {
        assert!(is_system_database("mysql"));
        assert!(is_system_database("INFORMATION_SCHEMA"));
        assert!(!is_system_database("shop"));
    }
}
