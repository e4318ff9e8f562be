//! Table definitions for both backends.

/// Backend-dependent column tokens. Everything else is plain `TEXT`
/// (or `DOUBLE PRECISION`, which both engines accept) and shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnTypes {
    pub primary_key: &'static str,
    pub timestamp: &'static str,
    pub binary: &'static str,
}

impl ColumnTypes {
    pub const fn for_backend(networked: bool) -> Self {
        if networked {
            Self {
                primary_key: "SERIAL PRIMARY KEY",
                timestamp: "TIMESTAMP",
                binary: "BYTEA",
            }
        } else {
            Self {
                primary_key: "INTEGER PRIMARY KEY AUTOINCREMENT",
                timestamp: "DATETIME",
                binary: "BLOB",
            }
        }
    }
}

pub const TABLES: [&str; 8] = [
    "contacts",
    "donations",
    "programs",
    "careers",
    "applications",
    "subscribers",
    "events",
    "event_registrations",
];

/// `(table, CREATE TABLE IF NOT EXISTS …)` in creation order.
pub fn schema_statements(types: &ColumnTypes) -> Vec<(&'static str, String)> {
    let ColumnTypes {
        primary_key: pk,
        timestamp: ts,
        binary: bin,
    } = *types;

    vec![
        (
            "contacts",
            format!(
                "CREATE TABLE IF NOT EXISTS contacts (
                    id {pk},
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    subject TEXT,
                    message TEXT NOT NULL,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "donations",
            format!(
                "CREATE TABLE IF NOT EXISTS donations (
                    id {pk},
                    amount DOUBLE PRECISION NOT NULL,
                    frequency TEXT NOT NULL,
                    payment_method TEXT NOT NULL,
                    first_name TEXT,
                    last_name TEXT,
                    email TEXT,
                    txnid TEXT,
                    status TEXT,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "programs",
            format!(
                "CREATE TABLE IF NOT EXISTS programs (
                    id {pk},
                    title TEXT NOT NULL,
                    category TEXT NOT NULL,
                    description TEXT,
                    image TEXT,
                    icon TEXT
                )"
            ),
        ),
        (
            "careers",
            format!(
                "CREATE TABLE IF NOT EXISTS careers (
                    id {pk},
                    title TEXT NOT NULL,
                    department TEXT,
                    location TEXT,
                    type TEXT,
                    description TEXT,
                    requirements TEXT,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "applications",
            format!(
                "CREATE TABLE IF NOT EXISTS applications (
                    id {pk},
                    job_id INTEGER,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    phone TEXT,
                    resume TEXT,
                    resume_data {bin},
                    resume_type TEXT,
                    cover_letter TEXT,
                    status TEXT DEFAULT 'Pending',
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "subscribers",
            format!(
                "CREATE TABLE IF NOT EXISTS subscribers (
                    id {pk},
                    email TEXT NOT NULL UNIQUE,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "events",
            format!(
                "CREATE TABLE IF NOT EXISTS events (
                    id {pk},
                    title TEXT NOT NULL,
                    date TEXT,
                    location TEXT,
                    description TEXT,
                    image TEXT,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
        (
            "event_registrations",
            format!(
                "CREATE TABLE IF NOT EXISTS event_registrations (
                    id {pk},
                    event_id INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    phone TEXT,
                    created_at {ts} DEFAULT CURRENT_TIMESTAMP
                )"
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_tokens_follow_backend_flag() {
        let embedded = ColumnTypes::for_backend(false);
        assert_eq!(embedded.primary_key, "INTEGER PRIMARY KEY AUTOINCREMENT");
        assert_eq!(embedded.timestamp, "DATETIME");
        assert_eq!(embedded.binary, "BLOB");

        let networked = ColumnTypes::for_backend(true);
        assert_eq!(networked.primary_key, "SERIAL PRIMARY KEY");
        assert_eq!(networked.timestamp, "TIMESTAMP");
        assert_eq!(networked.binary, "BYTEA");
    }

    #[test]
    fn every_table_is_guarded_and_typed() {
        for networked in [false, true] {
            let types = ColumnTypes::for_backend(networked);
            let stmts = schema_statements(&types);
            let names: Vec<&str> = stmts.iter().map(|(t, _)| *t).collect();
            assert_eq!(names, TABLES.to_vec());

            for (table, ddl) in &stmts {
                assert!(ddl.starts_with(&format!("CREATE TABLE IF NOT EXISTS {table} (")));
                assert!(ddl.contains(types.primary_key));
                assert!(!ddl.contains(';'));
            }
        }
    }

    #[test]
    fn application_status_defaults_to_pending() {
        let stmts = schema_statements(&ColumnTypes::for_backend(false));
        let (_, ddl) = stmts.iter().find(|(t, _)| *t == "applications").unwrap();
        assert!(ddl.contains("status TEXT DEFAULT 'Pending'"));
    }
}
