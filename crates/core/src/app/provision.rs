//! Startup schema provisioning and reference-data seeding.
//!
//! Safe to run on every start and from several processes at once. Seeding
//! is lookup-then-insert by title, not a database upsert, so two processes
//! cold-starting together can both insert the same reference row.
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::app::schema::{schema_statements, ColumnTypes};
use crate::domain::seeds::{CareerSeed, ProgramSeed, CAREERS, PROGRAMS};
use crate::infra::database::Database;
use crate::infra::error::DbError;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("schema apply failed for table {table}: {source}")]
    Schema {
        table: &'static str,
        #[source]
        source: DbError,
    },
    #[error("seeding {kind} '{title}' failed: {source}")]
    Seed {
        kind: &'static str,
        title: &'static str,
        #[source]
        source: DbError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    pub tables: usize,
    pub programs_inserted: usize,
    pub careers_inserted: usize,
    pub seeds_skipped: usize,
}

pub async fn provision(db: &Database) -> Result<ProvisionReport, ProvisionError> {
    info!(backend = %db.kind(), "schema provision start");

    let mut report = ProvisionReport::default();
    let types = ColumnTypes::for_backend(db.kind().is_networked());

    for (table, ddl) in schema_statements(&types) {
        match db.exec(&ddl).await {
            Ok(()) => {}
            Err(e) if lost_create_race(&e) => {
                warn!(table, error = %e, "table created concurrently, continuing");
            }
            Err(source) => return Err(ProvisionError::Schema { table, source }),
        }
        report.tables += 1;
    }

    for program in PROGRAMS {
        match seed_program(db, program).await? {
            SeedOutcome::Inserted => report.programs_inserted += 1,
            SeedOutcome::Present => {}
            SeedOutcome::Skipped => report.seeds_skipped += 1,
        }
    }

    for career in CAREERS {
        match seed_career(db, career).await? {
            SeedOutcome::Inserted => report.careers_inserted += 1,
            SeedOutcome::Present => {}
            SeedOutcome::Skipped => report.seeds_skipped += 1,
        }
    }

    info!(
        tables = report.tables,
        programs_inserted = report.programs_inserted,
        careers_inserted = report.careers_inserted,
        seeds_skipped = report.seeds_skipped,
        "schema provision done"
    );
    Ok(report)
}

enum SeedOutcome {
    Inserted,
    Present,
    Skipped,
}

async fn seed_program(db: &Database, seed: &ProgramSeed) -> Result<SeedOutcome, ProvisionError> {
    let fail = |source| ProvisionError::Seed {
        kind: "program",
        title: seed.title,
        source,
    };

    let existing = db
        .prepare("SELECT id FROM programs WHERE title = ?")
        .get(&[seed.title.into()])
        .await
        .map_err(fail)?;

    if existing.is_some() {
        debug!(title = seed.title, "program seed present");
        return Ok(SeedOutcome::Present);
    }

    let inserted = db
        .prepare(
            "INSERT INTO programs (title, category, description, image, icon) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .run(&[
            seed.title.into(),
            seed.category.into(),
            seed.description.into(),
            seed.image.into(),
            seed.icon.into(),
        ])
        .await;

    settle("program", seed.title, inserted.map(|_| ())).map_err(fail)
}

async fn seed_career(db: &Database, seed: &CareerSeed) -> Result<SeedOutcome, ProvisionError> {
    let fail = |source| ProvisionError::Seed {
        kind: "career",
        title: seed.title,
        source,
    };

    let existing = db
        .prepare("SELECT id FROM careers WHERE title = ?")
        .get(&[seed.title.into()])
        .await
        .map_err(fail)?;

    if existing.is_some() {
        debug!(title = seed.title, "career seed present");
        return Ok(SeedOutcome::Present);
    }

    let inserted = db
        .prepare(
            "INSERT INTO careers (title, department, location, type, description, requirements) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .run(&[
            seed.title.into(),
            seed.department.into(),
            seed.location.into(),
            seed.kind.into(),
            seed.description.into(),
            seed.requirements.into(),
        ])
        .await;

    settle("career", seed.title, inserted.map(|_| ())).map_err(fail)
}

/// A seed insert that collides with a concurrent writer is not fatal.
fn settle(
    kind: &'static str,
    title: &'static str,
    inserted: Result<(), DbError>,
) -> Result<SeedOutcome, DbError> {
    match inserted {
        Ok(()) => {
            info!(kind, title, "seeded reference row");
            Ok(SeedOutcome::Inserted)
        }
        Err(e) if e.is_unique_violation() => {
            warn!(kind, title, error = %e, "seed insert collided, skipping");
            Ok(SeedOutcome::Skipped)
        }
        Err(e) => Err(e),
    }
}

/// Postgres can still fail `CREATE TABLE IF NOT EXISTS` when two sessions
/// race: duplicate table (`42P07`), duplicate object (`42710`), or a
/// duplicate row in `pg_type` (`23505`).
fn lost_create_race(err: &DbError) -> bool {
    matches!(
        err.code().as_deref(),
        Some("42P07") | Some("42710") | Some("23505")
    )
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    #[derive(Debug)]
    struct CodedError(&'static str);

    impl fmt::Display for CodedError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "driver error {}", self.0)
        }
    }

    impl StdError for CodedError {}

    impl DatabaseError for CodedError {
        fn message(&self) -> &str {
            "driver error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.0))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    fn coded(code: &'static str) -> DbError {
        DbError::Sqlx(sqlx::Error::Database(Box::new(CodedError(code))))
    }

    #[test]
    fn seed_collision_is_skipped() {
        for code in ["2067", "1555", "23505"] {
            assert!(matches!(
                settle("program", "Tech for All", Err(coded(code))),
                Ok(SeedOutcome::Skipped)
            ));
        }
        assert!(matches!(
            settle("career", "Volunteer Teacher", Ok(())),
            Ok(SeedOutcome::Inserted)
        ));
    }

    #[test]
    fn other_seed_errors_propagate() {
        let err = settle("program", "Tech for All", Err(coded("42P01"))).err();
        assert_eq!(err.and_then(|e| e.code()).as_deref(), Some("42P01"));

        let err = settle("program", "Tech for All", Err(DbError::Connect("gone".into())));
        assert!(err.is_err());
    }

    #[test]
    fn create_race_codes_are_tolerated() {
        for code in ["42P07", "42710", "23505"] {
            assert!(lost_create_race(&coded(code)), "{code}");
        }
        for code in ["42P01", "42601", "2067"] {
            assert!(!lost_create_race(&coded(code)), "{code}");
        }
        assert!(!lost_create_race(&DbError::Connect("refused".into())));
    }
}
