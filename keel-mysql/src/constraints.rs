use crate::MySQLDriver;
use keel_core::{ConstraintSnapshot, ErrorContext, Executor, Query, Result};

impl MySQLDriver {
    /// Turns foreign key checks off for the session when they are on.
    ///
    /// The returned snapshot must be handed to
    /// [`MySQLDriver::enable_fk_checks_if_was_active`] once the bulk operation ends.
    pub async fn disable_fk_checks_if_active<E: Executor>(
        &self,
        executor: &mut E,
    ) -> Result<ConstraintSnapshot> {
        let row = executor
            .fetch_optional(Query::new("SHOW VARIABLES LIKE 'foreign_key_checks'"))
            .await
            .context("While reading `foreign_key_checks`")?;
        let active = row
            .as_ref()
            .and_then(|v| v.get_column("Value").or_else(|| v.get(1)))
            .and_then(|v| v.as_str())
            .is_some_and(|v| v.eq_ignore_ascii_case("ON") || v == "1");
        if active {
            executor
                .execute(Query::new("SET foreign_key_checks = 0"))
                .await
                .context("While disabling the foreign key checks")?;
            log::debug!("Foreign key checks disabled");
        }
        Ok(ConstraintSnapshot::new(active))
    }

    /// Turns foreign key checks back on if `snapshot` says they were on.
    pub async fn enable_fk_checks_if_was_active<E: Executor>(
        &self,
        executor: &mut E,
        snapshot: ConstraintSnapshot,
    ) -> Result<()> {
        if snapshot.was_active() {
            executor
                .execute(Query::new("SET foreign_key_checks = 1"))
                .await
                .context("While enabling the foreign key checks")?;
            log::debug!("Foreign key checks enabled");
        }
        Ok(())
    }
}
