//! The index manager: durable table layout, staging, and the ten
//! transactional operations a membership index exposes.

use chrono::{DateTime, Utc};
use sqlx::{Any, Row, Transaction};
use tracing::{debug, info, warn};

use crate::backend::Backend;
use crate::config::Config;
use crate::error::IndexResult;
use crate::id::Id;
use crate::model::{ForceFlag, MembershipRow, Operation, StagingRow, Triple};
use crate::sql::TIMESTAMP_FORMAT;
use crate::time::{no_end, no_start, truncate_to_seconds};

/// Sentinel transaction id meaning "no transaction" — `get_membership`
/// called with this sees only committed state, since no staging row's
/// `tx_id` column is ever the empty string.
pub const NO_TRANSACTION: &str = "";

fn fmt_ts(instant: DateTime<Utc>) -> String {
    truncate_to_seconds(instant).format(TIMESTAMP_FORMAT).to_string()
}

fn parse_ts(raw: &str) -> IndexResult<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|e| {
        crate::error::IndexError::InvariantViolation(format!(
            "stored timestamp '{raw}' does not match expected format: {e}"
        ))
    })?;
    Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Owns the MEMBERSHIP and STAGING relations and exposes the mutating and
/// query operations. Cheap to clone; holds only a pool handle.
#[derive(Clone)]
pub struct IndexManager {
    backend: Backend,
}

impl IndexManager {
    /// Connect and wrap a fresh pool. Does not apply DDL — call
    /// [`IndexManager::init_schema`] once at startup for that.
    pub async fn connect(config: &Config) -> IndexResult<Self> {
        let backend = Backend::connect(config).await?;
        Ok(Self { backend })
    }

    /// Construct directly from an already-connected backend (used by tests
    /// that share one pool across many managers/schemas).
    pub fn from_backend(backend: Backend) -> Self {
        Self { backend }
    }

    /// Apply this manager's platform DDL. Safe to call repeatedly — the
    /// scripts are `CREATE TABLE IF NOT EXISTS`.
    pub async fn init_schema(&self) -> IndexResult<()> {
        self.backend.init_schema().await
    }

    async fn begin(&self) -> IndexResult<Transaction<'_, Any>> {
        Ok(self.backend.pool().begin().await?)
    }

    // ---- 4.1 mutating operations ----------------------------------------

    /// Stage an ADD with an unbounded (still-active) end time.
    pub async fn add_membership(
        &self,
        tx_id: &str,
        source: &str,
        triple: &Triple,
        start_time: DateTime<Utc>,
    ) -> IndexResult<()> {
        self.add_membership_until(tx_id, source, triple, start_time, no_end())
            .await
    }

    /// Stage an ADD with an explicit (bounded) end time, used when a caller
    /// already knows the row's lifetime (e.g. replaying history).
    pub async fn add_membership_until(
        &self,
        tx_id: &str,
        source: &str,
        triple: &Triple,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let clear_pending_delete = format!(
            "DELETE FROM membership_tx_operations \
             WHERE tx_id = {p1} AND operation = 'D' \
               AND source_id = {p2} AND subject_id = {p3} AND property = {p4} AND object_id = {p5}",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.param(4),
            p5 = dialect.param(5),
        );
        sqlx::query(&clear_pending_delete)
            .bind(tx_id)
            .bind(source)
            .bind(triple.subject.base_id())
            .bind(&triple.property)
            .bind(triple.object.base_id())
            .execute(&mut *tx)
            .await?;

        let insert_add = format!(
            "INSERT INTO membership_tx_operations \
             (source_id, subject_id, property, object_id, start_time, end_time, tx_id, operation, force_flag) \
             VALUES ({p1}, {p2}, {p3}, {p4}, {p5}, {p6}, {p7}, '{op}', NULL)",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.param(4),
            p5 = dialect.ts_param(5),
            p6 = dialect.ts_param(6),
            p7 = dialect.param(7),
            op = Operation::Add.as_db_str(),
        );
        sqlx::query(&insert_add)
            .bind(source)
            .bind(triple.subject.base_id())
            .bind(&triple.property)
            .bind(triple.object.base_id())
            .bind(fmt_ts(start_time))
            .bind(fmt_ts(end_time))
            .bind(tx_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(tx_id, source, subject = %triple.subject, "staged ADD");
        Ok(())
    }

    /// End a single triple: withdraw it if it was only ever staged in this
    /// transaction, otherwise stage a DELETE against the live committed row.
    pub async fn end_membership(
        &self,
        tx_id: &str,
        source: &str,
        triple: &Triple,
        end_time: DateTime<Utc>,
    ) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let withdraw = format!(
            "DELETE FROM membership_tx_operations \
             WHERE tx_id = {p1} AND operation = 'A' AND force_flag IS NULL \
               AND source_id = {p2} AND subject_id = {p3} AND property = {p4} AND object_id = {p5}",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.param(4),
            p5 = dialect.param(5),
        );
        let withdrawn = sqlx::query(&withdraw)
            .bind(tx_id)
            .bind(source)
            .bind(triple.subject.base_id())
            .bind(&triple.property)
            .bind(triple.object.base_id())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if withdrawn > 0 {
            tx.commit().await?;
            debug!(tx_id, source, subject = %triple.subject, "withdrew staged ADD");
            return Ok(());
        }

        let find_live = format!(
            "SELECT {start_txt} AS start_time FROM membership \
             WHERE source_id = {p1} AND subject_id = {p2} AND property = {p3} AND object_id = {p4} \
               AND end_time = {p5}",
            start_txt = dialect.text_cast("start_time"),
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.param(4),
            p5 = dialect.ts_param(5),
        );
        let live_rows = sqlx::query(&find_live)
            .bind(source)
            .bind(triple.subject.base_id())
            .bind(&triple.property)
            .bind(triple.object.base_id())
            .bind(fmt_ts(no_end()))
            .fetch_all(&mut *tx)
            .await?;

        if live_rows.is_empty() {
            tx.commit().await?;
            warn!(tx_id, source, subject = %triple.subject, "end_membership: no live row to end, no-op");
            return Ok(());
        }

        let insert_delete = format!(
            "INSERT INTO membership_tx_operations \
             (source_id, subject_id, property, object_id, start_time, end_time, tx_id, operation, force_flag) \
             VALUES ({p1}, {p2}, {p3}, {p4}, {p5}, {p6}, {p7}, '{op}', NULL)",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.param(4),
            p5 = dialect.ts_param(5),
            p6 = dialect.ts_param(6),
            p7 = dialect.param(7),
            op = Operation::Delete.as_db_str(),
        );
        for row in live_rows {
            let start_raw: String = row.try_get("start_time")?;
            let start_time = parse_ts(&start_raw)?;
            sqlx::query(&insert_delete)
                .bind(source)
                .bind(triple.subject.base_id())
                .bind(&triple.property)
                .bind(triple.object.base_id())
                .bind(fmt_ts(start_time))
                .bind(fmt_ts(end_time))
                .bind(tx_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        debug!(tx_id, source, subject = %triple.subject, "staged DELETE for live row");
        Ok(())
    }

    /// Bulk-end every live triple produced by `source`.
    pub async fn end_membership_for_source(
        &self,
        tx_id: &str,
        source: &str,
        end_time: DateTime<Utc>,
    ) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let clear_adds = format!(
            "DELETE FROM membership_tx_operations \
             WHERE tx_id = {p1} AND source_id = {p2} AND operation = 'A'",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
        );
        sqlx::query(&clear_adds)
            .bind(tx_id)
            .bind(source)
            .execute(&mut *tx)
            .await?;

        let insert_deletes = format!(
            "INSERT INTO membership_tx_operations \
             (source_id, subject_id, property, object_id, start_time, end_time, tx_id, operation, force_flag) \
             SELECT m.source_id, m.subject_id, m.property, m.object_id, m.start_time, {p1}, {p2}, 'D', NULL \
             FROM membership m \
             WHERE m.source_id = {p3} AND m.end_time = {p4} \
               AND NOT EXISTS ( \
                 SELECT 1 FROM membership_tx_operations s \
                 WHERE s.operation = 'D' AND s.source_id = m.source_id AND s.subject_id = m.subject_id \
                   AND s.property = m.property AND s.object_id = m.object_id \
               )",
            p1 = dialect.ts_param(1),
            p2 = dialect.param(2),
            p3 = dialect.param(3),
            p4 = dialect.ts_param(4),
        );
        let affected = sqlx::query(&insert_deletes)
            .bind(fmt_ts(end_time))
            .bind(tx_id)
            .bind(source)
            .bind(fmt_ts(no_end()))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        info!(tx_id, source, rows = affected, "staged source-wide end");
        Ok(())
    }

    /// Force-delete every committed row from `source` whose start or end
    /// time is at or after `after_time` (defaults to [`no_start`] — all
    /// history — when absent).
    pub async fn delete_membership_for_source_after(
        &self,
        tx_id: &str,
        source: &str,
        after_time: Option<DateTime<Utc>>,
    ) -> IndexResult<()> {
        let after = after_time.unwrap_or_else(no_start);
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let clear_adds = format!(
            "DELETE FROM membership_tx_operations \
             WHERE tx_id = {p1} AND source_id = {p2} AND operation = 'A'",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
        );
        sqlx::query(&clear_adds)
            .bind(tx_id)
            .bind(source)
            .execute(&mut *tx)
            .await?;

        let insert_force_deletes = format!(
            "INSERT INTO membership_tx_operations \
             (source_id, subject_id, property, object_id, start_time, end_time, tx_id, operation, force_flag) \
             SELECT m.source_id, m.subject_id, m.property, m.object_id, m.start_time, m.end_time, {p1}, '{op}', '{force}' \
             FROM membership m \
             WHERE m.source_id = {p2} AND (m.start_time >= {p3} OR m.end_time >= {p4})",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
            p3 = dialect.ts_param(3),
            p4 = dialect.ts_param(4),
            op = Operation::Delete.as_db_str(),
            force = ForceFlag::Force.as_db_str().unwrap_or("FORCE"),
        );
        let affected = sqlx::query(&insert_force_deletes)
            .bind(tx_id)
            .bind(source)
            .bind(fmt_ts(after))
            .bind(fmt_ts(after))
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        info!(tx_id, source, %after, rows = affected, "staged force deletes after timestamp");
        Ok(())
    }

    /// Permanently expunge every reference to `target_id`, staged and
    /// committed alike, in one store-transaction.
    pub async fn delete_membership_references(&self, tx_id: &str, target_id: &str) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let clear_staging = format!(
            "DELETE FROM membership_tx_operations \
             WHERE tx_id = {p1} AND (source_id = {p2} OR subject_id = {p2} OR object_id = {p2})",
            p1 = dialect.param(1),
            p2 = dialect.param(2),
        );
        sqlx::query(&clear_staging)
            .bind(tx_id)
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        let clear_committed = format!(
            "DELETE FROM membership \
             WHERE source_id = {p1} OR subject_id = {p1} OR object_id = {p1}",
            p1 = dialect.param(1),
        );
        sqlx::query(&clear_committed)
            .bind(target_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(tx_id, target_id, "expunged all references");
        Ok(())
    }

    /// Drain `tx`'s staging rows into the committed relation: force
    /// deletes, then end-dates, then adds, then purge staging.
    pub async fn commit(&self, tx_id: &str) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;

        let p = dialect.param(1);

        let force_delete = match dialect.platform() {
            crate::platform::Platform::Mysql | crate::platform::Platform::MariaDb => format!(
                "DELETE m FROM membership m \
                 INNER JOIN membership_tx_operations s \
                   ON m.source_id = s.source_id AND m.subject_id = s.subject_id \
                  AND m.property = s.property AND m.object_id = s.object_id \
                 WHERE s.tx_id = {p} AND s.operation = 'D' AND s.force_flag = 'FORCE'"
            ),
            crate::platform::Platform::Postgresql => format!(
                "DELETE FROM membership m USING membership_tx_operations s \
                 WHERE s.tx_id = {p} AND s.operation = 'D' AND s.force_flag = 'FORCE' \
                   AND m.source_id = s.source_id AND m.subject_id = s.subject_id \
                   AND m.property = s.property AND m.object_id = s.object_id"
            ),
            crate::platform::Platform::H2 => format!(
                "DELETE FROM membership m WHERE EXISTS ( \
                   SELECT 1 FROM membership_tx_operations s \
                   WHERE s.tx_id = {p} AND s.operation = 'D' AND s.force_flag = 'FORCE' \
                     AND s.source_id = m.source_id AND s.subject_id = m.subject_id \
                     AND s.property = m.property AND s.object_id = m.object_id \
                 )"
            ),
        };
        let force_deleted = sqlx::query(&force_delete)
            .bind(tx_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        // H2 needs a correlated subquery, PostgreSQL a FROM-style update,
        // MySQL/MariaDB an INNER JOIN UPDATE. Join on all four identity
        // columns exactly once — no duplicate predicate.
        let end_date = match dialect.platform() {
            crate::platform::Platform::Mysql | crate::platform::Platform::MariaDb => format!(
                "UPDATE membership m \
                 INNER JOIN membership_tx_operations s \
                   ON m.source_id = s.source_id AND m.subject_id = s.subject_id \
                  AND m.property = s.property AND m.object_id = s.object_id \
                 SET m.end_time = s.end_time \
                 WHERE s.tx_id = {p} AND s.operation = 'D'"
            ),
            crate::platform::Platform::Postgresql => format!(
                "UPDATE membership m SET end_time = s.end_time \
                 FROM membership_tx_operations s \
                 WHERE s.tx_id = {p} AND s.operation = 'D' \
                   AND m.source_id = s.source_id AND m.subject_id = s.subject_id \
                   AND m.property = s.property AND m.object_id = s.object_id"
            ),
            crate::platform::Platform::H2 => format!(
                "UPDATE membership m SET end_time = ( \
                   SELECT s.end_time FROM membership_tx_operations s \
                   WHERE s.tx_id = {p} AND s.operation = 'D' \
                     AND s.source_id = m.source_id AND s.subject_id = m.subject_id \
                     AND s.property = m.property AND s.object_id = m.object_id \
                 ) \
                 WHERE EXISTS ( \
                   SELECT 1 FROM membership_tx_operations s \
                   WHERE s.tx_id = {p} AND s.operation = 'D' \
                     AND s.source_id = m.source_id AND s.subject_id = m.subject_id \
                     AND s.property = m.property AND s.object_id = m.object_id \
                 )"
            ),
        };
        // H2's statement binds the sentinel tx id twice (subquery + EXISTS guard).
        let mut end_date_query = sqlx::query(&end_date).bind(tx_id);
        if matches!(dialect.platform(), crate::platform::Platform::H2) {
            end_date_query = end_date_query.bind(tx_id);
        }
        let end_dated = end_date_query.execute(&mut *tx).await?.rows_affected();

        let apply_adds = format!(
            "INSERT INTO membership (source_id, subject_id, property, object_id, start_time, end_time) \
             SELECT s.source_id, s.subject_id, s.property, s.object_id, s.start_time, s.end_time \
             FROM membership_tx_operations s \
             WHERE s.tx_id = {p} AND s.operation = 'A' \
               AND NOT EXISTS ( \
                 SELECT 1 FROM membership m \
                 WHERE m.source_id = s.source_id AND m.subject_id = s.subject_id \
                   AND m.property = s.property AND m.object_id = s.object_id \
                   AND m.start_time = s.start_time AND m.end_time = s.end_time \
               )"
        );
        let added = sqlx::query(&apply_adds)
            .bind(tx_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let purge_staging = format!("DELETE FROM membership_tx_operations WHERE tx_id = {p}");
        sqlx::query(&purge_staging).bind(tx_id).execute(&mut *tx).await?;

        tx.commit().await?;
        info!(
            tx_id,
            force_deleted, end_dated, added, "committed transaction"
        );
        Ok(())
    }

    /// Discard every staging row for `tx_id`. No effect on committed rows.
    pub async fn rollback(&self, tx_id: &str) -> IndexResult<()> {
        let dialect = self.backend.dialect();
        let mut tx = self.begin().await?;
        let sql = format!(
            "DELETE FROM membership_tx_operations WHERE tx_id = {p}",
            p = dialect.param(1)
        );
        let rolled_back = sqlx::query(&sql).bind(tx_id).execute(&mut *tx).await?.rows_affected();
        tx.commit().await?;
        info!(tx_id, rows = rolled_back, "rolled back transaction");
        Ok(())
    }

    /// Truncate both relations. Test/administrative only.
    pub async fn clear_index(&self) -> IndexResult<()> {
        let mut tx = self.begin().await?;
        sqlx::query("DELETE FROM membership_tx_operations").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM membership").execute(&mut *tx).await?;
        tx.commit().await?;
        warn!("cleared index (administrative operation)");
        Ok(())
    }

    // ---- 4.2 query operations ---------------------------------------------

    /// The currently-visible set of `(subject, property, object)` triples
    /// for `subject` under `tx_id` (pass [`NO_TRANSACTION`] to see only
    /// committed state). `subject` may be memento-qualified.
    pub async fn get_membership(&self, tx_id: &str, subject: &Id) -> IndexResult<Vec<Triple>> {
        let dialect = self.backend.dialect();
        let base_subject = subject.base_id();
        let pool = self.backend.pool();

        let mut seen = std::collections::HashSet::new();
        let mut results = Vec::new();

        if let Some(instant) = subject.memento_instant() {
            let committed_sql = format!(
                "SELECT m.property, m.object_id FROM membership m \
                 WHERE m.subject_id = {p1} AND m.start_time <= {p2} AND m.end_time > {p2} \
                   AND NOT EXISTS ( \
                     SELECT 1 FROM membership_tx_operations s \
                     WHERE s.tx_id = {p3} AND s.operation = 'D' \
                       AND s.source_id = m.source_id AND s.property = m.property AND s.object_id = m.object_id \
                       AND s.end_time <= {p2} \
                   )",
                p1 = dialect.param(1),
                p2 = dialect.ts_param(2),
                p3 = dialect.param(3),
            );
            let rows = sqlx::query(&committed_sql)
                .bind(base_subject)
                .bind(fmt_ts(instant))
                .bind(tx_id)
                .fetch_all(pool)
                .await?;
            collect(rows, base_subject, &mut seen, &mut results)?;

            let staging_sql = format!(
                "SELECT s.property, s.object_id FROM membership_tx_operations s \
                 WHERE s.tx_id = {p1} AND s.operation = 'A' AND s.subject_id = {p2} \
                   AND s.start_time <= {p3} AND s.end_time > {p3}",
                p1 = dialect.param(1),
                p2 = dialect.param(2),
                p3 = dialect.ts_param(3),
            );
            let rows = sqlx::query(&staging_sql)
                .bind(tx_id)
                .bind(base_subject)
                .bind(fmt_ts(instant))
                .fetch_all(pool)
                .await?;
            collect(rows, base_subject, &mut seen, &mut results)?;
        } else {
            let committed_sql = format!(
                "SELECT m.property, m.object_id FROM membership m \
                 WHERE m.subject_id = {p1} AND m.end_time = {p2} \
                   AND NOT EXISTS ( \
                     SELECT 1 FROM membership_tx_operations s \
                     WHERE s.tx_id = {p3} AND s.operation = 'D' \
                       AND s.source_id = m.source_id AND s.object_id = m.object_id \
                   )",
                p1 = dialect.param(1),
                p2 = dialect.ts_param(2),
                p3 = dialect.param(3),
            );
            let rows = sqlx::query(&committed_sql)
                .bind(base_subject)
                .bind(fmt_ts(no_end()))
                .bind(tx_id)
                .fetch_all(pool)
                .await?;
            collect(rows, base_subject, &mut seen, &mut results)?;

            let staging_sql = format!(
                "SELECT s.property, s.object_id FROM membership_tx_operations s \
                 WHERE s.tx_id = {p1} AND s.operation = 'A' AND s.subject_id = {p2} AND s.end_time = {p3}",
                p1 = dialect.param(1),
                p2 = dialect.param(2),
                p3 = dialect.ts_param(3),
            );
            let rows = sqlx::query(&staging_sql)
                .bind(tx_id)
                .bind(base_subject)
                .bind(fmt_ts(no_end()))
                .fetch_all(pool)
                .await?;
            collect(rows, base_subject, &mut seen, &mut results)?;
        }

        Ok(results)
    }

    // ---- operational logging (tests only) ----------------------------------

    /// Stream the full committed relation to the log sink.
    pub async fn log_membership_table(&self) -> IndexResult<Vec<MembershipRow>> {
        let dialect = self.backend.dialect();
        let sql = format!(
            "SELECT source_id, subject_id, property, object_id, {start} AS start_time, {end} AS end_time \
             FROM membership",
            start = dialect.text_cast("start_time"),
            end = dialect.text_cast("end_time"),
        );
        let rows = sqlx::query(&sql).fetch_all(self.backend.pool()).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let source_id: String = row.try_get("source_id")?;
            let subject_id: String = row.try_get("subject_id")?;
            let property: String = row.try_get("property")?;
            let object_id: String = row.try_get("object_id")?;
            let start_time = parse_ts(&row.try_get::<String, _>("start_time")?)?;
            let end_time = parse_ts(&row.try_get::<String, _>("end_time")?)?;
            info!(source_id, subject_id, property, object_id, "membership row");
            out.push(MembershipRow {
                source_id,
                subject_id,
                property,
                object_id,
                start_time,
                end_time,
            });
        }
        Ok(out)
    }

    /// Stream the full staging relation to the log sink.
    pub async fn log_staging_table(&self) -> IndexResult<Vec<StagingRow>> {
        let dialect = self.backend.dialect();
        let sql = format!(
            "SELECT tx_id, operation, force_flag, source_id, subject_id, property, object_id, \
                    {start} AS start_time, {end} AS end_time \
             FROM membership_tx_operations",
            start = dialect.text_cast("start_time"),
            end = dialect.text_cast("end_time"),
        );
        let rows = sqlx::query(&sql).fetch_all(self.backend.pool()).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let tx_id: String = row.try_get("tx_id")?;
            let operation_raw: String = row.try_get("operation")?;
            let force_flag_raw: Option<String> = row.try_get("force_flag")?;
            let source_id: String = row.try_get("source_id")?;
            let subject_id: String = row.try_get("subject_id")?;
            let property: String = row.try_get("property")?;
            let object_id: String = row.try_get("object_id")?;
            let start_time = parse_ts(&row.try_get::<String, _>("start_time")?)?;
            let end_time = parse_ts(&row.try_get::<String, _>("end_time")?)?;
            let operation = Operation::from_db_str(&operation_raw);
            let force_flag = ForceFlag::from_db_str(force_flag_raw.as_deref());
            info!(
                tx_id,
                operation = operation_raw,
                force = force_flag.is_force(),
                source_id,
                subject_id,
                "staging row"
            );
            out.push(StagingRow {
                source_id,
                subject_id,
                property,
                object_id,
                start_time,
                end_time,
                tx_id,
                operation,
                force_flag,
            });
        }
        Ok(out)
    }
}

fn collect(
    rows: Vec<sqlx::any::AnyRow>,
    subject_base: &str,
    seen: &mut std::collections::HashSet<(String, String)>,
    out: &mut Vec<Triple>,
) -> IndexResult<()> {
    for row in rows {
        let property: String = row.try_get("property")?;
        let object_id: String = row.try_get("object_id")?;
        if seen.insert((property.clone(), object_id.clone())) {
            out.push(Triple::new(subject_base, property, object_id));
        }
    }
    Ok(())
}
