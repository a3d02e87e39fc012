//! Table status reconciliation.
//!
//! A table's `status` column is a cache. The reservations are the source of
//! truth, and this module recomputes the cache from them:
//!
//! - a `free` or `occupied` table with an active reservation today covering
//!   the current time becomes `reserved`
//! - a `reserved` table with no active reservation today ending at or after
//!   the current time becomes `free`
//!
//! Running the sweep twice in a row changes nothing the second time. A
//! booking that lands between two sweeps leaves the cache stale for at most
//! one interval; it never affects conflict detection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDateTime};

use crate::clock::{ClockTime, ServiceDate, TimeRange};
use crate::config::{Config, DEFAULT_RECONCILE_INTERVAL_SECONDS};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::reservation::ReservationId;
use crate::table::{RestaurantId, Table, TableId, TableStatus};

/// How often a sleeping job checks its stop flag.
const STOP_POLL: Duration = Duration::from_millis(200);

/// Options for a reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Only reconcile tables of this restaurant.
    pub restaurant_id: Option<RestaurantId>,
    /// Complete active reservations that have already ended first.
    pub complete_elapsed: bool,
    /// Report changes without writing them.
    pub dry_run: bool,
}

impl ReconcileOptions {
    /// Creates options for a full sweep without completion.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options taken from the `reconcile` section of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let complete_elapsed = config
            .reconcile
            .as_ref()
            .and_then(|r| r.complete_elapsed)
            .unwrap_or(false);
        Self {
            complete_elapsed,
            ..Self::default()
        }
    }

    /// Restricts the sweep to one restaurant.
    #[must_use]
    pub const fn with_restaurant(mut self, restaurant_id: Option<RestaurantId>) -> Self {
        self.restaurant_id = restaurant_id;
        self
    }

    /// Sets whether elapsed reservations are completed.
    #[must_use]
    pub const fn with_complete_elapsed(mut self, complete: bool) -> Self {
        self.complete_elapsed = complete;
        self
    }

    /// Sets dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// One table whose cached status changed (or would change).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    /// Table identifier.
    pub table_id: TableId,
    /// Table number.
    pub number: u32,
    /// Status before the sweep.
    pub from: TableStatus,
    /// Status after the sweep.
    pub to: TableStatus,
}

/// Result of a reconciliation sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileResult {
    /// Tables whose status changed.
    pub changes: Vec<StatusChange>,
    /// Reservations moved to completed by the elapsed sweep.
    pub completed: Vec<ReservationId>,
    /// Number of tables examined.
    pub tables_checked: usize,
    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl ReconcileResult {
    /// Whether the sweep changed anything.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.changes.is_empty() && self.completed.is_empty()
    }
}

/// Reconciliation operations. All methods are static and take the store
/// explicitly.
pub struct ReconcileOperations;

impl ReconcileOperations {
    /// The status a table should have given today's active reservations on it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tablebook::operations::ReconcileOperations;
    /// use tablebook::{ClockTime, TableStatus, TimeRange};
    ///
    /// let dinner = TimeRange::new("18:00".parse().unwrap(), "20:00".parse().unwrap()).unwrap();
    /// let at = |s: &str| -> ClockTime { s.parse().unwrap() };
    ///
    /// assert_eq!(ReconcileOperations::desired_status(TableStatus::Free, &[dinner], at("19:00")), TableStatus::Reserved);
    /// assert_eq!(ReconcileOperations::desired_status(TableStatus::Free, &[dinner], at("17:00")), TableStatus::Free);
    /// assert_eq!(ReconcileOperations::desired_status(TableStatus::Reserved, &[dinner], at("17:00")), TableStatus::Reserved);
    /// assert_eq!(ReconcileOperations::desired_status(TableStatus::Reserved, &[dinner], at("20:01")), TableStatus::Free);
    /// ```
    #[must_use]
    pub fn desired_status(
        current: TableStatus,
        todays_active: &[TimeRange],
        now: ClockTime,
    ) -> TableStatus {
        match current {
            TableStatus::Free | TableStatus::Occupied
                if todays_active.iter().any(|r| r.covers_instant(now)) =>
            {
                TableStatus::Reserved
            }
            TableStatus::Reserved if todays_active.iter().all(|r| r.end() < now) => {
                TableStatus::Free
            }
            other => other,
        }
    }

    /// Runs one reconciliation sweep for wall-clock time `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if a store read or write fails. With
    /// `complete_elapsed` set, completions are committed before table
    /// statuses are written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tablebook::database::{Database, DatabaseConfig};
    /// use tablebook::operations::{ReconcileOperations, ReconcileOptions};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
    /// let now = chrono::Local::now().naive_local();
    /// let result = ReconcileOperations::reconcile_statuses(&mut db, now, &ReconcileOptions::new()).unwrap();
    /// println!("{} table(s) changed", result.changes.len());
    /// ```
    pub fn reconcile_statuses(
        db: &mut Database,
        now: NaiveDateTime,
        options: &ReconcileOptions,
    ) -> Result<ReconcileResult> {
        let today = ServiceDate::from(now.date());
        let now_time = ClockTime::from_naive(now.time());

        let tables = match options.restaurant_id {
            Some(id) => {
                db.require_restaurant(id)?;
                db.list_tables(id)?
            }
            None => db.list_all_tables()?,
        };
        let ids: Vec<TableId> = tables.iter().map(|t| t.id).collect();

        let mut completed = Vec::new();
        if options.complete_elapsed {
            let in_scope: HashSet<TableId> = ids.iter().copied().collect();
            completed = db
                .find_elapsed_active(now)?
                .into_iter()
                .filter(|r| in_scope.contains(&r.table_id()))
                .map(|r| r.id())
                .collect();
            if !options.dry_run && !completed.is_empty() {
                let changed = db.complete_reservations(&completed)?;
                log::info!("completed {changed} elapsed reservation(s)");
            }
        }

        let mut by_table: HashMap<TableId, Vec<TimeRange>> = HashMap::new();
        for interval in db.list_active_reservations(&ids, today)? {
            by_table.entry(interval.table_id).or_default().push(interval.range);
        }

        let changes = Self::diff(&tables, &by_table, now_time);

        if !options.dry_run && !changes.is_empty() {
            let updates: Vec<(TableId, TableStatus)> =
                changes.iter().map(|c| (c.table_id, c.to)).collect();
            db.apply_table_statuses(&updates)?;
        }

        for change in &changes {
            log::debug!("table {}: {} -> {}", change.number, change.from, change.to);
        }
        log::info!(
            "reconciled {} table(s) at {today} {now_time}: {} change(s)",
            tables.len(),
            changes.len()
        );

        Ok(ReconcileResult {
            changes,
            completed,
            tables_checked: tables.len(),
            dry_run: options.dry_run,
        })
    }

    /// Recomputes a single table's status, as the booking and cancellation
    /// flows do after they write.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the table does not exist, or a store error.
    pub fn sync_table(
        db: &mut Database,
        table_id: TableId,
        now: NaiveDateTime,
    ) -> Result<Option<StatusChange>> {
        let table = db.get_table(table_id)?.ok_or_else(|| Error::NotFound {
            resource: format!("table {table_id}"),
        })?;

        let today = ServiceDate::from(now.date());
        let ranges: Vec<TimeRange> = db
            .list_active_reservations(&[table_id], today)?
            .into_iter()
            .map(|i| i.range)
            .collect();

        let to = Self::desired_status(table.status, &ranges, ClockTime::from_naive(now.time()));
        if to == table.status {
            return Ok(None);
        }

        db.set_table_status(table_id, to)?;
        log::debug!("table {}: {} -> {to}", table.number, table.status);
        Ok(Some(StatusChange {
            table_id,
            number: table.number,
            from: table.status,
            to,
        }))
    }

    fn diff(
        tables: &[Table],
        by_table: &HashMap<TableId, Vec<TimeRange>>,
        now: ClockTime,
    ) -> Vec<StatusChange> {
        tables
            .iter()
            .filter_map(|table| {
                let ranges = by_table.get(&table.id).map_or(&[][..], Vec::as_slice);
                let to = Self::desired_status(table.status, ranges, now);
                (to != table.status).then_some(StatusChange {
                    table_id: table.id,
                    number: table.number,
                    from: table.status,
                    to,
                })
            })
            .collect()
    }
}

/// Runs reconciliation on a fixed interval until stopped.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tablebook::database::{Database, DatabaseConfig};
/// use tablebook::operations::{ReconcileJob, ReconcileOptions};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/tablebook.db")).unwrap();
/// let job = ReconcileJob::new(Duration::from_secs(300), ReconcileOptions::new());
/// let stop = job.stop_handle();
/// std::thread::spawn(move || {
///     std::thread::sleep(Duration::from_secs(900));
///     stop.store(true, std::sync::atomic::Ordering::SeqCst);
/// });
/// job.run(&mut db, |result| println!("{} change(s)", result.changes.len())).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ReconcileJob {
    interval: Duration,
    options: ReconcileOptions,
    stop: Arc<AtomicBool>,
}

impl ReconcileJob {
    /// Creates a job that sweeps every `interval`.
    #[must_use]
    pub fn new(interval: Duration, options: ReconcileOptions) -> Self {
        Self {
            interval,
            options,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a job from the `reconcile` section of a configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let seconds = config
            .reconcile
            .as_ref()
            .map_or(DEFAULT_RECONCILE_INTERVAL_SECONDS, |r| {
                r.interval_seconds_or_default()
            });
        Self::new(
            Duration::from_secs(seconds),
            ReconcileOptions::from_config(config),
        )
    }

    /// The sweep interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// The options each sweep runs with.
    #[must_use]
    pub const fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// A flag that ends [`ReconcileJob::run`] once set.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs one sweep at the current local time.
    ///
    /// # Errors
    ///
    /// Returns an error if the sweep fails.
    pub fn run_once(&self, db: &mut Database) -> Result<ReconcileResult> {
        ReconcileOperations::reconcile_statuses(db, Local::now().naive_local(), &self.options)
    }

    /// Sweeps immediately and then once per interval until the stop flag is
    /// set, passing each result to `on_sweep`.
    ///
    /// A sweep that fails with a transient store error is logged and retried
    /// at the next tick. Returns the number of sweeps that ran.
    ///
    /// # Errors
    ///
    /// Returns the first non-transient error.
    pub fn run<F>(&self, db: &mut Database, mut on_sweep: F) -> Result<usize>
    where
        F: FnMut(&ReconcileResult),
    {
        let mut sweeps = 0;
        while !self.stop.load(Ordering::SeqCst) {
            match self.run_once(db) {
                Ok(result) => on_sweep(&result),
                Err(e) if e.is_transient() => log::warn!("reconciliation skipped: {e}"),
                Err(e) => return Err(e),
            }
            sweeps += 1;
            self.sleep_interval();
        }
        Ok(sweeps)
    }

    fn sleep_interval(&self) {
        let deadline = Instant::now() + self.interval;
        while !self.stop.load(Ordering::SeqCst) {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep(STOP_POLL.min(deadline - now));
        }
    }
}
