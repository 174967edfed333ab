//! Time budget of one recipe write.
//!
//! Postgres `statement_timeout` bounds a single statement, so the budget is
//! re-applied with what is left before every statement of the write. A
//! statement started at `t` can then run until the deadline and no further.

use crate::error::AppError;
use crate::raw_sql::set_local_timeouts;
use diesel::PgConnection;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct WriteDeadline {
    started: Instant,
    budget: Duration,
}

impl WriteDeadline {
    pub fn start(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn remaining(&self) -> Result<Duration, AppError> {
        self.budget
            .checked_sub(self.started.elapsed())
            .filter(|left| !left.is_zero())
            .ok_or(AppError::Timeout)
    }

    /// Fail if the budget is spent, otherwise cap the next statement by what
    /// is left. Must run inside the write's transaction.
    pub fn check(&self, conn: &mut PgConnection, stage: &'static str) -> Result<(), AppError> {
        let left = self.remaining().inspect_err(|_| {
            tracing::warn!(
                stage,
                budget_ms = self.budget.as_millis() as u64,
                "recipe write ran out of time"
            );
        })?;
        // Round up so a sub-millisecond remainder is not sent as 0 (no limit).
        let millis = left.as_micros().div_ceil(1000) as u64;
        set_local_timeouts(conn, millis)?;
        Ok(())
    }
}
