//! SQL the Diesel DSL has no builder for: window counts, float averages and
//! transaction-scoped settings.
//!
//! Nothing in here takes client input. The only formatted values are the
//! integer timeouts derived from server configuration.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Double, Nullable};

/// `COUNT(*) OVER()`: rows matching the filter, ignoring LIMIT and OFFSET.
pub fn count_over() -> SqlLiteral<BigInt> {
    sql::<BigInt>("COUNT(*) OVER()")
}

/// `AVG(reviews.rating)` as a float; `NULL` when the recipe has no reviews.
///
/// Diesel's `avg` on an integer column yields `Numeric`; the read model wants
/// a plain float.
pub fn average_rating() -> SqlLiteral<Nullable<Double>> {
    sql::<Nullable<Double>>("AVG(reviews.rating)::float8")
}

/// Bound the current transaction with `statement_timeout` and `lock_timeout`.
///
/// `SET LOCAL` only lasts until the enclosing transaction ends, so this must
/// be called inside one. Postgres does not accept bind parameters in `SET`,
/// hence the formatting.
///
/// # Safety
/// `millis` is a `u64`; nothing but digits reaches the statement.
pub fn set_local_timeouts(conn: &mut PgConnection, millis: u64) -> QueryResult<()> {
    // 0 disables the timeout in Postgres; the smallest real budget is 1ms.
    let millis = millis.max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {millis}")).execute(conn)?;
    diesel::sql_query(format!("SET LOCAL lock_timeout = {millis}")).execute(conn)?;
    Ok(())
}
