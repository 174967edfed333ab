use crate::models::{NewSession, User};
use crate::schema::{sessions, users};
use chrono::{Duration, Utc};
use diesel::prelude::*;

use super::crypto::{generate_token, hash_token};

const SESSION_DAYS: i64 = 30;

/// Issue a session for `user_id` and return the bearer token. Sign-in lives
/// in a separate service; this is what it (and the test suite) writes.
pub fn create_session(conn: &mut PgConnection, user_id: i32) -> QueryResult<String> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    diesel::insert_into(sessions::table)
        .values(&NewSession {
            user_id,
            token_hash: &token_hash,
            expires_at: Utc::now() + Duration::days(SESSION_DAYS),
        })
        .execute(conn)?;

    Ok(token)
}

/// The user behind an unexpired session token, if any.
pub fn get_user_from_token(conn: &mut PgConnection, token: &str) -> QueryResult<Option<User>> {
    let token_hash = hash_token(token);

    sessions::table
        .inner_join(users::table)
        .filter(sessions::token_hash.eq(&token_hash))
        .filter(sessions::expires_at.gt(Utc::now()))
        .select(User::as_select())
        .first(conn)
        .optional()
}
