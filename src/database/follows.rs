use crate::models::follow::Follow;
use crate::schema::follows;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use tracing::info;

/// Insert a follow row. Returns `false` when the pair already exists.
pub fn create(conn: &mut SqliteConnection, follower: i32, followed: i32) -> QueryResult<bool> {
    let result = diesel::insert_into(follows::table)
        .values(&Follow { follower, followed })
        .execute(conn);

    match result {
        Ok(_) => {
            info!(follower, followed, "follow created");
            Ok(true)
        }
        Err(Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(false),
        Err(err) => Err(err),
    }
}

/// Remove a follow row if present. Returns the number of deleted rows.
pub fn delete(conn: &mut SqliteConnection, follower: i32, followed: i32) -> QueryResult<usize> {
    diesel::delete(follows::table.find((follower, followed))).execute(conn)
}

pub fn exists(conn: &mut SqliteConnection, follower: i32, followed: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(follows::table.find((follower, followed)))).get_result(conn)
}

pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    follows::table.count().get_result(conn)
}

pub fn followers_count(conn: &mut SqliteConnection, author: i32) -> QueryResult<i64> {
    follows::table
        .filter(follows::followed.eq(author))
        .count()
        .get_result(conn)
}

pub fn following_count(conn: &mut SqliteConnection, follower: i32) -> QueryResult<i64> {
    follows::table
        .filter(follows::follower.eq(follower))
        .count()
        .get_result(conn)
}
