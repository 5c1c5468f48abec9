use crate::models::user::User;
use crate::schema::{comments, follows, posts, users};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error};
use diesel::Insertable;
use rand::rngs::OsRng;
use scrypt::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use scrypt::Scrypt;
use tracing::info;

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub hash: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum UserCreationError {
    #[error("username is already taken")]
    DuplicatedUsername,
    #[error("email is already registered")]
    DuplicatedEmail,
    #[error("password could not be hashed")]
    Hashing,
    #[error(transparent)]
    Database(Error),
}

impl From<Error> for UserCreationError {
    fn from(err: Error) -> UserCreationError {
        if let Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &err {
            // sqlite names the offending column instead of the constraint
            let message = info.message();
            if message.contains("users.username") {
                return UserCreationError::DuplicatedUsername;
            }
            if message.contains("users.email") {
                return UserCreationError::DuplicatedEmail;
            }
        }
        UserCreationError::Database(err)
    }
}

pub fn create(
    conn: &mut SqliteConnection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, UserCreationError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| UserCreationError::Hashing)?
        .to_string();

    let new_user = &NewUser {
        username,
        email,
        hash: &hash,
    };

    let user = diesel::insert_into(users::table)
        .values(new_user)
        .get_result::<User>(conn)?;
    info!(user = user.id, username = %user.username, "user registered");
    Ok(user)
}

pub fn login(conn: &mut SqliteConnection, username: &str, password: &str) -> QueryResult<Option<User>> {
    let user = match users::table
        .filter(users::username.eq(username))
        .first::<User>(conn)
        .optional()?
    {
        Some(user) => user,
        None => return Ok(None),
    };

    let password_matches = PasswordHash::new(&user.hash)
        .map(|parsed_hash| {
            Scrypt
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .unwrap_or(false);

    Ok(password_matches.then_some(user))
}

pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<User>> {
    users::table.find(id).get_result(conn).optional()
}

pub fn find_by_username(conn: &mut SqliteConnection, username: &str) -> QueryResult<Option<User>> {
    users::table
        .filter(users::username.eq(username))
        .first(conn)
        .optional()
}

/// Delete a user along with their posts, the comments on those posts,
/// their own comments and every follow they take part in.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<()> {
    conn.transaction(|conn| {
        let own_posts = posts::table.filter(posts::author.eq(id)).select(posts::id);
        diesel::delete(comments::table.filter(comments::post.eq_any(own_posts))).execute(conn)?;
        diesel::delete(comments::table.filter(comments::author.eq(id))).execute(conn)?;
        diesel::delete(
            follows::table.filter(follows::follower.eq(id).or(follows::followed.eq(id))),
        )
        .execute(conn)?;
        diesel::delete(posts::table.filter(posts::author.eq(id))).execute(conn)?;
        diesel::delete(users::table.find(id)).execute(conn)?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_connection;

    #[test]
    fn login_checks_password() {
        let conn = &mut test_connection();
        let user = create(conn, "leo", "leo@example.com", "password123").unwrap();

        let logged_in = login(conn, "leo", "password123").unwrap();
        assert_eq!(logged_in.map(|user| user.id), Some(user.id));
        assert!(login(conn, "leo", "wrong-password").unwrap().is_none());
        assert!(login(conn, "nobody", "password123").unwrap().is_none());
    }

    #[test]
    fn duplicates_are_reported_per_field() {
        let conn = &mut test_connection();
        create(conn, "leo", "leo@example.com", "password123").unwrap();

        assert!(matches!(
            create(conn, "leo", "other@example.com", "password123"),
            Err(UserCreationError::DuplicatedUsername)
        ));
        assert!(matches!(
            create(conn, "other", "leo@example.com", "password123"),
            Err(UserCreationError::DuplicatedEmail)
        ));
    }

    #[test]
    fn lookup_by_username() {
        let conn = &mut test_connection();
        let user = create(conn, "leo", "leo@example.com", "password123").unwrap();

        assert_eq!(find_by_username(conn, "leo").unwrap().map(|u| u.id), Some(user.id));
        assert_eq!(find(conn, user.id).unwrap().map(|u| u.username), Some("leo".to_string()));
        assert!(find_by_username(conn, "nobody").unwrap().is_none());
    }
}
