use crate::auth::Auth;
use chrono::{Duration, Utc};
use diesel::Queryable;
use serde::Serialize;

type Url = String;

#[derive(Queryable, Serialize, Clone, Debug)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hash: String,
}

#[derive(Serialize)]
pub struct UserAuth<'a> {
    username: &'a str,
    email: &'a str,
    token: String,
}

#[derive(Serialize)]
pub struct Profile {
    pub username: String,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
    pub url: Url,
}

impl User {
    pub fn to_user_auth(&self, secret: &[u8]) -> Result<UserAuth<'_>, jsonwebtoken::errors::Error> {
        let exp = Utc::now() + Duration::days(60); // TODO: move to config
        let token = Auth {
            id: self.id,
            username: self.username.clone(),
            exp: exp.timestamp(),
        }
        .token(secret)?;

        Ok(UserAuth {
            username: &self.username,
            email: &self.email,
            token,
        })
    }
}
