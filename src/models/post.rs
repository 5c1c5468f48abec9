use crate::config::DATE_FORMAT;
use crate::models::group::{Group, GroupRef};
use crate::models::user::User;
use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

/// Length of the short representation of a post.
const PREVIEW_CHARS: usize = 15;

#[derive(Queryable, Debug, Clone, PartialEq)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author: i32,
    pub group_id: Option<i32>,
    pub image: Option<String>,
}

impl Post {
    pub fn attach(self, author: &User, group: Option<&Group>) -> PostJson {
        PostJson {
            url: format!("/{}/{}", author.username, self.id),
            id: self.id,
            text: self.text,
            pub_date: self.pub_date.format(DATE_FORMAT).to_string(),
            author: author.username.clone(),
            group: group.map(GroupRef::from),
            image: self.image,
        }
    }

    /// First characters of the text, used wherever a post is named in logs.
    pub fn preview(&self) -> String {
        self.text.chars().take(PREVIEW_CHARS).collect()
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct PostJson {
    pub id: i32,
    pub text: String,
    pub pub_date: String,
    pub author: String,
    pub group: Option<GroupRef>,
    pub image: Option<String>,
    pub url: String,
}
