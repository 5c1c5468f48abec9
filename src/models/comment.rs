use crate::config::DATE_FORMAT;
use chrono::NaiveDateTime;
use diesel::Queryable;
use serde::Serialize;

#[derive(Queryable, Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub post: i32,
    pub author: i32,
    pub text: String,
    pub created: NaiveDateTime,
}

impl Comment {
    pub fn attach(self, author: String) -> CommentJson {
        CommentJson {
            id: self.id,
            text: self.text,
            created: self.created.format(DATE_FORMAT).to_string(),
            author,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct CommentJson {
    pub id: i32,
    pub text: String,
    pub created: String,
    pub author: String,
}
