use crate::models::comment::{Comment, CommentJson};
use crate::schema::{comments, users};
use chrono::Utc;
use diesel::prelude::*;
use diesel::Insertable;

#[derive(Insertable)]
#[diesel(table_name = comments)]
struct NewComment<'a> {
    post: i32,
    author: i32,
    text: &'a str,
    created: chrono::NaiveDateTime,
}

pub fn create(conn: &mut SqliteConnection, post: i32, author: i32, text: &str) -> QueryResult<Comment> {
    let new_comment = &NewComment {
        post,
        author,
        text,
        created: Utc::now().naive_utc(),
    };

    diesel::insert_into(comments::table)
        .values(new_comment)
        .get_result(conn)
}

/// Comments of a post, newest first.
pub fn for_post(conn: &mut SqliteConnection, post: i32) -> QueryResult<Vec<CommentJson>> {
    let result = comments::table
        .inner_join(users::table)
        .select((comments::all_columns, users::username))
        .filter(comments::post.eq(post))
        .order((comments::created.desc(), comments::id.desc()))
        .load::<(Comment, String)>(conn)?;

    Ok(result
        .into_iter()
        .map(|(comment, author)| comment.attach(author))
        .collect())
}

pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    comments::table.count().get_result(conn)
}
