use crate::database::{Page, Paginate};
use crate::models::group::Group;
use crate::models::post::{Post, PostJson};
use crate::models::user::User;
use crate::schema::{comments, follows, groups, posts, users};
use chrono::Utc;
use diesel::prelude::*;
use diesel::Insertable;
use std::collections::HashMap;
use tracing::info;

#[derive(Insertable)]
#[diesel(table_name = posts)]
struct NewPost<'a> {
    text: &'a str,
    pub_date: chrono::NaiveDateTime,
    author: i32,
    group_id: Option<i32>,
    image: Option<&'a str>,
}

pub fn create(
    conn: &mut SqliteConnection,
    author: i32,
    text: &str,
    group: Option<i32>,
    image: Option<&str>,
) -> QueryResult<Post> {
    let new_post = &NewPost {
        text,
        pub_date: Utc::now().naive_utc(),
        author,
        group_id: group,
        image,
    };

    let post = diesel::insert_into(posts::table)
        .values(new_post)
        .get_result::<Post>(conn)?;
    info!(post = post.id, author, text = %post.preview(), "post published");
    Ok(post)
}

pub fn find_one(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Post>> {
    posts::table.find(id).get_result(conn).optional()
}

/// Post `id` when it was written by `author`.
pub fn find_by_author(conn: &mut SqliteConnection, author: i32, id: i32) -> QueryResult<Option<Post>> {
    posts::table
        .find(id)
        .filter(posts::author.eq(author))
        .get_result(conn)
        .optional()
}

/// Replace text and group of a post. The image is only replaced when a new
/// one is given.
pub fn update(
    conn: &mut SqliteConnection,
    id: i32,
    text: &str,
    group: Option<i32>,
    image: Option<&str>,
) -> QueryResult<Post> {
    let target = posts::table.find(id);
    match image {
        Some(image) => diesel::update(target)
            .set((
                posts::text.eq(text),
                posts::group_id.eq(group),
                posts::image.eq(image),
            ))
            .get_result(conn),
        None => diesel::update(target)
            .set((posts::text.eq(text), posts::group_id.eq(group)))
            .get_result(conn),
    }
}

/// Delete a post together with its comments.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<()> {
    conn.transaction(|conn| {
        diesel::delete(comments::table.filter(comments::post.eq(id))).execute(conn)?;
        diesel::delete(posts::table.find(id)).execute(conn)?;
        Ok(())
    })
}

pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
    posts::table.count().get_result(conn)
}

pub fn count_by_author(conn: &mut SqliteConnection, author: i32) -> QueryResult<i64> {
    posts::table
        .filter(posts::author.eq(author))
        .count()
        .get_result(conn)
}

/// Every post, newest first.
pub fn all(conn: &mut SqliteConnection, page: i64) -> QueryResult<Page<PostJson>> {
    let result: Page<Post> = posts::table
        .order((posts::pub_date.desc(), posts::id.desc()))
        .paginate(page)
        .load_page(conn)?;
    with_relations(conn, result)
}

pub fn by_group(conn: &mut SqliteConnection, group: i32, page: i64) -> QueryResult<Page<PostJson>> {
    let result: Page<Post> = posts::table
        .filter(posts::group_id.eq(group))
        .order((posts::pub_date.desc(), posts::id.desc()))
        .paginate(page)
        .load_page(conn)?;
    with_relations(conn, result)
}

pub fn by_author(conn: &mut SqliteConnection, author: i32, page: i64) -> QueryResult<Page<PostJson>> {
    let result: Page<Post> = posts::table
        .filter(posts::author.eq(author))
        .order((posts::pub_date.desc(), posts::id.desc()))
        .paginate(page)
        .load_page(conn)?;
    with_relations(conn, result)
}

/// Posts of every author `follower` follows.
pub fn feed(conn: &mut SqliteConnection, follower: i32, page: i64) -> QueryResult<Page<PostJson>> {
    let followed = follows::table
        .filter(follows::follower.eq(follower))
        .select(follows::followed);

    let result: Page<Post> = posts::table
        .filter(posts::author.eq_any(followed))
        .order((posts::pub_date.desc(), posts::id.desc()))
        .paginate(page)
        .load_page(conn)?;
    with_relations(conn, result)
}

fn with_relations(conn: &mut SqliteConnection, page: Page<Post>) -> QueryResult<Page<PostJson>> {
    let author_ids: Vec<i32> = page.items.iter().map(|post| post.author).collect();
    let group_ids: Vec<i32> = page.items.iter().filter_map(|post| post.group_id).collect();

    let authors: HashMap<i32, User> = users::table
        .filter(users::id.eq_any(author_ids))
        .load::<User>(conn)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();
    let groups: HashMap<i32, Group> = groups::table
        .filter(groups::id.eq_any(group_ids))
        .load::<Group>(conn)?
        .into_iter()
        .map(|group| (group.id, group))
        .collect();

    page.try_map(|post| {
        let author = authors
            .get(&post.author)
            .ok_or(diesel::result::Error::NotFound)?;
        let group = post.group_id.and_then(|id| groups.get(&id));
        Ok(post.attach(author, group))
    })
}
