use crate::models::group::Group;
use crate::schema::{groups, posts};
use diesel::prelude::*;
use diesel::Insertable;

#[derive(Insertable)]
#[diesel(table_name = groups)]
struct NewGroup<'a> {
    title: &'a str,
    slug: &'a str,
    description: &'a str,
}

/// Create a group. Without an explicit slug one is derived from the title.
pub fn create(
    conn: &mut SqliteConnection,
    title: &str,
    slug: Option<&str>,
    description: &str,
) -> QueryResult<Group> {
    let slug = match slug {
        Some(slug) => slug.to_string(),
        None => ::slug::slugify(title),
    };

    diesel::insert_into(groups::table)
        .values(&NewGroup {
            title,
            slug: &slug,
            description,
        })
        .get_result(conn)
}

pub fn find(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Group>> {
    groups::table.find(id).get_result(conn).optional()
}

pub fn find_by_slug(conn: &mut SqliteConnection, slug: &str) -> QueryResult<Option<Group>> {
    groups::table
        .filter(groups::slug.eq(slug))
        .first(conn)
        .optional()
}

pub fn exists(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(groups::table.find(id))).get_result(conn)
}

/// Every group, as choices for the post form.
pub fn all(conn: &mut SqliteConnection) -> QueryResult<Vec<Group>> {
    groups::table.order(groups::title.asc()).load(conn)
}

/// Delete a group. Its posts survive with the group reference cleared.
pub fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<()> {
    conn.transaction(|conn| {
        diesel::update(posts::table.filter(posts::group_id.eq(id)))
            .set(posts::group_id.eq(None::<i32>))
            .execute(conn)?;
        diesel::delete(groups::table.find(id)).execute(conn)?;
        Ok(())
    })
}
