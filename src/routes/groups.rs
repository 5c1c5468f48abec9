use crate::database::{self, groups, posts, Db};
use crate::errors::Error;
use rocket::get;
use rocket::serde::json::{json, Value};

#[get("/group/<slug>?<page>")]
pub async fn group_posts(slug: String, page: Option<&str>, db: Db) -> Result<Value, Error> {
    let number = database::requested_page(page);

    db.run(move |conn| -> Result<Value, Error> {
        let group = groups::find_by_slug(conn, &slug)?.ok_or(Error::NotFound)?;
        let page = posts::by_group(conn, group.id, number)?;
        Ok(json!({ "group": group, "page": page }))
    })
    .await
}
