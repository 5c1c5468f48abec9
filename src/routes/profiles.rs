use crate::access::{self, Decision};
use crate::auth::Auth;
use crate::database::{self, follows, posts, users, Db};
use crate::errors::Error;
use crate::models::user::Profile;
use crate::routes::profile_url;
use rocket::get;
use rocket::response::Redirect;
use rocket::serde::json::{json, Value};

#[get("/<username>?<page>")]
pub async fn profile(
    username: String,
    page: Option<&str>,
    viewer: Option<Auth>,
    db: Db,
) -> Result<Value, Error> {
    let number = database::requested_page(page);
    let viewer = viewer.map(|auth| auth.id);

    db.run(move |conn| -> Result<Value, Error> {
        let author = users::find_by_username(conn, &username)?.ok_or(Error::NotFound)?;
        let page = posts::by_author(conn, author.id, number)?;
        let following = match viewer {
            Some(viewer) => follows::exists(conn, viewer, author.id)?,
            None => false,
        };

        let profile = Profile {
            url: profile_url(&author.username),
            posts_count: page.count,
            followers_count: follows::followers_count(conn, author.id)?,
            following_count: follows::following_count(conn, author.id)?,
            username: author.username,
        };

        Ok(json!({
            "author": profile,
            "following": following,
            "page": page,
        }))
    })
    .await
}

#[get("/<username>/follow")]
pub async fn profile_follow(username: String, auth: Auth, db: Db) -> Result<Redirect, Error> {
    let redirect_to = profile_url(&username);

    db.run(move |conn| -> Result<(), Error> {
        let author = users::find_by_username(conn, &username)?.ok_or(Error::NotFound)?;
        let already_following = follows::exists(conn, auth.id, author.id)?;

        match access::follow(auth.id, author.id, already_following) {
            Decision::Allowed => {}
            Decision::Forbidden | Decision::Redirect => return Err(Error::Forbidden),
        }

        // the primary key still rejects a concurrent duplicate
        if !follows::create(conn, auth.id, author.id)? {
            return Err(Error::Forbidden);
        }
        Ok(())
    })
    .await?;

    Ok(Redirect::to(redirect_to))
}

#[get("/<username>/unfollow")]
pub async fn profile_unfollow(username: String, auth: Auth, db: Db) -> Result<Redirect, Error> {
    let redirect_to = profile_url(&username);

    db.run(move |conn| -> Result<(), Error> {
        let author = users::find_by_username(conn, &username)?.ok_or(Error::NotFound)?;
        follows::delete(conn, auth.id, author.id)?;
        Ok(())
    })
    .await?;

    Ok(Redirect::to(redirect_to))
}
