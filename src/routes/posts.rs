use crate::access::{self, Decision};
use crate::auth::Auth;
use crate::cache::PageCache;
use crate::database::{self, comments, groups, posts, users, Db};
use crate::errors::{Error, Errors};
use crate::forms::{CommentForm, NewComment, NewPost, PostForm};
use crate::models::post::Post;
use crate::models::user::User;
use crate::routes::{post_url, FormResponse};
use diesel::SqliteConnection;
use rocket::response::Redirect;
use rocket::serde::json::{json, Json, Value};
use rocket::{get, post, State};
use tracing::debug;

/// Reject a group choice that does not exist.
fn check_group(conn: &mut SqliteConnection, group: Option<i32>) -> Result<(), Error> {
    match group {
        Some(id) if !groups::exists(conn, id)? => {
            Err(Errors::new(&[("group", "invalid_choice")]).into())
        }
        _ => Ok(()),
    }
}

/// Post `post_id` of `username`, or 404 when either is missing or they
/// don't belong together.
fn authored_post(
    conn: &mut SqliteConnection,
    username: &str,
    post_id: i32,
) -> Result<(User, Post), Error> {
    let author = users::find_by_username(conn, username)?.ok_or(Error::NotFound)?;
    let post = posts::find_by_author(conn, author.id, post_id)?.ok_or(Error::NotFound)?;
    Ok((author, post))
}

#[get("/?<page>")]
pub async fn index(page: Option<&str>, cache: &State<PageCache>, db: Db) -> Result<Value, Error> {
    let number = database::requested_page(page);
    if let Some(cached) = cache.get(number) {
        return Ok(cached);
    }

    let page = db.run(move |conn| posts::all(conn, number)).await?;
    let resolved = page.number;
    let rendered = json!({ "page": page });
    cache.insert(resolved, rendered.clone());
    Ok(rendered)
}

#[get("/new")]
pub async fn new_post_form(_auth: Auth, db: Db) -> Result<Value, Error> {
    let groups = db.run(groups::all).await?;
    Ok(json!({
        "mode": "new",
        "form": PostForm::default().render(&groups),
    }))
}

#[post("/new", format = "json", data = "<new_post>")]
pub async fn new_post(auth: Auth, new_post: Json<NewPost>, db: Db) -> Result<Redirect, Error> {
    let data = new_post.into_inner().post.clean()?;

    db.run(move |conn| -> Result<(), Error> {
        check_group(conn, data.group)?;
        posts::create(conn, auth.id, &data.text, data.group, data.image.as_deref())?;
        Ok(())
    })
    .await?;

    Ok(Redirect::to("/"))
}

#[get("/<username>/<post_id>")]
pub async fn post_view(username: String, post_id: i32, db: Db) -> Result<Value, Error> {
    db.run(move |conn| -> Result<Value, Error> {
        let (author, post) = authored_post(conn, &username, post_id)?;
        let group = match post.group_id {
            Some(id) => groups::find(conn, id)?,
            None => None,
        };
        let comments = comments::for_post(conn, post.id)?;
        let posts_count = posts::count_by_author(conn, author.id)?;

        Ok(json!({
            "author": { "username": author.username, "posts_count": posts_count },
            "post": post.attach(&author, group.as_ref()),
            "comments": comments,
            "form": CommentForm::default().render(),
        }))
    })
    .await
}

#[post("/<username>/<post_id>/comment", format = "json", data = "<new_comment>")]
pub async fn add_comment(
    username: String,
    post_id: i32,
    auth: Auth,
    new_comment: Json<NewComment>,
    db: Db,
) -> Result<Redirect, Error> {
    let form = new_comment.into_inner().comment;
    let redirect_to = post_url(&username, post_id);

    db.run(move |conn| -> Result<(), Error> {
        let (_, post) = authored_post(conn, &username, post_id)?;
        match form.clean() {
            Ok(text) => {
                comments::create(conn, post.id, auth.id, &text)?;
            }
            Err(errors) => debug!(?errors, post = post.id, "comment rejected"),
        }
        Ok(())
    })
    .await?;

    Ok(Redirect::to(redirect_to))
}

/// Post `post_id` with its author, looked up by id alone. Edit URLs don't
/// check their username segment; redirects use the author's post URL.
fn post_with_author(conn: &mut SqliteConnection, post_id: i32) -> Result<(User, Post), Error> {
    let post = posts::find_one(conn, post_id)?.ok_or(Error::NotFound)?;
    let author = users::find(conn, post.author)?.ok_or(Error::NotFound)?;
    Ok((author, post))
}

#[get("/<_username>/<post_id>/edit")]
pub async fn post_edit_form(
    _username: &str,
    post_id: i32,
    auth: Auth,
    db: Db,
) -> Result<FormResponse, Error> {
    db.run(move |conn| -> Result<FormResponse, Error> {
        let (author, post) = post_with_author(conn, post_id)?;
        match access::edit_post(auth.id, &post) {
            Decision::Allowed => {}
            Decision::Redirect | Decision::Forbidden => {
                return Ok(FormResponse::Redirect(Redirect::to(post_url(&author.username, post_id))));
            }
        }

        let groups = groups::all(conn)?;
        let form = PostForm::from_post(&post);
        let group = groups.iter().find(|group| Some(group.id) == post.group_id).cloned();
        Ok(FormResponse::Form(json!({
            "mode": "edit",
            "form": form.render(&groups),
            "post": post.attach(&author, group.as_ref()),
        })))
    })
    .await
}

#[post("/<_username>/<post_id>/edit", format = "json", data = "<edit_post>")]
pub async fn post_edit(
    _username: &str,
    post_id: i32,
    auth: Auth,
    edit_post: Json<NewPost>,
    db: Db,
) -> Result<FormResponse, Error> {
    let form = edit_post.into_inner().post;

    db.run(move |conn| -> Result<FormResponse, Error> {
        let (author, post) = post_with_author(conn, post_id)?;
        let redirect = Redirect::to(post_url(&author.username, post_id));
        match access::edit_post(auth.id, &post) {
            Decision::Allowed => {}
            Decision::Redirect | Decision::Forbidden => return Ok(FormResponse::Redirect(redirect)),
        }

        let data = form.clean()?;
        check_group(conn, data.group)?;
        posts::update(conn, post.id, &data.text, data.group, data.image.as_deref())?;
        Ok(FormResponse::Redirect(redirect))
    })
    .await
}

#[get("/follow?<page>")]
pub async fn follow_index(page: Option<&str>, auth: Auth, db: Db) -> Result<Value, Error> {
    let number = database::requested_page(page);
    let page = db.run(move |conn| posts::feed(conn, auth.id, number)).await?;
    Ok(json!({ "page": page }))
}
