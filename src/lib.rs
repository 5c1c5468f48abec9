#[macro_use]
extern crate diesel;
#[macro_use]
extern crate validator_derive;

use crate::cache::PageCache;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::request::Request;
use rocket::response::Redirect;
use rocket::serde::json::{json, Value};
use rocket::{catch, catchers, routes, Build, Rocket};
use rocket_cors::Cors;

pub mod access;
mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod errors;
pub mod forms;
pub mod models;
mod routes;
mod schema;

pub use auth::Auth;

#[catch(400)]
fn bad_request() -> Value {
    json!({
        "status": "error",
        "reason": "Request could not be understood."
    })
}

/// Protected pages send anonymous visitors to the login page, remembering
/// where they came from.
#[catch(401)]
fn unauthorized(req: &Request<'_>) -> Redirect {
    Redirect::to(format!("/auth/login?login={}", req.uri().path()))
}

#[catch(403)]
fn forbidden() -> Value {
    json!({
        "status": "error",
        "reason": "Action is not allowed."
    })
}

#[catch(404)]
fn not_found(req: &Request<'_>) -> Value {
    json!({
        "status": "error",
        "reason": "Resource was not found.",
        "path": req.uri().path().to_string(),
    })
}

#[catch(422)]
fn unprocessable_entity() -> Value {
    json!({
        "status": "error",
        "reason": "Request body could not be processed."
    })
}

#[catch(500)]
fn internal_error() -> Value {
    json!({
        "status": "error",
        "reason": "Internal server error."
    })
}

fn cors_fairing() -> Cors {
    Cors::from_options(&Default::default()).expect("Cors fairing cannot be created")
}

pub fn rocket() -> Rocket<Build> {
    rocket_with(config::from_env())
}

/// Application assembled on top of an explicit configuration.
pub fn rocket_with(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .mount(
            "/",
            routes![
                routes::posts::index,
                routes::posts::new_post_form,
                routes::posts::new_post,
                routes::posts::follow_index,
                routes::posts::post_view,
                routes::posts::add_comment,
                routes::posts::post_edit_form,
                routes::posts::post_edit,
                routes::groups::group_posts,
                routes::profiles::profile,
                routes::profiles::profile_follow,
                routes::profiles::profile_unfollow,
                routes::users::signup,
                routes::users::login,
                routes::users::login_form,
            ],
        )
        .attach(database::Db::fairing())
        .attach(database::migrations())
        .attach(cors_fairing())
        .attach(config::AppState::manage())
        .attach(AdHoc::on_liftoff("Startup banner", |rocket| {
            Box::pin(async move {
                let cache_ttl = rocket.state::<PageCache>().map(|cache| cache.ttl().as_secs());
                tracing::info!(
                    address = %rocket.config().address,
                    port = rocket.config().port,
                    ?cache_ttl,
                    "yatube is serving"
                );
            })
        }))
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                unprocessable_entity,
                internal_error
            ],
        )
}
