use rocket::response::Redirect;
use rocket::serde::json::Value;
use rocket::Responder;

pub mod groups;
pub mod posts;
pub mod profiles;
pub mod users;

/// A form page, or a redirect away from it.
#[derive(Responder)]
pub enum FormResponse {
    Form(Value),
    Redirect(Redirect),
}

pub fn post_url(username: &str, post_id: i32) -> String {
    format!("/{}/{}", username, post_id)
}

pub fn profile_url(username: &str) -> String {
    format!("/{}", username)
}
