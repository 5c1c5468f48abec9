//! Helpers shared by the API tests.

#![allow(dead_code)]

use rocket::figment::util::map;
use rocket::figment::value::{Map, Value as ConfigValue};
use rocket::http::{ContentType, Header, Status};
use rocket::local::asynchronous::{Client, LocalResponse};
use rocket::serde::json::{json, Value};
use tempfile::TempDir;
use yatube::database::{comments, follows, groups, posts, Db};
use yatube::models::group::Group;

pub const PASSWORD: &str = "smoketest";

/// Client bound to a fresh database file that lives as long as the app.
pub struct TestApp {
    pub client: Client,
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_ttl(20).await
}

pub async fn spawn_app_with_ttl(index_cache_ttl: u64) -> TestApp {
    let dir = tempfile::tempdir().expect("temporary directory");
    let url = dir.path().join("yatube.sqlite").to_string_lossy().into_owned();

    let database: Map<_, ConfigValue> = map! {
        "url" => url.into(),
        "pool_size" => 1.into()
    };

    let figment = rocket::Config::figment()
        .merge(("databases", map!["yatube" => database]))
        .merge(("jwt_secret", "integration-test-secret"))
        .merge(("index_cache_ttl", index_cache_ttl))
        .merge(("log_level", "off"));

    let client = Client::tracked(yatube::rocket_with(figment))
        .await
        .expect("valid rocket instance");

    TestApp { client, _dir: dir }
}

pub fn token_header(token: &str) -> Header<'static> {
    Header::new("authorization", format!("Token {}", token))
}

/// Register a user and return their token.
pub async fn register(client: &Client, username: &str) -> String {
    let response = client
        .post("/auth/signup")
        .header(ContentType::JSON)
        .body(
            json!({
                "user": {
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": PASSWORD,
                }
            })
            .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body = response_json(response).await;
    body["user"]["token"]
        .as_str()
        .expect("token in signup response")
        .to_string()
}

pub async fn response_json(response: LocalResponse<'_>) -> Value {
    let body = response.into_string().await.expect("response body");
    serde_json::from_str(&body).expect("json response")
}

pub fn location<'a>(response: &'a LocalResponse<'_>) -> Option<&'a str> {
    response.headers().get_one("Location")
}

/// Publish a post through the API.
pub async fn create_post(client: &Client, token: &str, text: &str, group: Option<i32>) {
    let response = client
        .post("/new")
        .header(ContentType::JSON)
        .header(token_header(token))
        .body(json!({ "post": { "text": text, "group": group } }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
}

async fn db(client: &Client) -> Db {
    Db::get_one(client.rocket())
        .await
        .expect("database connection")
}

/// Groups have no public endpoint, so they are created directly.
pub async fn create_group(client: &Client, title: &str, slug: &str) -> Group {
    let (title, slug) = (title.to_string(), slug.to_string());
    db(client)
        .await
        .run(move |conn| groups::create(conn, &title, Some(&slug), "A group for tests"))
        .await
        .expect("group created")
}

pub async fn delete_group(client: &Client, id: i32) {
    db(client)
        .await
        .run(move |conn| groups::delete(conn, id))
        .await
        .expect("group deleted");
}

pub async fn post_count(client: &Client) -> i64 {
    db(client).await.run(posts::count).await.expect("post count")
}

pub async fn comment_count(client: &Client) -> i64 {
    db(client).await.run(comments::count).await.expect("comment count")
}

pub async fn follow_count(client: &Client) -> i64 {
    db(client).await.run(follows::count).await.expect("follow count")
}
