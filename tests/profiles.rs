//! Profiles, follows and the personal feed.

mod common;

use common::*;
use rocket::http::{ContentType, Status};
use rocket::serde::json::json;

#[rocket::async_test]
async fn test_profile() {
    let app = spawn_app().await;
    let client = &app.client;
    let token = register(client, "leo").await;
    create_post(client, &token, "Hello", None).await;

    let response = client.get("/leo").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    let body = response_json(response).await;
    assert_eq!(body["author"]["username"], "leo");
    assert_eq!(body["author"]["posts_count"], 1);
    assert_eq!(body["following"], false);
    assert_eq!(body["page"]["items"][0]["text"], "Hello");

    let response = client.get("/nobody").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_follow_and_unfollow() {
    let app = spawn_app().await;
    let client = &app.client;
    register(client, "author").await;
    let reader = register(client, "reader").await;

    let response = client
        .get("/author/follow")
        .header(token_header(&reader))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response), Some("/author"));
    assert_eq!(follow_count(client).await, 1);

    let body = response_json(
        client
            .get("/author")
            .header(token_header(&reader))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(body["following"], true);
    assert_eq!(body["author"]["followers_count"], 1);

    let response = client
        .get("/author/follow")
        .header(token_header(&reader))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    assert_eq!(follow_count(client).await, 1);

    for _ in 0..2 {
        let response = client
            .get("/author/unfollow")
            .header(token_header(&reader))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(location(&response), Some("/author"));
    }
    assert_eq!(follow_count(client).await, 0);
}

#[rocket::async_test]
async fn test_cannot_follow_self() {
    let app = spawn_app().await;
    let client = &app.client;
    let token = register(client, "leo").await;

    let response = client
        .get("/leo/follow")
        .header(token_header(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Forbidden);
    assert_eq!(follow_count(client).await, 0);
}

#[rocket::async_test]
async fn test_follow_requires_login() {
    let app = spawn_app().await;
    let client = &app.client;
    register(client, "author").await;

    let response = client.get("/author/follow").dispatch().await;
    assert_eq!(response.status(), Status::SeeOther);
    assert_eq!(location(&response), Some("/auth/login?login=/author/follow"));
    assert_eq!(follow_count(client).await, 0);

    let token = register(client, "reader").await;
    let response = client
        .get("/nobody/follow")
        .header(token_header(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_feed() {
    let app = spawn_app().await;
    let client = &app.client;
    let author = register(client, "author").await;
    let stranger = register(client, "stranger").await;
    let reader = register(client, "reader").await;
    create_post(client, &author, "Followed post", None).await;
    create_post(client, &stranger, "Unfollowed post", None).await;

    let body = response_json(
        client
            .get("/follow")
            .header(token_header(&reader))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(body["page"]["count"], 0);

    client
        .get("/author/follow")
        .header(token_header(&reader))
        .dispatch()
        .await;

    let body = response_json(
        client
            .get("/follow")
            .header(token_header(&reader))
            .dispatch()
            .await,
    )
    .await;
    assert_eq!(body["page"]["count"], 1);
    assert_eq!(body["page"]["items"][0]["text"], "Followed post");

    let response = client.get("/follow").dispatch().await;
    assert_eq!(response.status(), Status::SeeOther);
}

#[rocket::async_test]
async fn test_signup_and_login() {
    let app = spawn_app().await;
    let client = &app.client;
    register(client, "leo").await;

    let response = client
        .post("/auth/signup")
        .header(ContentType::JSON)
        .body(
            json!({ "user": { "username": "leo", "email": "other@example.com", "password": PASSWORD } })
                .to_string(),
        )
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response_json(response).await;
    assert_eq!(body["errors"]["username"][0], "has already been taken");

    let response = client
        .post("/auth/signup")
        .header(ContentType::JSON)
        .body(json!({ "user": { "username": "bad name", "email": "bad", "password": "short" } }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
    let body = response_json(response).await;
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());

    let response = client
        .post("/auth/login")
        .header(ContentType::JSON)
        .body(json!({ "user": { "username": "leo", "password": PASSWORD } }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let body = response_json(response).await;
    let token = body["user"]["token"].as_str().unwrap().to_string();

    let response = client
        .get("/new")
        .header(token_header(&token))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post("/auth/login")
        .header(ContentType::JSON)
        .body(json!({ "user": { "username": "leo", "password": "wrong-password" } }).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::UnprocessableEntity);
}

#[rocket::async_test]
async fn test_login_form_remembers_next_page() {
    let app = spawn_app().await;
    let client = &app.client;

    let body = response_json(client.get("/auth/login?login=/new").dispatch().await).await;
    assert_eq!(body["next"], "/new");
    assert_eq!(body["form"]["fields"][1]["widget"], "password");
}
