use crate::config::AppState;
use crate::database::users::UserCreationError;
use crate::database::{users, Db};
use crate::errors::{Error, Errors, FieldValidator};
use rocket::serde::json::{json, Json, Value};
use rocket::{get, post, State};
use serde::Deserialize;
use validator::ValidationError;

#[derive(Deserialize)]
pub struct NewUser {
    user: NewUserData,
}

#[derive(Deserialize, Validate)]
struct NewUserData {
    #[validate(length(min = 1, max = 150), custom = "username_chars")]
    username: Option<String>,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 8))]
    password: Option<String>,
}

/// Letters, digits and `@.+-_` only, so a username is always a safe path
/// segment.
fn username_chars(username: &str) -> Result<(), ValidationError> {
    let valid = username
        .chars()
        .all(|c| c.is_alphanumeric() || "@.+-_".contains(c));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

#[post("/auth/signup", format = "json", data = "<new_user>")]
pub async fn signup(
    new_user: Json<NewUser>,
    db: Db,
    state: &State<AppState>,
) -> Result<Value, Error> {
    let new_user = new_user.into_inner().user;

    let mut extractor = FieldValidator::validate(&new_user);
    let username = extractor.extract("username", new_user.username);
    let email = extractor.extract("email", new_user.email);
    let password = extractor.extract("password", new_user.password);

    extractor.check()?;

    let user = db
        .run(move |conn| users::create(conn, &username, &email, &password))
        .await
        .map_err(|error| -> Error {
            match error {
                UserCreationError::DuplicatedUsername => {
                    Errors::new(&[("username", "has already been taken")]).into()
                }
                UserCreationError::DuplicatedEmail => {
                    Errors::new(&[("email", "has already been taken")]).into()
                }
                UserCreationError::Hashing => Errors::new(&[("password", "is invalid")]).into(),
                UserCreationError::Database(err) => err.into(),
            }
        })?;

    Ok(json!({ "user": user.to_user_auth(&state.secret)? }))
}

#[derive(Deserialize)]
pub struct LoginUser {
    user: LoginUserData,
}

#[derive(Deserialize)]
struct LoginUserData {
    username: Option<String>,
    password: Option<String>,
}

#[post("/auth/login", format = "json", data = "<user>")]
pub async fn login(user: Json<LoginUser>, db: Db, state: &State<AppState>) -> Result<Value, Error> {
    let user = user.into_inner().user;

    let mut extractor = FieldValidator::default();
    let username = extractor.extract("username", user.username);
    let password = extractor.extract("password", user.password);
    extractor.check()?;

    let user = db
        .run(move |conn| users::login(conn, &username, &password))
        .await?
        .ok_or_else(|| Errors::new(&[("username or password", "is invalid")]))?;

    Ok(json!({ "user": user.to_user_auth(&state.secret)? }))
}

/// Where unauthenticated visitors of protected pages are sent; `login`
/// holds the page to return to.
#[get("/auth/login?<login>")]
pub fn login_form(login: Option<String>) -> Value {
    json!({
        "form": {
            "fields": [
                { "name": "username", "label": "Username", "widget": "text", "required": true },
                { "name": "password", "label": "Password", "widget": "password", "required": true },
            ],
        },
        "next": login,
    })
}
