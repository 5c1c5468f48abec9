use rocket::http::Status;
use rocket::request::Request;
use rocket::response::status;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Json};
use tracing::error;
use validator::{Validate, ValidationError, ValidationErrors};

#[derive(Debug)]
pub struct Errors {
    errors: ValidationErrors,
}

pub type FieldName = &'static str;
pub type FieldErrorCode = &'static str;

impl Errors {
    pub fn new(errs: &[(FieldName, FieldErrorCode)]) -> Self {
        let mut errors = ValidationErrors::new();
        for &(field, code) in errs {
            errors.add(field, ValidationError::new(code));
        }
        Self { errors }
    }

    /// Error codes reported for `field`, in insertion order.
    pub fn codes(&self, field: &str) -> Vec<String> {
        self.errors
            .field_errors()
            .get(field)
            .map(|errors| errors.iter().map(|err| err.code.to_string()).collect())
            .unwrap_or_default()
    }
}

impl<'r> Responder<'r, 'static> for Errors {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        use validator::ValidationErrorsKind::Field;

        let mut errors = json!({});
        for (field, field_errors) in self.errors.into_errors() {
            if let Field(field_errors) = field_errors {
                errors[field] = field_errors
                    .into_iter()
                    .map(|field_error| field_error.code)
                    .collect();
            }
        }

        status::Custom(
            Status::UnprocessableEntity,
            Json(json!({ "errors": errors })),
        )
        .respond_to(req)
    }
}

pub struct FieldValidator {
    errors: ValidationErrors,
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self {
            errors: ValidationErrors::new(),
        }
    }
}

impl FieldValidator {
    pub fn validate<T: Validate>(model: &T) -> Self {
        Self {
            errors: model.validate().err().unwrap_or_else(ValidationErrors::new),
        }
    }

    /// Convenience method to trigger early returns with ? operator.
    pub fn check(self) -> Result<(), Errors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Errors {
                errors: self.errors,
            })
        }
    }

    pub fn extract<T>(&mut self, field_name: &'static str, field: Option<T>) -> T
    where
        T: Default,
    {
        field.unwrap_or_else(|| {
            self.errors
                .add(field_name, ValidationError::new("can't be blank"));
            T::default()
        })
    }
}

/// Failure of a request handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("resource was not found")]
    NotFound,
    #[error("action is not allowed")]
    Forbidden,
    #[error("submitted form is invalid")]
    Invalid(Errors),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

impl From<Errors> for Error {
    fn from(errors: Errors) -> Self {
        Error::Invalid(errors)
    }
}

impl<'r> Responder<'r, 'static> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        match self {
            Error::NotFound => Err(Status::NotFound),
            Error::Forbidden => Err(Status::Forbidden),
            Error::Invalid(errors) => errors.respond_to(req),
            Error::Database(err) => {
                error!(%err, path = %req.uri(), "storage failure");
                Err(Status::InternalServerError)
            }
            Error::Token(err) => {
                error!(%err, path = %req.uri(), "token encoding failure");
                Err(Status::InternalServerError)
            }
        }
    }
}
