//! Post and comment forms: field validation plus the widget layout a client
//! needs to render them.

use crate::errors::{Errors, FieldValidator};
use crate::models::group::Group;
use crate::models::post::Post;
use rocket::serde::json::{json, Value};
use serde::{Deserialize, Serialize};
use validator::ValidationError;

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "svg",
];

const POST_TEXT_ROWS: u32 = 10;
const COMMENT_TEXT_ROWS: u32 = 7;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("can't be blank"));
    }
    Ok(())
}

fn image_file(value: &str) -> Result<(), ValidationError> {
    let extension = value
        .rsplit_once('.')
        .map(|(_, extension)| extension.to_ascii_lowercase());

    match extension {
        Some(extension) if IMAGE_EXTENSIONS.contains(&extension.as_str()) => Ok(()),
        _ => Err(ValidationError::new("invalid_image")),
    }
}

#[derive(Serialize, Debug)]
struct Widget {
    name: &'static str,
    label: &'static str,
    widget: &'static str,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<u32>,
}

impl Widget {
    fn textarea(name: &'static str, label: &'static str, rows: u32) -> Self {
        Widget {
            name,
            label,
            widget: "textarea",
            required: true,
            rows: Some(rows),
        }
    }

    fn optional(name: &'static str, label: &'static str, widget: &'static str) -> Self {
        Widget {
            name,
            label,
            widget,
            required: false,
            rows: None,
        }
    }
}

#[derive(Deserialize)]
pub struct NewPost {
    pub post: PostForm,
}

#[derive(Deserialize, Serialize, Validate, Default, Debug, Clone)]
pub struct PostForm {
    #[validate(custom = "not_blank")]
    pub text: Option<String>,
    pub group: Option<i32>,
    #[validate(custom = "image_file")]
    pub image: Option<String>,
}

/// Validated post form.
#[derive(Debug, Clone, PartialEq)]
pub struct PostData {
    pub text: String,
    pub group: Option<i32>,
    pub image: Option<String>,
}

impl PostForm {
    /// Form pre-filled with an existing post.
    pub fn from_post(post: &Post) -> Self {
        PostForm {
            text: Some(post.text.clone()),
            group: post.group_id,
            image: post.image.clone(),
        }
    }

    /// Field-level validation. Whether the group exists is checked by the
    /// caller against storage.
    pub fn clean(self) -> Result<PostData, Errors> {
        let mut extractor = FieldValidator::validate(&self);
        let text = extractor.extract("text", self.text);
        extractor.check()?;

        Ok(PostData {
            text,
            group: self.group,
            image: self.image,
        })
    }

    pub fn render(&self, groups: &[Group]) -> Value {
        let choices: Vec<Value> = groups
            .iter()
            .map(|group| json!({ "value": group.id, "label": group.title }))
            .collect();

        json!({
            "fields": [
                Widget::textarea("text", "Text", POST_TEXT_ROWS),
                Widget::optional("group", "Group", "select"),
                Widget::optional("image", "Image", "file"),
            ],
            "choices": { "group": choices },
            "values": self,
        })
    }
}

#[derive(Deserialize)]
pub struct NewComment {
    pub comment: CommentForm,
}

#[derive(Deserialize, Serialize, Validate, Default, Debug, Clone)]
pub struct CommentForm {
    #[validate(custom = "not_blank")]
    pub text: Option<String>,
}

impl CommentForm {
    /// Validated comment text.
    pub fn clean(self) -> Result<String, Errors> {
        let mut extractor = FieldValidator::validate(&self);
        let text = extractor.extract("text", self.text);
        extractor.check()?;
        Ok(text)
    }

    pub fn render(&self) -> Value {
        json!({
            "fields": [Widget::textarea("text", "Text", COMMENT_TEXT_ROWS)],
            "values": self,
        })
    }
}
