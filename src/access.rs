use crate::models::post::Post;

/// Outcome of an ownership or follow check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden,
    /// Not an error: the viewer is sent back to a page they may see.
    Redirect,
}

/// Only the author edits a post; everybody else is sent to the post page.
pub fn edit_post(viewer: i32, post: &Post) -> Decision {
    if post.author != viewer {
        return Decision::Redirect;
    }
    Decision::Allowed
}

pub fn follow(viewer: i32, author: i32, already_following: bool) -> Decision {
    if viewer == author || already_following {
        return Decision::Forbidden;
    }
    Decision::Allowed
}
