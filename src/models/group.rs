use diesel::Queryable;
use serde::Serialize;

#[derive(Queryable, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Short form of a group embedded into rendered posts.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GroupRef {
    pub id: i32,
    pub slug: String,
    pub title: String,
}

impl From<&Group> for GroupRef {
    fn from(group: &Group) -> Self {
        GroupRef {
            id: group.id,
            slug: group.slug.clone(),
            title: group.title.clone(),
        }
    }
}
