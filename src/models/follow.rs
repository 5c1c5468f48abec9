use crate::schema::follows;
use diesel::{Insertable, Queryable};

#[derive(Queryable, Insertable, Debug, Clone, Copy, PartialEq, Eq)]
#[diesel(table_name = follows)]
pub struct Follow {
    pub follower: i32,
    pub followed: i32,
}
