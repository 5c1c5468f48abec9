table! {
    comments (id) {
        id -> Integer,
        post -> Integer,
        author -> Integer,
        text -> Text,
        created -> Timestamp,
    }
}

table! {
    follows (follower, followed) {
        follower -> Integer,
        followed -> Integer,
    }
}

table! {
    groups (id) {
        id -> Integer,
        title -> Text,
        slug -> Text,
        description -> Text,
    }
}

table! {
    posts (id) {
        id -> Integer,
        text -> Text,
        pub_date -> Timestamp,
        author -> Integer,
        group_id -> Nullable<Integer>,
        image -> Nullable<Text>,
    }
}

table! {
    users (id) {
        id -> Integer,
        username -> Text,
        email -> Text,
        hash -> Text,
    }
}

joinable!(comments -> posts (post));
joinable!(comments -> users (author));
joinable!(posts -> groups (group_id));
joinable!(posts -> users (author));

allow_tables_to_appear_in_same_query!(comments, follows, groups, posts, users,);
