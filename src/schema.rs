table! {
    users (id) {
        id -> Integer,
        username -> Text,
        salt_base64 -> Text,
        argon2_hash -> Text,
    }
}
