/// Generate a new row identifier.
pub fn generate_id() -> String {
    nanoid::nanoid!()
}

/// Generate an unguessable value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    nanoid::nanoid!(32)
}
