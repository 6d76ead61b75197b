use crate::utils::generate_random_id;
use regex::Regex;
use std::sync::OnceLock;

pub const UPLOAD_PREFIX: &str = "uploads/";

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9.\-]").expect("valid sanitizer regex"))
}

/// Strip every character outside `[a-zA-Z0-9.-]`.
pub fn sanitize_file_name(file_name: &str) -> String {
    unsafe_chars().replace_all(file_name, "").into_owned()
}

/// `uploads/<random-id>-<sanitized-filename>`
pub fn upload_object_key(file_name: &str) -> String {
    let mut sanitized = sanitize_file_name(file_name);
    if sanitized.is_empty() {
        sanitized = "file".to_string();
    }
    format!("{UPLOAD_PREFIX}{}-{sanitized}", generate_random_id(16))
}
