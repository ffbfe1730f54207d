/// Convert a cache key to a file name that is safe on every platform
pub fn cache_file_name(key: &str) -> String {
    let mut name = key.replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");
    name = name.trim_matches('.').to_string();
    if name.is_empty() {
        name = "snapshot".to_string();
    }

    // Limit filename length
    if name.chars().count() > 100 {
        name = name.chars().take(100).collect();
    }
    format!("{}.json", name)
}
