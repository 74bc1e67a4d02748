use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const SHORT_ID_CHARS: usize = 6;

/// Leading segment of an identifier, capped to a few characters so it fits
/// inside a node circle. UUID-style ids collapse to their first group.
pub fn short_id(id: &str) -> &str {
    let head = id.split_once('-').map(|(head, _)| head).unwrap_or(id);
    match head.char_indices().nth(SHORT_ID_CHARS) {
        Some((end, _)) => &head[..end],
        None => head,
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let truncated = chars.by_ref().take(max_chars).collect::<String>();
    if chars.next().is_some() {
        format!("{}…", truncated.trim_end())
    } else {
        truncated
    }
}

pub fn stable_pair(id: &str) -> (f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let x = ((hash & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    let y = (((hash >> 32) & 0xffff_ffff) as f64 / u32::MAX as f64) as f32;
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0)
}
