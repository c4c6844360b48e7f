//! Small shared helpers

/// Clip a string to a maximum number of characters, appending "..." when
/// anything was cut. Counts whole characters, so multi-byte input never
/// splits mid-glyph.
pub fn clip_line(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}
