/// Converts a display team name into its join key: `"Ohio State"` becomes
/// `"ohio_state"`.
///
/// Whitespace runs collapse into a single `_`. Punctuation and diacritics are
/// kept, only their case changes, so `"Texas A&M"` maps to `"texas_a&m"`.
pub fn team_slug(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
