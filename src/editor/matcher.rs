use indexmap::IndexSet;

use super::menu::MenuEntry;

/// Splits a `;`-delimited tag string, dropping blanks and duplicates but keeping order.
pub fn split_tags(raw: &str) -> IndexSet<String> {
    raw.split(';').map(str::trim).filter(|tag| !tag.is_empty()).map(str::to_string).collect()
}

/// Indices of every entry whose required tags share at least one tag with `asset_tags`.
///
/// Each entry shows up at most once no matter how many tags overlap, so an asset tagged
/// `snow;ground` lands in both a "Snow" and a "Ground" palette but only once in a
/// "Snowy ground" palette that requires both.
pub fn find_target_entries(entries: &[MenuEntry], asset_tags: &IndexSet<String>) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.required_tags().iter().any(|tag| asset_tags.contains(tag)))
        .map(|(index, _)| index)
        .collect()
}
