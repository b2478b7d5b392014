use unicode_segmentation::UnicodeSegmentation;

/// Length in user-perceived characters (grapheme clusters)
pub fn grapheme_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Keep at most `max` graphemes of `s`, dropping the rest
pub fn clamp_graphemes(s: &str, max: usize) -> String {
    match s.grapheme_indices(true).nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}
