use crate::entity::CleanedComment;

pub const MAX_CLEANED_CHARS: usize = 512;

pub fn filter(rows: Vec<CleanedComment>) -> Vec<CleanedComment> {
    filter_by_length(rows, MAX_CLEANED_CHARS)
}

/// Keeps rows whose cleaned text has at most `max_chars` characters (not bytes), in order.
pub fn filter_by_length(rows: Vec<CleanedComment>, max_chars: usize) -> Vec<CleanedComment> {
    rows.into_iter()
        .filter(|row| row.cleaned_text().chars().count() <= max_chars)
        .collect()
}
