use crate::models::Subject;

/// Keep the subjects whose short code or full name contains `query`,
/// ignoring case. Catalog order is preserved and bookmarks play no part in
/// the ordering. A blank query keeps everything.
pub fn filter_subjects<'a>(subjects: &'a [Subject], query: &str) -> Vec<&'a Subject> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return subjects.iter().collect();
    }

    subjects
        .iter()
        .filter(|subject| {
            subject.short_code.to_lowercase().contains(&needle)
                || subject.full_name.to_lowercase().contains(&needle)
        })
        .collect()
}
