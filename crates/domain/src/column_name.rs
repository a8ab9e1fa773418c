/// Rewrites a resolved field name into the storage column naming convention.
///
/// The name is split on `_` and re-joined in order. A segment directly
/// followed by a segment that starts with an ASCII digit is joined without the
/// separator, so `limit_24` becomes `limit24` while `field_one` is kept. The
/// result is lower-cased.
#[must_use]
pub fn to_column_name(name: &str) -> String {
    let segments: Vec<&str> = name.split('_').collect();
    let mut column = String::with_capacity(name.len());

    for (index, segment) in segments.iter().enumerate() {
        column.push_str(segment);

        if segments
            .get(index + 1)
            .is_some_and(|next| !starts_with_digit(next))
        {
            column.push('_');
        }
    }

    column.to_lowercase()
}

// An empty segment (from `__` or a trailing `_`) never counts as numeric.
fn starts_with_digit(segment: &str) -> bool {
    segment
        .chars()
        .next()
        .is_some_and(|character| character.is_ascii_digit())
}
