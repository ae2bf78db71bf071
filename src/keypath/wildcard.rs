//! Single-wildcard template matching, used during resolution.

/// Matches a candidate key against a template holding at most one
/// wildcard character.
///
/// Without a wildcard the test is exact equality. With one, the candidate
/// must start with the literal prefix and end with the literal suffix;
/// either side may be empty, and overlapping matches on short candidates
/// are allowed (no minimum length beyond the two substring tests).
pub fn matches(template: &str, candidate: &str, wildcard: char) -> bool {
    match template.split_once(wildcard) {
        None => template == candidate,
        Some((prefix, suffix)) => candidate.starts_with(prefix) && candidate.ends_with(suffix),
    }
}
