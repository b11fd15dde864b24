use super::lines::LineSequence;
use super::normalize::is_text_space;

/// Next original line at or after `start` whose normalized form is neither
/// empty nor `placeholder`, looking at most `max_lookahead` lines past
/// `start` (inclusive). Returned trimmed.
pub fn next_valid_line<'a>(
    lines: &'a LineSequence,
    start: usize,
    max_lookahead: usize,
    placeholder: &str,
) -> Option<&'a str> {
    let limit = start
        .saturating_add(max_lookahead)
        .saturating_add(1)
        .min(lines.len());

    (start..limit)
        .find(|index| {
            lines
                .normalized(*index)
                .is_some_and(|line| !line.is_empty() && line != placeholder)
        })
        .and_then(|index| lines.original(index))
        .map(|line| line.trim_matches(is_text_space))
}
