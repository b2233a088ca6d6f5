//! Text transformations shared by the form, the preview and the exporter.

use super::validation::parse_month;

/// Splits a comma-separated edit buffer into a list.
///
/// Tokens are trimmed and empty tokens dropped; order is preserved. This
/// never fails.
///
/// # Examples
///
/// ```
/// use tresume::domain::split_comma_list;
///
/// assert_eq!(
///     split_comma_list(" Go,  Rust ,,TypeScript"),
///     vec!["Go", "Rust", "TypeScript"]
/// );
/// ```
pub fn split_comma_list(buffer: &str) -> Vec<String> {
    buffer
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins a committed list back into edit-buffer text.
pub fn join_comma_list(items: &[String]) -> String {
    items.join(", ")
}

/// Formats a month string for display, e.g. `2023-01` as `Jan 2023`.
///
/// Values that do not parse are shown unchanged.
pub fn format_month(value: &str) -> String {
    match parse_month(value) {
        Some(date) => date.format("%b %Y").to_string(),
        None => value.trim().to_string(),
    }
}

/// Formats a start/end pair. A start without an end reads as ongoing.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{} - {}", format_month(start), format_month(end))),
        (Some(start), None) => Some(format!("{} - Present", format_month(start))),
        (None, Some(end)) => Some(format_month(end)),
        (None, None) => None,
    }
}

/// Splits free text into non-empty lines, stripping common bullet markers.
pub fn description_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Greedy word wrap to at most `width` characters per line.
///
/// Words longer than the width are hard-split.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let split_at = word
                .char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(word.len());
            lines.push(word[..split_at].to_string());
            word = &word[split_at..];
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma_list_trims_and_drops_empties() {
        assert_eq!(
            split_comma_list(" Go,  Rust ,,TypeScript"),
            vec!["Go".to_string(), "Rust".to_string(), "TypeScript".to_string()]
        );
    }

    #[test]
    fn test_split_comma_list_blank_inputs() {
        assert!(split_comma_list("").is_empty());
        assert!(split_comma_list(" , ,, ").is_empty());
    }

    #[test]
    fn test_join_then_split_is_stable() {
        let items = vec!["Chess".to_string(), "Climbing".to_string()];
        let buffer = join_comma_list(&items);
        assert_eq!(buffer, "Chess, Climbing");
        assert_eq!(split_comma_list(&buffer), items);
    }

    #[test]
    fn test_format_date_range() {
        assert_eq!(
            format_date_range(Some("2021-03"), Some("2023-11")).as_deref(),
            Some("Mar 2021 - Nov 2023")
        );
        assert_eq!(
            format_date_range(Some("2021-03"), None).as_deref(),
            Some("Mar 2021 - Present")
        );
        assert_eq!(format_date_range(None, None), None);
        assert_eq!(format_month("someday"), "someday");
    }

    #[test]
    fn test_description_lines_strip_markers() {
        let lines = description_lines("- Shipped v2\n\n* Cut latency 40%\n  plain line ");
        assert_eq!(lines, vec!["Shipped v2", "Cut latency 40%", "plain line"]);
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three four", 9), vec!["one two", "three", "four"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap_text("   ", 10).is_empty());
    }
}
