use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Shortens `text` to at most `max_width` terminal columns, ending with `…` when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut truncated = String::with_capacity(text.len().min(max_width * 4));
    for character in text.chars() {
        let width = character.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push(character);
    }
    truncated.push(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_to_width("resume.pdf", 10), "resume.pdf");
        assert_eq!(truncate_to_width("", 0), "");
    }

    #[test]
    fn long_text_ends_with_ellipsis_within_budget() {
        let truncated = truncate_to_width("quarterly-financial-report-final.pdf", 12);
        assert_eq!(truncated, "quarterly-f…");
        assert_eq!(truncated.width(), 12);
    }

    #[test]
    fn wide_characters_are_measured_in_columns() {
        let truncated = truncate_to_width("報告書報告書.pdf", 7);
        assert_eq!(truncated, "報告書…");
        assert!(truncated.width() <= 7);
    }
}
