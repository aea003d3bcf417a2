//! Row formatting for the two panes.
//!
//! Each pane draws its records through a delegate so the view code does not
//! care whether it is drawing task lists or tasks.

use chrono::DateTime;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::record::Record;
use crate::store::{ItemRecord, ListRecord};

/// Turns one record into one line of text (without padding).
pub trait RowDelegate {
    type Item: Record;

    fn row(&self, record: &Self::Item, selected: bool, focused: bool) -> String;
}

pub struct ListDelegate;

impl RowDelegate for ListDelegate {
    type Item = ListRecord;

    fn row(&self, record: &ListRecord, selected: bool, focused: bool) -> String {
        format!("{}{}", marker(selected, focused), record.title())
    }
}

pub struct ItemDelegate;

impl RowDelegate for ItemDelegate {
    type Item = ItemRecord;

    fn row(&self, record: &ItemRecord, selected: bool, focused: bool) -> String {
        let checkbox = if record.status.is_completed() { "[x]" } else { "[ ]" };
        let mut line = format!("{}{} {}", marker(selected, focused), checkbox, record.title());
        if let Some(due) = &record.due {
            line.push_str(&format!("  (due {})", format_due(due)));
        }
        line
    }
}

/// Cursor marker: bold arrow in the focused pane, a dash in the other one.
pub fn marker(selected: bool, focused: bool) -> &'static str {
    match (selected, focused) {
        (true, true) => "> ",
        (true, false) => "- ",
        _ => "  ",
    }
}

/// Formats an RFC 3339 due timestamp as a calendar date. Anything that does
/// not parse is shown as-is.
pub fn format_due(due: &str) -> String {
    DateTime::parse_from_rfc3339(due)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| due.to_string())
}

/// Pads or truncates `text` to exactly `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    let text_width = UnicodeWidthStr::width(text);
    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }
    if width == 0 {
        return String::new();
    }

    // Leave one column for the ellipsis
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    used += 1;
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ItemStatus;
    use crate::test_support::{item, list};

    #[test]
    fn test_markers() {
        assert_eq!(marker(true, true), "> ");
        assert_eq!(marker(true, false), "- ");
        assert_eq!(marker(false, true), "  ");
    }

    #[test]
    fn test_item_row_shows_checkbox_and_due() {
        let mut task = item("1", "Milk");
        assert_eq!(ItemDelegate.row(&task, false, true), "  [ ] Milk");

        task.status = ItemStatus::Completed;
        task.due = Some("2024-05-01T00:00:00.000Z".into());
        assert_eq!(
            ItemDelegate.row(&task, true, true),
            "> [x] Milk  (due 2024-05-01)"
        );
    }

    #[test]
    fn test_list_row() {
        assert_eq!(ListDelegate.row(&list("a", "Work"), true, false), "- Work");
    }

    #[test]
    fn test_format_due_falls_back_to_raw() {
        assert_eq!(format_due("2024-12-31T10:00:00+02:00"), "2024-12-31");
        assert_eq!(format_due("someday"), "someday");
    }

    #[test]
    fn test_fit_pads_and_truncates_by_display_width() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        // Wide characters take two columns each
        assert_eq!(UnicodeWidthStr::width(fit("日本語テキスト", 6).as_str()), 6);
        assert_eq!(fit("abc", 0), "");
    }
}
