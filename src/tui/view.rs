//! # View
//!
//! `render(&App) -> String` produces one full text frame. It reads state only,
//! so rendering twice without an update in between gives the same frame.
//!
//! ```text
//! ┌──────────────┬───────────────────────────┐
//! │ Task lists   │ Tasks                     │  titles
//! │ > Groceries  │   [ ] Milk                │  panes (scroll with cursor)
//! │   Work       │   [x] Eggs                │
//! ├──────────────┴───────────────────────────┤
//! │ detail of the focused selection          │  detail panel
//! │ status line                              │
//! │ key help                                 │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Creation, confirmation and detail modals replace the whole frame.

use crate::core::record::Record;
use crate::core::selection::SelectionList;
use crate::core::state::{App, ItemsStatus, Modal, Pane};
use crate::store::ItemRecord;
use crate::tui::delegate::{ItemDelegate, ListDelegate, RowDelegate, fit, format_due};

const SEPARATOR: &str = " │ ";
const SEPARATOR_WIDTH: usize = 3;
/// Title row, rule above the detail panel, status line, help line.
const CHROME_ROWS: usize = 4;

pub fn render(app: &App) -> String {
    let lines = match &app.modal {
        Modal::CreatingList => input_frame(app, "New task list"),
        Modal::CreatingItem { list_id } => {
            let title = app
                .lists
                .records()
                .iter()
                .find(|l| l.id() == list_id)
                .map(|l| format!("New task in {}", l.title()))
                .unwrap_or_else(|| String::from("New task"));
            input_frame(app, &title)
        }
        Modal::ConfirmingListDeletion { title, .. } => {
            confirm_frame(&format!("Delete task list \"{}\" and all its tasks?", title))
        }
        Modal::ConfirmingItemDeletion { title, .. } => {
            confirm_frame(&format!("Delete task \"{}\"?", title))
        }
        Modal::ViewingItemDetail { item_id, .. } => detail_frame(app, item_id),
        Modal::Default | Modal::Filtering => dashboard_frame(app),
    };

    let width = app.width as usize;
    let height = app.height as usize;
    lines
        .iter()
        .take(height.max(1))
        .map(|line| fit(line, width).trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn input_frame(app: &App, title: &str) -> Vec<String> {
    vec![
        title.to_string(),
        String::new(),
        format!("> {}█", app.input),
        String::new(),
        String::from("enter: create • esc: cancel"),
    ]
}

fn confirm_frame(question: &str) -> Vec<String> {
    vec![
        question.to_string(),
        String::new(),
        String::from("y: delete • n: cancel"),
    ]
}

fn detail_frame(app: &App, item_id: &str) -> Vec<String> {
    let mut lines = match app.find_item(item_id) {
        Some(item) => item_details(item, app.width as usize),
        None => vec![String::from("Task no longer available")],
    };
    lines.push(String::new());
    lines.push(String::from("esc: back"));
    lines
}

fn item_details(item: &ItemRecord, width: usize) -> Vec<String> {
    let mut lines = vec![item.title().to_string(), format!("Status: {}", item.status.label())];
    if let Some(due) = &item.due {
        lines.push(format!("Due: {}", format_due(due)));
    }
    if !item.notes.is_empty() {
        lines.push(String::new());
        lines.extend(
            textwrap::wrap(item.description(), width.max(1))
                .into_iter()
                .map(|l| l.into_owned()),
        );
    }
    lines
}

/// On short terminals the detail panel shrinks first, then the panes. The
/// status and help lines are the last rows to go.
fn dashboard_frame(app: &App) -> Vec<String> {
    let width = app.width as usize;
    let rows = (app.height as usize).max(1);
    let detail_rows = (app.detail_height as usize).min(rows.saturating_sub(CHROME_ROWS + 1));
    let body_rows = rows.saturating_sub(CHROME_ROWS + detail_rows).max(1);

    let left_width = (width.saturating_sub(SEPARATOR_WIDTH) / 3).max(1);
    let right_width = width.saturating_sub(left_width + SEPARATOR_WIDTH);

    let lists_focused = app.focused == Pane::Lists;
    let left = pane_rows(&app.lists, &ListDelegate, lists_focused, body_rows, "No task lists");
    let right = pane_rows(&app.items, &ItemDelegate, !lists_focused, body_rows, "");

    let mut lines = Vec::with_capacity(rows);
    lines.push(format!(
        "{}{}{}",
        fit(&titled("Task lists", app.lists.filter()), left_width),
        SEPARATOR,
        titled(items_title(app), app.items.filter())
    ));
    for (l, r) in left.iter().zip(right.iter()) {
        lines.push(format!("{}{}{}", fit(l, left_width), SEPARATOR, fit(r, right_width)));
    }

    lines.push("─".repeat(width));
    let mut detail = detail_panel(app, width);
    detail.resize(detail_rows, String::new());
    lines.extend(detail);

    let mut footer = vec![status_line(app), help_line(app).to_string()];
    footer.truncate(rows);
    lines.truncate(rows - footer.len());
    lines.extend(footer);
    lines
}

fn pane_rows<D: RowDelegate>(
    list: &SelectionList<D::Item>,
    delegate: &D,
    focused: bool,
    rows: usize,
    empty_text: &str,
) -> Vec<String> {
    let mut out: Vec<String> = if list.is_empty() && !empty_text.is_empty() {
        vec![format!("  {}", empty_text)]
    } else {
        let window = list.window(rows);
        let start = window.start;
        list.iter_visible()
            .enumerate()
            .skip(start)
            .take(window.len())
            .map(|(i, record)| delegate.row(record, i == list.cursor(), focused))
            .collect()
    };
    out.resize(rows, String::new());
    out
}

fn items_title(app: &App) -> &'static str {
    match app.items_status {
        ItemsStatus::Loading => "Loading...",
        ItemsStatus::Ready if app.items.records().is_empty() => "Empty task list",
        ItemsStatus::Ready | ItemsStatus::Idle => "Tasks",
    }
}

fn titled(title: &str, filter: &str) -> String {
    if filter.is_empty() {
        title.to_string()
    } else {
        format!("{} /{}", title, filter)
    }
}

fn detail_panel(app: &App, width: usize) -> Vec<String> {
    match app.focused {
        Pane::Lists => match app.selected_list() {
            Some(list) => {
                let mut lines = vec![list.title().to_string()];
                if !list.updated.is_empty() {
                    lines.push(format!("Updated: {}", format_due(&list.updated)));
                }
                lines
            }
            None => vec![],
        },
        Pane::Items => app
            .selected_item()
            .map(|item| item_details(item, width))
            .unwrap_or_default(),
    }
}

fn status_line(app: &App) -> String {
    if app.modal == Modal::Filtering {
        format!("Filter: {}█", app.input)
    } else {
        format!("[sort: {}] {}", app.sort.current(), app.status_message)
    }
}

fn help_line(app: &App) -> &'static str {
    match (&app.modal, app.focused) {
        (Modal::Filtering, _) => "enter: apply • esc: clear",
        (_, Pane::Lists) => {
            "j/k: move • enter/tab: tasks • n: new • d: delete • s: sort • /: filter • q: quit"
        }
        (_, Pane::Items) => {
            "j/k: move • space: toggle • enter: details • n: new • d: delete • tab: lists • q: quit"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, KeyAction, update};
    use crate::core::command::Operation;
    use crate::store::{ItemStatus, SortKey};
    use crate::test_support::{item, list};

    fn app_with_lists() -> App {
        let mut app = App::new();
        update(
            &mut app,
            Action::ListsLoaded {
                sort: SortKey::Alphabetical,
                lists: vec![list("a", "Groceries"), list("b", "Work")],
            },
        );
        app
    }

    #[test]
    fn test_render_is_idempotent() {
        let app = app_with_lists();
        assert_eq!(render(&app), render(&app));
    }

    #[test]
    fn test_frame_fits_terminal() {
        let mut app = app_with_lists();
        update(&mut app, Action::Resize { width: 40, height: 12 });
        let frame = render(&app);
        assert!(frame.lines().count() <= 12);
        assert!(
            frame
                .lines()
                .all(|l| unicode_width::UnicodeWidthStr::width(l) <= 40)
        );
        let last: Vec<&str> = frame.lines().rev().take(2).collect();
        assert!(last[1].starts_with("[sort: alphabetical]"));
        assert!(last[0].starts_with("j/k: move"));
    }

    #[test]
    fn test_short_terminal_keeps_status_line() {
        let mut app = app_with_lists();
        update(
            &mut app,
            Action::OperationFailed {
                operation: Operation::LoadItems,
                message: "offline".into(),
            },
        );
        for height in [2u16, 3, 5, 8] {
            update(&mut app, Action::Resize { width: 60, height });
            let frame = render(&app);
            assert_eq!(frame.lines().count(), height as usize);
            assert!(
                frame.contains("Loading tasks failed: offline"),
                "status line missing at height {height}"
            );
        }

        update(&mut app, Action::Resize { width: 60, height: 1 });
        assert_eq!(render(&app), "[sort: alphabetical] Loading tasks failed: offline");
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app_with_lists();
        update(&mut app, Action::Resize { width: 3, height: 1 });
        let _ = render(&app);
        update(&mut app, Action::Resize { width: 0, height: 0 });
        let _ = render(&app);
    }

    #[test]
    fn test_selected_list_has_marker_and_items_loading() {
        let app = app_with_lists();
        let frame = render(&app);
        assert!(frame.contains("> Groceries"));
        assert!(frame.contains("Loading..."));
    }

    #[test]
    fn test_empty_task_list_title() {
        let mut app = app_with_lists();
        update(
            &mut app,
            Action::ItemsLoaded {
                list_id: "a".into(),
                sort: SortKey::Alphabetical,
                items: vec![],
            },
        );
        assert!(render(&app).contains("Empty task list"));
    }

    #[test]
    fn test_items_pane_shows_checkboxes() {
        let mut app = app_with_lists();
        let mut done = item("2", "Eggs");
        done.status = ItemStatus::Completed;
        update(
            &mut app,
            Action::ItemsLoaded {
                list_id: "a".into(),
                sort: SortKey::Alphabetical,
                items: vec![item("1", "Milk"), done],
            },
        );
        let frame = render(&app);
        assert!(frame.contains("- [ ] Milk"));
        assert!(frame.contains("  [x] Eggs"));
    }

    #[test]
    fn test_modal_frames() {
        let mut app = app_with_lists();
        update(&mut app, Action::Key(KeyAction::New));
        update(&mut app, Action::Input('X'));
        let frame = render(&app);
        assert!(frame.starts_with("New task list"));
        assert!(frame.contains("> X█"));
        assert!(!frame.contains("Groceries"));

        update(&mut app, Action::Key(KeyAction::Cancel));
        update(&mut app, Action::Key(KeyAction::Delete));
        assert!(render(&app).contains("Delete task list \"Groceries\""));
    }

    #[test]
    fn test_detail_frame_wraps_notes() {
        let mut app = app_with_lists();
        update(&mut app, Action::Resize { width: 20, height: 24 });
        update(&mut app, Action::Key(KeyAction::SwitchPane));
        let mut task = item("1", "Milk");
        task.notes = "two litres of the semi skimmed kind please".into();
        update(
            &mut app,
            Action::ItemsLoaded {
                list_id: "a".into(),
                sort: SortKey::Alphabetical,
                items: vec![task],
            },
        );
        update(&mut app, Action::Key(KeyAction::Open));
        let frame = render(&app);
        assert!(frame.starts_with("Milk"));
        assert!(frame.contains("Status: needsAction"));
        assert!(frame.lines().all(|l| l.chars().count() <= 20));
        assert!(frame.contains("esc: back"));
    }

    #[test]
    fn test_filter_shows_in_title_and_status() {
        let mut app = app_with_lists();
        update(&mut app, Action::Key(KeyAction::Filter));
        update(&mut app, Action::Input('w'));
        let frame = render(&app);
        assert!(frame.contains("Task lists /w"));
        assert!(frame.contains("Filter: w█"));
        assert!(frame.contains("> Work"));
    }

    #[test]
    fn test_pane_scrolls_with_cursor() {
        let mut app = App::new();
        let lists = (0..30)
            .map(|i| list(&format!("l{i:02}"), &format!("List {i:02}")))
            .collect();
        update(
            &mut app,
            Action::ListsLoaded {
                sort: SortKey::Alphabetical,
                lists,
            },
        );
        for _ in 0..25 {
            update(&mut app, Action::Key(KeyAction::MoveDown));
        }
        let frame = render(&app);
        assert!(frame.contains("> List 25"));
        assert!(!frame.contains("List 00"));
    }
}
