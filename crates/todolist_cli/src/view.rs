use tabled::{Table, Tabled};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use todolist_core::config::Palette;
use todolist_core::error::AppError;
use todolist_core::model::{Todo, TodoStatus};
use todolist_core::usecases::sort_todos_by_due_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    All,
    Status(TodoStatus),
}

impl Filter {
    pub fn label(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Status(status) => status.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DueDate,
    CreatedAt,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::DueDate => "due_date",
            SortKey::CreatedAt => "created_at",
        }
    }
}

/// The controller's current view selection. A plain value: every render
/// receives one explicitly instead of reading hidden mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub filter: Filter,
    pub sort: SortKey,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: Filter::All,
            sort: SortKey::DueDate,
        }
    }
}

pub fn parse_filter(raw: &str) -> Result<Filter, AppError> {
    if raw.trim().eq_ignore_ascii_case("all") {
        return Ok(Filter::All);
    }
    TodoStatus::parse(raw).map(Filter::Status)
}

pub fn parse_sort_key(raw: &str) -> Result<SortKey, AppError> {
    let canonical: String = raw
        .trim()
        .chars()
        .map(|ch| {
            if ch == '-' || ch.is_whitespace() {
                '_'
            } else {
                ch.to_ascii_lowercase()
            }
        })
        .collect();

    match canonical.as_str() {
        "due_date" | "due" => Ok(SortKey::DueDate),
        "created_at" | "created" => Ok(SortKey::CreatedAt),
        _ => Err(AppError::validation(format!(
            "unknown sort key '{}'",
            raw.trim()
        ))),
    }
}

/// Pure filter + sort: exact status match unless `All`; due dates ascending
/// with missing deadlines last, creation time newest first.
pub fn apply_view(todos: &[Todo], view: &ViewState) -> Vec<Todo> {
    let filtered: Vec<Todo> = match view.filter {
        Filter::All => todos.to_vec(),
        Filter::Status(status) => todos
            .iter()
            .filter(|todo| todo.status == status)
            .cloned()
            .collect(),
    };

    match view.sort {
        SortKey::DueDate => sort_todos_by_due_date(&filtered, true),
        SortKey::CreatedAt => {
            let mut sorted = filtered;
            sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            sorted
        }
    }
}

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Created")]
    created: String,
}

fn format_instant(instant: OffsetDateTime) -> Result<String, AppError> {
    instant
        .format(&Rfc3339)
        .map_err(|err| AppError::storage(err.to_string()))
}

fn status_cell(todo: &Todo) -> String {
    if todo.is_overdue() {
        format!("{} (overdue)", todo.status.as_str())
    } else {
        todo.status.as_str().to_string()
    }
}

/// Build the full screen output from scratch. No incremental patching:
/// the same todos and view always produce the same text.
pub fn render(todos: &[Todo], view: &ViewState, palette: &Palette) -> Result<String, AppError> {
    let summary = palette.accentize(&format!(
        "{} todo(s) | filter: {} | sort: {}",
        todos.len(),
        view.filter.label(),
        view.sort.label()
    ));

    if todos.is_empty() {
        return Ok(format!("{}\n{}", summary, palette.mutedize("no todos to show")));
    }

    let mut rows = Vec::with_capacity(todos.len());
    for todo in todos {
        rows.push(TodoRow {
            id: todo.id.clone(),
            title: todo.title.clone(),
            status: status_cell(todo),
            due: match todo.due_date {
                Some(due) => format_instant(due)?,
                None => "-".to_string(),
            },
            created: format_instant(todo.created_at)?,
        });
    }

    Ok(format!("{}\n{}", summary, Table::new(rows)))
}

/// Multi-line detail rendering for a single todo.
pub fn render_detail(todo: &Todo) -> Result<String, AppError> {
    let due = match todo.due_date {
        Some(due) => format_instant(due)?,
        None => "-".to_string(),
    };

    Ok(format!(
        "id:          {}\n\
         title:       {}\n\
         description: {}\n\
         status:      {}\n\
         due:         {}\n\
         created:     {}\n\
         updated:     {}",
        todo.id,
        todo.title,
        todo.description,
        status_cell(todo),
        due,
        format_instant(todo.created_at)?,
        format_instant(todo.updated_at)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::{Filter, SortKey, ViewState, apply_view, parse_filter, parse_sort_key, render};
    use time::{Duration, OffsetDateTime};
    use todolist_core::config::palette_for_theme;
    use todolist_core::model::{Todo, TodoStatus};

    fn plain_palette() -> todolist_core::config::Palette {
        palette_for_theme(None)
    }

    #[test]
    fn parse_filter_accepts_all_and_statuses() {
        assert_eq!(parse_filter("ALL").unwrap(), Filter::All);
        assert_eq!(
            parse_filter("in-progress").unwrap(),
            Filter::Status(TodoStatus::InProgress)
        );
        assert_eq!(parse_filter("bogus").unwrap_err().code(), "invalid_state");
    }

    #[test]
    fn parse_sort_key_accepts_both_keys() {
        assert_eq!(parse_sort_key("due-date").unwrap(), SortKey::DueDate);
        assert_eq!(parse_sort_key("created_at").unwrap(), SortKey::CreatedAt);
        assert_eq!(parse_sort_key("title").unwrap_err().code(), "validation");
    }

    #[test]
    fn apply_view_filters_by_exact_status() {
        let todos = vec![
            Todo::new("open", "", None, None),
            Todo::new("done", "", None, Some(TodoStatus::Done)),
        ];
        let view = ViewState {
            filter: Filter::Status(TodoStatus::Done),
            sort: SortKey::DueDate,
        };

        let visible = apply_view(&todos, &view);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "done");
    }

    #[test]
    fn apply_view_sorts_due_dates_ascending_with_none_last() {
        let now = OffsetDateTime::now_utc();
        let todos = vec![
            Todo::new("late", "", Some(now + Duration::days(9)), None),
            Todo::new("none", "", None, None),
            Todo::new("soon", "", Some(now + Duration::days(1)), None),
        ];

        let visible = apply_view(&todos, &ViewState::default());
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(titles, vec!["soon", "late", "none"]);
    }

    #[test]
    fn apply_view_sorts_created_at_newest_first() {
        let mut first = Todo::new("first", "", None, None);
        let mut second = Todo::new("second", "", None, None);
        let now = OffsetDateTime::now_utc();
        first.created_at = now - Duration::hours(2);
        second.created_at = now - Duration::hours(1);

        let view = ViewState {
            filter: Filter::All,
            sort: SortKey::CreatedAt,
        };
        let visible = apply_view(&[first, second], &view);

        assert_eq!(visible[0].title, "second");
        assert_eq!(visible[1].title, "first");
    }

    #[test]
    fn render_includes_summary_rows_and_overdue_marker() {
        let overdue = Todo::new(
            "late delivery",
            "",
            Some(OffsetDateTime::now_utc() - Duration::days(1)),
            None,
        );

        let output = render(&[overdue], &ViewState::default(), &plain_palette()).unwrap();

        assert!(output.contains("1 todo(s) | filter: all | sort: due_date"));
        assert!(output.contains("late delivery"));
        assert!(output.contains("NOT_STARTED (overdue)"));
    }

    #[test]
    fn render_is_deterministic_for_the_same_input() {
        let todos = vec![Todo::new("stable", "", None, None)];
        let view = ViewState::default();
        let palette = plain_palette();

        let first = render(&todos, &view, &palette).unwrap();
        let second = render(&todos, &view, &palette).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn render_empty_list_mentions_it() {
        let output = render(&[], &ViewState::default(), &plain_palette()).unwrap();
        assert!(output.contains("no todos to show"));
    }
}
