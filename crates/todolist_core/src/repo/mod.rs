use crate::error::AppError;
use crate::model::{Todo, TodoStatus};

pub mod json;
pub mod memory;

/// Storage contract for todos. Implementations are injected where needed;
/// absence is reported as data (`Option`/`bool`), never as an error.
pub trait TodoRepository {
    /// Insert or replace by id; returns the persisted todo.
    fn save(&mut self, todo: &Todo) -> Result<Todo, AppError>;

    /// Remove by id; `false` when nothing matched.
    fn delete(&mut self, id: &str) -> Result<bool, AppError>;

    fn get_by_id(&self, id: &str) -> Result<Option<Todo>, AppError>;

    /// Every stored todo, in no particular order.
    fn get_all(&self) -> Result<Vec<Todo>, AppError>;

    fn get_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, AppError>;

    /// Case-insensitive substring match over title or description. A blank
    /// query behaves exactly like `get_all`.
    fn search(&self, query: &str) -> Result<Vec<Todo>, AppError>;
}

/// Shared match predicate so every backend keeps identical search semantics.
/// `normalized_query` must already be trimmed and lower-cased.
pub(crate) fn matches_query(title: &str, description: &str, normalized_query: &str) -> bool {
    title.to_lowercase().contains(normalized_query)
        || description.to_lowercase().contains(normalized_query)
}

#[cfg(test)]
mod tests {
    use super::matches_query;

    #[test]
    fn matches_query_is_case_insensitive() {
        assert!(matches_query("Write REPORT", "", "report"));
        assert!(matches_query("", "quarterly Report draft", "report"));
        assert!(!matches_query("groceries", "milk and eggs", "report"));
    }

    #[test]
    fn matches_query_handles_non_ascii_text() {
        assert!(matches_query("프로젝트 계획", "", "프로젝트"));
        assert!(matches_query("", "주간 프로젝트 회의", "프로젝트"));
    }
}
