pub mod config;
pub mod error;
pub mod model;
pub mod repo;
pub mod storage;
pub mod usecases;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Todo, TodoStatus};

    #[test]
    fn todo_has_required_fields() {
        let todo = Todo::new("demo", "a description", None, Some(TodoStatus::InProgress));

        assert!(todo.id.starts_with("todo-"));
        assert_eq!(todo.title, "demo");
        assert_eq!(todo.description, "a description");
        assert_eq!(todo.status, TodoStatus::InProgress);
        assert_eq!(todo.due_date, None);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::validation("missing title");
        assert_eq!(err.code(), "validation");
        assert_eq!(err.to_string(), "validation - missing title");
    }
}
