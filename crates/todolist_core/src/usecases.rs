use crate::error::AppError;
use crate::model::{Todo, TodoPatch, TodoStatus};
use crate::repo::TodoRepository;
use std::cmp::Ordering;
use time::OffsetDateTime;

/// Application-level operations over an injected repository. All input
/// validation and orchestration rules live here; the repository below is
/// trusted to only store and fetch.
pub struct TodoUseCases<R: TodoRepository> {
    repository: R,
}

impl<R: TodoRepository> TodoUseCases<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn create_todo(
        &mut self,
        title: &str,
        description: &str,
        due_date: Option<OffsetDateTime>,
        status: Option<TodoStatus>,
    ) -> Result<Todo, AppError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("title is required"));
        }

        let todo = Todo::new(trimmed, description, due_date, status);
        self.repository.save(&todo)
    }

    /// Applies a partial update to an existing todo. A miss is not an
    /// error: `None` comes back and nothing is written.
    pub fn update_todo(&mut self, id: &str, patch: &TodoPatch) -> Result<Option<Todo>, AppError> {
        let Some(mut todo) = self.repository.get_by_id(id)? else {
            return Ok(None);
        };

        todo.update(patch);
        self.repository.save(&todo).map(Some)
    }

    pub fn delete_todo(&mut self, id: &str) -> Result<bool, AppError> {
        // Load-before-delete mirrors the not-found path of update_todo,
        // even though delete reports existence on its own.
        if self.repository.get_by_id(id)?.is_none() {
            return Ok(false);
        }
        self.repository.delete(id)
    }

    pub fn get_todo_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        self.repository.get_by_id(id)
    }

    pub fn get_all_todos(&self) -> Result<Vec<Todo>, AppError> {
        self.repository.get_all()
    }

    pub fn get_todos_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, AppError> {
        self.repository.get_by_status(status)
    }

    pub fn search_todos(&self, query: &str) -> Result<Vec<Todo>, AppError> {
        if query.trim().is_empty() {
            return self.repository.get_all();
        }
        self.repository.search(query)
    }
}

/// Stable, non-mutating sort by due date. Todos without a deadline come
/// last in both directions; equal deadlines keep their input order.
pub fn sort_todos_by_due_date(todos: &[Todo], ascending: bool) -> Vec<Todo> {
    let mut sorted = todos.to_vec();
    sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(left), Some(right)) => {
            if ascending {
                left.cmp(&right)
            } else {
                right.cmp(&left)
            }
        }
    });
    sorted
}
