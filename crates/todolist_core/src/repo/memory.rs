use crate::error::AppError;
use crate::model::{Todo, TodoRecord, TodoStatus};
use crate::repo::{TodoRepository, matches_query};
use std::collections::HashMap;

/// In-memory repository backed by flat records, so the same serialize and
/// deserialize paths run as with the durable backend. Used as the test
/// double and for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTodoRepository {
    records: HashMap<String, TodoRecord>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl TodoRepository for MemoryTodoRepository {
    fn save(&mut self, todo: &Todo) -> Result<Todo, AppError> {
        let record = todo.to_record()?;
        self.records.insert(record.id.clone(), record);
        Ok(todo.clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool, AppError> {
        Ok(self.records.remove(id).is_some())
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        self.records.get(id).map(Todo::from_record).transpose()
    }

    fn get_all(&self) -> Result<Vec<Todo>, AppError> {
        self.records.values().map(Todo::from_record).collect()
    }

    fn get_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, AppError> {
        self.records
            .values()
            .filter(|record| record.status == status.as_str())
            .map(Todo::from_record)
            .collect()
    }

    fn search(&self, query: &str) -> Result<Vec<Todo>, AppError> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return self.get_all();
        }

        self.records
            .values()
            .filter(|record| matches_query(&record.title, &record.description, &normalized))
            .map(Todo::from_record)
            .collect()
    }
}
