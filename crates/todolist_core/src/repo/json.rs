use crate::error::AppError;
use crate::model::{Todo, TodoStatus};
use crate::repo::{TodoRepository, matches_query};
use crate::storage::json_db::TodoDatabase;

/// Repository over the JSON document store. This layer only translates:
/// entities to flat records on write, records to entities on read, and
/// delete counts to a boolean. Validation belongs to the layers above.
#[derive(Debug)]
pub struct JsonTodoRepository {
    db: TodoDatabase,
}

impl JsonTodoRepository {
    pub fn new(db: TodoDatabase) -> Self {
        Self { db }
    }
}

impl TodoRepository for JsonTodoRepository {
    fn save(&mut self, todo: &Todo) -> Result<Todo, AppError> {
        self.db.put(&todo.to_record()?)?;
        Ok(todo.clone())
    }

    fn delete(&mut self, id: &str) -> Result<bool, AppError> {
        Ok(self.db.delete_by_id(id)? > 0)
    }

    fn get_by_id(&self, id: &str) -> Result<Option<Todo>, AppError> {
        self.db.get(id)?.map(|r| Todo::from_record(&r)).transpose()
    }

    fn get_all(&self) -> Result<Vec<Todo>, AppError> {
        self.db
            .scan()?
            .iter()
            .map(Todo::from_record)
            .collect()
    }

    fn get_by_status(&self, status: TodoStatus) -> Result<Vec<Todo>, AppError> {
        self.db
            .scan_by_status(status.as_str())?
            .iter()
            .map(Todo::from_record)
            .collect()
    }

    fn search(&self, query: &str) -> Result<Vec<Todo>, AppError> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return self.get_all();
        }

        // The store has no text index, so search is a predicate scan.
        self.db
            .filter_scan(|record| matches_query(&record.title, &record.description, &normalized))?
            .iter()
            .map(Todo::from_record)
            .collect()
    }
}
