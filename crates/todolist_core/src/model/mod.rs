mod todo;

pub use todo::{Todo, TodoPatch, TodoRecord, TodoStatus, parse_due_date};
