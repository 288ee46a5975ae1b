pub mod json_db;
