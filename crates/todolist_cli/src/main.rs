use clap::{CommandFactory, Parser};
use std::io::{self, BufRead};
use time::OffsetDateTime;
use todolist_core::config::{Palette, load_config_with_fallback, palette_for_theme};
use todolist_core::error::AppError;
use todolist_core::model::{Todo, TodoPatch, TodoStatus, parse_due_date};
use todolist_core::repo::json::JsonTodoRepository;
use todolist_core::storage::json_db::TodoDatabase;
use todolist_core::usecases::TodoUseCases;

mod cli;
mod view;

use cli::{Cli, Command};
use view::{ViewState, apply_view, parse_filter, parse_sort_key, render, render_detail};

/// The controller: owns the use-case facade and the current view state,
/// and re-renders the whole visible list after every state change.
struct App {
    use_cases: TodoUseCases<JsonTodoRepository>,
    view: ViewState,
    palette: Palette,
}

impl App {
    fn bootstrap() -> Result<App, AppError> {
        let loaded = load_config_with_fallback();
        if let Some(err) = loaded.error {
            eprintln!("WARNING: {err}");
        }
        let palette = palette_for_theme(loaded.config.theme.as_deref());

        let db = TodoDatabase::open_default()?;
        db.initialize()?;
        let repository = JsonTodoRepository::new(db);

        Ok(App {
            use_cases: TodoUseCases::new(repository),
            view: ViewState::default(),
            palette,
        })
    }

    fn render_current(&self) -> Result<(), AppError> {
        let todos = self.use_cases.get_all_todos()?;
        let visible = apply_view(&todos, &self.view);
        println!("{}", render(&visible, &self.view, &self.palette)?);
        Ok(())
    }
}

fn todo_json(todo: &Todo) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(todo.to_record()?).map_err(|err| AppError::storage(err.to_string()))
}

fn print_todos_json(todos: &[Todo]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(todos.len());
    for todo in todos {
        payload.push(todo_json(todo)?);
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn parse_due_flag(raw: &str) -> Result<Option<OffsetDateTime>, AppError> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_due_date(raw).map(Some)
}

fn parse_status_flag(raw: Option<&str>) -> Result<Option<TodoStatus>, AppError> {
    raw.map(TodoStatus::parse).transpose()
}

fn run_command(app: &mut App, cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Command::Add {
            title,
            description,
            due,
            status,
        } => {
            let due_date = due.as_deref().map(parse_due_date).transpose()?;
            let status = parse_status_flag(status.as_deref())?;
            let todo = app.use_cases.create_todo(&title, &description, due_date, status)?;

            if cli.json {
                println!("{}", todo_json(&todo)?);
            } else {
                println!("Added todo: {} ({})", todo.title, todo.id);
                app.render_current()?;
            }
        }
        Command::Edit {
            id,
            title,
            description,
            due,
            status,
        } => {
            let patch = TodoPatch {
                title,
                description,
                due_date: due.as_deref().map(parse_due_flag).transpose()?,
                status: parse_status_flag(status.as_deref())?,
            };

            match app.use_cases.update_todo(&id, &patch)? {
                Some(todo) => {
                    if cli.json {
                        println!("{}", todo_json(&todo)?);
                    } else {
                        println!("Updated todo: {} ({})", todo.title, todo.id);
                        app.render_current()?;
                    }
                }
                None => report_missing(&id, cli.json),
            }
        }
        Command::Delete { id } => {
            let deleted = app.use_cases.delete_todo(&id)?;
            if cli.json {
                println!("{}", serde_json::json!({ "id": id, "deleted": deleted }));
            } else if deleted {
                println!("Deleted todo: {id}");
                app.render_current()?;
            } else {
                println!("No todo found: {id}");
            }
        }
        Command::Status { id, status } => {
            let status = TodoStatus::parse(&status)?;
            let patch = TodoPatch {
                status: Some(status),
                ..TodoPatch::default()
            };

            match app.use_cases.update_todo(&id, &patch)? {
                Some(todo) => {
                    if cli.json {
                        println!("{}", todo_json(&todo)?);
                    } else {
                        println!("Set status {} on: {} ({})", status.as_str(), todo.title, todo.id);
                        app.render_current()?;
                    }
                }
                None => report_missing(&id, cli.json),
            }
        }
        Command::Done { id } => {
            let Some(current) = app.use_cases.get_todo_by_id(&id)? else {
                report_missing(&id, cli.json);
                return Ok(());
            };

            let next = if current.is_completed() {
                TodoStatus::NotStarted
            } else {
                TodoStatus::Done
            };
            let patch = TodoPatch {
                status: Some(next),
                ..TodoPatch::default()
            };

            if let Some(todo) = app.use_cases.update_todo(&id, &patch)? {
                if cli.json {
                    println!("{}", todo_json(&todo)?);
                } else {
                    println!("Set status {} on: {} ({})", next.as_str(), todo.title, todo.id);
                    app.render_current()?;
                }
            }
        }
        Command::Show { id } => match app.use_cases.get_todo_by_id(&id)? {
            Some(todo) => {
                if cli.json {
                    println!("{}", todo_json(&todo)?);
                } else {
                    println!("{}", render_detail(&todo)?);
                }
            }
            None => report_missing(&id, cli.json),
        },
        Command::List { filter, sort } => {
            if let Some(raw) = filter.as_deref() {
                app.view.filter = parse_filter(raw)?;
            }
            if let Some(raw) = sort.as_deref() {
                app.view.sort = parse_sort_key(raw)?;
            }

            if cli.json {
                let todos = app.use_cases.get_all_todos()?;
                print_todos_json(&apply_view(&todos, &app.view))?;
            } else {
                app.render_current()?;
            }
        }
        Command::Search { query } => {
            let matches = app.use_cases.search_todos(&query)?;
            let visible = apply_view(&matches, &app.view);
            if cli.json {
                print_todos_json(&visible)?;
            } else {
                println!("{}", render(&visible, &app.view, &app.palette)?);
            }
        }
        Command::Filter { filter } => {
            app.view.filter = parse_filter(&filter)?;
            app.render_current()?;
        }
        Command::Sort { sort } => {
            app.view.sort = parse_sort_key(&sort)?;
            app.render_current()?;
        }
    }

    Ok(())
}

fn report_missing(id: &str, json: bool) {
    if json {
        println!("null");
    } else {
        println!("No todo found: {id}");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::validation(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
        } else if in_quotes && ch == '\\' {
            escape = true;
        } else if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if in_quotes {
        return Err(AppError::validation("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_interactive(mut app: App) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::storage(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("todolist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(&mut app, cli) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    let interactive = args.next().is_none();

    let mut app = match App::bootstrap() {
        Ok(app) => app,
        Err(err) => {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
    };

    if interactive {
        if let Err(err) = run_interactive(app) {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(&mut app, cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
