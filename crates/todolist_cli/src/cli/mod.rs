use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new todo
    ///
    /// Example: todolist add "Buy milk" --due 2025-12-24T18:00:00Z
    Add {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Due date in RFC 3339
        #[arg(long)]
        due: Option<String>,
        /// Initial status (NOT_STARTED, IN_PROGRESS, DONE)
        #[arg(long)]
        status: Option<String>,
    },
    /// Edit fields of a todo; omitted flags keep their current value
    ///
    /// Example: todolist edit todo-1 --title "Buy oat milk" --due none
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// New due date in RFC 3339, or "none" to clear the deadline
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a todo
    Delete {
        id: String,
    },
    /// Set a todo's status
    ///
    /// Example: todolist status todo-1 in-progress
    Status {
        id: String,
        status: String,
    },
    /// Toggle a todo between DONE and NOT_STARTED
    Done {
        id: String,
    },
    /// Show details of a single todo
    Show {
        id: String,
    },
    /// List todos; optional filter and sort become the active view
    ///
    /// Example: todolist list done --sort created-at
    List {
        /// all, not-started, in-progress or done
        filter: Option<String>,
        /// due-date or created-at
        #[arg(long)]
        sort: Option<String>,
    },
    /// Search todos by title or description
    Search {
        query: String,
    },
    /// Change the active filter (interactive mode)
    Filter {
        filter: String,
    },
    /// Change the active sort key (interactive mode)
    Sort {
        sort: String,
    },
}
