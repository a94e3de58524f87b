use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tdl", about = concat!("todoline v", env!("CARGO_PKG_VERSION"), " - a todo.txt task manager"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Todo file (overrides `file` in the config)
    #[arg(long, global = true, value_name = "PATH")]
    pub todo: Option<String>,

    /// Archive file for completed tasks (overrides `archive` in the config)
    #[arg(long, global = true, value_name = "PATH")]
    pub done: Option<String>,

    /// Config file [default: <config dir>/todoline/config.toml]
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Print the default key bindings as a [keys] table and exit
    #[arg(long)]
    pub show_default_bindings: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive task list (the default)
    Tui,
    /// Append a task to the todo file
    Add(AddArgs),
    /// Print tasks with their line numbers
    List(ListArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,

    /// Prefix today's date as the creation date
    #[arg(long)]
    pub date: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks matching this query (`-word` excludes)
    #[arg(long)]
    pub search: Option<String>,

    /// Only tasks with this context (repeatable; any match)
    #[arg(long = "context", value_name = "CONTEXT")]
    pub contexts: Vec<String>,

    /// Only tasks with this project (repeatable; any match)
    #[arg(long = "project", value_name = "PROJECT")]
    pub projects: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
