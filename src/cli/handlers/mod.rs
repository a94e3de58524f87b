use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, default_config_path, read_config};
use crate::io::todo_io::{TodoError, expand_path, resolve_path};
use crate::model::{Config, TaskList};
use crate::ops::search::SearchQuery;
use crate::tui;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli
        .config
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(default_config_path);
    let config = read_config(&config_path)?;
    let files = resolve_files(&cli, &config, &config_path)?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => cmd_tui(files, &config),
        Commands::Add(args) => cmd_add(args, files),
        Commands::List(args) => cmd_list(args, files),
    }
}

/// The todo file and optional archive file, resolved and ready to open
pub struct Files {
    pub todo: PathBuf,
    pub archive: Option<PathBuf>,
}

/// CLI flags win over the config file. A todo file is required; the archive
/// is optional.
pub fn resolve_files(cli: &Cli, config: &Config, config_path: &Path) -> Result<Files, TodoError> {
    let todo = cli
        .todo
        .as_deref()
        .or(config.settings.file.as_deref())
        .ok_or_else(|| TodoError::NoTodoFile {
            config: config_path.to_path_buf(),
        })?;
    let todo = resolve_path(todo, "todo")?;
    let archive = cli
        .done
        .as_deref()
        .or(config.settings.archive.as_deref())
        .map(|done| resolve_path(done, "archive"))
        .transpose()?;
    Ok(Files { todo, archive })
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_tui(files: Files, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let bindings = config_io::load_key_bindings(config);
    let todos = TaskList::load(&files.todo, files.archive)?;
    log::info!("opening {} ({} tasks)", files.todo.display(), todos.len());
    tui::run(todos, bindings, config)
}

fn cmd_add(args: AddArgs, files: Files) -> Result<(), Box<dyn std::error::Error>> {
    let text = args.text.join(" ");
    let text = text.trim();
    if text.is_empty() {
        return Err("task text is empty".into());
    }
    let mut todos = TaskList::load(&files.todo, files.archive)?;
    let index = todos.append(text, args.date);
    todos.save()?;
    if let Some(task) = todos.get(index) {
        log::info!("added task {}: {}", index + 1, task.raw());
        println!("{}", format_task_line(task, 1));
    }
    Ok(())
}

fn cmd_list(args: ListArgs, files: Files) -> Result<(), Box<dyn std::error::Error>> {
    let todos = TaskList::load(&files.todo, files.archive)?;
    let query = args.search.as_deref().and_then(SearchQuery::parse);
    let tasks: Vec<_> = todos
        .filter_contexts_and_projects(&args.contexts, &args.projects)
        .filter(|t| query.as_ref().is_none_or(|q| q.matches(t)))
        .collect();

    if args.json {
        let results: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        let width = line_number_width(todos.len());
        for task in tasks {
            println!("{}", format_task_line(task, width));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("tdl").chain(args.iter().copied()))
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let tmp = TempDir::new().unwrap();
        let from_flag = tmp.path().join("flag.txt");
        let mut config = Config::default();
        config.settings.file = Some(tmp.path().join("config.txt").display().to_string());

        let cli = parse(&["--todo", from_flag.to_str().unwrap(), "list"]);
        let files = resolve_files(&cli, &config, Path::new("config.toml")).unwrap();
        assert_eq!(files.todo, fs::canonicalize(&from_flag).unwrap());
        assert!(files.archive.is_none());
    }

    #[test]
    fn test_config_file_used_without_flag() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.settings.file = Some(tmp.path().join("todo.txt").display().to_string());
        config.settings.archive = Some(tmp.path().join("done.txt").display().to_string());

        let files = resolve_files(&parse(&[]), &config, Path::new("config.toml")).unwrap();
        assert!(files.todo.ends_with("todo.txt"));
        assert!(files.archive.unwrap().ends_with("done.txt"));
        // Both were created empty
        assert!(tmp.path().join("todo.txt").exists());
        assert!(tmp.path().join("done.txt").exists());
    }

    #[test]
    fn test_missing_todo_file_setting() {
        let err = resolve_files(&parse(&[]), &Config::default(), Path::new("/x/config.toml"))
            .err()
            .unwrap();
        assert!(matches!(err, TodoError::NoTodoFile { .. }));
        assert!(err.to_string().contains("/x/config.toml"));
    }

    #[test]
    fn test_add_requires_text() {
        assert!(Cli::try_parse_from(["tdl", "add"]).is_err());
        let cli = parse(&["add", "--date", "Call", "mom"]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.text, vec!["Call", "mom"]);
                assert!(args.date);
            }
            _ => panic!("expected add"),
        }
    }
}
