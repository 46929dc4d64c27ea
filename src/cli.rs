//! CLI module for one-shot/non-interactive mode.

use crate::api::{ApiClient, TaskPatch};
use crate::config::Config;
use crate::session::{self, Session, SessionStore};
use crate::tasks::TaskStore;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Terminal client for a remote to-do service
#[derive(Parser, Debug)]
#[command(name = "tido", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (tracing to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to the task service
    Login(LoginArgs),
    /// Register a new account (logs in on success)
    Register(RegisterArgs),
    /// Log out and clear the stored session
    Logout,
    /// List tasks
    List,
    /// Add a task
    Add(AddArgs),
    /// Mark a task as done
    Done(IdArg),
    /// Reopen a completed task
    Undo(IdArg),
    /// Rename a task
    Rename(RenameArgs),
    /// Delete a task
    Rm(IdArg),
    /// View or modify configuration
    Config(ConfigArgs),
}

#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// Account username
    pub username: String,

    /// Password (prompted on stdin when omitted)
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Account username
    pub username: String,

    /// First name
    pub firstname: String,

    /// Last name
    pub lastname: String,

    /// Password (prompted on stdin when omitted)
    pub password: Option<String>,
}

#[derive(Parser, Debug)]
pub struct AddArgs {
    /// Task name
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct IdArg {
    /// Task id
    pub id: i64,
}

#[derive(Parser, Debug)]
pub struct RenameArgs {
    /// Task id
    pub id: i64,

    /// New name
    #[arg(required = true, num_args = 1..)]
    pub name: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Get a configuration value
    Get {
        /// Key to get (api_url)
        key: String,
    },
    /// Set a configuration value
    Set {
        /// Key to set (api_url)
        key: String,
        /// Value to set
        value: String,
    },
    /// Show config file path
    Path,
}

/// Initialize tracing to stderr when requested via flag or env var.
pub fn init_tracing(verbose: bool) {
    if verbose || std::env::var("TIDO_LOG").is_ok() {
        let filter = tracing_subscriber::EnvFilter::try_from_env("TIDO_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Client, session storage, and the session restored from disk.
pub struct ClientSetup {
    pub api: ApiClient,
    pub store: SessionStore,
    pub session: Session,
}

/// Load config, open session storage, and restore the persisted session.
pub fn setup() -> Result<ClientSetup> {
    let config = Config::load()?;
    let store = SessionStore::new()?;
    let mut api = ApiClient::new(config.api_url);
    let session = session::restore(&mut api, &store);

    Ok(ClientSetup {
        api,
        store,
        session,
    })
}

fn setup_authenticated() -> Result<ClientSetup> {
    let setup = setup()?;
    if !setup.session.is_authenticated() {
        anyhow::bail!("Not logged in. Run 'tido login <username>' first.");
    }
    Ok(setup)
}

/// Read the password from stdin when not given as an argument.
fn read_password(arg: Option<String>) -> Result<String> {
    if let Some(password) = arg {
        return Ok(password);
    }

    eprint!("Password: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Run the login command
pub async fn login(args: LoginArgs) -> ExitCode {
    match login_inner(args).await {
        Ok(username) => {
            println!("Logged in as {username}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Login failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn login_inner(args: LoginArgs) -> Result<String> {
    let ClientSetup {
        mut api, store, ..
    } = setup()?;
    let password = read_password(args.password)?;
    let session = session::login(&mut api, &store, &args.username, &password).await?;
    Ok(session.username.unwrap_or(args.username))
}

/// Run the register command
pub async fn register(args: RegisterArgs) -> ExitCode {
    match register_inner(args).await {
        Ok(username) => {
            println!("Registered and logged in as {username}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Registration failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn register_inner(args: RegisterArgs) -> Result<String> {
    let ClientSetup {
        mut api, store, ..
    } = setup()?;
    let password = read_password(args.password)?;
    let session = session::register(
        &mut api,
        &store,
        &args.username,
        &args.firstname,
        &args.lastname,
        &password,
    )
    .await?;
    Ok(session.username.unwrap_or(args.username))
}

/// Run the logout command
#[must_use]
pub fn logout() -> ExitCode {
    match setup() {
        Ok(ClientSetup {
            mut api, store, ..
        }) => {
            session::logout(&mut api, &store);
            println!("Logged out");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Logout failed: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run the list command
pub async fn list() -> ExitCode {
    match list_inner().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to load tasks: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn list_inner() -> Result<()> {
    let ClientSetup { api, .. } = setup_authenticated()?;
    let mut tasks = TaskStore::new();
    tasks.load(&api).await?;

    if tasks.is_empty() {
        println!("No tasks.");
        return Ok(());
    }

    for task in tasks.tasks() {
        let mark = if task.completed { "x" } else { " " };
        println!("[{mark}] {:>4}  {}", task.id, task.name);
    }
    Ok(())
}

/// Run the add command
pub async fn add(args: AddArgs) -> ExitCode {
    match add_inner(args).await {
        Ok((id, name)) => {
            println!("Added task {id}: {name}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to add task: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn add_inner(args: AddArgs) -> Result<(i64, String)> {
    let ClientSetup { api, .. } = setup_authenticated()?;
    let mut tasks = TaskStore::new();
    let task = tasks.add(&api, &args.name.join(" ")).await?;
    Ok((task.id, task.name))
}

/// Run the done/undo commands
pub async fn set_done(args: IdArg, done: bool) -> ExitCode {
    match set_done_inner(args.id, done).await {
        Ok(()) => {
            println!("Task {} marked as {}", args.id, if done { "done" } else { "open" });
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to update task: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn set_done_inner(id: i64, done: bool) -> Result<()> {
    let ClientSetup { api, .. } = setup_authenticated()?;
    let tasks = TaskStore::new();
    tasks.update(&api, id, &TaskPatch::completed(done)).await?;
    Ok(())
}

/// Run the rename command
pub async fn rename(args: RenameArgs) -> ExitCode {
    match rename_inner(args).await {
        Ok(()) => {
            println!("Task renamed");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to update task: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn rename_inner(args: RenameArgs) -> Result<()> {
    let ClientSetup { api, .. } = setup_authenticated()?;
    let tasks = TaskStore::new();
    tasks
        .update(&api, args.id, &TaskPatch::rename(args.name.join(" ")))
        .await?;
    Ok(())
}

/// Run the rm command
pub async fn rm(args: IdArg) -> ExitCode {
    match rm_inner(args.id).await {
        Ok(()) => {
            println!("Task deleted");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to delete task: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn rm_inner(id: i64) -> Result<()> {
    let ClientSetup { api, .. } = setup_authenticated()?;
    let mut tasks = TaskStore::new();
    tasks.delete(&api, id).await?;
    Ok(())
}

/// Run the config command
#[must_use]
pub fn config(args: ConfigArgs) -> ExitCode {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {e}");
            return ExitCode::FAILURE;
        }
    };

    match args.action {
        None => {
            println!("api_url: {}", config.api_url);
            ExitCode::SUCCESS
        }
        Some(ConfigAction::Path) => {
            println!("{}", Config::path().display());
            ExitCode::SUCCESS
        }
        Some(ConfigAction::Get { key }) => match key.as_str() {
            "api_url" => {
                println!("{}", config.api_url);
                ExitCode::SUCCESS
            }
            _ => {
                eprintln!("Unknown key: {key}. Valid keys: api_url");
                ExitCode::FAILURE
            }
        },
        Some(ConfigAction::Set { key, value }) => {
            let mut config = config;
            match key.as_str() {
                "api_url" => config.api_url = value,
                _ => {
                    eprintln!("Unknown key: {key}. Valid keys: api_url");
                    return ExitCode::FAILURE;
                }
            }
            if let Err(e) = config.save() {
                eprintln!("Failed to save config: {e}");
                return ExitCode::FAILURE;
            }
            println!("Updated {key}");
            ExitCode::SUCCESS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // --- CLI parsing tests ---

    #[test]
    fn test_parse_no_args() {
        let cli = Cli::try_parse_from(["tido"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_verbose_global() {
        let cli = Cli::try_parse_from(["tido", "-v", "list"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_parse_login_with_password() {
        let cli = Cli::try_parse_from(["tido", "login", "ann", "secret"]).unwrap();
        if let Some(Commands::Login(args)) = cli.command {
            assert_eq!(args.username, "ann");
            assert_eq!(args.password.as_deref(), Some("secret"));
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_parse_login_without_password() {
        let cli = Cli::try_parse_from(["tido", "login", "ann"]).unwrap();
        if let Some(Commands::Login(args)) = cli.command {
            assert!(args.password.is_none());
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_parse_register() {
        let cli = Cli::try_parse_from(["tido", "register", "ann", "Ann", "Lee", "pw"]).unwrap();
        if let Some(Commands::Register(args)) = cli.command {
            assert_eq!(args.username, "ann");
            assert_eq!(args.firstname, "Ann");
            assert_eq!(args.lastname, "Lee");
            assert_eq!(args.password.as_deref(), Some("pw"));
        } else {
            panic!("Expected Register command");
        }
    }

    #[test]
    fn test_parse_add_joins_words() {
        let cli = Cli::try_parse_from(["tido", "add", "Buy", "milk"]).unwrap();
        if let Some(Commands::Add(args)) = cli.command {
            assert_eq!(args.name.join(" "), "Buy milk");
        } else {
            panic!("Expected Add command");
        }
    }

    #[test]
    fn test_parse_add_requires_name() {
        assert!(Cli::try_parse_from(["tido", "add"]).is_err());
    }

    #[test]
    fn test_parse_done_and_undo() {
        let cli = Cli::try_parse_from(["tido", "done", "7"]).unwrap();
        if let Some(Commands::Done(args)) = cli.command {
            assert_eq!(args.id, 7);
        } else {
            panic!("Expected Done command");
        }

        let cli = Cli::try_parse_from(["tido", "undo", "7"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Undo(_))));
    }

    #[test]
    fn test_parse_rename() {
        let cli = Cli::try_parse_from(["tido", "rename", "3", "Water", "plants"]).unwrap();
        if let Some(Commands::Rename(args)) = cli.command {
            assert_eq!(args.id, 3);
            assert_eq!(args.name.join(" "), "Water plants");
        } else {
            panic!("Expected Rename command");
        }
    }

    #[test]
    fn test_parse_rm() {
        let cli = Cli::try_parse_from(["tido", "rm", "9"]).unwrap();
        if let Some(Commands::Rm(args)) = cli.command {
            assert_eq!(args.id, 9);
        } else {
            panic!("Expected Rm command");
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["tido", "done", "seven"]).is_err());
    }

    #[test]
    fn test_parse_config_actions() {
        let cli = Cli::try_parse_from(["tido", "config"]).unwrap();
        if let Some(Commands::Config(args)) = cli.command {
            assert!(args.action.is_none());
        } else {
            panic!("Expected Config command");
        }

        let cli = Cli::try_parse_from(["tido", "config", "set", "api_url", "http://x"]).unwrap();
        if let Some(Commands::Config(ConfigArgs {
            action: Some(ConfigAction::Set { key, value }),
        })) = cli.command
        {
            assert_eq!(key, "api_url");
            assert_eq!(value, "http://x");
        } else {
            panic!("Expected Config set");
        }
    }
}
