//! Interactive TUI mode.
//!
//! The app owns the session, the task cache, and the API client; key
//! handlers call the core operations and every operation resolves before
//! the next key is processed, so there is never more than one request in
//! flight.

mod events;
mod render;
mod status;

pub use status::{StatusLevel, StatusMessage};

use crate::api::ApiClient;
use crate::cli::{self, ClientSetup};
use crate::session::{Session, SessionStore};
use crate::tasks::TaskStore;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use std::time::Duration;

/// Which view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Tasks,
}

/// Input focus inside the auth form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Username,
    Password,
    Firstname,
    Lastname,
}

/// What the input line below the task list is editing, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInput {
    None,
    Add(String),
    Edit { id: i64, buffer: String },
}

/// Main TUI application state.
pub struct App {
    pub api: ApiClient,
    pub store: SessionStore,
    pub session: Session,
    pub tasks: TaskStore,
    pub view: View,
    pub register_mode: bool,
    pub auth_focus: AuthField,
    pub username_input: String,
    pub password_input: String,
    pub firstname_input: String,
    pub lastname_input: String,
    pub selected: usize,
    pub input: TaskInput,
    pub status: Option<StatusMessage>,
    pub should_quit: bool,
}

impl App {
    /// Restore the persisted session and, when authenticated, load tasks.
    pub async fn new() -> Result<Self> {
        let ClientSetup {
            api,
            store,
            session,
        } = cli::setup()?;

        let mut app = Self {
            api,
            store,
            session,
            tasks: TaskStore::new(),
            view: View::Login,
            register_mode: false,
            auth_focus: AuthField::Username,
            username_input: String::new(),
            password_input: String::new(),
            firstname_input: String::new(),
            lastname_input: String::new(),
            selected: 0,
            input: TaskInput::None,
            status: None,
            should_quit: false,
        };

        if app.session.is_authenticated() {
            app.view = View::Tasks;
            app.reload().await;
        }

        Ok(app)
    }

    pub(super) fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    fn drop_expired_status(&mut self) {
        if self.status.as_ref().is_some_and(StatusMessage::is_expired) {
            self.status = None;
        }
    }

    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.drop_expired_status();
            terminal.draw(|f| render::draw(f, self))?;

            if event::poll(Duration::from_millis(50))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key).await;
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }
}

/// Run the interactive TUI until the user quits.
pub async fn run() -> Result<()> {
    let mut app = App::new().await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run_loop(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
