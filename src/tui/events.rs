//! Key handling for the TUI.

use super::status::StatusMessage;
use super::{App, AuthField, TaskInput, View};
use crate::api::TaskPatch;
use crate::session;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    pub(super) async fn handle_key(&mut self, key: KeyEvent) {
        // Errors persist until the next input.
        if self.status.as_ref().is_some_and(StatusMessage::is_error) {
            self.status = None;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.view {
            View::Login => self.handle_login_key(key).await,
            View::Tasks => self.handle_tasks_key(key).await,
        }
    }

    // --- Login view ---

    async fn handle_login_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.register_mode = !self.register_mode;
                self.auth_focus = AuthField::Username;
            }
            KeyCode::Tab | KeyCode::Down => self.focus_next_field(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev_field(),
            KeyCode::Enter => self.submit_auth().await,
            KeyCode::Backspace => {
                self.focused_field_mut().pop();
            }
            KeyCode::Char(c) => self.focused_field_mut().push(c),
            _ => {}
        }
    }

    fn auth_fields(&self) -> &'static [AuthField] {
        if self.register_mode {
            &[
                AuthField::Username,
                AuthField::Password,
                AuthField::Firstname,
                AuthField::Lastname,
            ]
        } else {
            &[AuthField::Username, AuthField::Password]
        }
    }

    fn focus_next_field(&mut self) {
        let fields = self.auth_fields();
        let current = fields.iter().position(|f| *f == self.auth_focus).unwrap_or(0);
        self.auth_focus = fields[(current + 1) % fields.len()];
    }

    fn focus_prev_field(&mut self) {
        let fields = self.auth_fields();
        let current = fields.iter().position(|f| *f == self.auth_focus).unwrap_or(0);
        self.auth_focus = fields[(current + fields.len() - 1) % fields.len()];
    }

    fn focused_field_mut(&mut self) -> &mut String {
        match self.auth_focus {
            AuthField::Username => &mut self.username_input,
            AuthField::Password => &mut self.password_input,
            AuthField::Firstname => &mut self.firstname_input,
            AuthField::Lastname => &mut self.lastname_input,
        }
    }

    async fn submit_auth(&mut self) {
        let result = if self.register_mode {
            session::register(
                &mut self.api,
                &self.store,
                &self.username_input,
                &self.firstname_input,
                &self.lastname_input,
                &self.password_input,
            )
            .await
        } else {
            session::login(
                &mut self.api,
                &self.store,
                &self.username_input,
                &self.password_input,
            )
            .await
        };

        match result {
            Ok(session) => {
                self.session = session;
                self.password_input.clear();
                self.view = View::Tasks;
                self.reload().await;
                // A load failure wins over the login confirmation.
                if !self.status.as_ref().is_some_and(StatusMessage::is_error) {
                    self.set_status(StatusMessage::success(if self.register_mode {
                        "Registered and logged in"
                    } else {
                        "Login successful"
                    }));
                }
            }
            Err(e) => {
                let what = if self.register_mode {
                    "Registration"
                } else {
                    "Login"
                };
                self.set_status(StatusMessage::error(format!("{what} failed: {e}")));
            }
        }
    }

    // --- Tasks view ---

    async fn handle_tasks_key(&mut self, key: KeyEvent) {
        if self.input != TaskInput::None {
            self.handle_input_key(key).await;
            return;
        }

        match key.code {
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => self.logout(),
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char(' ') => self.toggle_selected().await,
            KeyCode::Char('a') => self.input = TaskInput::Add(String::new()),
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('d') => self.delete_selected().await,
            KeyCode::Char('r') => self.reload().await,
            _ => {}
        }
    }

    async fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input = TaskInput::None,
            KeyCode::Enter => self.submit_input().await,
            KeyCode::Backspace => {
                if let Some(buffer) = self.input_buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(buffer) = self.input_buffer_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn input_buffer_mut(&mut self) -> Option<&mut String> {
        match &mut self.input {
            TaskInput::None => None,
            TaskInput::Add(buffer) => Some(buffer),
            TaskInput::Edit { buffer, .. } => Some(buffer),
        }
    }

    async fn submit_input(&mut self) {
        match std::mem::replace(&mut self.input, TaskInput::None) {
            TaskInput::None => {}
            TaskInput::Add(buffer) => self.add_task(&buffer).await,
            TaskInput::Edit { id, buffer } => self.rename_task(id, buffer).await,
        }
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.tasks.len() {
            self.selected = self.tasks.len().saturating_sub(1);
        }
    }

    // --- Operations ---

    pub(super) async fn reload(&mut self) {
        match self.tasks.load(&self.api).await {
            Ok(count) => {
                self.clamp_selection();
                self.set_status(StatusMessage::info(format!("Loaded {count} tasks")));
            }
            Err(e) => self.set_status(StatusMessage::error(format!("Failed to load tasks: {e}"))),
        }
    }

    async fn add_task(&mut self, name: &str) {
        match self.tasks.add(&self.api, name).await {
            Ok(task) => {
                self.selected = self.tasks.len().saturating_sub(1);
                self.set_status(StatusMessage::success(format!("Added \"{}\"", task.name)));
            }
            Err(e) => self.set_status(StatusMessage::error(format!("Failed to add task: {e}"))),
        }
    }

    async fn toggle_selected(&mut self) {
        let Some(task) = self.tasks.tasks().get(self.selected) else {
            return;
        };
        let id = task.id;

        // Optimistic flip; `update` itself never rewrites the cache.
        let Some(done) = self.tasks.toggle(id) else {
            return;
        };
        if let Err(e) = self
            .tasks
            .update(&self.api, id, &TaskPatch::completed(done))
            .await
        {
            self.set_status(StatusMessage::error(format!("Failed to update task: {e}")));
        }
    }

    fn start_edit(&mut self) {
        if let Some(task) = self.tasks.tasks().get(self.selected) {
            self.input = TaskInput::Edit {
                id: task.id,
                buffer: task.name.clone(),
            };
        }
    }

    async fn rename_task(&mut self, id: i64, name: String) {
        let name = name.trim().to_string();
        if name.is_empty() {
            self.set_status(StatusMessage::error("Enter a task name"));
            return;
        }

        self.tasks.rename_local(id, name.clone());
        if let Err(e) = self
            .tasks
            .update(&self.api, id, &TaskPatch::rename(name))
            .await
        {
            self.set_status(StatusMessage::error(format!("Failed to update task: {e}")));
        }
    }

    async fn delete_selected(&mut self) {
        let Some(task) = self.tasks.tasks().get(self.selected) else {
            return;
        };
        let id = task.id;

        match self.tasks.delete(&self.api, id).await {
            Ok(()) => {
                self.clamp_selection();
                self.set_status(StatusMessage::success("Task deleted"));
            }
            Err(e) => self.set_status(StatusMessage::error(format!("Failed to delete task: {e}"))),
        }
    }

    fn logout(&mut self) {
        self.session = session::logout(&mut self.api, &self.store);
        self.tasks.clear();
        self.selected = 0;
        self.input = TaskInput::None;
        self.view = View::Login;
        self.register_mode = false;
        self.password_input.clear();
        self.set_status(StatusMessage::success("Logged out"));
    }
}
