//! Drawing for the TUI.

use super::status::StatusLevel;
use super::{App, AuthField, TaskInput, View};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

pub(super) fn draw(frame: &mut Frame, app: &App) {
    let [main, status] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

    match app.view {
        View::Login => draw_login(frame, app, main),
        View::Tasks => draw_tasks(frame, app, main),
    }
    draw_status(frame, app, status);
}

fn draw_login(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.register_mode {
        " Register "
    } else {
        " Log in "
    };
    let block = Block::bordered().title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut rows: Vec<(AuthField, &str, &str, bool)> = vec![
        (AuthField::Username, "Username", app.username_input.as_str(), false),
        (AuthField::Password, "Password", app.password_input.as_str(), true),
    ];
    if app.register_mode {
        rows.push((
            AuthField::Firstname,
            "First name",
            app.firstname_input.as_str(),
            false,
        ));
        rows.push((
            AuthField::Lastname,
            "Last name",
            app.lastname_input.as_str(),
            false,
        ));
    }

    let mut constraints = vec![Constraint::Length(1); rows.len()];
    constraints.push(Constraint::Min(0));
    let areas = Layout::vertical(constraints).split(inner);

    for (i, (field, label, value, masked)) in rows.iter().enumerate() {
        let shown = if *masked {
            "*".repeat(value.chars().count())
        } else {
            (*value).to_string()
        };
        let style = if app.auth_focus == *field {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let line = Line::from(vec![
            Span::styled(format!("{label:>11}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(shown, style),
        ]);
        frame.render_widget(Paragraph::new(line), areas[i]);
    }
}

fn draw_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let editing = app.input != TaskInput::None;
    let [list_area, input_area] = if editing {
        Layout::vertical([Constraint::Min(1), Constraint::Length(3)]).areas(area)
    } else {
        [area, Rect::default()]
    };

    let username = app.session.username.as_deref().unwrap_or("");
    let block = Block::bordered().title(format!(" Tasks · {username} "));

    if app.tasks.is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No tasks. Press 'a' to add one.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, list_area);
    } else {
        let items: Vec<ListItem> = app
            .tasks
            .tasks()
            .iter()
            .map(|task| {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                let style = if task.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{mark} ")),
                    Span::styled(task.name.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default();
        state.select(Some(app.selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }

    let editing_row = match &app.input {
        TaskInput::None => None,
        TaskInput::Add(buffer) => Some((" New task ", buffer.as_str())),
        TaskInput::Edit { buffer, .. } => Some((" Edit task ", buffer.as_str())),
    };
    if let Some((title, buffer)) = editing_row {
        let input = Paragraph::new(buffer).block(Block::bordered().title(title));
        frame.render_widget(input, input_area);
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(status) = &app.status {
        let style = match status.level {
            StatusLevel::Info => Style::default().fg(Color::Cyan),
            StatusLevel::Success => Style::default().fg(Color::Green),
            StatusLevel::Error => Style::default().fg(Color::Red),
        };
        Line::styled(status.text.clone(), style)
    } else {
        let hints = match app.view {
            View::Login => "Enter submit · Tab next field · Ctrl-R toggle register · Ctrl-C quit",
            View::Tasks => {
                "a add · e edit · space toggle · d delete · r reload · Ctrl-L logout · q quit"
            }
        };
        Line::styled(hints, Style::default().fg(Color::DarkGray))
    };
    frame.render_widget(Paragraph::new(line), area);
}
