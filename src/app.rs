use std::io;
use std::path::PathBuf;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::export::ExportFormat;
use crate::fetch::Transport;
use crate::openmeteo::OpenMeteo;
use crate::pipeline::{self, Mode, Outcome, Request, Status, Tone};

const DEFAULT_PLACE: &str = "Delhi, India";
const FOOTER: &str = " Tab: next field   ↑/↓: mode   Enter: fetch   PgUp/PgDn: scroll   Esc: quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Place,
    Mode,
    Folder,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Place => Field::Mode,
            Field::Mode => Field::Folder,
            Field::Folder => Field::Place,
        }
    }

    fn prev(self) -> Self {
        match self {
            Field::Place => Field::Folder,
            Field::Mode => Field::Place,
            Field::Folder => Field::Mode,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Fetch,
    Quit,
}

pub struct App {
    place: String,
    folder: String,
    mode: Mode,
    format: ExportFormat,
    focus: Field,
    console: Vec<String>,
    status: Option<Status>,
    scroll: u16,
}

impl App {
    pub fn new(out_dir: Option<PathBuf>, format: ExportFormat) -> Self {
        Self {
            place: DEFAULT_PLACE.to_string(),
            folder: out_dir
                .map(|dir| dir.display().to_string())
                .unwrap_or_default(),
            mode: Mode::Current,
            format,
            focus: Field::Place,
            console: Vec::new(),
            status: None,
            scroll: 0,
        }
    }

    pub fn request(&self) -> Request {
        let folder = self.folder.trim();
        Request {
            place: self.place.clone(),
            mode: self.mode,
            out_dir: (!folder.is_empty()).then(|| PathBuf::from(folder)),
            format: self.format,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }
        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Enter => return Action::Fetch,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(5),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_add(5),
            code => match self.focus {
                Field::Mode => self.select_mode(code),
                Field::Place => edit(&mut self.place, code),
                Field::Folder => edit(&mut self.folder, code),
            },
        }
        Action::None
    }

    fn select_mode(&mut self, code: KeyCode) {
        let idx = Mode::ALL.iter().position(|m| *m == self.mode).unwrap_or(0);
        let len = Mode::ALL.len();
        self.mode = match code {
            KeyCode::Up | KeyCode::Left => Mode::ALL[(idx + len - 1) % len],
            KeyCode::Down | KeyCode::Right => Mode::ALL[(idx + 1) % len],
            _ => self.mode,
        };
    }

    /// Clears the console and status before a new fetch.
    pub fn begin_run(&mut self) {
        self.console.clear();
        self.status = None;
        self.scroll = 0;
    }

    pub fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    pub fn finish(&mut self, outcome: Outcome) {
        self.console
            .extend(outcome.console.lines().map(str::to_string));
    }
}

fn edit(text: &mut String, code: KeyCode) {
    match code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => {}
    }
}

pub fn run_app<B: Backend, T: Transport>(
    terminal: &mut Terminal<B>,
    api: &OpenMeteo<T>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, &app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.handle_key(key) {
            Action::Quit => return Ok(()),
            Action::Fetch => {
                app.begin_run();
                let request = app.request();
                let today = Local::now().date_naive();
                let outcome = {
                    let mut notify = |status: Status| {
                        app.set_status(status);
                        if let Err(err) = terminal.draw(|f| ui(f, &app)) {
                            warn!(%err, "redraw failed");
                        }
                    };
                    pipeline::invoke(api, &request, today, &mut notify)
                };
                app.finish(outcome);
            }
            Action::None => {}
        }
    }
}

fn panel(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::Cyan };
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Yellow),
        ))
        .title_alignment(Alignment::Left)
        .border_style(Style::default().fg(border))
        .border_type(BorderType::Rounded)
}

fn input<'a>(title: &'a str, value: &'a str, placeholder: &'a str, focused: bool) -> Paragraph<'a> {
    let line = if value.is_empty() {
        Line::from(Span::styled(
            format!(" {placeholder}"),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(" "),
            Span::styled(value, Style::default().fg(Color::Green)),
        ])
    };
    Paragraph::new(line).block(panel(title, focused))
}

fn mode_selector(app: &App) -> Paragraph<'_> {
    let lines: Vec<Line> = Mode::ALL
        .iter()
        .map(|mode| {
            if *mode == app.mode {
                Line::from(vec![
                    Span::raw(" (•) "),
                    Span::styled(
                        mode.label(),
                        Style::default()
                            .fg(Color::Green)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(format!(" ( ) {}", mode.label()))
            }
        })
        .collect();
    Paragraph::new(lines).block(panel("Mode", app.focus == Field::Mode))
}

fn status_line(status: Option<&Status>) -> Paragraph<'static> {
    let Some(status) = status else {
        return Paragraph::new("");
    };
    let color = match status.tone() {
        Tone::Progress => Color::Blue,
        Tone::Success => Color::Green,
        Tone::Failure => Color::Red,
    };
    Paragraph::new(Span::styled(
        format!(" {}", status.message()),
        Style::default().fg(color).add_modifier(Modifier::ITALIC),
    ))
}

fn cursor_in(area: Rect, value: &str) -> (u16, u16) {
    let offset = u16::try_from(value.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let last = area.x.saturating_add(area.width.saturating_sub(2));
    (area.x.saturating_add(offset).min(last), area.y + 1)
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(
        input(
            "City, Country",
            &app.place,
            "e.g. Delhi, India",
            app.focus == Field::Place,
        ),
        chunks[0],
    );
    f.render_widget(mode_selector(app), chunks[1]);
    f.render_widget(
        input(
            "Save folder",
            &app.folder,
            "folder for history downloads",
            app.focus == Field::Folder,
        ),
        chunks[2],
    );

    let console: Vec<Line> = app
        .console
        .iter()
        .map(|line| Line::from(format!(" {line}")))
        .collect();
    f.render_widget(
        Paragraph::new(console)
            .block(panel("Console Output", false))
            .wrap(Wrap { trim: false })
            .scroll((app.scroll, 0)),
        chunks[3],
    );

    f.render_widget(status_line(app.status.as_ref()), chunks[4]);
    f.render_widget(
        Paragraph::new(Span::styled(FOOTER, Style::default().fg(Color::DarkGray))),
        chunks[5],
    );

    match app.focus {
        Field::Place => f.set_cursor_position(cursor_in(chunks[0], &app.place)),
        Field::Folder => f.set_cursor_position(cursor_in(chunks[2], &app.folder)),
        Field::Mode => {}
    }
}
