use anyhow::Result;
use std::time::Duration;
use tui_logger::TuiWidgetState;
use tui_textarea::TextArea;
use uuid::Uuid;

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, ScrollbarState, Tabs},
};

use crossterm::event::{self, KeyCode, KeyEvent};

use tokio::sync::mpsc;
use tokio::task;

use crate::{
    chat_message::ChatMessage,
    commands::{Command, CommandEvent},
};

use super::{
    app_command_responder::AppCommandResponder, logs_mode, main_mode, ui_event::UIEvent,
};

const TICK_RATE: u64 = 250;

/// Handles user and TUI interaction
pub struct App<'a> {
    /// The repository URL input
    pub repo_input: TextArea<'a>,

    /// The issue description input
    pub issue_input: TextArea<'a>,

    /// The commit message input
    pub commit_input: TextArea<'a>,

    /// Which input currently receives key strokes
    pub focus: Focus,

    /// Everything the backend reported, oldest first
    pub feed: Vec<ChatMessage>,

    /// Progress line of the command currently running
    pub activity: Option<String>,

    /// A command is running; further dispatches are refused until it completes
    pub busy: bool,

    /// Holds the sender of UI events for later cloning if needed
    pub ui_tx: mpsc::UnboundedSender<UIEvent>,

    /// Receives UI events (key presses, commands, etc)
    pub ui_rx: mpsc::UnboundedReceiver<UIEvent>,

    /// Sends commands to the backend
    pub command_tx: Option<mpsc::UnboundedSender<CommandEvent>>,

    /// Converts backend responses into UI events
    responder: AppCommandResponder,

    /// Mode the app is in, manages which layout is rendered and if it should quit
    pub mode: AppMode,

    /// Tab names
    pub tab_names: Vec<&'static str>,

    /// Index of selected tab
    pub selected_tab: usize,

    /// States when viewing logs
    pub log_state: TuiWidgetState,

    pub vertical_scroll: u16,
    pub vertical_scroll_state: ScrollbarState,

    /// Rendered line count of the feed, updated on draw
    pub num_feed_lines: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum AppMode {
    #[default]
    Main,
    Logs,
    Quit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Focus {
    #[default]
    Repo,
    Issue,
    CommitMessage,
}

impl Focus {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Focus::Repo => Focus::Issue,
            Focus::Issue => Focus::CommitMessage,
            Focus::CommitMessage => Focus::Repo,
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.next().next()
    }
}

impl AppMode {
    fn on_key(self, app: &mut App, key: KeyEvent) {
        match self {
            AppMode::Main => main_mode::on_key(app, key),
            AppMode::Logs => logs_mode::on_key(app, key),
            AppMode::Quit => (),
        }
    }

    fn ui(self, f: &mut ratatui::Frame, area: Rect, app: &mut App) {
        match self {
            AppMode::Main => main_mode::ui(f, area, app),
            AppMode::Logs => logs_mode::ui(f, area, app),
            AppMode::Quit => (),
        }
    }

    fn tab_index(self) -> Option<usize> {
        match self {
            AppMode::Main => Some(0),
            AppMode::Logs => Some(1),
            AppMode::Quit => None,
        }
    }

    fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(AppMode::Main),
            1 => Some(AppMode::Logs),
            _ => None,
        }
    }
}

impl Default for App<'_> {
    fn default() -> Self {
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        let responder = AppCommandResponder::spawn_for(ui_tx.clone());

        Self {
            repo_input: new_text_area("https://github.com/owner/repo"),
            issue_input: new_text_area("Describe the issue to fix ..."),
            commit_input: new_text_area("Commit message for the fix"),
            focus: Focus::default(),
            feed: Vec::new(),
            activity: None,
            busy: false,
            ui_tx,
            ui_rx,
            command_tx: None,
            responder,
            mode: AppMode::default(),
            tab_names: vec!["[F1] Fix", "[F2] Logs"],
            selected_tab: 0,
            log_state: TuiWidgetState::new()
                .set_default_display_level(log::LevelFilter::Off)
                .set_level_for_target("repofix", log::LevelFilter::Info)
                .set_level_for_target("swiftide", log::LevelFilter::Info),
            vertical_scroll: 0,
            vertical_scroll_state: ScrollbarState::default(),
            num_feed_lines: 0,
        }
    }
}

fn new_text_area(placeholder: &str) -> TextArea<'static> {
    let mut text_area = TextArea::default();

    text_area.set_placeholder_text(placeholder.to_string());
    text_area.set_placeholder_style(Style::default().fg(Color::Gray));
    text_area.set_cursor_line_style(Style::reset());

    text_area
}

impl<'a> App<'a> {
    async fn recv_messages(&mut self) -> Option<UIEvent> {
        self.ui_rx.recv().await
    }

    pub fn send_ui_event(&self, msg: impl Into<UIEvent>) {
        let event = msg.into();
        tracing::debug!("Sending ui event {event}");
        if let Err(err) = self.ui_tx.send(event) {
            tracing::error!("Failed to send ui event {err}");
        }
    }

    pub fn focused_input(&mut self) -> &mut TextArea<'a> {
        match self.focus {
            Focus::Repo => &mut self.repo_input,
            Focus::Issue => &mut self.issue_input,
            Focus::CommitMessage => &mut self.commit_input,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        // Always quit on ctrl q
        if key.modifiers == crossterm::event::KeyModifiers::CONTROL
            && key.code == KeyCode::Char('q')
        {
            tracing::warn!("Ctrl-Q pressed, quitting");
            return self.send_ui_event(UIEvent::Quit);
        }

        if let KeyCode::F(index) = key.code {
            let index = index - 1;
            if let Some(mode) = AppMode::from_index(index as usize) {
                return self.change_mode(mode);
            }
        }

        self.mode.on_key(self, key);
    }

    fn change_mode(&mut self, mode: AppMode) {
        self.mode = mode;
        if let Some(index) = mode.tab_index() {
            self.selected_tab = index;
        }
    }

    /// Sends a command to the backend, refusing while one is still running
    #[tracing::instrument(skip(self))]
    pub fn dispatch_command(&mut self, command: Command) {
        if self.busy {
            self.add_feed_message(
                ChatMessage::new_system("A command is still running, please wait").build(),
            );
            return;
        }

        let uuid = Uuid::new_v4();
        let event = CommandEvent::builder()
            .command(command)
            .uuid(uuid)
            .responder(self.responder.for_command(uuid))
            .build();

        let event = match event {
            Ok(event) => event,
            Err(error) => {
                tracing::error!(?error, "Failed to build command event");
                return;
            }
        };

        let Some(command_tx) = self.command_tx.as_ref() else {
            tracing::error!("Command tx not set, dropping command");
            return;
        };

        if command_tx.send(event).is_err() {
            tracing::error!("Failed to dispatch command, backend gone");
            return;
        }

        self.busy = true;
    }

    fn add_feed_message(&mut self, message: ChatMessage) {
        self.feed.push(message);
        // Follow the tail unless the operator scrolled up
        self.vertical_scroll = u16::MAX;
    }

    fn handle_event(&mut self, event: UIEvent) {
        match event {
            UIEvent::Input(key) => self.on_key(key),
            UIEvent::Tick => (),
            UIEvent::ChatMessage(message) => self.add_feed_message(message),
            UIEvent::ActivityUpdate(_, state) => self.activity = Some(state),
            UIEvent::CommandDone(_) => {
                self.busy = false;
                self.activity = None;
            }
            UIEvent::ChangeMode(mode) => self.change_mode(mode),
            UIEvent::Quit => {
                if let Some(command_tx) = self.command_tx.as_ref() {
                    let _ = command_tx.send(CommandEvent::quit());
                }
                self.change_mode(AppMode::Quit);
            }
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn run<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        let handle = task::spawn(poll_ui_events(self.ui_tx.clone()));

        loop {
            terminal.draw(|f| {
                let base_area = self.draw_base_ui(f);
                self.mode.ui(f, base_area, self);
            })?;

            if self.mode == AppMode::Quit {
                break;
            }

            if let Some(event) = self.recv_messages().await {
                if !matches!(event, UIEvent::Tick | UIEvent::Input(_)) {
                    tracing::debug!("Received ui event: {event}");
                }
                self.handle_event(event);
            }
        }

        handle.abort();
        Ok(())
    }

    fn draw_base_ui(&self, f: &mut ratatui::Frame) -> Rect {
        let [tabs_area, remaining] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(f.area());

        let tabs = Tabs::new(self.tab_names.clone())
            .select(self.selected_tab)
            .block(Block::default().borders(Borders::BOTTOM))
            .highlight_style(Style::default().fg(Color::Yellow));

        f.render_widget(tabs, tabs_area);

        remaining
    }
}

async fn poll_ui_events(ui_tx: mpsc::UnboundedSender<UIEvent>) {
    loop {
        // Poll for input events
        if event::poll(Duration::from_millis(TICK_RATE)).unwrap_or(false) {
            if let Ok(event::Event::Key(key)) = event::read() {
                if ui_tx.send(key.into()).is_err() {
                    break;
                }
                continue;
            }
        }
        if ui_tx.send(UIEvent::Tick).is_err() {
            break;
        }
    }
}
