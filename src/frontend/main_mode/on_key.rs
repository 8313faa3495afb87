use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::{
    chat_message::ChatMessage,
    commands::Command,
    frontend::app::App,
};

pub fn on_key(app: &mut App, key: KeyEvent) {
    // `Ctrl-s` to process the repository with the entered issue
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        let repo_url = app.repo_input.lines().join("\n");
        let issue_description = app.issue_input.lines().join("\n");

        app.send_ui_event(
            &mut ChatMessage::new_user(format!("Process {repo_url}: {issue_description}")),
        );
        app.dispatch_command(Command::ProcessRepository {
            repo_url,
            issue_description,
        });

        return;
    }

    // `Ctrl-o` to commit the reviewed changes
    if key.code == KeyCode::Char('o') && key.modifiers.contains(KeyModifiers::CONTROL) {
        let message = app.commit_input.lines().join("\n");

        app.send_ui_event(&mut ChatMessage::new_user(format!("Commit: {message}")));
        app.dispatch_command(Command::CommitChanges { message });

        return;
    }

    // `Ctrl-e` to echo the loaded configuration
    if key.code == KeyCode::Char('e') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.dispatch_command(Command::ShowConfig);
        return;
    }

    match key.code {
        KeyCode::Tab => app.focus = app.focus.next(),
        KeyCode::BackTab => app.focus = app.focus.prev(),
        KeyCode::End => {
            app.vertical_scroll = u16::MAX;
        }
        KeyCode::PageDown => {
            app.vertical_scroll = app.vertical_scroll.saturating_add(1);
        }
        KeyCode::PageUp => {
            app.vertical_scroll = app.vertical_scroll.saturating_sub(1);
        }
        _ => {
            app.focused_input().input(key);
        }
    }
}
