use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use probewatch_types::TimeRange;

use crate::app::{App, View};

/// File written by the in-app export key.
pub const EXPORT_FILE: &str = "probewatch_export.json";

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    match key.code {
        KeyCode::Char('q') => return app.quit(),
        KeyCode::Char('?') => return app.toggle_help(),
        KeyCode::Char('r') => return app.refresh(),
        _ => {}
    }

    match app.view {
        View::MonitorList => handle_list_key(app, key),
        View::MonitorDetail => handle_detail_key(app, key),
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),
        KeyCode::Enter => app.enter_detail(),
        _ => {}
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Time range
        KeyCode::Char('t') | KeyCode::Char(']') | KeyCode::Right => app.next_time_range(),
        KeyCode::Char('T') | KeyCode::Char('[') | KeyCode::Left => app.prev_time_range(),
        KeyCode::Char(c @ '1'..='5') => {
            let idx = (c as usize) - ('1' as usize);
            app.set_time_range(TimeRange::ALL[idx]);
        }

        // Agent selection
        KeyCode::Char('a') | KeyCode::Down => app.next_agent(),
        KeyCode::Char('A') | KeyCode::Up => app.prev_agent(),
        KeyCode::Char('0') => app.select_all_agents(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(EXPORT_FILE);
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match (app.view, mouse.kind) {
        (View::MonitorList, MouseEventKind::ScrollUp) => app.select_prev(),
        (View::MonitorList, MouseEventKind::ScrollDown) => app.select_next(),
        (View::MonitorList, MouseEventKind::Down(MouseButton::Left)) => {
            // Rows start below the header bar, table border and table header
            if mouse.row > content_start_row {
                let item_row = (mouse.row - content_start_row - 1) as usize;
                if item_row < app.monitors().len() {
                    if app.selected_index == item_row {
                        app.enter_detail();
                    } else {
                        app.selected_index = item_row;
                    }
                }
            }
        }
        (View::MonitorDetail, MouseEventKind::ScrollUp) => app.prev_agent(),
        (View::MonitorDetail, MouseEventKind::ScrollDown) => app.next_agent(),
        (_, MouseEventKind::Down(MouseButton::Right)) => app.go_back(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::source::tests::FakeApi;
    use crate::source::Fetcher;
    use crate::ui::Theme;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn with_app(f: impl FnOnce(&mut App)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let _guard = rt.enter();
        let fetcher = Fetcher::current(Arc::new(FakeApi::default()));
        let mut app = App::with_theme(fetcher, AppOptions::default(), Theme::dark());
        f(&mut app);
    }

    #[test]
    fn test_quit() {
        with_app(|app| {
            handle_key_event(app, key(KeyCode::Char('q')));
            assert!(!app.running);
        });
    }

    #[test]
    fn test_help_swallows_next_key() {
        with_app(|app| {
            handle_key_event(app, key(KeyCode::Char('?')));
            assert!(app.show_help);
            handle_key_event(app, key(KeyCode::Char('q')));
            assert!(!app.show_help);
            assert!(app.running);
        });
    }

    #[test]
    fn test_range_keys() {
        with_app(|app| {
            app.open_monitor("m1");
            handle_key_event(app, key(KeyCode::Char('1')));
            assert_eq!(app.filter.time_range, TimeRange::OneHour);
            handle_key_event(app, key(KeyCode::Char('5')));
            assert_eq!(app.filter.time_range, TimeRange::SevenDays);
            handle_key_event(app, key(KeyCode::Char('t')));
            assert_eq!(app.filter.time_range, TimeRange::OneHour);
            handle_key_event(app, key(KeyCode::Char('T')));
            assert_eq!(app.filter.time_range, TimeRange::SevenDays);
        });
    }

    #[test]
    fn test_range_keys_ignored_in_list() {
        with_app(|app| {
            handle_key_event(app, key(KeyCode::Char('1')));
            assert_eq!(app.filter.time_range, TimeRange::OneDay);
        });
    }

    #[test]
    fn test_escape_returns_to_list() {
        with_app(|app| {
            app.open_monitor("m1");
            handle_key_event(app, key(KeyCode::Esc));
            assert_eq!(app.view, View::MonitorList);
        });
    }

    #[test]
    fn test_export_without_data_reports_failure() {
        with_app(|app| {
            app.open_monitor("m1");
            handle_key_event(app, key(KeyCode::Char('e')));
            let msg = app.get_status_message().unwrap_or_default();
            assert!(msg.starts_with("Export failed"));
        });
    }
}
