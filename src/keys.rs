use crate::app::{App, MenuItem};
use crate::state::analyst::AnalystCommand;
use crate::state::messages::NetworkRequest;
use crate::state::refresher::NEWS_WINDOW_DAYS;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    analyst_commands: &mpsc::Sender<AnalystCommand>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    // The change popup swallows input until dismissed.
    if guard.state.alert.popup.is_some() {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter => guard.state.alert.dismiss_popup(),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Slate),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Changes),
        (_, Char('3'), _) => guard.update_tab(MenuItem::News),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Analysis),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Slate navigation
        (MenuItem::Slate, Char('j') | KeyCode::Down, KeyModifiers::NONE) => {
            guard.state.slate.game_down();
        }
        (MenuItem::Slate, Char('k') | KeyCode::Up, KeyModifiers::NONE) => {
            guard.state.slate.game_up();
        }
        (MenuItem::Slate, Char('h') | KeyCode::Left, _) => guard.state.slate.focus_side(false),
        (MenuItem::Slate, Char('l') | KeyCode::Right, _) => guard.state.slate.focus_side(true),
        (MenuItem::Slate, Char('J'), _) => guard.state.slate.player_down(),
        (MenuItem::Slate, Char('K'), _) => guard.state.slate.player_up(),

        // Slate actions
        (MenuItem::Slate, Char('t'), _) => {
            let date = guard.toggle_date();
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSlate { date }).await;
            return;
        }
        (MenuItem::Slate, Char('r'), _) => {
            let date = guard.state.slate.date;
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSlate { date }).await;
            return;
        }
        (MenuItem::Slate, Char('a'), _) => guard.toggle_auto_check(),
        (MenuItem::Slate, KeyCode::Enter, _) => {
            // Team stats for the focused side; the briefing follows
            // once the log lands.
            if let Some(team) = guard.state.slate.focused_team().map(|t| t.abbrev.clone()) {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::LoadTeamStats { team })
                    .await;
                return;
            }
        }
        (MenuItem::Slate, Char('p'), _) => {
            if let Some(command) = guard.build_projection_command() {
                guard.update_tab(MenuItem::Analysis);
                drop(guard);
                let _ = analyst_commands.send(command).await;
                return;
            }
        }
        (MenuItem::Slate, Char('g'), _) => {
            if let Some(command) = guard.build_matchup_command() {
                guard.update_tab(MenuItem::Analysis);
                drop(guard);
                let _ = analyst_commands.send(command).await;
                return;
            }
        }

        // Changes tab
        (MenuItem::Changes, Char('j') | KeyCode::Down, _) => {
            guard.state.changes.scroll_offset = guard.state.changes.scroll_offset.saturating_add(1);
        }
        (MenuItem::Changes, Char('k') | KeyCode::Up, _) => {
            guard.state.changes.scroll_offset = guard.state.changes.scroll_offset.saturating_sub(1);
        }
        (MenuItem::Changes, Char('c'), _) => {
            let teams: Vec<String> = guard
                .state
                .slate
                .slate
                .as_ref()
                .map(|s| s.teams().iter().map(|t| t.to_string()).collect())
                .unwrap_or_default();
            if !teams.is_empty() {
                drop(guard);
                let _ = network_requests
                    .send(NetworkRequest::CompareWithLastGame { teams })
                    .await;
                return;
            }
        }

        // News tab
        (MenuItem::News, Char('j') | KeyCode::Down, _) => {
            guard.state.news.scroll_offset = guard.state.news.scroll_offset.saturating_add(1);
        }
        (MenuItem::News, Char('k') | KeyCode::Up, _) => {
            guard.state.news.scroll_offset = guard.state.news.scroll_offset.saturating_sub(1);
        }
        (MenuItem::News, Char('c'), _) => guard.state.news.cycle_filter(),
        (MenuItem::News, Char('x'), _) => {
            guard.state.news.filter = None;
            guard.state.news.scroll_offset = 0;
        }
        (MenuItem::News, Char('n'), _) => {
            guard.state.news.refreshing = true;
            drop(guard);
            let _ = network_requests
                .send(NetworkRequest::RefreshNews { days: NEWS_WINDOW_DAYS })
                .await;
            return;
        }

        // Analysis tab
        (MenuItem::Analysis, Char('j') | KeyCode::Down, _) => {
            guard.state.analysis.scroll_offset =
                guard.state.analysis.scroll_offset.saturating_add(1);
        }
        (MenuItem::Analysis, Char('k') | KeyCode::Up, _) => {
            guard.state.analysis.scroll_offset =
                guard.state.analysis.scroll_offset.saturating_sub(1);
        }
        (MenuItem::Analysis, Char('h') | KeyCode::Left, _) => guard.state.analysis.prev_report(),
        (MenuItem::Analysis, Char('l') | KeyCode::Right, _) => guard.state.analysis.next_report(),
        (MenuItem::Analysis, Char('p'), _) => {
            guard.state.analysis.show_prompt = !guard.state.analysis.show_prompt;
            guard.state.analysis.scroll_offset = 0;
        }

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
