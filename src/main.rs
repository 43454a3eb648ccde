mod ai;
mod app;
mod components;
mod draw;
mod keys;
mod odds;
mod state;
mod store;
mod ui;

use crate::app::App;
use crate::state::analyst::{AnalystCommand, AnalystConfig, AnalystEvent, AnalystWorker};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::{NEWS_WINDOW_DAYS, PeriodicRefresher};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    tui_logger::init_logger(log::LevelFilter::Info)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let app = Arc::new(Mutex::new(App::new()));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (analyst_cmd_tx, analyst_cmd_rx) = mpsc::channel::<AnalystCommand>(100);
    let (analyst_evt_tx, analyst_evt_rx) = mpsc::channel::<AnalystEvent>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Analyst thread
    let analyst_worker = AnalystWorker {
        commands: analyst_cmd_rx,
        events: analyst_evt_tx,
        config: AnalystConfig::from_env(),
    };
    let analyst_task = tokio::spawn(analyst_worker.run());

    // Periodic slate/news refresh thread
    let periodic_updater = PeriodicRefresher::new(network_req_tx.clone(), app.clone());
    let periodic_task = tokio::spawn(periodic_updater.run());

    // Animation tick thread — drives the alert flash
    let anim_tx = ui_event_tx.clone();
    let animation_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            if anim_tx.send(UiEvent::AnimationTick).await.is_err() {
                break;
            }
        }
    });

    // Trigger initial loads
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        analyst_cmd_tx,
        analyst_evt_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    analyst_task.abort();
    periodic_task.abort();
    animation_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("courtside {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "courtside - NBA starting lineups terminal UI

Usage:
  courtside
  courtside --help
  courtside --version

Environment:
  OPENAI_API_KEY             Enables the AI analyst (projections, briefings)
  COURTSIDE_AI_MODEL         Chat model (default gpt-4o-mini)
  COURTSIDE_AI_BASE_URL      OpenAI-compatible endpoint override
  COURTSIDE_ODDS_FILE        Semicolon CSV with bookmaker player totals
  COURTSIDE_ROTOWIRE_COOKIE  Session cookie; needed for tomorrow's slate"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    analyst_commands: mpsc::Sender<AnalystCommand>,
    mut analyst_events: mpsc::Receiver<AnalystEvent>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw =
                    handle_ui_event(ui_event, &app, &network_requests, &analyst_commands).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &analyst_commands, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(event) = analyst_events.recv() => {
                handle_analyst_event(event, &app).await;
                if !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    analyst_commands: &mpsc::Sender<AnalystCommand>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let (needs_slate, date) = {
                let guard = app.lock().await;
                (guard.needs_initial_slate(), guard.state.slate.date)
            };
            if needs_slate {
                let _ = network_requests.send(NetworkRequest::LoadSlate { date }).await;
            }
            let _ = network_requests
                .send(NetworkRequest::RefreshNews { days: NEWS_WINDOW_DAYS })
                .await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests, analyst_commands).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::AnimationTick => {
            let mut guard = app.lock().await;
            let animating =
                guard.state.alert.flashes_left > 0 || guard.state.analysis.pending.is_some();
            guard.advance_animation();
            // Only redraw on ticks while something is actually animating.
            animating
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    analyst_commands: &mpsc::Sender<AnalystCommand>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::SlateLoaded { slate } => {
            let commands = {
                let mut guard = app.lock().await;
                guard.on_slate_loaded(slate)
            };
            // Auto-analysis for teams whose lineups changed.
            for command in commands {
                let _ = analyst_commands.send(command).await;
            }
        }
        NetworkResponse::RostersLoaded { rosters } => {
            let mut guard = app.lock().await;
            guard.on_rosters_loaded(rosters);
        }
        NetworkResponse::TeamStatsLoaded { log } => {
            let command = {
                let mut guard = app.lock().await;
                let command = guard.on_team_stats_loaded(log);
                if command.is_some() {
                    guard.update_tab(crate::app::MenuItem::Analysis);
                }
                command
            };
            if let Some(command) = command {
                let _ = analyst_commands.send(command).await;
            }
        }
        NetworkResponse::NewsRefreshed { articles, added } => {
            let mut guard = app.lock().await;
            guard.on_news_refreshed(articles, added);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    !loading.is_loading
}

async fn handle_analyst_event(event: AnalystEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    match event {
        AnalystEvent::Report(report) => guard.on_analysis_report(report),
        AnalystEvent::Unavailable(message) => guard.on_analyst_unavailable(message),
        AnalystEvent::Failed { key, message } => guard.on_analyst_failed(key, message),
    }
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
