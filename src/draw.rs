use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::banner::{BANNER_HEIGHT, Banner};
use crate::components::cards;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use tui::backend::Backend;

static TABS: &[&str; 4] = &["Slate", "Changes", "News", "Analysis"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            if app.state.show_intro {
                draw_intro(f, f.area(), app);
                return;
            }

            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Slate => draw_slate(f, layout.main, app),
                MenuItem::Changes => draw_changes(f, layout.main, app),
                MenuItem::News => draw_news(f, layout.main, app),
                MenuItem::Analysis => draw_analysis(f, layout.main, app),
                MenuItem::Help => draw_placeholder(
                    f,
                    layout.main,
                    "Keys: q=quit  1=Slate 2=Changes 3=News 4=Analysis\n\
                     Slate: j/k=game  h/l=side  J/K=player  Enter=team stats+AI  p=projection  g=matchup\n\
                     t=today/tomorrow  r=refresh  a=auto-check  c(Changes)=vs last game  n(News)=refresh\n\
                     f=fullscreen  \"=logs  ?=help",
                ),
            }

            if app.state.show_logs {
                draw_logs_pane(f, layout.main);
            }
            draw_change_popup(f, f.area(), app);
            draw_loading_spinner(f, f.area(), app, loading);
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_intro(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Courtside ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [_top_pad, banner_area, prompt_area, _bottom_pad] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(BANNER_HEIGHT),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(
        Banner { flash: app.state.alert.flash_on(app.state.animation.tick) },
        banner_area,
    );
    f.render_widget(
        Paragraph::new("Press Enter to view today's slate")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        prompt_area,
    );
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Slate => 0,
        MenuItem::Changes => 1,
        MenuItem::News => 2,
        MenuItem::Analysis => 3,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_slate(f: &mut Frame, area: Rect, app: &App) {
    let border_color = if app.state.alert.flash_on(app.state.animation.tick) {
        Color::Red
    } else {
        Color::White
    };
    let block = default_border(border_color).title(" Slate ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(slate) = app.state.slate.slate.as_ref() else {
        let msg = if let Some(err) = app.state.last_error.as_deref() {
            format!("Slate load failed:\n{err}")
        } else {
            "Loading lineups...".to_string()
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)])
            .areas(inner);

    let auto = if app.settings.auto_check { "auto" } else { "manual" };
    let source = if app.state.slate.from_cache { " (cache)" } else { "" };
    let header_text = format!(
        "{} games {} | {} | last check {}{source}",
        slate.games.len(),
        slate.date.label(),
        auto,
        app.state.slate.last_checked.as_deref().unwrap_or("never"),
    );
    f.render_widget(Paragraph::new(header_text), header);
    f.render_widget(
        Paragraph::new("j/k=game  h/l=side  J/K=player  Enter=team AI  p=projection  g=matchup  t=date  r=refresh")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    if slate.games.is_empty() {
        f.render_widget(
            Paragraph::new("No NBA games on this slate")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            content,
        );
        return;
    }

    let [list_area, detail_area] = if content.width >= 90 {
        let [l, r] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                .areas(content);
        [l, r]
    } else {
        let [t, b] =
            Layout::vertical([Constraint::Length(slate.games.len().min(10) as u16 + 2), Constraint::Fill(1)])
                .areas(content);
        [t, b]
    };

    draw_game_list(f, list_area, app);
    draw_game_detail(f, detail_area, app);
}

fn draw_game_list(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::DarkGray).title(" Games ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(slate) = app.state.slate.slate.as_ref() else {
        return;
    };

    let visible = inner.height as usize;
    let selected = app.state.slate.selected_game;
    // Keep the selection in the window.
    let start = selected.saturating_sub(visible.saturating_sub(1));
    let lines: Vec<Line> = slate
        .games
        .iter()
        .enumerate()
        .skip(start)
        .take(visible)
        .map(|(idx, game)| cards::game_row(game, idx == selected))
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_game_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.state.slate.selected_game() else {
        return;
    };

    let title = format!(" {} @ {} ", game.away.abbrev, game.home.abbrev);
    let block = default_border(Color::DarkGray).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.width < 10 || inner.height < 3 {
        return;
    }

    let [away_col, home_col] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(inner);

    let focus_home = app.state.slate.focus_home;
    let cursor = app.state.slate.selected_player;
    f.render_widget(
        Paragraph::new(cards::lineup_lines(&game.away, !focus_home, cursor)),
        away_col,
    );
    f.render_widget(
        Paragraph::new(cards::lineup_lines(&game.home, focus_home, cursor)),
        home_col,
    );
}

fn draw_changes(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Changes ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 4 {
        return;
    }

    let [log_area, compare_area] =
        Layout::vertical([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(inner);

    // Intraday position diffs, newest last.
    let mut lines = vec![Line::from(Span::styled(
        "Detected changes (this slate):",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if app.state.changes.log.is_empty() {
        lines.push(Line::from(Span::styled(
            "  none yet — lineups are re-checked every 3 minutes",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for change in &app.state.changes.log {
        lines.push(Line::from(format!(
            "  [{}] {} {} {}: {} -> {}",
            change.time,
            change.game,
            change.team,
            change.position.label(),
            change.old_player,
            change.new_player
        )));
    }
    let offset = app.state.changes.scroll_offset as usize;
    let visible = log_area.height as usize;
    let window: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    f.render_widget(Paragraph::new(window), log_area);

    // Today vs. last real game.
    let mut cmp_lines = vec![Line::from(Span::styled(
        match app.state.changes.compared_at.as_deref() {
            Some(at) => format!("Vs last game (press c to refresh, loaded {at}):"),
            None => "Vs last game: press c to load".to_string(),
        },
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    if app.state.changes.comparisons.is_empty() && app.state.changes.compared_at.is_some() {
        cmp_lines.push(Line::from(Span::styled(
            "  no starter changes from last games",
            Style::default().fg(Color::Green),
        )));
    }
    for cmp in &app.state.changes.comparisons {
        cmp_lines.push(Line::from(Span::styled(
            format!("  {} — last: {} ({}) {}", cmp.team, cmp.matchup, cmp.result, cmp.last_date),
            Style::default().fg(Color::Gray),
        )));
        if !cmp.delta.new_starters.is_empty() {
            cmp_lines.push(Line::from(Span::styled(
                format!("    + NEW: {}", cmp.delta.new_starters.join(", ")),
                Style::default().fg(Color::Green),
            )));
        }
        if !cmp.delta.removed_starters.is_empty() {
            cmp_lines.push(Line::from(Span::styled(
                format!("    - OUT: {}", cmp.delta.removed_starters.join(", ")),
                Style::default().fg(Color::Red),
            )));
        }
    }
    let window: Vec<Line> = cmp_lines
        .into_iter()
        .take(compare_area.height as usize)
        .collect();
    f.render_widget(Paragraph::new(window), compare_area);
}

fn draw_news(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.state.news.filter.as_deref() {
        Some(team) => format!(" News — {} ", lineup_api::teams::team_name(team)),
        None => " News ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let mut lines = Vec::new();
    let status = if app.state.news.refreshing {
        "refreshing...".to_string()
    } else {
        format!(
            "{} articles | updated {} | j/k=scroll c=filter x=clear n=refresh",
            app.state.news.visible().len(),
            app.state.news.last_refresh.as_deref().unwrap_or("never")
        )
    };
    lines.push(Line::from(Span::styled(status, Style::default().fg(Color::DarkGray))));
    lines.push(Line::from(""));

    for article in app.state.news.visible() {
        let date = article
            .published_at
            .map(|d| d.format("%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "??-??".to_string());
        let tags = if article.teams.is_empty() {
            String::new()
        } else {
            format!("  [{}]", article.teams.join(","))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("[{date}] "), Style::default().fg(Color::DarkGray)),
            Span::styled(article.title.clone(), Style::default().fg(Color::White)),
            Span::styled(tags, Style::default().fg(Color::Cyan)),
        ]));
        if !article.author.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("        {}", article.author),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let offset = app.state.news.scroll_offset as usize;
    let visible = inner.height as usize;
    let window: Vec<Line> = lines.into_iter().skip(offset).take(visible).collect();
    f.render_widget(Paragraph::new(window), inner);
}

fn draw_analysis(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Analysis ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if inner.height < 3 {
        return;
    }

    let [header, body] =
        Layout::vertical([Constraint::Length(2), Constraint::Fill(1)]).areas(inner);

    let mut header_lines = Vec::new();
    if let Some(message) = app.state.analysis.unavailable.as_deref() {
        header_lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red),
        )));
    } else if let Some(pending) = app.state.analysis.pending.as_deref() {
        header_lines.push(Line::from(Span::styled(
            format!("AI анализирует... ({pending})"),
            Style::default().fg(Color::Magenta),
        )));
    } else if app.state.analysis.reports.is_empty() {
        header_lines.push(Line::from(Span::styled(
            "No reports yet. On the Slate tab: Enter=team, p=player projection, g=matchup.",
            Style::default().fg(Color::DarkGray),
        )));
    }
    if let Some(report) = app.state.analysis.current() {
        header_lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "[{}/{}] ",
                    app.state.analysis.selected + 1,
                    app.state.analysis.reports.len()
                ),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                report.title.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({}; h/l=switch, p=prompt)", report.kind.label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }
    f.render_widget(Paragraph::new(header_lines), header);

    if let Some(report) = app.state.analysis.current() {
        let text = if app.state.analysis.show_prompt {
            report.prompt.as_str()
        } else {
            report.text.as_str()
        };
        f.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .scroll((app.state.analysis.scroll_offset, 0)),
            body,
        );
    }
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

/// Modal overlay listing detected changes; Esc/Enter dismisses.
fn draw_change_popup(f: &mut Frame, area: Rect, app: &App) {
    let Some(changes) = app.state.alert.popup.as_ref() else {
        return;
    };

    let height = (changes.len().min(10) as u16 + 6).min(area.height);
    let width = 60.min(area.width);
    let popup = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    f.render_widget(Clear, popup);
    let block = default_border(Color::Red).title(" LINEUP CHANGES! ");
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} change(s) detected", changes.len()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for change in changes.iter().take(10) {
        lines.push(Line::from(format!(
            "{} {}: {} -> {}",
            change.team,
            change.position.label(),
            change.old_player,
            change.new_player
        )));
    }
    if changes.len() > 10 {
        lines.push(Line::from(Span::styled(
            format!("...and {} more", changes.len() - 10),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/Enter to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs_pane(f: &mut Frame, area: Rect) {
    let height = (area.height / 3).max(6).min(area.height);
    let pane = Rect::new(area.x, area.y + area.height - height, area.width, height);
    f.render_widget(Clear, pane);
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray));
    f.render_widget(widget, pane);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
