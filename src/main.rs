use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use f126_terminal::catalog::Catalog;
use f126_terminal::persist;
use f126_terminal::picks::{self, ChampionshipHalf};
use f126_terminal::present::{self, RankedEntry};
use f126_terminal::selection::FormState;
use f126_terminal::state::{AppState, Focus, Screen};
use f126_terminal::table::{self, UNSET};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.picker.is_some() {
            self.on_picker_key(key);
            return;
        }
        if self.state.fun_editing {
            self.on_fun_edit_key(key);
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.switch_screen(Screen::Season),
            KeyCode::Char('2') => self.switch_screen(Screen::Race),
            KeyCode::Char('3') => self.switch_screen(Screen::Fun),
            KeyCode::Char('u') | KeyCode::Char('U') => {
                self.state.cycle_user();
                persist::save_from_state(&self.state);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.state.screen == Screen::Race {
                    self.state.cycle_race();
                    persist::save_from_state(&self.state);
                }
            }
            KeyCode::Char('h') | KeyCode::Char('l') | KeyCode::Left | KeyCode::Right => {
                if self.state.screen == Screen::Season && self.state.focus == Focus::Form {
                    self.state.toggle_season_half();
                }
            }
            KeyCode::Tab => self.state.toggle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => match (self.state.screen, self.state.focus) {
                (Screen::Fun, Focus::Form) => self.state.fun_editing = true,
                (_, Focus::Form) => self.state.open_picker(),
                (_, Focus::Records) => {}
            },
            KeyCode::Char('i') => {
                if self.state.screen == Screen::Fun && self.state.focus == Focus::Form {
                    self.state.fun_editing = true;
                }
            }
            KeyCode::Char('c') => {
                if self.state.focus == Focus::Form {
                    self.state.clear_selected_slot();
                }
            }
            KeyCode::Char('s') => self.state.submit(),
            KeyCode::Char('x') => {
                if self.state.focus == Focus::Records {
                    self.state.delete_selected_record();
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Enter => self.state.accept_picker(),
            KeyCode::Esc | KeyCode::Char('q') => self.state.close_picker(),
            _ => {}
        }
    }

    fn on_fun_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.state.fun_editing = false,
            KeyCode::Enter => self.state.fun_text.push('\n'),
            KeyCode::Backspace => {
                self.state.fun_text.pop();
            }
            KeyCode::Char(c) => self.state.fun_text.push(c),
            _ => {}
        }
    }

    fn switch_screen(&mut self, screen: Screen) {
        self.state.set_screen(screen);
        self.state.sync_forms();
        persist::save_from_state(&self.state);
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let data_dir = table::data_dir();
    let catalog = match Catalog::load(&data_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("error: {err:#}");
            return Ok(());
        }
    };

    let mut state = AppState::new(data_dir, catalog);
    persist::load_into_state(&mut state);
    if let Err(err) = state.refresh() {
        state.push_log(format!("[WARN] initial load failed: {err}"));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state);
    let res = run_app(&mut terminal, &mut app);

    persist::save_from_state(&app.state);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Season => render_season(frame, chunks[1], &app.state),
        Screen::Race => render_race(frame, chunks[1], &app.state),
        Screen::Fun => render_fun(frame, chunks[1], &app.state),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.picker.is_some() {
        render_picker_overlay(frame, frame.size(), &app.state);
    }
    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Season => format!(
            "F1 2026 SEASON PREDICTIONS | User: {} | Half: {}",
            state.current_user(),
            match state.season_half {
                ChampionshipHalf::Drivers => "Drivers",
                ChampionshipHalf::Constructors => "Constructors",
            }
        ),
        Screen::Race => format!(
            "F1 2026 RACE PREDICTIONS | User: {} | Race: {}",
            state.current_user(),
            state
                .current_race()
                .map(|r| state.catalog.race_label(r))
                .unwrap_or_else(|| "none".to_string())
        ),
        Screen::Fun => format!("F1 2026 FUN PREDICTIONS | User: {}", state.current_user()),
    };
    let line1 = format!("  __  {title}");
    let line2 = " /oo\\".to_string();
    let line3 = " \\__/".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let hints = match (state.screen, state.focus) {
        (Screen::Season, Focus::Form) => {
            "1/2/3 Screen | u User | h/l Half | j/k Move | Enter Pick | c Clear | s Submit | Tab Records | ? Help | q Quit"
        }
        (Screen::Race, Focus::Form) => {
            "1/2/3 Screen | u User | r Race | j/k Move | Enter Pick | c Clear | s Submit | Tab Records | ? Help | q Quit"
        }
        (Screen::Fun, Focus::Form) => {
            "1/2/3 Screen | u User | Enter/i Edit | s Submit | Tab Records | ? Help | q Quit"
        }
        (_, Focus::Records) => {
            "1/2/3 Screen | j/k Move | x Delete | Tab Form | ? Help | q Quit"
        }
    };
    let status = state.last_log().unwrap_or("");
    format!("{hints}\n{status}")
}

fn render_season(frame: &mut Frame, area: Rect, state: &AppState) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let drivers_active =
        state.focus == Focus::Form && state.season_half == ChampionshipHalf::Drivers;
    let constructors_active =
        state.focus == Focus::Form && state.season_half == ChampionshipHalf::Constructors;

    render_form_column(
        frame,
        halves[0],
        "Drivers' Championship",
        &state.season_drivers,
        state,
        drivers_active,
        true,
    );
    render_form_column(
        frame,
        halves[1],
        "Constructors' Championship",
        &state.season_constructors,
        state,
        constructors_active,
        false,
    );
    render_season_records(frame, halves[2], state);
}

fn render_race(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_form_column(
        frame,
        cols[0],
        "Finishing Order",
        &state.race_form,
        state,
        state.focus == Focus::Form,
        true,
    );
    render_race_records(frame, cols[1], state);
}

fn render_fun(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let title = if state.fun_editing {
        "Your prediction (editing, Esc to stop)"
    } else {
        "Your prediction"
    };
    let border_style = if state.focus == Focus::Form {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let text = if state.fun_text.is_empty() && !state.fun_editing {
        "e.g. Bearman scores a podium before Round 5...".to_string()
    } else {
        state.fun_text.clone()
    };
    let editor = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
    frame.render_widget(editor, cols[0]);

    render_fun_records(frame, cols[1], state);
}

fn render_form_column(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &FormState,
    state: &AppState,
    active: bool,
    driver_labels: bool,
) {
    let border_style = if active {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let total = form.slot_count();
    let visible = inner.height as usize;
    let cursor = if active { state.slot_selected } else { 0 };
    let (start, end) = visible_range(cursor, total, visible);

    let mut lines: Vec<Line> = Vec::with_capacity(end - start);
    for i in start..end {
        let position = i + 1;
        let badge = present::pos_badge(position);
        let badge_style = Style::default()
            .fg(present::badge_color(badge))
            .add_modifier(Modifier::BOLD);
        let selected = active && i == cursor;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let value = match form.slot(i) {
            Some(name) if driver_labels => state.catalog.driver_label(name),
            Some(name) => name.to_string(),
            None => UNSET.to_string(),
        };
        let value_style = if form.slot(i).is_none() {
            row_style.fg(Color::DarkGray)
        } else {
            row_style
        };
        lines.push(Line::from(vec![
            Span::styled(format!("P{position:<3}"), badge_style),
            Span::styled(value, value_style),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_season_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = records_block("Current Predictions", state.focus == Focus::Records);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if state.season_table.rows.is_empty() {
        render_empty(frame, inner, "No season predictions yet");
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let mut spans: Vec<Span> = Vec::new();
    for i in 0..state.season_table.rows.len() {
        let user = state
            .season_table
            .get(i, "user")
            .unwrap_or_default()
            .to_string();
        let style = if i == state.record_selected && state.focus == Focus::Records {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {user} "), style));
        spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[0]);

    let idx = state.record_selected.min(state.season_table.rows.len() - 1);
    let user = state.season_table.get(idx, "user").unwrap_or_default();
    let driver_slots = picks::season_slots(&state.season_table, user, ChampionshipHalf::Drivers)
        .unwrap_or_default();
    let constructor_slots =
        picks::season_slots(&state.season_table, user, ChampionshipHalf::Constructors)
            .unwrap_or_default();

    let detail = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[1]);
    render_ranked(
        frame,
        detail[0],
        &format!("{user} — Drivers"),
        &present::rank_drivers(&driver_slots, &state.catalog),
    );
    render_ranked(
        frame,
        detail[1],
        &format!("{user} — Constructors"),
        &present::rank_constructors(&constructor_slots),
    );
}

fn render_race_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = records_block("Stored Predictions", state.focus == Focus::Records);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if state.race_table.rows.is_empty() {
        render_empty(frame, inner, "No race predictions yet");
        return;
    }

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(inner);

    let visible = cols[0].height as usize;
    let total = state.race_table.rows.len();
    let (start, end) = visible_range(state.record_selected, total, visible);
    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let race = state.race_table.get(i, "race").unwrap_or_default();
        let user = state.race_table.get(i, "user").unwrap_or_default();
        let style = if i == state.record_selected && state.focus == Focus::Records {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(format!("{race} — {user}"), style));
    }
    frame.render_widget(Paragraph::new(lines), cols[0]);

    let idx = state.record_selected.min(total - 1);
    let race = state.race_table.get(idx, "race").unwrap_or_default();
    let user = state.race_table.get(idx, "user").unwrap_or_default();
    let slots = picks::race_slots(&state.race_table, race, user).unwrap_or_default();
    render_ranked(
        frame,
        cols[1],
        &format!("{race} — {user}"),
        &present::rank_drivers(&slots, &state.catalog),
    );
}

fn render_fun_records(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = records_block("Hot Takes", state.focus == Focus::Records);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if state.fun_table.rows.is_empty() {
        render_empty(frame, inner, "No fun predictions yet — drop your hot takes here");
        return;
    }

    let visible = (inner.height as usize) / 2;
    let total = state.fun_table.rows.len();
    let (start, end) = visible_range(state.record_selected, total, visible.max(1));
    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let user = state.fun_table.get(i, "user").unwrap_or_default();
        let text = state.fun_table.get(i, "prediction").unwrap_or_default();
        let date = state.fun_table.get(i, "date_created").unwrap_or_default();
        let selected = i == state.record_selected && state.focus == Focus::Records;
        let meta_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{user} "), meta_style.add_modifier(Modifier::BOLD)),
            Span::styled(format!("({date})"), meta_style),
        ]));
        lines.push(Line::raw(format!("  {}", text.replace('\n', " "))));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_ranked(frame: &mut Frame, area: Rect, title: &str, entries: &[RankedEntry]) {
    let block = Block::default().borders(Borders::LEFT).title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::with_capacity(entries.len());
    for entry in entries.iter().take(inner.height as usize) {
        let badge = present::pos_badge(entry.position);
        let badge_style = Style::default()
            .fg(present::badge_color(badge))
            .add_modifier(Modifier::BOLD);
        let mut spans = vec![
            Span::styled(format!("P{:<3}", entry.position), badge_style),
            Span::raw(entry.name.clone()),
        ];
        match &entry.team {
            Some(team) => {
                spans.push(Span::raw("  "));
                spans.push(Span::styled(
                    team.clone(),
                    Style::default().fg(present::team_color(team)),
                ));
            }
            None => {
                // Constructor rows color the name itself; the name is the team.
                spans[1] = Span::styled(
                    entry.name.clone(),
                    Style::default().fg(present::team_color(&entry.name)),
                );
            }
        }
        lines.push(Line::from(spans));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_picker_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(picker) = &state.picker else {
        return;
    };
    let popup = centered_rect(40, 60, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(format!("P{}", picker.slot + 1));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    // Entry 0 clears the slot; stored options follow in catalog order.
    let total = picker.options.len() + 1;
    let visible = inner.height as usize;
    let (start, end) = visible_range(picker.selected, total, visible.max(1));
    let mut lines: Vec<Line> = Vec::new();
    for i in start..end {
        let label = if i == 0 {
            UNSET.to_string()
        } else {
            let name = &picker.options[i - 1];
            match state.screen {
                Screen::Season if state.season_half == ChampionshipHalf::Constructors => {
                    name.clone()
                }
                _ => state.catalog.driver_label(name),
            }
        };
        let style = if i == picker.selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else if i == 0 {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(label, style));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);
    let help = "\
1/2/3      Season / Race / Fun screen
u          Cycle user
r          Cycle race (race screen)
h/l        Switch championship half (season screen)
Tab        Switch between form and records
j/k ↑/↓    Move
Enter      Open slot picker / edit text
c          Clear slot
s          Submit
x          Delete selected record
?          Toggle help
q          Quit";
    let block = Block::default().borders(Borders::ALL).title("Help");
    frame.render_widget(Paragraph::new(help).block(block), popup);
}

fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let empty = Paragraph::new(message.to_string()).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(empty, area);
}

fn records_block(title: &str, active: bool) -> Block<'static> {
    let border_style = if active {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title.to_string())
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total <= visible {
        return (0, total);
    }
    let half = visible / 2;
    let start = selected.saturating_sub(half).min(total - visible);
    (start, start + visible)
}
