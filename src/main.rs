mod app;
mod calendar;
mod components;
mod config;
mod controller;
mod event;
mod theme;
mod tui;

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use app::{App, Focus, InputMode};
use calendar::{EventStore, FileStore, KeyValueStore, MemoryStore, SystemClock};
use color_eyre::Result;
use config::Config;
use controller::CalendarController;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use theme::Theme;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "month-calendar.log";

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load();
    let config_error = config.as_ref().err().map(ToString::to_string);
    let config = config.unwrap_or_default();
    theme::install(Theme::from_config(&config.theme));

    let data_dir = config.data_dir();
    if let Some(ref dir) = data_dir {
        if let Err(e) = init_logging(dir, config.log_level()) {
            eprintln!("Logging disabled: {}", e);
        }
    }
    if let Some(e) = config_error {
        warn!(error = %e, "ignoring config file");
    }

    let backend: Box<dyn KeyValueStore> = match data_dir {
        Some(dir) => {
            let store = FileStore::new(dir);
            info!(dir = %store.dir().display(), "using file storage");
            Box::new(store)
        }
        None => {
            warn!("no data directory available, events will not be kept after exit");
            Box::new(MemoryStore::new())
        }
    };

    let controller = CalendarController::new(EventStore::load(backend), Box::new(SystemClock));
    let mut app = App::new(controller);

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    info!("exiting");
    result
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging(dir: &Path, level: &str) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();
        terminal.draw(|frame| draw(frame, app))?;

        let Some(key) = event::next_key_press(Duration::from_millis(250))? else {
            continue;
        };

        // Clear status message on any key
        app.status_message = None;

        if app.show_help {
            if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                app.show_help = false;
            }
            continue;
        }

        if app.show_detail {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => app.show_detail = false,
                KeyCode::Char('d') => app.delete_selected_event(),
                _ => {}
            }
            continue;
        }

        match app.input_mode {
            InputMode::Form => handle_form_input(app, key.code),
            InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_event_form(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => app.toggle_focus(),
        _ => match app.focus {
            Focus::Grid => handle_grid_input(app, code),
            Focus::Upcoming => handle_upcoming_input(app, code),
        },
    }
}

fn handle_grid_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Left | KeyCode::Char('h') => app.move_selection(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-7),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(7),
        KeyCode::Enter => app.click_selected_cell(),
        _ => {}
    }
}

fn handle_upcoming_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.scroll_upcoming(-1),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_upcoming(1),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('d') | KeyCode::Delete => app.delete_selected_event(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab => app.form_tab(),
        KeyCode::BackTab => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(view) = app.screen.view() else {
        return;
    };

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = layout[0];

    let (calendar_area, upcoming_area) = if content.width >= 60 {
        let columns = Layout::horizontal([
            Constraint::Length(components::month_view::MONTH_VIEW_WIDTH),
            Constraint::Min(20),
        ])
        .split(content);
        (columns[0], columns[1])
    } else {
        let rows = Layout::vertical([
            Constraint::Length(components::month_view::MONTH_VIEW_HEIGHT + 5),
            Constraint::Min(3),
        ])
        .split(content);
        (rows[0], rows[1])
    };

    let left = Layout::vertical([
        Constraint::Length(components::month_view::MONTH_VIEW_HEIGHT),
        Constraint::Min(0),
    ])
    .split(calendar_area);

    components::MonthView::render(
        frame,
        left[0],
        view,
        app.selected_cell,
        app.focus == Focus::Grid,
    );
    components::DayView::render(frame, left[1], app.selected_date(), app.selected_day_events());
    components::UpcomingList::render(
        frame,
        upcoming_area,
        &view.upcoming,
        app.upcoming_index,
        app.focus == Focus::Upcoming,
    );

    if let Some(ref form) = app.form_state {
        components::EventForm::render(frame, area, form);
    }

    if app.show_detail {
        if let Some(item) = app.selected_upcoming() {
            components::day_view::render_detail_popup(frame, area, item);
        }
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(frame, layout[1], app);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();

    let popup_w = area.width.clamp(30, 52);
    let popup_h = area.height.clamp(12, 20);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h).intersection(area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.header);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = theme.marker.add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let section = |name: &'static str| Line::from(Span::styled(name, section_style));
    let binding = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        section("Calendar"),
        binding("hjkl", "Move between days"),
        binding("[ / ]", "Previous / next month"),
        binding("t", "Jump to today"),
        binding("Enter", "New event on selected day"),
        Line::from(""),
        section("Events"),
        binding("n", "New event today"),
        binding("Tab", "Switch to upcoming list"),
        binding("Enter", "Event details"),
        binding("d", "Delete selected event"),
        Line::from(""),
        binding("Esc", "Close form or popup"),
        binding("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
