use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
};
use std::cmp::max;
use std::io;
use std::path::Path;

use crate::operations::add::parse_transaction_input;
use crate::operations::export::DEFAULT_EXPORT_PATH;
use crate::presenter::{BalanceTone, InputMode, Presenter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    List,
    Input,
}

struct BrowseState {
    mode: Mode,

    table_state: TableState,

    // Input modal; the buffer is kept across validation errors.
    input_buffer: String,
    input_error: Option<String>,

    status: Option<String>,

    // Cached per-draw
    last_page_size: usize,
}

impl BrowseState {
    fn new(row_count: usize) -> Self {
        let mut state = Self {
            mode: Mode::List,
            table_state: TableState::default(),
            input_buffer: String::new(),
            input_error: None,
            status: None,
            last_page_size: 10,
        };
        state.clamp_selection(row_count);
        state
    }

    fn clamp_selection(&mut self, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
        } else {
            let selected = match self.table_state.selected() {
                Some(sel) => sel.min(row_count.saturating_sub(1)),
                None => 0,
            };
            self.table_state.select(Some(selected));
        }
    }

    fn move_selection(&mut self, delta: i32, row_count: usize) {
        if row_count == 0 {
            self.table_state.select(None);
            return;
        }

        let current = self.table_state.selected().unwrap_or(0) as i32;
        let max_index = row_count.saturating_sub(1) as i32;
        let next = (current + delta).clamp(0, max_index) as usize;
        self.table_state.select(Some(next));
    }

    fn page_up(&mut self, row_count: usize) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(-page, row_count);
    }

    fn page_down(&mut self, row_count: usize) {
        let page = max(1, self.last_page_size) as i32;
        self.move_selection(page, row_count);
    }

    fn start_input(&mut self, prefill: String) {
        self.input_buffer = prefill;
        self.input_error = None;
        self.status = None;
        self.mode = Mode::Input;
    }

    fn cancel_input(&mut self) {
        self.input_buffer.clear();
        self.input_error = None;
        self.mode = Mode::List;
    }
}

/// Full-screen ledger view: balance header, transaction table and a
/// single-line add/edit form. Every frame is rebuilt from the presenter's
/// current row-set, so the table can never show stale records.
pub fn run_browse(presenter: &mut Presenter) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

    let result = (|| {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)
            .map_err(|e| format!("Failed to initialize terminal: {}", e))?;

        let mut state = BrowseState::new(presenter.store().len());

        loop {
            terminal
                .draw(|frame| {
                    let size = frame.area();
                    let layout = Layout::default()
                        .direction(Direction::Vertical)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Min(5),
                            Constraint::Length(2),
                        ])
                        .split(size);

                    render_header(frame, layout[0], presenter);
                    render_table(frame, layout[1], presenter, &mut state);
                    render_footer(frame, layout[2], &state);

                    if state.mode == Mode::Input {
                        render_input_modal(frame, size, presenter, &state);
                    }
                })
                .map_err(|e| format!("Failed to draw terminal UI: {}", e))?;

            if event::poll(std::time::Duration::from_millis(200))
                .map_err(|e| format!("Failed to poll input: {}", e))?
            {
                let event = event::read().map_err(|e| format!("Failed to read input: {}", e))?;
                match event {
                    Event::Key(key) => {
                        if handle_key(presenter, &mut state, key) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)
        .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;

    result
}

fn handle_key(presenter: &mut Presenter, state: &mut BrowseState, key: KeyEvent) -> bool {
    // Many terminals emit both a Press and a Release event. Only act on Press/Repeat.
    if key.kind == KeyEventKind::Release {
        return false;
    }

    let row_count = presenter.store().len();

    match state.mode {
        Mode::List => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => state.move_selection(-1, row_count),
            KeyCode::Down => state.move_selection(1, row_count),
            KeyCode::PageUp => state.page_up(row_count),
            KeyCode::PageDown => state.page_down(row_count),
            KeyCode::Home => {
                if row_count > 0 {
                    state.table_state.select(Some(0));
                }
            }
            KeyCode::End => {
                if row_count > 0 {
                    state.table_state.select(Some(row_count.saturating_sub(1)));
                }
            }
            KeyCode::Char('a') => {
                // A pending edit session must not swallow the new record.
                presenter.cancel_edit();
                state.start_input(String::new());
            }
            KeyCode::Char('e') => {
                if let Some(selected) = state.table_state.selected() {
                    let id = presenter.rows().get(selected).map(|row| row.id);
                    if let Some(id) = id {
                        if let Some(transaction) = presenter.begin_edit(id) {
                            // The single-line form cannot express commas, so a
                            // comma-bearing description will need re-entry.
                            state.start_input(format!(
                                "{}, {}, {}, {}",
                                transaction.date.format("%Y-%m-%d"),
                                transaction.description,
                                transaction.amount,
                                transaction.transaction_type.label()
                            ));
                        }
                    }
                }
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(selected) = state.table_state.selected() {
                    let id = presenter.rows().get(selected).map(|row| row.id);
                    if let Some(id) = id {
                        let was_editing = presenter.edited() == Some(id);
                        let removed = presenter.delete(id);
                        state.clamp_selection(presenter.store().len());
                        state.status = Some(match (removed, was_editing) {
                            (0, _) => "Nothing removed".to_string(),
                            (_, true) => "Transaction removed; edit cancelled".to_string(),
                            (_, false) => "Transaction removed".to_string(),
                        });
                    }
                }
            }
            KeyCode::Char('c') => {
                presenter.cycle_currency();
                state.status = Some(format!("Currency set to {}", presenter.currency()));
            }
            KeyCode::Char('g') => {
                match presenter.export_to_file(Path::new(DEFAULT_EXPORT_PATH)) {
                    Ok(count) => {
                        state.status = Some(format!(
                            "Exported {} transactions to {}",
                            count, DEFAULT_EXPORT_PATH
                        ));
                    }
                    Err(e) => {
                        state.status = Some(format!("Export failed: {}", e));
                    }
                }
            }
            _ => {}
        },
        Mode::Input => {
            // Allow Ctrl+C / Ctrl+Q to cancel
            if key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
            {
                presenter.cancel_edit();
                state.cancel_input();
                return false;
            }

            match key.code {
                KeyCode::Esc => {
                    presenter.cancel_edit();
                    state.cancel_input();
                }
                KeyCode::Enter => commit_input(presenter, state),
                KeyCode::Backspace => {
                    state.input_buffer.pop();
                }
                KeyCode::Char(ch) => {
                    state.input_buffer.push(ch);
                }
                _ => {}
            }
        }
    }

    false
}

fn commit_input(presenter: &mut Presenter, state: &mut BrowseState) {
    let input = match parse_transaction_input(state.input_buffer.trim()) {
        Ok(input) => input,
        Err(e) => {
            state.input_error = Some(e.to_string());
            return;
        }
    };

    let outcome = match presenter.mode() {
        InputMode::Editing => match presenter.commit_edit(input) {
            Ok(true) => Ok("Transaction saved".to_string()),
            Ok(false) => Ok("Transaction no longer exists; nothing saved".to_string()),
            Err(e) => Err(e),
        },
        InputMode::Adding => presenter
            .add(input)
            .map(|transaction| format!("Transaction added with ID {}", transaction.id)),
    };

    match outcome {
        Ok(message) => {
            state.status = Some(message);
            state.input_buffer.clear();
            state.input_error = None;
            state.mode = Mode::List;
            state.clamp_selection(presenter.store().len());
        }
        Err(e) => {
            // Buffer and edit session stay; the input is fixed in place.
            state.input_error = Some(e.to_string());
        }
    }
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, presenter: &Presenter) {
    let tone_color = match presenter.balance_tone() {
        BalanceTone::Negative => Color::Red,
        BalanceTone::NonNegative => Color::Green,
    };

    let row_count = presenter.store().len();
    let rows_label = if presenter.scrollable() {
        format!("Rows: {} (scroll)", row_count)
    } else {
        format!("Rows: {}", row_count)
    };

    let line = Line::from(vec![
        Span::styled("Ledger", Style::default().fg(Color::Cyan).bold()),
        Span::raw("  "),
        Span::styled(
            format!("Balance: {}", presenter.formatted_balance()),
            Style::default().fg(tone_color).bold(),
        ),
        Span::raw("  |  "),
        Span::raw(format!("Currency: {}", presenter.currency())),
        Span::raw("  |  "),
        Span::raw(rows_label),
    ]);

    let block = Block::default().borders(Borders::ALL);
    let paragraph = Paragraph::new(line).block(block).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect, state: &BrowseState) {
    let hint = match state.mode {
        Mode::List => {
            "↑/↓ move  PgUp/PgDn page  a add  e edit  x delete  c currency  g export  q/Esc exit"
        }
        Mode::Input => "Type, Enter apply, Esc cancel",
    };

    let mut lines = vec![Line::from(hint)];
    if let Some(ref status) = state.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_table(frame: &mut ratatui::Frame, area: Rect, presenter: &Presenter, state: &mut BrowseState) {
    let block = Block::default().title("Transactions").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new([
        Cell::from("Date").style(Style::default().bold()),
        Cell::from("Description").style(Style::default().bold()),
        Cell::from("Amount").style(Style::default().bold()),
        Cell::from("Type").style(Style::default().bold()),
        Cell::from("Id").style(Style::default().bold()),
    ])
    .style(Style::default().fg(Color::White));

    let table_rows = presenter.rows();
    let rows = table_rows.iter().map(|row| {
        let mut desc = row.description.clone();
        if desc.len() > 42 {
            desc.truncate(39);
            desc.push_str("...");
        }
        let mut id_short = row.id.to_string();
        id_short.truncate(8);

        Row::new([
            Cell::from(row.date.clone()),
            Cell::from(desc),
            Cell::from(row.amount.clone()),
            Cell::from(row.transaction_type),
            Cell::from(id_short),
        ])
    });

    // Estimate a page size based on the table height.
    // Leave room for the header row.
    state.last_page_size = inner.height.saturating_sub(2) as usize;
    if state.last_page_size == 0 {
        state.last_page_size = 1;
    }

    let widths = [
        Constraint::Length(10),
        Constraint::Percentage(40),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("➤ ")
        .column_spacing(1);

    frame.render_stateful_widget(table, inner, &mut state.table_state);

    if table_rows.is_empty() {
        let empty = Paragraph::new("No transactions recorded")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
    }
}

fn render_input_modal(frame: &mut ratatui::Frame, area: Rect, presenter: &Presenter, state: &BrowseState) {
    let popup_area = centered_rect(80, 30, area);
    frame.render_widget(Clear, popup_area);

    // Add and save are mutually exclusive; the title tells the user which
    // one Enter will perform.
    let title = match presenter.mode() {
        InputMode::Adding => "Add Transaction",
        InputMode::Editing => "Save Transaction",
    };

    let help = "Enter: date(YYYY-MM-DD), description, amount, type(income/expense)";

    let mut lines = vec![
        Line::from(vec![Span::styled(title, Style::default().bold())]),
        Line::from(help),
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("> {}", state.input_buffer),
            Style::default().fg(Color::Yellow),
        )]),
    ];

    if let Some(ref err) = state.input_error {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )]));
    }

    let block = Block::default().borders(Borders::ALL).title("Input");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
