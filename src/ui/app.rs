use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::{error, info};
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::config::StartScreen;
use crate::engine::{format_countdown, Clock};
use crate::models::{AdmissionScheduleItem, Catalog, Subject};
use crate::preferences::Preferences;
use crate::store::KeyValueStore;

use super::helpers::{centered_rect, strip_markup, surface_error};
use super::screens::{ScheduleScreen, SeatScreen, SubjectTable};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Below this width the countdown column switches to abbreviated units.
const COMPACT_WIDTH: u16 = 110;
const SEATS_BANNER: &str = "সাবজেক্ট প্রতি সিট সংখ্যা ও রিভিউ";
const SEARCH_PLACEHOLDER: &str = "🔎 বিষয় খুঁজুন...";
const REVIEW_LINK_LABEL: &str = "[লিংক]";

/// Top-level screens reachable with `Tab`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Schedule,
    Seats,
}

/// Fine-grained modes layered on top of the current screen.
enum Mode {
    Normal,
    Searching { query: String },
    Tooltip { title: String, body: String },
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    preferences: Preferences,
    schedule: ScheduleScreen,
    seats: SeatScreen,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Build both screens from the catalog and load preferences once.
    pub fn new(
        catalog: &Catalog,
        institution: &str,
        unit: &str,
        store: Box<dyn KeyValueStore>,
        clock: Box<dyn Clock>,
    ) -> Self {
        let preferences = Preferences::load(store.as_ref());
        let now = clock.now();
        let items: Vec<AdmissionScheduleItem> =
            catalog.visible_schedule().into_iter().cloned().collect();
        let schedule = ScheduleScreen::new(items, &preferences.favorites, now);
        let seats = SeatScreen::from_lookup(catalog.seat_table(institution, unit));

        info!(
            "board ready: {} schedule rows, {} bookmarks, {} favorites",
            schedule.order.len(),
            preferences.bookmarks.len(),
            preferences.favorites.len()
        );

        Self {
            store,
            clock,
            preferences,
            schedule,
            seats,
            screen: Screen::Schedule,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn with_start_screen(mut self, start: StartScreen) -> Self {
        self.screen = match start {
            StartScreen::Schedule => Screen::Schedule,
            StartScreen::Seats => Screen::Seats,
        };
        self
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Ids of the schedule rows in display order.
    pub fn schedule_ids(&self) -> Vec<String> {
        self.schedule.rows().map(|item| item.id.clone()).collect()
    }

    /// Short codes of the subject rows currently shown.
    pub fn subject_codes(&self) -> Vec<String> {
        match &self.seats {
            SeatScreen::Table(table) => table.rows().map(|s| s.short_code.clone()).collect(),
            SeatScreen::NoData { .. } => Vec::new(),
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Called on every pass of the event loop. Re-ranks the schedule, since
    /// completion depends on the current time, and advances the countdowns.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.schedule.rerank(&self.preferences.favorites, now);
        self.schedule.tick(now);
    }

    /// Dispatch a key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching { query } => self.handle_search(code, query),
            Mode::Tooltip { title, body } => match code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char('q') => {
                    Mode::Normal
                }
                _ => Mode::Tooltip { title, body },
            },
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                return Mode::Normal;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.clear_status();
                self.screen = match self.screen {
                    Screen::Schedule => Screen::Seats,
                    Screen::Seats => Screen::Schedule,
                };
                return Mode::Normal;
            }
            _ => {}
        }

        match self.screen {
            Screen::Schedule => {
                match code {
                    KeyCode::Up => self.schedule.move_selection(-1),
                    KeyCode::Down => self.schedule.move_selection(1),
                    KeyCode::PageUp => self.schedule.move_selection(-5),
                    KeyCode::PageDown => self.schedule.move_selection(5),
                    KeyCode::Home => self.schedule.select_first(),
                    KeyCode::End => self.schedule.select_last(),
                    KeyCode::Char(' ') | KeyCode::Char('h') => self.toggle_favorite(),
                    _ => {}
                }
                Mode::Normal
            }
            Screen::Seats => {
                let SeatScreen::Table(table) = &mut self.seats else {
                    return Mode::Normal;
                };
                match code {
                    KeyCode::Up => table.move_selection(-1),
                    KeyCode::Down => table.move_selection(1),
                    KeyCode::PageUp => table.move_selection(-5),
                    KeyCode::PageDown => table.move_selection(5),
                    KeyCode::Home => table.select_first(),
                    KeyCode::End => table.select_last(),
                    KeyCode::Char('f') | KeyCode::Char('/') => {
                        let query = table.query.clone();
                        self.clear_status();
                        return Mode::Searching { query };
                    }
                    KeyCode::Char('i') => {
                        if let Some(subject) = table.current_subject().cloned() {
                            return self.tooltip_mode(subject);
                        }
                    }
                    KeyCode::Enter => self.open_review_link(),
                    KeyCode::Char(' ') | KeyCode::Char('b') => self.toggle_bookmark(),
                    _ => {}
                }
                Mode::Normal
            }
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        let SeatScreen::Table(table) = &mut self.seats else {
            return Mode::Normal;
        };

        match code {
            KeyCode::Esc => {
                table.set_query("");
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => table.move_selection(-1),
            KeyCode::Down => table.move_selection(1),
            KeyCode::Backspace => {
                query.pop();
                table.set_query(&query);
            }
            KeyCode::Char(c) => {
                query.push(c);
                table.set_query(&query);
            }
            _ => {}
        }

        Mode::Searching { query }
    }

    fn tooltip_mode(&mut self, subject: Subject) -> Mode {
        match subject.tooltip.as_deref() {
            Some(tooltip) if !tooltip.trim().is_empty() => Mode::Tooltip {
                title: subject.full_name.clone(),
                body: strip_markup(tooltip),
            },
            _ => {
                self.set_status("এই বিষয়ের কোনো অতিরিক্ত তথ্য নেই।", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn open_review_link(&mut self) {
        let SeatScreen::Table(table) = &self.seats else {
            return;
        };
        let Some(subject) = table.current_subject() else {
            return;
        };

        let link = subject.review_link.as_deref().unwrap_or("").trim().to_string();
        let name = subject.full_name.clone();
        if link.is_empty() {
            self.set_status("এই বিষয়ের কোনো রিভিউ লিংক নেই।", StatusKind::Error);
        } else {
            let (text, kind) = link_status(&name, open_link(&link));
            self.set_status(text, kind);
        }
    }

    fn toggle_bookmark(&mut self) {
        let SeatScreen::Table(table) = &self.seats else {
            return;
        };
        let Some(code) = table.current_subject().map(|s| s.short_code.clone()) else {
            return;
        };

        match self
            .preferences
            .bookmarks
            .toggle(self.store.as_mut(), &code)
        {
            Ok(outcome) => self.set_status(outcome.bookmark_message(), StatusKind::Info),
            Err(err) => {
                error!("bookmark toggle for {code} failed: {err:#}");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    fn toggle_favorite(&mut self) {
        let Some(id) = self.schedule.current_item().map(|item| item.id.clone()) else {
            return;
        };

        match self
            .preferences
            .favorites
            .toggle(self.store.as_mut(), &id)
        {
            Ok(outcome) => {
                self.schedule
                    .rerank(&self.preferences.favorites, self.clock.now());
                self.set_status(outcome.favorite_message(), StatusKind::Info);
            }
            Err(err) => {
                error!("favorite toggle for {id} failed: {err:#}");
                self.set_status(surface_error(&err), StatusKind::Error);
            }
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match self.screen {
            Screen::Schedule => self.draw_schedule(frame, content_area),
            Screen::Seats => self.draw_seats(frame, content_area),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        if let Mode::Tooltip { title, body } = &self.mode {
            self.draw_tooltip(frame, area, title, body);
        }
    }

    fn draw_schedule(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("ভর্তি পরীক্ষার সময়সূচি");

        if self.schedule.order.is_empty() {
            let message = Paragraph::new("কোনো পরীক্ষার তারিখ পাওয়া যায়নি।")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let compact = area.width < COMPACT_WIDTH;
        let favorites = &self.preferences.favorites;
        let rows: Vec<Row> = self
            .schedule
            .rows()
            .enumerate()
            .map(|(idx, item)| {
                let favorite = favorites.contains(&item.id);
                let heart = if favorite {
                    Span::styled("♥", Style::default().fg(Color::Magenta))
                } else {
                    Span::styled("♡", Style::default().fg(Color::DarkGray))
                };
                let department = Line::from(vec![
                    Span::styled("▌", Style::default().fg(item.department.color())),
                    Span::styled(
                        item.department.label(),
                        Style::default().fg(item.department.color()),
                    ),
                ]);
                let countdown = self.schedule.countdown_for(&item.id);
                let countdown_cell = if countdown.completed {
                    Cell::from(format_countdown(&countdown, compact))
                        .style(Style::default().fg(Color::Red))
                } else {
                    Cell::from(format_countdown(&countdown, compact))
                };

                let mut style = Style::default();
                if favorite {
                    style = style.bg(Color::Rgb(0x2a, 0x1f, 0x3d));
                } else if idx % 2 == 1 {
                    style = style.bg(Color::Rgb(0x1c, 0x1c, 0x1c));
                }

                Row::new(vec![
                    Cell::from(heart),
                    Cell::from(department),
                    Cell::from(item.university_name_and_unit.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(item.exam_details.date.clone().unwrap_or_default()),
                    countdown_cell,
                ])
                .style(style)
            })
            .collect();

        let header = Row::new(vec!["", "", "ভার্সিটি", "তারিখ", "সময় বাকি"])
            .style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        let widths = [
            Constraint::Length(2),
            Constraint::Length(8),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Min(20),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let mut state = TableState::default().with_selected(Some(self.schedule.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_seats(&self, frame: &mut Frame, area: Rect) {
        let table = match &self.seats {
            SeatScreen::NoData { message } => {
                let paragraph = Paragraph::new(message.as_str())
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(paragraph, area);
                return;
            }
            SeatScreen::Table(table) => table,
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(area);

        let banner = Paragraph::new(Line::from(vec![Span::styled(
            SEATS_BANNER,
            Style::default().add_modifier(Modifier::BOLD),
        )]))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(table.institution_name.as_str()),
        );
        frame.render_widget(banner, chunks[0]);

        self.draw_search_box(frame, chunks[1], table);
        self.draw_subject_table(frame, chunks[2], table);
    }

    fn draw_search_box(&self, frame: &mut Frame, area: Rect, table: &SubjectTable) {
        let searching = matches!(self.mode, Mode::Searching { .. });
        let content = if table.query.is_empty() && !searching {
            Span::styled(SEARCH_PLACEHOLDER, Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(table.query.clone())
        };
        let mut block = Block::default().borders(Borders::ALL);
        if searching {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        frame.render_widget(Paragraph::new(content).block(block), area);

        if searching {
            let inner = area.inner(Margin::new(1, 1));
            let cursor_x = inner.x + Line::from(table.query.as_str()).width() as u16;
            frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
        }
    }

    fn draw_subject_table(&self, frame: &mut Frame, area: Rect, table: &SubjectTable) {
        let block = Block::default().borders(Borders::ALL);

        if table.filtered.is_empty() {
            let text = if table.subjects.is_empty() {
                "এই ইউনিটের কোনো বিষয় নেই।"
            } else {
                "কোনো বিষয় মেলেনি।"
            };
            let message = Paragraph::new(text).alignment(Alignment::Center).block(block);
            frame.render_widget(message, area);
            return;
        }

        let bookmarks = &self.preferences.bookmarks;
        let rows: Vec<Row> = table
            .rows()
            .map(|subject| {
                let marker = if bookmarks.contains(&subject.short_code) {
                    Span::styled("★", Style::default().fg(Color::Yellow))
                } else {
                    Span::styled("☆", Style::default().fg(Color::DarkGray))
                };
                let seat = match subject.tooltip {
                    Some(_) => format!("{} ⓘ", subject.seat_count),
                    None => subject.seat_count.to_string(),
                };
                let review = if subject.has_review_link() {
                    REVIEW_LINK_LABEL
                } else {
                    ""
                };

                Row::new(vec![
                    Cell::from(marker),
                    Cell::from(subject.full_name.clone())
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                    Cell::from(seat),
                    Cell::from(review).style(Style::default().fg(Color::Cyan)),
                ])
            })
            .collect();

        let header = Row::new(vec!["", "নাম", "আসন", "রিভিউ"])
            .style(Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED));
        let widths = [
            Constraint::Length(2),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ];
        let widget = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let mut state = TableState::default().with_selected(Some(table.selected));
        frame.render_stateful_widget(widget, area, &mut state);
    }

    fn draw_tooltip(&self, frame: &mut Frame, area: Rect, title: &str, body: &str) {
        let popup = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(body)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_bottom(Line::from("Esc").right_aligned()),
            );
        frame.render_widget(paragraph, popup);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, self.footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = match (&self.mode, self.screen) {
            (Mode::Searching { .. }, _) => &[("type", "filter"), ("Enter", "keep"), ("Esc", "clear")],
            (Mode::Tooltip { .. }, _) => &[("Esc", "close")],
            (Mode::Normal, Screen::Schedule) => &[
                ("↑↓", "move"),
                ("Space/h", "favorite"),
                ("Tab", "seats"),
                ("q", "quit"),
            ],
            (Mode::Normal, Screen::Seats) => &[
                ("↑↓", "move"),
                ("f", "search"),
                ("Space/b", "bookmark"),
                ("Enter", "review"),
                ("i", "info"),
                ("Tab", "schedule"),
                ("q", "quit"),
            ],
        };

        let mut spans = Vec::with_capacity(hints.len() * 3);
        for (key, action) in hints {
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(format!(" {action}  ")));
        }
        Line::from(spans)
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Footer text after trying to open a subject's review link.
fn link_status(name: &str, outcome: std::io::Result<()>) -> (String, StatusKind) {
    match outcome {
        Ok(()) => (format!("{name} খোলা হয়েছে।"), StatusKind::Info),
        Err(err) => (format!("লিংক খোলা যায়নি: {err}"), StatusKind::Error),
    }
}
