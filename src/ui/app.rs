use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::models::{BookField, BookRecord};
use crate::store::{CatalogError, CatalogStore, Selection};

use super::forms::{BookForm, ConfirmDelete};
use super::helpers::{book_count, centered_rect, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;
/// Titles listed by name in the delete prompt before it switches to a count.
const CONFIRM_TITLE_LIMIT: usize = 5;

/// What the keyboard is currently driving. Everything except `Normal` draws a
/// popup over the table.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ViewingDetails(usize),
    ConfirmDelete(ConfirmDelete),
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

/// UI state. The catalog itself lives in the store; `App` only tracks the
/// cursor, marked rows, the open popup and the footer message.
pub struct App {
    store: CatalogStore,
    selected: usize,
    marked: Selection,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            selected: 0,
            marked: Selection::none(),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Read-only access to the catalog being shown.
    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Hand the store back, e.g. once the event loop exits.
    pub fn into_store(self) -> CatalogStore {
        self.store
    }

    /// Process one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::ViewingDetails(row) => self.handle_details(code, row),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.marked.is_empty() {
                    *exit = true;
                } else {
                    self.marked.clear();
                    self.set_status("Selection cleared.", StatusKind::Info);
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.selected = 0,
            KeyCode::End => self.selected = self.store.len().saturating_sub(1),
            KeyCode::Enter => {
                if self.store.details(self.selected).is_some() {
                    self.clear_status();
                    return Ok(Mode::ViewingDetails(self.selected));
                }
                self.set_status("No book selected.", StatusKind::Error);
            }
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Char(' ') => {
                if !self.store.is_empty() {
                    self.marked.toggle(self.selected);
                    self.move_selection(1);
                }
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                let selection = self.delete_target();
                if selection.is_empty() {
                    // Let the store report the empty selection.
                    if let Err(err) = self.store.remove(&selection) {
                        self.set_status(surface_error(&err), StatusKind::Info);
                    }
                } else {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(ConfirmDelete::new(
                        selection,
                        self.store.books(),
                    )));
                }
            }
            KeyCode::Char('w') | KeyCode::Char('W') => self.retry_save(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(()) => keep_open = false,
                Err(err @ CatalogError::Persist { .. }) => {
                    // The book is in the catalog even though the file is stale.
                    self.selected = self.store.len().saturating_sub(1);
                    self.report_unsaved(&err);
                    keep_open = false;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_details(&mut self, code: KeyCode, row: usize) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Mode::Normal,
            _ => Mode::ViewingDetails(row),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm.selection);
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    /// Marked rows win; otherwise the highlighted row, if there is one.
    fn delete_target(&self) -> Selection {
        if !self.marked.is_empty() {
            self.marked.clone()
        } else if self.store.details(self.selected).is_some() {
            Selection::single(self.selected)
        } else {
            Selection::none()
        }
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<(), CatalogError> {
        let row = self.store.add(form.record())?;
        self.selected = row;
        let title = self
            .store
            .details(row)
            .map(|book| book.title.clone())
            .unwrap_or_default();
        self.set_status(format!("Added {title}."), StatusKind::Info);
        Ok(())
    }

    fn perform_delete(&mut self, selection: &Selection) {
        let result = self.store.remove(selection);
        match result {
            Ok(removed) => {
                self.marked.clear();
                self.clamp_selection();
                self.set_status(
                    format!("Deleted {}.", book_count(removed.len())),
                    StatusKind::Info,
                );
            }
            Err(err @ CatalogError::Persist { .. }) => {
                self.marked.clear();
                self.clamp_selection();
                self.report_unsaved(&err);
            }
            Err(err @ CatalogError::Selection(_)) => {
                self.marked.clear();
                self.set_status(surface_error(&err), StatusKind::Info);
            }
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    fn retry_save(&mut self) {
        if self.store.is_synced() {
            self.set_status("Catalog already saved.", StatusKind::Info);
            return;
        }
        match self.store.persist() {
            Ok(()) => self.set_status(
                format!("Saved to {}.", self.store.path().display()),
                StatusKind::Info,
            ),
            Err(err) => self.report_unsaved(&err),
        }
    }

    fn report_unsaved(&mut self, err: &CatalogError) {
        debug!("write failed, waiting for retry");
        self.set_status(
            format!("{} (press w to retry)", surface_error(err)),
            StatusKind::Error,
        );
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.store.len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let target = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = target as usize;
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.store.len().saturating_sub(1));
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

        self.draw_table(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ViewingDetails(row) => {
                if let Some(book) = self.store.details(*row) {
                    self.draw_details(frame, area, book);
                }
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let mut title = vec![Span::raw(format!(
            " Book Catalog ({}) ",
            book_count(self.store.len())
        ))];
        if !self.store.is_synced() {
            title.push(Span::styled(
                "[unsaved] ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        let block = Block::default().borders(Borders::ALL).title(Line::from(title));

        if self.store.is_empty() {
            let message = Paragraph::new("No books yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(
            std::iter::once(Cell::from(""))
                .chain(BookField::ALL.into_iter().map(|field| Cell::from(field.label()))),
        )
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

        let rows = self.store.books().iter().enumerate().map(|(idx, book)| {
            let mark = if self.marked.contains(idx) { "*" } else { "" };
            let cells = std::iter::once(Cell::from(mark)).chain(
                BookField::ALL
                    .into_iter()
                    .map(|field| Cell::from(book.get(field).to_string())),
            );
            let row = Row::new(cells);
            if self.marked.contains(idx) {
                row.style(Style::default().fg(Color::Cyan))
            } else {
                row
            }
        });

        let widths = [
            Constraint::Length(1),
            Constraint::Fill(3),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Fill(2),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        let mut state = TableState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(table, area, &mut state);
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

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key = |text: &'static str| {
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
        };
        match &self.mode {
            Mode::Normal => {
                let mut spans = vec![
                    key("↑/↓"),
                    Span::raw(" Move  "),
                    key("Enter"),
                    Span::raw(" Details  "),
                    key("+"),
                    Span::raw(" Add  "),
                    key("Space"),
                    Span::raw(" Mark  "),
                    key("-"),
                    Span::raw(" Delete  "),
                ];
                if !self.store.is_synced() {
                    spans.push(key("w"));
                    spans.push(Span::raw(" Retry save  "));
                }
                spans.push(key("q"));
                spans.push(Span::raw(" Quit"));
                Line::from(spans)
            }
            Mode::AddingBook(_) => Line::from(vec![
                key("Enter"),
                Span::raw(" Save  "),
                key("Tab"),
                Span::raw(" Next field  "),
                key("Esc"),
                Span::raw(" Cancel"),
            ]),
            Mode::ViewingDetails(_) => Line::from(vec![key("Esc"), Span::raw(" Close")]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                key("Y"),
                Span::raw(" Delete  "),
                key("N"),
                Span::raw(" Cancel"),
            ]),
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add New Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .into_iter()
            .map(|field| form.build_line(field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = form.active.label().len() as u16 + 2;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        let cursor_y = inner.y + form.active as u16;
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_details(&self, frame: &mut Frame, area: Rect, book: &BookRecord) {
        let popup_area = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Book Details").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let detail = |label: &str, value: &str| {
            Line::from(vec![
                Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)),
                Span::raw(value.to_string()),
            ])
        };

        let lines = vec![
            Line::from(Span::styled(
                book.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("By {}", book.author),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
            detail("Genre", &book.genre),
            detail("Released", &book.release_date),
            detail("Copies", &book.copies),
            detail("Time Borrowed", &book.time_borrowed),
            Line::from(""),
            Line::from(Span::styled(
                "Press Esc to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![Line::from(format!(
            "Delete {}?",
            book_count(confirm.selection.len())
        ))];
        for title in confirm.titles.iter().take(CONFIRM_TITLE_LIMIT) {
            lines.push(Line::from(format!("  • {title}")));
        }
        if confirm.titles.len() > CONFIRM_TITLE_LIMIT {
            lines.push(Line::from(format!(
                "  …and {} more",
                confirm.titles.len() - CONFIRM_TITLE_LIMIT
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Press Y to confirm or N / Esc to cancel.",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
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
