use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{BookField, BookRecord};
use crate::store::Selection;

/// State of the "Add Book" popup: the six raw inputs, which one has focus,
/// and the last validation message.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) values: BookRecord,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            values: BookRecord::default(),
            active: BookField::Title,
            error: None,
        }
    }
}

impl BookForm {
    pub(crate) fn next_field(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.values.get_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.values.get_mut(self.active).pop();
    }

    /// The inputs as typed; trimming and validation happen in the store.
    pub(crate) fn record(&self) -> BookRecord {
        self.values.clone()
    }

    /// Render one `Label: value` line, highlighting the focused field.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.values.get(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character count for the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        self.values.get(field).chars().count()
    }
}

/// Pending delete awaiting Y/N. Titles are captured up front so the prompt
/// can name what is about to go.
pub(crate) struct ConfirmDelete {
    pub(crate) selection: Selection,
    pub(crate) titles: Vec<String>,
}

impl ConfirmDelete {
    pub(crate) fn new(selection: Selection, books: &[BookRecord]) -> Self {
        let titles = selection
            .iter()
            .filter_map(|row| books.get(row))
            .map(|book| book.title.clone())
            .collect();
        Self { selection, titles }
    }
}
