//! Domain model for the catalog. A book is six free-form text fields; nothing
//! is parsed or typed beyond "is it blank". The serde shape here is the on-disk
//! shape, so field names double as JSON keys.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// One catalog entry. Every field is always present; entries read from disk
/// without a key get an empty string instead.
pub struct BookRecord {
    /// Title shown in the first table column and as the details heading.
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    /// Author name, rendered as "By ..." in the details popup.
    #[serde(default, deserialize_with = "lenient_text")]
    pub author: String,
    /// Free-form genre label.
    #[serde(default, deserialize_with = "lenient_text")]
    pub genre: String,
    /// Kept as typed by the user, e.g. `1965` or `March 2001`.
    #[serde(default, deserialize_with = "lenient_text")]
    pub release_date: String,
    /// Kept as typed by the user; not parsed as a number.
    #[serde(default, deserialize_with = "lenient_text")]
    pub copies: String,
    /// How long the book has been out, as typed by the user.
    #[serde(default, deserialize_with = "lenient_text")]
    pub time_borrowed: String,
}

impl BookRecord {
    /// Build a record from the six field values in column order.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        release_date: impl Into<String>,
        copies: impl Into<String>,
        time_borrowed: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            release_date: release_date.into(),
            copies: copies.into(),
            time_borrowed: time_borrowed.into(),
        }
    }

    /// Borrow the value of a single field.
    pub fn get(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Genre => &self.genre,
            BookField::ReleaseDate => &self.release_date,
            BookField::Copies => &self.copies,
            BookField::TimeBorrowed => &self.time_borrowed,
        }
    }

    /// Mutable access to a single field, used by the add form.
    pub fn get_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Genre => &mut self.genre,
            BookField::ReleaseDate => &mut self.release_date,
            BookField::Copies => &mut self.copies,
            BookField::TimeBorrowed => &mut self.time_borrowed,
        }
    }

    /// Copy of the record with surrounding whitespace stripped from every
    /// field.
    pub fn trimmed(&self) -> Self {
        let mut out = Self::default();
        for field in BookField::ALL {
            *out.get_mut(field) = self.get(field).trim().to_string();
        }
        out
    }

    /// Fields that are empty once trimmed, in display order.
    pub fn blank_fields(&self) -> Vec<BookField> {
        BookField::ALL
            .into_iter()
            .filter(|field| self.get(*field).trim().is_empty())
            .collect()
    }
}

impl fmt::Display for BookRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.author.trim().is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} by {}", self.title, self.author)
        }
    }
}

/// The six record fields in table/column order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BookField {
    Title,
    Author,
    Genre,
    ReleaseDate,
    Copies,
    TimeBorrowed,
}

impl BookField {
    /// Every field, in the order columns and form lines are drawn.
    pub const ALL: [BookField; 6] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::ReleaseDate,
        BookField::Copies,
        BookField::TimeBorrowed,
    ];

    /// Human-facing column label.
    pub fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Genre => "Genre",
            BookField::ReleaseDate => "Release Date",
            BookField::Copies => "Copies",
            BookField::TimeBorrowed => "Time Borrowed",
        }
    }

    /// Key used in the persisted JSON objects.
    pub fn key(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::ReleaseDate => "release_date",
            BookField::Copies => "copies",
            BookField::TimeBorrowed => "time_borrowed",
        }
    }

    /// Field after this one, wrapping to the first.
    pub fn next(self) -> Self {
        let idx = self as usize;
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Field before this one, wrapping to the last.
    pub fn previous(self) -> Self {
        let idx = self as usize;
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accept strings as-is, render numbers and booleans as text, and map `null`
/// to an empty string. Older catalog files stored numeric-looking values such
/// as copy counts as bare JSON numbers.
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected text, found {}",
            match other {
                Value::Array(_) => "an array",
                _ => "an object",
            }
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_keys_default_to_empty() {
        let record: BookRecord = serde_json::from_str(r#"{"title": "Emma"}"#).unwrap();
        assert_eq!(record, BookRecord::new("Emma", "", "", "", "", ""));
    }

    #[test]
    fn numeric_values_are_read_as_text() {
        let record: BookRecord = serde_json::from_str(
            r#"{"title": "Dune", "release_date": 1965, "copies": 3, "time_borrowed": null}"#,
        )
        .unwrap();
        assert_eq!(record.release_date, "1965");
        assert_eq!(record.copies, "3");
        assert_eq!(record.time_borrowed, "");
    }

    #[test]
    fn nested_values_are_rejected() {
        let result = serde_json::from_str::<BookRecord>(r#"{"title": ["a", "b"]}"#);
        assert!(result.is_err());
    }

    #[test]
    fn blank_fields_reports_whitespace_only_values() {
        let record = BookRecord::new("Dune", "  ", "SciFi", "1965", "\t", "0");
        assert_eq!(
            record.blank_fields(),
            vec![BookField::Author, BookField::Copies]
        );
    }

    #[test]
    fn trimmed_strips_every_field() {
        let record = BookRecord::new(" Dune ", "Herbert ", " SciFi", "1965", " 3", "0 ");
        assert_eq!(
            record.trimmed(),
            BookRecord::new("Dune", "Herbert", "SciFi", "1965", "3", "0")
        );
    }

    #[test]
    fn field_cycling_wraps_around() {
        assert_eq!(BookField::TimeBorrowed.next(), BookField::Title);
        assert_eq!(BookField::Title.previous(), BookField::TimeBorrowed);
        assert_eq!(BookField::Genre.next(), BookField::ReleaseDate);
    }
}
