use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editing::{Block, Outline};

/// Stable identifier for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A titled document whose body is an [`Outline`].
///
/// Journal documents are one-per-day entries titled from their date;
/// regular documents carry a free-form title. The outline body is always
/// live (never empty), so a freshly created document has one blank block
/// ready for input.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub is_journal: bool,
    pub outline: Outline,
}

/// Prompt content seeded into a new journal entry's first block.
const JOURNAL_PROMPT: &str = "Start your journal entry here...";

impl Document {
    /// Create a regular document with an empty outline body.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            title: title.into(),
            date: Utc::now(),
            is_journal: false,
            outline: Outline::new(),
        }
    }

    /// Create the journal entry for a calendar day, titled from the date.
    pub fn journal_for(day: NaiveDate) -> Self {
        let date = day.and_time(NaiveTime::MIN).and_utc();
        Self {
            id: DocumentId::new(),
            title: Self::journal_title(day),
            date,
            is_journal: true,
            outline: Outline::seeded(vec![Block::new(JOURNAL_PROMPT, 0)]),
        }
    }

    /// Journal display title, e.g. "Monday, 02/01/2006".
    pub fn journal_title(day: NaiveDate) -> String {
        day.format("%A, %d/%m/%Y").to_string()
    }

    /// The calendar day this document belongs to (journal lookup key).
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            title: self.title.clone(),
            date: self.date,
        }
    }
}

/// Lightweight listing entry for document pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    pub title: String,
    pub date: DateTime<Utc>,
}
