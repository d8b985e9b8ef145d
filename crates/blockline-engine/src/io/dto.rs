//! Wire-format DTOs for document persistence and host marshalling.
//!
//! The JSON shape is the engine's external contract: blocks travel as
//! `(id, content, indent)` tuples and documents add title, RFC 3339 date
//! and the journal flag. Domain → DTO never fails; DTO → domain validates
//! ids and dates and reports which field was bad.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::editing::{Block, Outline};
use crate::models::{Document, DocumentSummary};

#[derive(Debug, thiserror::Error)]
pub enum DtoError {
    #[error("invalid document id {value:?}: {source}")]
    InvalidDocumentId {
        value: String,
        source: uuid::Error,
    },
    #[error("invalid block id {value:?}: {source}")]
    InvalidBlockId {
        value: String,
        source: uuid::Error,
    },
    #[error("invalid date {value:?}: {source}")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDto {
    pub id: String,
    pub content: String,
    pub indent: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDto {
    pub id: String,
    pub title: String,
    pub blocks: Vec<BlockDto>,
    /// RFC 3339 format
    pub date: String,
    pub is_journal: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummaryDto {
    pub id: String,
    pub title: String,
    /// RFC 3339 format
    pub date: String,
}

impl DocumentDto {
    pub fn from_domain(doc: &Document) -> Self {
        Self {
            id: doc.id.to_string(),
            title: doc.title.clone(),
            blocks: doc
                .outline
                .blocks()
                .iter()
                .map(|b| BlockDto {
                    id: b.id.to_string(),
                    content: b.content.clone(),
                    indent: b.indent,
                })
                .collect(),
            date: doc.date.to_rfc3339(),
            is_journal: doc.is_journal,
        }
    }

    pub fn to_domain(&self) -> Result<Document, DtoError> {
        let id = self
            .id
            .parse()
            .map_err(|source| DtoError::InvalidDocumentId {
                value: self.id.clone(),
                source,
            })?;
        let date = parse_rfc3339(&self.date)?;

        let mut blocks = Vec::with_capacity(self.blocks.len());
        for dto in &self.blocks {
            let block_id = dto.id.parse().map_err(|source| DtoError::InvalidBlockId {
                value: dto.id.clone(),
                source,
            })?;
            blocks.push(Block::with_id(block_id, dto.content.clone(), dto.indent));
        }

        Ok(Document {
            id,
            title: self.title.clone(),
            date,
            is_journal: self.is_journal,
            // Seeding clamps indents and guarantees a non-empty body
            outline: Outline::seeded(blocks),
        })
    }

    pub fn summary(&self) -> DocumentSummaryDto {
        DocumentSummaryDto {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self.date.clone(),
        }
    }
}

impl DocumentSummaryDto {
    pub fn from_domain(summary: &DocumentSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            title: summary.title.clone(),
            date: summary.date.to_rfc3339(),
        }
    }

    pub fn to_domain(&self) -> Result<DocumentSummary, DtoError> {
        Ok(DocumentSummary {
            id: self
                .id
                .parse()
                .map_err(|source| DtoError::InvalidDocumentId {
                    value: self.id.clone(),
                    source,
                })?,
            title: self.title.clone(),
            date: parse_rfc3339(&self.date)?,
        })
    }
}

fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, DtoError> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|source| DtoError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_document_round_trips_through_dto() {
        let mut doc = Document::new("round trip");
        let first = doc.outline.blocks()[0].id;
        doc.outline.set_content(first, "hello");
        doc.outline.create(Some(first), 1, "child");

        let dto = DocumentDto::from_domain(&doc);
        let restored = dto.to_domain().unwrap();

        assert_eq!(restored.id, doc.id);
        assert_eq!(restored.title, doc.title);
        assert_eq!(restored.is_journal, doc.is_journal);
        assert_eq!(restored.outline.blocks(), doc.outline.blocks());
    }

    #[test]
    fn test_dto_json_field_names_match_wire_contract() {
        let doc = Document::new("wire");
        let json = serde_json::to_value(DocumentDto::from_domain(&doc)).unwrap();

        assert!(json.get("is_journal").is_some());
        assert!(json.get("date").is_some());
        let block = &json["blocks"][0];
        assert!(block.get("id").is_some());
        assert!(block.get("content").is_some());
        assert!(block.get("indent").is_some());
    }

    #[test]
    fn test_to_domain_rejects_bad_block_id() {
        let dto = DocumentDto {
            id: Document::new("x").id.to_string(),
            title: "x".to_string(),
            blocks: vec![BlockDto {
                id: "not-a-uuid".to_string(),
                content: String::new(),
                indent: 0,
            }],
            date: Utc::now().to_rfc3339(),
            is_journal: false,
        };

        let err = dto.to_domain().unwrap_err();
        assert!(matches!(err, DtoError::InvalidBlockId { .. }));
    }

    #[test]
    fn test_to_domain_rejects_bad_date() {
        let dto = DocumentDto {
            id: Document::new("x").id.to_string(),
            title: "x".to_string(),
            blocks: Vec::new(),
            date: "yesterday-ish".to_string(),
            is_journal: false,
        };

        let err = dto.to_domain().unwrap_err();
        assert!(matches!(err, DtoError::InvalidDate { .. }));
    }

    #[test]
    fn test_to_domain_clamps_seeded_indents() {
        // A hand-edited file with an indent jump loads with the jump clamped
        let dto = DocumentDto {
            id: Document::new("x").id.to_string(),
            title: "x".to_string(),
            blocks: vec![
                BlockDto {
                    id: crate::editing::BlockId::new().to_string(),
                    content: "a".to_string(),
                    indent: 0,
                },
                BlockDto {
                    id: crate::editing::BlockId::new().to_string(),
                    content: "b".to_string(),
                    indent: 4,
                },
            ],
            date: Utc::now().to_rfc3339(),
            is_journal: false,
        };

        let doc = dto.to_domain().unwrap();
        assert_eq!(doc.outline.blocks()[1].indent, 1);
    }

    #[test]
    fn test_empty_block_list_loads_as_bootstrap_outline() {
        let dto = DocumentDto {
            id: Document::new("x").id.to_string(),
            title: "x".to_string(),
            blocks: Vec::new(),
            date: Utc::now().to_rfc3339(),
            is_journal: false,
        };

        let doc = dto.to_domain().unwrap();
        assert_eq!(doc.outline.len(), 1);
    }
}
