use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use super::warning::Warning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TableKind {
    Raw,
    TimeSpeed,
    Sprints,
    SprintSummary,
    LongSprints,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Raw,
        TableKind::TimeSpeed,
        TableKind::Sprints,
        TableKind::SprintSummary,
        TableKind::LongSprints,
    ];
}

/// A named table of display-ready cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: TableKind,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(name: TableKind, columns: Vec<String>) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }
}

#[cfg(test)]
impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cells of the named column, top to bottom.
    pub fn column_values(&self, name: &str) -> Vec<&str> {
        match self.column_index(name) {
            Some(index) => self.rows.iter().map(|row| row[index].as_str()).collect(),
            None => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub partial: bool,
    pub tables: Vec<Table>,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            source: None,
            partial: false,
            tables: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn table(&self, name: TableKind) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub(crate) fn push_table(&mut self, table: Table) {
        log::info!("Built table {} ({} rows)", table.name, table.rows.len());
        self.tables.push(table);
        self.refresh_partial();
    }

    pub(crate) fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
        self.refresh_partial();
    }

    fn refresh_partial(&mut self) {
        let missing_table = TableKind::ALL.iter().any(|kind| self.table(*kind).is_none());
        self.partial = missing_table || self.warnings.iter().any(Warning::degrades_output);
    }
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}
