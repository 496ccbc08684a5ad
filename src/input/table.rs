use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::InputError;

/// A headered table of text cells, every row padded to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// A borrowed view of one named column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a InputTable,
    index: usize,
}

impl InputTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(i, mut row)| {
                if row.len() > width {
                    log::debug!(
                        "Row {} has {} cells, ignoring the {} past the header",
                        i + 1,
                        row.len(),
                        row.len() - width
                    );
                }
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let file = File::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, InputError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(String::from).collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(String::from).collect()))
            .collect::<Result<Vec<Vec<String>>, csv::Error>>()?;

        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        let name = name.trim();
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|index| Column { table: self, index })
    }
}

impl<'a> Column<'a> {
    pub fn name(&self) -> &'a str {
        &self.table.headers[self.index]
    }

    pub fn values(&self) -> impl Iterator<Item = &'a str> + 'a {
        let index = self.index;
        self.table.rows.iter().map(move |row| row[index].as_str())
    }
}
