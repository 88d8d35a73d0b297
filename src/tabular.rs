//! Tab separated tables with a header row.
//!
//! Every flat-file surface of the crate (evidence corpora, predicted mappings,
//! reconciliation reports) goes through [`Table`]. Cells never contain tabs or
//! line breaks; they are replaced with a space on write.
use std::{
    fs,
    path::{Path, PathBuf},
};

const SEPARATOR: char = '\t';

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("cannot read table `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write table `{path}`: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("table has no header row")]
    MissingHeader,

    #[error("line {line}: expected {expected} cells, found {found}")]
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("missing column `{0}`")]
    MissingColumn(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row, which must have one cell per header column.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), TableError> {
        if row.len() != self.header.len() {
            return Err(TableError::RaggedRow {
                line: self.rows.len() + 2,
                expected: self.header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Appends a row, padding missing cells with empty ones and dropping
    /// cells beyond the header width.
    pub fn push_padded(&mut self, cells: impl IntoIterator<Item = String>) {
        let width = self.header.len();
        let mut row: Vec<String> = cells.into_iter().take(width).collect();
        row.resize(width, String::new());
        self.rows.push(row);
    }

    #[must_use]
    pub fn header(&self) -> &[String] {
        &self.header
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parses tab separated text whose first non empty line is the header.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.is_empty());

        let (_, header) = lines.next().ok_or(TableError::MissingHeader)?;
        let mut table = Self::new(header.split(SEPARATOR));
        for (line, text) in lines {
            let cells: Vec<String> = text.split(SEPARATOR).map(str::to_string).collect();
            if cells.len() != table.header.len() {
                return Err(TableError::RaggedRow {
                    line,
                    expected: table.header.len(),
                    found: cells.len(),
                });
            }
            table.rows.push(cells);
        }
        Ok(table)
    }

    pub fn read(path: &Path) -> Result<Self, TableError> {
        let text = fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in std::iter::once(&self.header).chain(self.rows.iter()) {
            let cells: Vec<String> = line.iter().map(|cell| sanitize(cell)).collect();
            out.push_str(&cells.join("\t"));
            out.push('\n');
        }
        out
    }

    /// Writes the table, creating missing parent directories.
    pub fn write(&self, path: &Path) -> Result<(), TableError> {
        let write_err = |source| TableError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, self.render()).map_err(write_err)
    }
}

fn sanitize(cell: &str) -> String {
    cell.replace(['\t', '\n', '\r'], " ")
}

/// Borrowed view of one table row, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Cell of `column`; `None` when the column does not exist.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.table.column(column)?;
        self.cells.get(index).map(String::as_str)
    }

    /// Cell of `column`, with empty cells read as missing.
    #[must_use]
    pub fn non_empty(&self, column: &str) -> Option<&'a str> {
        self.get(column).filter(|cell| !cell.trim().is_empty())
    }

    pub fn require(&self, column: &str) -> Result<&'a str, TableError> {
        self.get(column)
            .ok_or_else(|| TableError::MissingColumn(column.to_string()))
    }
}
