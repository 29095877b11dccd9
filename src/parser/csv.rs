// src/parser/csv.rs
//! Tabular data to database schema and rows.

use super::error::ParseError;
use super::DocumentParser;
use crate::model::{PropertySchema, PropertyValue};
use indexmap::IndexMap;
use serde::Serialize;

/// A parsed CSV file, ready to become a database.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvDocument {
    pub title: Option<String>,
    pub schema: IndexMap<String, PropertySchema>,
    pub records: Vec<IndexMap<String, PropertyValue>>,
}

impl CsvDocument {
    /// Name of the title column
    pub fn title_property(&self) -> Option<&str> {
        self.schema
            .iter()
            .find(|(_, schema)| matches!(schema, PropertySchema::Title {}))
            .map(|(name, _)| name.as_str())
    }
}

/// Reads comma separated values with double-quote escaping.
#[derive(Debug, Clone)]
pub struct CsvParser {
    header_row: bool,
    title_column: usize,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            header_row: true,
            title_column: 0,
        }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the first row names the columns. Without one, columns are
    /// numbered from 0 and the first row is data.
    pub fn with_header_row(mut self, header_row: bool) -> Self {
        self.header_row = header_row;
        self
    }

    /// Column that becomes the database title property.
    pub fn with_title_column(mut self, title_column: usize) -> Self {
        self.title_column = title_column;
        self
    }

    fn build_schema(&self, header: &[String]) -> Result<Vec<String>, ParseError> {
        if header.is_empty() {
            return Err(ParseError::InvalidCsv("empty header".to_string()));
        }

        let mut names: Vec<String> = Vec::with_capacity(header.len());
        for (column, field) in header.iter().enumerate() {
            let mut name = field.trim().to_string();
            while names.contains(&name) {
                name = format!("{}_{}", name, column);
            }
            names.push(name);
        }
        Ok(names)
    }

    fn build_record(
        &self,
        names: &[String],
        fields: Vec<String>,
        line: usize,
    ) -> Result<IndexMap<String, PropertyValue>, ParseError> {
        if fields.len() != names.len() {
            return Err(ParseError::InvalidCsv(format!(
                "incorrect number of fields on line {}: expected {}, found {}",
                line,
                names.len(),
                fields.len()
            )));
        }

        Ok(names
            .iter()
            .zip(fields)
            .enumerate()
            .map(|(column, (name, value))| {
                let value = if column == self.title_column {
                    PropertyValue::title(&value)
                } else {
                    PropertyValue::rich_text(&value)
                };
                (name.clone(), value)
            })
            .collect())
    }
}

impl DocumentParser for CsvParser {
    type Output = CsvDocument;

    fn parse_named(&self, data: &str, name: Option<&str>) -> Result<CsvDocument, ParseError> {
        let mut rows = read_rows(data)?.into_iter();
        let (first_line, first) = rows.next().ok_or(ParseError::EmptyInput)?;

        let mut records = Vec::new();
        let names = if self.header_row {
            self.build_schema(&first)?
        } else {
            let numbered: Vec<String> = (0..first.len()).map(|n| n.to_string()).collect();
            let names = self.build_schema(&numbered)?;
            records.push(self.build_record(&names, first, first_line)?);
            names
        };

        for (line, fields) in rows {
            records.push(self.build_record(&names, fields, line)?);
        }

        let schema = names
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let schema = if column == self.title_column {
                    PropertySchema::Title {}
                } else {
                    PropertySchema::RichText {}
                };
                (name.clone(), schema)
            })
            .collect();

        log::debug!("Parsed {} CSV record(s)", records.len());

        Ok(CsvDocument {
            title: name.map(str::to_string),
            schema,
            records,
        })
    }
}

/// Split CSV text into rows of fields, tagged with their starting line.
///
/// Quoted fields may contain commas, newlines and doubled quotes. Blank
/// lines are skipped.
fn read_rows(data: &str) -> Result<Vec<(usize, Vec<String>)>, ParseError> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_line = 1;
    let mut chars = data.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                fields.push(std::mem::take(&mut field));
                push_row(&mut rows, std::mem::take(&mut fields), row_line);
                line += 1;
                row_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ParseError::InvalidCsv(format!(
            "unterminated quoted field starting on line {}",
            row_line
        )));
    }

    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_row(&mut rows, fields, row_line);
    }

    Ok(rows)
}

fn push_row(rows: &mut Vec<(usize, Vec<String>)>, fields: Vec<String>, line: usize) {
    let blank = fields.len() == 1 && fields[0].is_empty();
    if !blank {
        rows.push((line, fields));
    }
}
