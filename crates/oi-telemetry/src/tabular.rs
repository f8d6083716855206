//! Minimal delimited-text reader for CSV and TSV uploads.
//!
//! Handles RFC 4180 quoting (embedded delimiters, doubled quotes, quoted
//! newlines), skips blank lines, and strips a leading UTF-8 BOM.

use crate::error::{TelemetryError, TelemetryResult};

/// Field separator of a delimited file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    /// Pick the delimiter from a file extension (`csv` or `tsv`, any case).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Comma),
            "tsv" => Some(Self::Tab),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Tab => '\t',
        }
    }
}

/// One data record, with the 1-based line it started on.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub fields: Vec<String>,
}

impl Row {
    /// Field at `index`, or an empty string when the row is short.
    pub fn get(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }
}

/// Header plus data rows of a delimited file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Read `content` as a delimited table. The first non-blank record is the header.
pub fn read_table(content: &str, delimiter: Delimiter) -> TelemetryResult<Table> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = split_records(content, delimiter.as_char())?.into_iter();

    let Some(header) = records.next() else {
        return Err(TelemetryError::Empty);
    };
    let headers: Vec<String> = header.fields.into_iter().map(|h| h.trim().to_string()).collect();

    let mut rows = Vec::new();
    for record in records {
        if record.fields.len() > headers.len() {
            return Err(TelemetryError::Parse {
                line: record.line,
                message: format!(
                    "expected {} fields, saw {}",
                    headers.len(),
                    record.fields.len()
                ),
            });
        }
        rows.push(record);
    }

    Ok(Table { headers, rows })
}

fn split_records(content: &str, sep: char) -> TelemetryResult<Vec<Row>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = content.chars().peekable();

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
            '"' if field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut fields), record_line);
                line += 1;
                record_line = line;
            }
            c if c == sep => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(TelemetryError::Parse {
            line: record_line,
            message: "unterminated quoted field".into(),
        });
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        push_record(&mut records, fields, record_line);
    }
    Ok(records)
}

fn push_record(records: &mut Vec<Row>, fields: Vec<String>, line: usize) {
    let blank = fields.iter().all(|f| f.trim().is_empty());
    if !blank {
        records.push(Row { line, fields });
    }
}
