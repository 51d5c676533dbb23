use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Stored value for a slot nobody has filled in yet. Kept as the literal
/// placeholder string so the tables stay readable in a plain editor.
pub const UNSET: &str = "-- Select --";

/// Flat columnar table: one header row plus string rows, persisted as CSV.
/// Every mutation path loads fresh from disk and rewrites the whole file, so
/// external edits between interactions are picked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn with_columns(columns: &[String]) -> Self {
        Self {
            columns: columns.to_vec(),
            rows: Vec::new(),
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let mut records = parse_records(raw);
        if records.is_empty() {
            anyhow::bail!("table has no header row");
        }
        let columns = records.remove(0);
        let width = columns.len();
        let rows = records
            .into_iter()
            .filter(|row| !(row.len() == 1 && row[0].is_empty()))
            .map(|mut row| {
                // Short rows happen when a column was added after the row was
                // written. Pad with the sentinel so every row is full-width.
                while row.len() < width {
                    row.push(UNSET.to_string());
                }
                row.truncate(width);
                row
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// Load a table, creating an empty one with the given header when the
    /// file does not exist yet.
    pub fn load_or_create(path: &Path, columns: &[String]) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::with_columns(columns));
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading table {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parsing table {}", path.display()))
    }

    /// Write the full table back. Temp-file-then-rename so a reader never
    /// observes a half-written file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating data dir {}", dir.display()))?;
        }
        let tmp = path.with_extension("csv.tmp");
        fs::write(&tmp, self.to_csv())
            .with_context(|| format!("writing table {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("replacing table {}", path.display()))?;
        Ok(())
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        write_record(&mut out, &self.columns);
        for row in &self.rows {
            write_record(&mut out, row);
        }
        out
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get<'a>(&'a self, row: usize, column: &str) -> Option<&'a str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// First row matching every (column, value) pair of the natural key.
    pub fn find_row(&self, key: &[(&str, &str)]) -> Option<usize> {
        let cols: Option<Vec<usize>> = key
            .iter()
            .map(|(name, _)| self.column_index(name))
            .collect();
        let cols = cols?;
        self.rows.iter().position(|row| {
            cols.iter()
                .zip(key.iter())
                .all(|(&c, &(_, want))| row.get(c).map(String::as_str) == Some(want))
        })
    }

    /// Insert-or-overwrite by natural key. A matching row has only the
    /// columns named in `record` overwritten; a fresh row gets every column
    /// populated, with the sentinel for anything not supplied.
    pub fn upsert(&mut self, key: &[(&str, &str)], record: &[(&str, &str)]) -> Result<()> {
        for (name, _) in key.iter().chain(record.iter()) {
            if self.column_index(name).is_none() {
                anyhow::bail!("unknown column '{name}'");
            }
        }
        match self.find_row(key) {
            Some(idx) => {
                for (name, value) in record {
                    let col = self.column_index(name).unwrap_or_default();
                    self.rows[idx][col] = (*value).to_string();
                }
            }
            None => {
                let mut row = vec![UNSET.to_string(); self.columns.len()];
                for (name, value) in key.iter().chain(record.iter()) {
                    let col = self.column_index(name).unwrap_or_default();
                    row[col] = (*value).to_string();
                }
                self.rows.push(row);
            }
        }
        Ok(())
    }

    /// Append without any key matching (fun predictions have no natural key).
    pub fn append(&mut self, record: &[(&str, &str)]) -> Result<()> {
        let mut row = vec![UNSET.to_string(); self.columns.len()];
        for (name, value) in record {
            let col = self
                .column_index(name)
                .with_context(|| format!("unknown column '{name}'"))?;
            row[col] = (*value).to_string();
        }
        self.rows.push(row);
        Ok(())
    }

    /// Remove exactly one row; rows above it shift down by one, so any
    /// positional index held by a caller is stale after this returns.
    pub fn delete(&mut self, index: usize) -> Result<()> {
        if index >= self.rows.len() {
            anyhow::bail!("row {index} out of range ({} rows)", self.rows.len());
        }
        self.rows.remove(index);
        Ok(())
    }
}

/// Data directory holding all tables. `F1_DATA_DIR` overrides the default.
pub fn data_dir() -> PathBuf {
    match std::env::var("F1_DATA_DIR") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("data"),
    }
}

fn write_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if field.contains([',', '"', '\n', '\r']) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn parse_records(raw: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;

    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    // Final record when the file lacks a trailing newline.
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}
