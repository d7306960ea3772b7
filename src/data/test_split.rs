// ============================================================
// Layer 4 — Test Split Loader
// ============================================================
// Reads the held-out test split written by the training stage.
// Both files are pandas `to_csv` output: a header row and an
// unnamed index column first.
//
//   x_test.csv            y_test.csv
//   ,tweet                ,label
//   17,"some text..."     17,0
//   42,"more text..."     42,1
//
// Rows are matched by position, like the training stage wrote them.

use csv::ReaderBuilder;
use std::path::Path;

use crate::domain::error::StageFault;

/// Raw test texts with their 0/1 labels, same order and length.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSplit {
    pub texts:  Vec<String>,
    pub labels: Vec<u8>,
}

impl TestSplit {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub struct TestSplitLoader {
    text_column: String,
}

impl TestSplitLoader {
    pub fn new(text_column: impl Into<String>) -> Self {
        Self { text_column: text_column.into() }
    }

    pub fn load(&self, x_path: &Path, y_path: &Path) -> Result<TestSplit, StageFault> {
        let texts  = self.read_texts(x_path)?;
        let labels = read_labels(y_path)?;

        if texts.len() != labels.len() {
            return Err(StageFault::data(
                y_path,
                format!("{} labels for {} test rows", labels.len(), texts.len()),
            ));
        }
        let split = TestSplit { texts, labels };
        if split.is_empty() {
            return Err(StageFault::data(x_path, "test split has no rows"));
        }

        tracing::debug!("Loaded {} test rows from '{}'", split.len(), x_path.display());
        Ok(split)
    }

    fn read_texts(&self, path: &Path) -> Result<Vec<String>, StageFault> {
        let mut reader = open_csv(path)?;

        let headers = reader
            .headers()
            .map_err(|e| StageFault::data(path, e.to_string()))?
            .clone();
        let column = headers
            .iter()
            .position(|h| h == self.text_column)
            .ok_or_else(|| {
                StageFault::data(path, format!("no '{}' column", self.text_column))
            })?;

        let mut texts = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| StageFault::data(path, e.to_string()))?;
            // Short rows keep their slot with empty text so labels stay aligned
            texts.push(record.get(column).unwrap_or_default().to_string());
        }
        Ok(texts)
    }
}

/// The label is the last column, so files with or without the index column both work.
fn read_labels(path: &Path) -> Result<Vec<u8>, StageFault> {
    let mut reader = open_csv(path)?;
    let mut labels = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|e| StageFault::data(path, e.to_string()))?;
        let cell = record
            .iter()
            .last()
            .ok_or_else(|| StageFault::data(path, format!("row {row} is empty")))?;
        labels.push(parse_label(cell).ok_or_else(|| {
            StageFault::data(path, format!("row {row}: '{cell}' is not a 0/1 label"))
        })?);
    }
    Ok(labels)
}

/// Accepts "0", "1", and float spellings such as "1.0".
fn parse_label(cell: &str) -> Option<u8> {
    let v: f64 = cell.trim().parse().ok()?;
    if v == 0.0 {
        Some(0)
    } else if v == 1.0 {
        Some(1)
    } else {
        None
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>, StageFault> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| match e.into_kind() {
            csv::ErrorKind::Io(io) => StageFault::io(path, io),
            other => StageFault::data(path, format!("{other:?}")),
        })
}
