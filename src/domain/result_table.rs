use std::fmt;

use itertools::Itertools;
use serde_json::{Number, Value};
use url::Url;

use super::result_record::ResultRecord;

pub const DROPPED_COLUMNS: [&str; 2] = ["overseas_investment_related", "supporting_evidence"];

const COLUMN_LABELS: [(&str, &str); 4] = [
    ("content", "About Us Content"),
    ("date", "Date"),
    ("title", "Title"),
    ("url", "URL"),
];

pub fn column_label(key: &str) -> &str {
    COLUMN_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(Number),
    Bool(bool),
}

impl From<Option<&Value>> for Cell {
    fn from(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Cell::Empty,
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(Value::Number(n)) => Cell::Number(n.clone()),
            Some(other) => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Records laid out as rows under relabeled column headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl ResultTable {
    /// Columns are every key seen across the records, in first-seen order,
    /// without the dropped investment columns.
    pub fn from_records(records: &[ResultRecord]) -> Self {
        let keys: Vec<&String> = records
            .iter()
            .flat_map(|r| r.keys())
            .unique()
            .filter(|k| !DROPPED_COLUMNS.contains(&k.as_str()))
            .collect();

        let headers = keys.iter().map(|k| column_label(k).to_string()).collect();
        let rows = records
            .iter()
            .map(|record| keys.iter().map(|k| Cell::from(record.get(k))).collect())
            .collect();

        ResultTable { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The expandable per-company view under the table.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    pub index: usize,
    pub title: String,
    pub date: String,
    pub content: String,
    pub link: String,
}

impl RecordDetail {
    pub fn from_records(records: &[ResultRecord]) -> Vec<RecordDetail> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| RecordDetail {
                index: i + 1,
                title: record.text("title").unwrap_or("Untitled".to_string()),
                date: record.text("date").unwrap_or("N/A".to_string()),
                content: record
                    .text("content")
                    .unwrap_or("No content available".to_string()),
                link: record
                    .text("url")
                    .and_then(|u| safe_link(&u))
                    .unwrap_or("#".to_string()),
            })
            .collect()
    }
}

// Only web links end up in an href.
fn safe_link(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}
