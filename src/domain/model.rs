use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 一個排名頁面的原始 HTML
#[derive(Debug, Clone)]
pub struct Page {
    pub topic: String,
    pub url: String,
    pub html: String,
}

/// 排名頁面中的一個訓練營項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub topic: String,
    pub ranking: u32,
    pub rating: Option<f64>,
    pub reviews: Option<u64>,
    pub cost: Option<u8>,
    pub summary: String,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<RankingRecord>,
    pub csv_output: String,
    pub tsv_output: String,
    pub json_output: String,
}

/// 從資料庫讀出的單一欄位值
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("None"),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::UInt(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
            Cell::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// 記憶體中的表格：欄位名稱加上逐列的值
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }
}
