use crate::domain::model::Table;

pub const DEFAULT_MAX_ROWS: usize = 50;
pub const DEFAULT_MAX_COLUMNS: usize = 9;

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub max_rows: usize,
    pub max_columns: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            max_columns: DEFAULT_MAX_COLUMNS,
        }
    }
}

/// 超過上限時保留頭尾各一半，中間以 `...` 取代
fn visible(total: usize, max: usize) -> (Vec<usize>, Option<usize>) {
    if max == 0 || total <= max {
        return ((0..total).collect(), None);
    }
    let head = max.div_ceil(2);
    let tail = max / 2;
    let mut idx: Vec<usize> = (0..head).collect();
    idx.extend(total - tail..total);
    (idx, Some(head))
}

pub fn render(table: &Table, opts: DisplayOptions) -> String {
    if table.width() == 0 {
        return "Empty table\nColumns: []\nIndex: []".to_string();
    }
    if table.height() == 0 {
        return format!(
            "Empty table\nColumns: [{}]\nIndex: []",
            table.columns.join(", ")
        );
    }

    let (cols, col_gap) = visible(table.width(), opts.max_columns);
    let (rows, row_gap) = visible(table.height(), opts.max_rows);

    // 第 0 欄是列索引，其餘依顯示順序排列
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 2);

    let mut header = vec![String::new()];
    for (pos, c) in cols.iter().enumerate() {
        if col_gap == Some(pos) {
            header.push(ELLIPSIS.to_string());
        }
        header.push(table.columns[*c].clone());
    }
    grid.push(header);

    for (rpos, r) in rows.iter().enumerate() {
        if row_gap == Some(rpos) {
            grid.push(vec![ELLIPSIS.to_string(); grid[0].len()]);
        }
        let mut line = vec![r.to_string()];
        for (pos, c) in cols.iter().enumerate() {
            if col_gap == Some(pos) {
                line.push(ELLIPSIS.to_string());
            }
            line.push(table.rows[*r][*c].to_string());
        }
        grid.push(line);
    }

    let widths: Vec<usize> = (0..grid[0].len())
        .map(|i| {
            grid.iter()
                .map(|line| line[i].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out: Vec<String> = grid
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:>width$}", cell, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect();

    if row_gap.is_some() || col_gap.is_some() {
        out.push(String::new());
        out.push(format!(
            "[{} rows x {} columns]",
            table.height(),
            table.width()
        ));
    }

    out.join("\n")
}
