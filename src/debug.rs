use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::types::Pt;

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| {
            let v = v.trim();
            v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes")
        })
        .unwrap_or(false)
}

pub(crate) fn table_debug_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| env_flag("TABULA_TABLE_DEBUG"))
}

pub(crate) fn table_debug_verbose_enabled() -> bool {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    *ENABLED.get_or_init(|| env_flag("TABULA_TABLE_DEBUG_VERBOSE"))
}

/// Non-fatal layout anomaly. The table keeps rendering in a degraded form.
#[derive(Debug, Clone, PartialEq)]
pub enum TableWarning {
    /// Star columns cannot fit; every star column was forced to its minimum width.
    OverConstrainedColumns { min_total: Pt, available: Pt },
    /// A row needs more than a full page; it was clamped to the space left on the page.
    RowTooTall {
        row: usize,
        requested: Pt,
        clamped_to: Pt,
    },
    /// A side definition with an unsupported number of values was broadcast.
    MalformedSides { len: usize },
    /// A cell spanned past the last column and was narrowed.
    ColSpanClamped {
        row: usize,
        col: usize,
        requested: usize,
        applied: usize,
    },
    /// The table ended while a row span was still open.
    OpenSpanAtEnd {
        row: usize,
        col: usize,
        row_span: usize,
        concluded_at: usize,
    },
}

impl TableWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            TableWarning::OverConstrainedColumns { .. } => "over_constrained_columns",
            TableWarning::RowTooTall { .. } => "row_too_tall",
            TableWarning::MalformedSides { .. } => "malformed_sides",
            TableWarning::ColSpanClamped { .. } => "col_span_clamped",
            TableWarning::OpenSpanAtEnd { .. } => "open_span_at_end",
        }
    }

    pub(crate) fn to_json(&self, table_id: u32) -> String {
        format!(
            "{{\"type\":\"table.warning\",\"table_id\":{},\"kind\":\"{}\",\"message\":\"{}\"}}",
            table_id,
            self.kind(),
            json_escape(&self.to_string())
        )
    }
}

impl fmt::Display for TableWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableWarning::OverConstrainedColumns {
                min_total,
                available,
            } => write!(
                f,
                "star columns need at least {} but only {} is unclaimed; columns forced to their minimum width",
                min_total, available
            ),
            TableWarning::RowTooTall {
                row,
                requested,
                clamped_to,
            } => write!(
                f,
                "row {} requested {} which is more than the safe page height, row has been clamped to {}",
                row, requested, clamped_to
            ),
            TableWarning::MalformedSides { len } => write!(
                f,
                "side definition with {} values is not a 1/2/4 value shorthand; broadcasting first value",
                len
            ),
            TableWarning::ColSpanClamped {
                row,
                col,
                requested,
                applied,
            } => write!(
                f,
                "cell at ({}, {}) requested colspan {} but only {} columns remain",
                col, row, requested, applied
            ),
            TableWarning::OpenSpanAtEnd {
                row,
                col,
                row_span,
                concluded_at,
            } => write!(
                f,
                "cell at ({}, {}) with rowspan {} was still open at table end; concluded at row {}",
                col, row, row_span, concluded_at
            ),
        }
    }
}

/// Emits to stderr when `TABULA_TABLE_DEBUG` is set.
pub(crate) fn report_warning(warning: &TableWarning) {
    if table_debug_enabled() {
        eprintln!("[tabula.table] warning {}: {}", warning.kind(), warning);
    }
}

#[derive(Clone)]
pub struct DebugLogger {
    inner: Arc<Mutex<DebugState>>,
}

struct DebugState {
    writer: BufWriter<File>,
    counters: HashMap<String, u64>,
}

impl DebugLogger {
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(DebugState {
                writer: BufWriter::new(file),
                counters: HashMap::new(),
            })),
        })
    }

    pub fn log_json(&self, json: &str) {
        if let Ok(mut writer) = self.inner.lock() {
            let _ = writeln!(writer.writer, "{json}");
        }
    }

    pub fn increment(&self, key: &str, amount: u64) {
        if let Ok(mut state) = self.inner.lock() {
            let entry = state.counters.entry(key.to_string()).or_insert(0);
            *entry = entry.saturating_add(amount);
        }
    }

    pub fn emit_summary(&self, context: &str) {
        if let Ok(mut state) = self.inner.lock() {
            let mut counters: Vec<(String, u64)> = state.counters.drain().collect();
            counters.sort_by(|a, b| a.0.cmp(&b.0));
            let counts_json = if counters.is_empty() {
                "{}".to_string()
            } else {
                let mut out = String::from("{");
                for (idx, (key, value)) in counters.iter().enumerate() {
                    if idx > 0 {
                        out.push(',');
                    }
                    out.push_str(&format!("\"{}\":{}", json_escape(key), value));
                }
                out.push('}');
                out
            };
            let json = format!(
                "{{\"type\":\"table.summary\",\"context\":\"{}\",\"counts\":{}}}",
                json_escape(context),
                counts_json
            );
            let _ = writeln!(state.writer, "{json}");
        }
    }

    pub fn flush(&self) {
        if let Ok(mut state) = self.inner.lock() {
            let _ = state.writer.flush();
        }
    }
}

pub(crate) fn json_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_escape_quotes_and_newlines() {
        assert_eq!(json_escape("a\"b\nc"), "a\\\"b\\nc");
    }

    #[test]
    fn warning_json_carries_kind() {
        let warning = TableWarning::RowTooTall {
            row: 3,
            requested: Pt::from_i32(900),
            clamped_to: Pt::from_i32(120),
        };
        let json = warning.to_json(7);
        assert!(json.starts_with("{\"type\":\"table.warning\",\"table_id\":7"));
        assert!(json.contains("\"kind\":\"row_too_tall\""));
        assert!(json.contains("row 3 requested 900.000"));
    }

    #[test]
    fn logger_writes_summary() {
        let path = std::env::temp_dir().join(format!(
            "tabula_debug_{}_{}.log",
            std::process::id(),
            line!()
        ));
        let logger = DebugLogger::new(&path).expect("create log");
        logger.increment("rows", 2);
        logger.increment("rows", 1);
        logger.emit_summary("unit");
        logger.flush();
        let contents = std::fs::read_to_string(&path).expect("read log");
        let _ = std::fs::remove_file(&path);
        assert!(contents.contains("\"counts\":{\"rows\":3}"));
    }
}
