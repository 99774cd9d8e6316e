//! Trend synthesis and tabular export for YTGraphX

pub mod export;
pub mod synthesizer;

pub use export::{
    to_csv_string, to_rows, CsvExporter, CsvRecord, CurrentStatsRow, ExportRows, HistoryRow,
    VideoRow,
};
pub use synthesizer::TrendSynthesizer;
