use crate::locator::Locator;
use crate::page::{PageOutcome, PageReader, Row};
use crate::query::OrderQuery;
use serde::{Deserialize, Serialize};

/// Rows with fewer cells than this are layout rows, not call records.
pub const MIN_CELLS: usize = 9;
pub const ORDER_CELL: usize = 1;
pub const STATUS_CELL: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusBucket {
    Success,
    NoAnswer,
    Refused,
    NotFilled,
}

impl StatusBucket {
    /// Classify a status cell. Unknown statuses are not counted anywhere.
    pub fn classify(status: &str) -> Option<Self> {
        match status {
            "успех" => Some(StatusBucket::Success),
            "отказ от общения" => Some(StatusBucket::Refused),
            "не заполнен" => Some(StatusBucket::NotFilled),
            s if s.starts_with("не алло") => Some(StatusBucket::NoAnswer),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTally {
    pub success: u32,
    pub no_answer: u32,
    pub refused: u32,
    pub not_filled: u32,
}

impl StatusTally {
    pub fn record(&mut self, bucket: StatusBucket) {
        match bucket {
            StatusBucket::Success => self.success += 1,
            StatusBucket::NoAnswer => self.no_answer += 1,
            StatusBucket::Refused => self.refused += 1,
            StatusBucket::NotFilled => self.not_filled += 1,
        }
    }

    /// Calls that actually went out: successes plus unanswered ones
    pub fn total_calls(&self) -> u32 {
        self.success + self.no_answer
    }
}

/// `counts` only means something when `found` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyReport {
    pub found: bool,
    pub counts: StatusTally,
}

/// Tally every row from the first one whose order cell satisfies `is_start`.
///
/// The predicate marks a starting point; later rows are counted whether or
/// not they match it.
pub fn scan_rows_from<F, C>(rows: &[Row], is_start: F, classify: C) -> TallyReport
where
    F: Fn(&str) -> bool,
    C: Fn(&str) -> Option<StatusBucket>,
{
    let mut report = TallyReport::default();

    for row in rows.iter().filter(|row| row.len() >= MIN_CELLS) {
        if !report.found && is_start(&row[ORDER_CELL]) {
            report.found = true;
        }

        if report.found {
            if let Some(bucket) = classify(&row[STATUS_CELL]) {
                report.counts.record(bucket);
            }
        }
    }

    report
}

/// Read the order table and tally statuses from the first queried order on.
///
/// A missing table comes back as `NotFound`; a reader error as `Failed`.
pub async fn analyze_table<R>(
    reader: &R,
    locator: &Locator,
    query: &OrderQuery,
) -> PageOutcome<TallyReport>
where
    R: PageReader + ?Sized,
{
    tracing::debug!("Scanning table {} for orders {}", locator, query);

    let outcome: PageOutcome<Vec<Row>> = reader.table_rows(locator).await.into();
    let outcome = outcome.map(|rows| {
        let report = scan_rows_from(&rows, |id| query.contains(id), StatusBucket::classify);
        tracing::info!(
            "Scanned {} rows: found={}, total calls {}",
            rows.len(),
            report.found,
            report.counts.total_calls()
        );
        report
    });

    match &outcome {
        PageOutcome::NotFound => tracing::warn!("Order table not found at {}", locator),
        PageOutcome::Failed(reason) => tracing::warn!("Table analysis failed: {}", reason),
        PageOutcome::Found(_) => {}
    }

    outcome
}

pub fn render_tally(counts: &StatusTally) -> String {
    format!(
        "Результаты анализа:\n\
         Всего звонков: {}\n\
         Успех: {}\n\
         Не алло: {}\n\
         Отказ от общения: {}\n\
         Не заполнен: {}",
        counts.total_calls(),
        counts.success,
        counts.no_answer,
        counts.refused,
        counts.not_filled
    )
}
