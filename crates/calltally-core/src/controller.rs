//! The popup session: restore input, resolve the master's name, then tally
//! calls on demand.
//!
//! ```text
//! Initializing ──> Ready <──> Analyzing
//! ```
//!
//! `submit` takes `&mut self`, so a second submission cannot start while one
//! is in flight.

use crate::extract::extract_short_name;
use crate::locator::Locator;
use crate::names::{NameMap, NameSource};
use crate::page::{PageOutcome, PageReader};
use crate::query::OrderQuery;
use crate::session::{SessionState, SessionStore};
use crate::tally::{analyze_table, render_tally, TallyReport};
use async_trait::async_trait;

pub mod messages {
    pub const LOADING_NAMES: &str = "Загрузка данных мастеров...";
    pub const NAMES_FAILED: &str = "Ошибка загрузки данных мастеров";
    pub const SEARCHING_MASTER: &str = "Поиск данных мастера на странице...";
    pub const MASTER_NOT_FOUND: &str = "Данные мастера не найдены";
    pub const INVALID_INPUT: &str = "Введите номера заявок через запятую (только цифры)";
    /// Shown both when no row matches and when the table could not be read.
    pub const ORDER_NOT_FOUND: &str = "Заявка не найдена или произошла ошибка";

    pub fn master(full_name: &str) -> String {
        format!("Мастер: {full_name}")
    }

    pub fn analyzing(orders: &str) -> String {
        format!("Анализ заявок начиная с {orders}...")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Ready,
    Analyzing,
}

/// What the popup shows: one input field and three output regions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub input: String,
    pub status: String,
    pub master: String,
    pub tally: String,
}

/// Receives the view after every visible change.
#[async_trait]
pub trait ViewSink: Send {
    async fn render(&mut self, phase: Phase, view: &View);
}

/// Discards everything; for one-shot commands that only need the result.
pub struct NullSink;

#[async_trait]
impl ViewSink for NullSink {
    async fn render(&mut self, _phase: Phase, _view: &View) {}
}

/// Locators the controller reads the page with
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub master: Locator,
    pub table: Locator,
}

/// Result of one submission, before it is collapsed into display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Invalid,
    Analyzed(PageOutcome<TallyReport>),
}

pub struct PopupController<R, S> {
    reader: R,
    session: SessionState<S>,
    layout: PageLayout,
    names: Option<NameMap>,
    phase: Phase,
    view: View,
}

impl<R, S> PopupController<R, S>
where
    R: PageReader,
    S: SessionStore,
{
    pub fn new(reader: R, store: S, layout: PageLayout) -> Self {
        Self {
            reader,
            session: SessionState::new(store),
            layout,
            names: None,
            phase: Phase::Initializing,
            view: View::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn names(&self) -> Option<&NameMap> {
        self.names.as_ref()
    }

    /// Run the `Initializing` state and land in `Ready`.
    pub async fn initialize(&mut self, source: &NameSource, sink: &mut dyn ViewSink) {
        self.phase = Phase::Initializing;

        match self.session.get() {
            Ok(saved) if !saved.is_empty() => self.view.input = saved,
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not restore last order numbers: {}", e),
        }

        self.view.status = messages::LOADING_NAMES.to_string();
        sink.render(self.phase, &self.view).await;

        match NameMap::load(source) {
            Ok(names) => self.names = Some(names),
            Err(e) => {
                tracing::warn!("Failed to load name table: {}", e);
                self.view.status = messages::NAMES_FAILED.to_string();
                self.phase = Phase::Ready;
                sink.render(self.phase, &self.view).await;
                return;
            }
        }

        self.view.status = messages::SEARCHING_MASTER.to_string();
        sink.render(self.phase, &self.view).await;

        let outcome = extract_short_name(&self.reader, &self.layout.master).await;
        self.view.master = match (outcome, &self.names) {
            (PageOutcome::Found(short_name), Some(names)) => {
                messages::master(names.resolve(Some(&short_name)))
            }
            _ => messages::MASTER_NOT_FOUND.to_string(),
        };
        self.view.status.clear();

        self.phase = Phase::Ready;
        sink.render(self.phase, &self.view).await;
    }

    /// Handle a click on "calculate" with the given input field contents.
    pub async fn submit(&mut self, input: &str, sink: &mut dyn ViewSink) -> Submission {
        self.view.input = input.to_string();

        let query = match OrderQuery::parse(input) {
            Ok(query) => query,
            Err(e) => {
                tracing::debug!("{}", e);
                self.view.tally = messages::INVALID_INPUT.to_string();
                sink.render(self.phase, &self.view).await;
                return Submission::Invalid;
            }
        };

        self.phase = Phase::Analyzing;
        if let Err(e) = self.session.set(query.as_str()) {
            tracing::warn!("Could not save order numbers: {}", e);
        }
        self.view.status = messages::analyzing(query.as_str());
        sink.render(self.phase, &self.view).await;

        let outcome = analyze_table(&self.reader, &self.layout.table, &query).await;
        match &outcome {
            PageOutcome::Found(report) if report.found => {
                self.view.tally = render_tally(&report.counts);
                self.view.status.clear();
            }
            // No match, no table and a failed read all read the same to the
            // user; the status line keeps the analysis message.
            _ => self.view.tally = messages::ORDER_NOT_FOUND.to_string(),
        }

        self.phase = Phase::Ready;
        sink.render(self.phase, &self.view).await;
        Submission::Analyzed(outcome)
    }

    /// The restored or last submitted order numbers
    pub fn last_order(&self) -> Option<&str> {
        self.session.last_order()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Row;
    use crate::session::{FileSessionStore, LAST_ORDER_KEY};
    use crate::tally::{MIN_CELLS, ORDER_CELL, STATUS_CELL};
    use crate::{Error, Result};
    use std::io::Write;

    /// Page with canned answers
    struct FakePage {
        short_name: Result<Option<String>>,
        rows: Result<Option<Vec<Row>>>,
    }

    fn clone_result<T: Clone>(r: &Result<T>) -> Result<T> {
        match r {
            Ok(v) => Ok(v.clone()),
            Err(e) => Err(Error::Page(e.to_string())),
        }
    }

    #[async_trait]
    impl PageReader for FakePage {
        async fn text_after(&self, _locator: &Locator) -> Result<Option<String>> {
            clone_result(&self.short_name)
        }

        async fn table_rows(&self, _locator: &Locator) -> Result<Option<Vec<Row>>> {
            clone_result(&self.rows)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(Phase, View)>,
    }

    #[async_trait]
    impl ViewSink for RecordingSink {
        async fn render(&mut self, phase: Phase, view: &View) {
            self.frames.push((phase, view.clone()));
        }
    }

    fn row(order: &str, status: &str) -> Row {
        let mut cells = vec![String::new(); MIN_CELLS];
        cells[ORDER_CELL] = order.to_string();
        cells[STATUS_CELL] = status.to_string();
        cells
    }

    fn sample_rows() -> Vec<Row> {
        vec![
            row("900", "успех"),
            row("901", "успех"),
            row("1001", "успех"),
            row("1002", "не алло диспетчер"),
            row("1003", "отказ от общения"),
            row("1004", "не заполнен"),
        ]
    }

    fn layout() -> PageLayout {
        PageLayout {
            master: Locator::parse("/html/body/b").unwrap(),
            table: Locator::parse("/html/body/table").unwrap(),
        }
    }

    fn names_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Ivanov": "Ivanov Ivan Ivanovich"}}"#).unwrap();
        file
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        names: tempfile::NamedTempFile,
        store: FileSessionStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));
        Fixture {
            _dir: dir,
            names: names_file(),
            store,
        }
    }

    impl Fixture {
        fn source(&self) -> NameSource {
            NameSource::File(self.names.path().to_path_buf())
        }

        async fn ready(&self, page: FakePage) -> PopupController<FakePage, FileSessionStore> {
            let mut controller = PopupController::new(page, self.store.clone(), layout());
            controller.initialize(&self.source(), &mut NullSink).await;
            controller
        }
    }

    fn page(short_name: Option<&str>) -> FakePage {
        FakePage {
            short_name: Ok(short_name.map(str::to_string)),
            rows: Ok(Some(sample_rows())),
        }
    }

    #[tokio::test]
    async fn test_initialize_resolves_master() {
        let fx = fixture();
        let mut controller = PopupController::new(page(Some("Ivanov I.I.")), fx.store.clone(), layout());
        let mut sink = RecordingSink::default();

        controller.initialize(&fx.source(), &mut sink).await;

        assert_eq!(controller.phase(), Phase::Ready);
        assert_eq!(controller.view().master, "Мастер: Ivanov Ivan Ivanovich");
        assert_eq!(controller.view().status, "");

        let statuses: Vec<&str> = sink.frames.iter().map(|(_, v)| v.status.as_str()).collect();
        assert_eq!(statuses, [messages::LOADING_NAMES, messages::SEARCHING_MASTER, ""]);
        assert_eq!(sink.frames.last().unwrap().0, Phase::Ready);
    }

    #[tokio::test]
    async fn test_initialize_unknown_surname_shows_sentinel() {
        let fx = fixture();
        let controller = fx.ready(page(Some("Petrov P.P."))).await;
        assert_eq!(controller.view().master, "Мастер: не найден");
    }

    #[tokio::test]
    async fn test_initialize_without_short_name() {
        let fx = fixture();
        let controller = fx.ready(page(None)).await;
        assert_eq!(controller.view().master, messages::MASTER_NOT_FOUND);

        let failing = FakePage {
            short_name: Err(Error::Page("tab went away".into())),
            rows: Ok(None),
        };
        let controller = fx.ready(failing).await;
        assert_eq!(controller.view().master, messages::MASTER_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_name_table_failure_stops_before_extraction() {
        let fx = fixture();
        let mut controller = PopupController::new(page(Some("Ivanov I.I.")), fx.store.clone(), layout());
        let mut sink = RecordingSink::default();

        let missing = NameSource::File("/nonexistent/masters.json".into());
        controller.initialize(&missing, &mut sink).await;

        assert_eq!(controller.phase(), Phase::Ready);
        assert_eq!(controller.view().status, messages::NAMES_FAILED);
        assert_eq!(controller.view().master, "");
        assert!(controller.names().is_none());
        assert!(
            sink.frames.iter().all(|(_, v)| v.status != messages::SEARCHING_MASTER),
            "extraction must not be attempted"
        );
    }

    #[tokio::test]
    async fn test_initialize_restores_saved_input() {
        let fx = fixture();
        fx.store.store(LAST_ORDER_KEY, "1001,1002").unwrap();

        let controller = fx.ready(page(None)).await;
        assert_eq!(controller.view().input, "1001,1002");
        assert_eq!(controller.last_order(), Some("1001,1002"));
    }

    #[tokio::test]
    async fn test_submit_renders_tally_and_persists() {
        let fx = fixture();
        let mut controller = fx.ready(page(Some("Ivanov I.I."))).await;
        let mut sink = RecordingSink::default();

        let submission = controller.submit(" 1001 ", &mut sink).await;

        let Submission::Analyzed(PageOutcome::Found(report)) = submission else {
            panic!("expected a tally report");
        };
        assert!(report.found);
        assert_eq!(report.counts.total_calls(), 2);

        let view = controller.view();
        assert!(view.tally.contains("Всего звонков: 2"));
        assert!(view.tally.contains("Успех: 1"));
        assert!(view.tally.contains("Не алло: 1"));
        assert!(view.tally.contains("Отказ от общения: 1"));
        assert!(view.tally.contains("Не заполнен: 1"));
        assert_eq!(view.status, "");
        assert_eq!(controller.phase(), Phase::Ready);

        assert_eq!(sink.frames[0].0, Phase::Analyzing);
        assert_eq!(sink.frames[0].1.status, "Анализ заявок начиная с 1001...");
        assert_eq!(fx.store.load(LAST_ORDER_KEY).unwrap().as_deref(), Some("1001"));
    }

    #[tokio::test]
    async fn test_invalid_input_is_not_persisted() {
        let fx = fixture();
        let mut controller = fx.ready(page(None)).await;

        let submission = controller.submit("1001,,1002", &mut NullSink).await;

        assert_eq!(submission, Submission::Invalid);
        assert_eq!(controller.view().tally, messages::INVALID_INPUT);
        assert_eq!(controller.phase(), Phase::Ready);
        assert_eq!(fx.store.load(LAST_ORDER_KEY).unwrap(), None);
    }

    // Both of the next two cases currently show the same text. The outcome
    // returned to the caller still tells them apart.

    #[tokio::test]
    async fn test_no_matching_order_shows_merged_message() {
        let fx = fixture();
        let mut controller = fx.ready(page(None)).await;

        let submission = controller.submit("4242", &mut NullSink).await;

        assert_eq!(
            submission,
            Submission::Analyzed(PageOutcome::Found(TallyReport::default()))
        );
        assert_eq!(controller.view().tally, messages::ORDER_NOT_FOUND);
        assert_eq!(controller.view().status, "Анализ заявок начиная с 4242...");
    }

    #[tokio::test]
    async fn test_failed_read_shows_merged_message() {
        let fx = fixture();
        let failing = FakePage {
            short_name: Ok(None),
            rows: Err(Error::Page("script injection failed".into())),
        };
        let mut controller = fx.ready(failing).await;

        let submission = controller.submit("1001", &mut NullSink).await;

        assert!(matches!(submission, Submission::Analyzed(PageOutcome::Failed(_))));
        assert_eq!(controller.view().tally, messages::ORDER_NOT_FOUND);
        // Still saved: persistence happens before the table is read.
        assert_eq!(fx.store.load(LAST_ORDER_KEY).unwrap().as_deref(), Some("1001"));
    }

    #[tokio::test]
    async fn test_missing_table_shows_merged_message() {
        let fx = fixture();
        let no_table = FakePage {
            short_name: Ok(None),
            rows: Ok(None),
        };
        let mut controller = fx.ready(no_table).await;

        let submission = controller.submit("1001", &mut NullSink).await;
        assert_eq!(submission, Submission::Analyzed(PageOutcome::NotFound));
        assert_eq!(controller.view().tally, messages::ORDER_NOT_FOUND);
    }
}
