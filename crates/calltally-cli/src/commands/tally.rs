use crate::page_source::PageSource;
use crate::{Context, OutputFormat};
use anyhow::{bail, Result};
use calltally_core::controller::{messages, NullSink, PopupController, Submission};
use calltally_core::page::PageOutcome;
use calltally_core::query;
use calltally_core::session::{FileSessionStore, SessionStore};
use calltally_core::tally::TallyReport;
use std::path::Path;

/// JSON/table view of one analysis
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyOutput {
    pub orders: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counts: Option<calltally_core::tally::StatusTally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_calls: Option<u32>,
    /// Set when the table could not be read at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TallyOutput {
    pub fn new(orders: &str, outcome: &PageOutcome<TallyReport>) -> Self {
        let mut output = Self {
            orders: orders.to_string(),
            found: false,
            counts: None,
            total_calls: None,
            error: None,
        };

        match outcome {
            PageOutcome::Found(report) if report.found => {
                output.found = true;
                output.counts = Some(report.counts);
                output.total_calls = Some(report.counts.total_calls());
            }
            PageOutcome::Found(_) => {}
            PageOutcome::NotFound => output.error = Some("order table not found".to_string()),
            PageOutcome::Failed(reason) => output.error = Some(reason.clone()),
        }
        output
    }
}

/// A store that never writes, for `--no-save`
struct ReadOnlyStore(FileSessionStore);

impl SessionStore for ReadOnlyStore {
    fn load(&self, key: &str) -> calltally_core::Result<Option<String>> {
        self.0.load(key)
    }

    fn store(&self, _key: &str, _value: &str) -> calltally_core::Result<()> {
        Ok(())
    }

    fn remove(&self, _key: &str) -> calltally_core::Result<()> {
        Ok(())
    }
}

pub fn execute(ctx: &Context, orders: &str, html: Option<&Path>, save: bool) -> Result<()> {
    let orders = orders.trim();
    if !query::is_valid(orders) {
        bail!("{}", messages::INVALID_INPUT);
    }

    let runtime = crate::runtime()?;
    let result = runtime.block_on(async {
        let (page, _session) = PageSource::open(html, ctx.settings.debugging_port).await?;
        let store = ctx.session_store()?;

        let (submission, tally_text) = if save {
            let mut controller = PopupController::new(page, store, ctx.layout());
            let submission = controller.submit(orders, &mut NullSink).await;
            (submission, controller.view().tally.clone())
        } else {
            let mut controller = PopupController::new(page, ReadOnlyStore(store), ctx.layout());
            let submission = controller.submit(orders, &mut NullSink).await;
            (submission, controller.view().tally.clone())
        };
        anyhow::Ok((submission, tally_text))
    });
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    let (submission, tally_text) = result?;
    let outcome = match submission {
        Submission::Analyzed(outcome) => outcome,
        Submission::Invalid => bail!("{}", messages::INVALID_INPUT),
    };

    match ctx.format {
        OutputFormat::Json => {
            let output = TallyOutput::new(orders, &outcome);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => {
            let output = TallyOutput::new(orders, &outcome);
            println!("Metric,Value");
            println!("Found,{}", output.found);
            if let Some(counts) = output.counts {
                println!("Total Calls,{}", counts.total_calls());
                println!("Success,{}", counts.success);
                println!("No Answer,{}", counts.no_answer);
                println!("Refused,{}", counts.refused);
                println!("Not Filled,{}", counts.not_filled);
            }
        }
        OutputFormat::Pretty => println!("{}", tally_text),
    }

    Ok(())
}
