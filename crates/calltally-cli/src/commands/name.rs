use crate::page_source::PageSource;
use crate::{Context, OutputFormat};
use anyhow::{Context as _, Result};
use calltally_core::controller::messages;
use calltally_core::extract::{resolve_master, Master};
use calltally_core::names::{NameMap, NOT_FOUND};
use std::path::Path;

/// Outcome of resolving the master shown on the page
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NameReport {
    pub found: bool,
    pub short_name: Option<String>,
    pub full_name: Option<String>,
}

impl NameReport {
    fn new(master: Option<Master>) -> Self {
        match master {
            Some(master) => {
                let known = master.full_name != NOT_FOUND;
                Self {
                    found: known,
                    short_name: Some(master.short_name),
                    full_name: known.then_some(master.full_name),
                }
            }
            None => Self {
                found: false,
                short_name: None,
                full_name: None,
            },
        }
    }

    /// The line the popup would show
    pub fn display_line(&self) -> String {
        match (&self.short_name, &self.full_name) {
            (None, _) => messages::MASTER_NOT_FOUND.to_string(),
            (Some(_), Some(full)) => messages::master(full),
            (Some(_), None) => messages::master(NOT_FOUND),
        }
    }
}

/// Resolve the master's full name from a page.
pub async fn resolve(ctx: &Context, page: &PageSource) -> Result<NameReport> {
    let source = ctx.name_source();
    let names = NameMap::load(&source).with_context(|| messages::NAMES_FAILED.to_string())?;

    let master = resolve_master(page, &ctx.settings.master_locator, &names).await;
    Ok(NameReport::new(master))
}

pub fn execute(ctx: &Context, html: Option<&Path>) -> Result<()> {
    let runtime = crate::runtime()?;

    let result = runtime.block_on(async {
        let (page, _session) = PageSource::open(html, ctx.settings.debugging_port).await?;
        resolve(ctx, &page).await
    });
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    let report = result?;
    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("Field,Value");
            println!("Found,{}", report.found);
            println!("Short Name,{}", report.short_name.as_deref().unwrap_or(""));
            println!("Full Name,{}", report.full_name.as_deref().unwrap_or(""));
        }
        OutputFormat::Pretty => println!("{}", report.display_line()),
    }

    Ok(())
}
