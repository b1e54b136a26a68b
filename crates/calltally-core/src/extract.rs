use crate::locator::Locator;
use crate::names::NameMap;
use crate::page::{PageOutcome, PageReader};

/// Read the worker's short name (e.g. "Иванов И.И.") from the page.
pub async fn extract_short_name<R>(reader: &R, locator: &Locator) -> PageOutcome<String>
where
    R: PageReader + ?Sized,
{
    tracing::debug!("Looking up short name at {}", locator);

    let outcome: PageOutcome<String> = reader.text_after(locator).await.into();
    match &outcome {
        PageOutcome::Found(name) => tracing::info!("Found short name '{}'", name),
        PageOutcome::NotFound => tracing::info!("No short name at {}", locator),
        PageOutcome::Failed(reason) => tracing::warn!("Short name extraction failed: {}", reason),
    }
    outcome
}

/// Full name resolution result for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Master {
    pub short_name: String,
    pub full_name: String,
}

/// Extract and resolve in one step. `None` when the page had no short name
/// (or could not be read); a short name missing from `names` still yields a
/// [`Master`] whose full name is the sentinel.
pub async fn resolve_master<R>(reader: &R, locator: &Locator, names: &NameMap) -> Option<Master>
where
    R: PageReader + ?Sized,
{
    let short_name = extract_short_name(reader, locator).await.found()?;
    let full_name = names.resolve(Some(&short_name)).to_string();
    Some(Master { short_name, full_name })
}
