use crate::{Context, OutputFormat};
use anyhow::{Context as _, Result};
use calltally_core::query::OrderQuery;
use calltally_core::session::SessionState;

pub fn get(ctx: &Context) -> Result<()> {
    let store = ctx.session_store()?;
    let path = store.path().to_path_buf();
    let value = SessionState::new(store)
        .get()
        .with_context(|| format!("Could not read session file {}", path.display()))?;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "lastOrderNumber": value })),
        OutputFormat::Table => {
            println!("Key,Value");
            println!("lastOrderNumber,{}", value);
        }
        OutputFormat::Pretty if value.is_empty() => println!("No saved order numbers"),
        OutputFormat::Pretty => println!("{}", value),
    }
    Ok(())
}

/// Save order numbers the popup will restore on its next start.
pub fn set(ctx: &Context, orders: &str) -> Result<()> {
    let query = OrderQuery::parse(orders)?;

    let mut state = SessionState::new(ctx.session_store()?);
    state.set(query.as_str())?;
    println!("Saved order numbers: {}", query);
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    let mut state = SessionState::new(ctx.session_store()?);
    state.clear()?;
    println!("Cleared saved order numbers");
    Ok(())
}
