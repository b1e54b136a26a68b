use crate::{Context, OutputFormat};
use anyhow::{bail, Result};
use calltally_core::settings::Settings;

/// Print the effective settings, overrides included.
pub fn show(ctx: &Context) -> Result<()> {
    let settings = &ctx.settings;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(settings)?),
        OutputFormat::Table => {
            println!("Setting,Value");
            println!("Master Locator,{}", settings.master_locator);
            println!("Table Locator,{}", settings.table_locator);
            println!("Names File,{}", display_or(&settings.names_file, "(bundled)"));
            println!("Session File,{}", display_or(&settings.session_file, "(default)"));
            println!("Debugging Port,{}", settings.debugging_port);
            println!(
                "Window,{}x{} at {}px from right",
                settings.window.width, settings.window.height, settings.window.right_offset
            );
        }
        OutputFormat::Pretty => {
            println!("Settings file: {}", ctx.settings_path.display());
            if !ctx.settings_path.exists() {
                println!("  (not created yet, showing defaults)");
            }
            println!();
            println!("Master locator:  {}", settings.master_locator);
            println!("Table locator:   {}", settings.table_locator);
            println!("Names file:      {}", display_or(&settings.names_file, "(bundled)"));
            println!("Session file:    {}", display_or(&settings.session_file, "(default)"));
            println!("Debugging port:  {}", settings.debugging_port);
            println!(
                "Popup window:    {}x{}, {}px from the right edge",
                settings.window.width, settings.window.height, settings.window.right_offset
            );
        }
    }

    Ok(())
}

/// Write a settings file holding the defaults.
pub fn init(ctx: &Context, force: bool) -> Result<()> {
    let path = &ctx.settings_path;
    if path.exists() && !force {
        bail!(
            "Settings file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    Settings::default().to_file(path)?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}

pub fn path(ctx: &Context) -> Result<()> {
    println!("{}", ctx.settings_path.display());
    Ok(())
}

fn display_or(path: &Option<std::path::PathBuf>, fallback: &str) -> String {
    path.as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| fallback.to_string())
}
