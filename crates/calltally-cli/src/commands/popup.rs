//! Interactive session: the terminal stands in for the popup's input field
//! and button, and the view can be mirrored into a popup browser window.

use crate::page_source::PageSource;
use crate::terminal::{PopupSink, TerminalSink};
use crate::Context;
use anyhow::{anyhow, Result};
use calltally_browser::PopupWindow;
use calltally_core::controller::PopupController;
use calltally_core::window::Activation;
use console::style;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// One line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Submit(String),
    Window,
    Quit,
}

/// Interpret a prompt line. An empty line re-submits what the field holds.
pub fn parse_input(line: &str, field: &str) -> Input {
    match line.trim() {
        ":q" | ":quit" | ":exit" => Input::Quit,
        ":w" | ":window" => Input::Window,
        "" => Input::Submit(field.to_string()),
        other => Input::Submit(other.to_string()),
    }
}

pub fn execute(ctx: &Context, html: Option<&Path>, open_window: bool) -> Result<()> {
    let runtime = crate::runtime()?;

    let result = runtime.block_on(async {
        let (page, session) = PageSource::open(html, ctx.settings.debugging_port).await?;
        let window = session.map(|s| PopupWindow::new(s, ctx.settings.window));

        let mut sink = PopupSink {
            terminal: TerminalSink::default(),
            window,
        };
        if open_window {
            activate_window(&mut sink).await?;
        }

        let mut controller = PopupController::new(page, ctx.session_store()?, ctx.layout());
        controller.initialize(&ctx.name_source(), &mut sink).await;

        println!(
            "{}",
            style("Enter order numbers separated by commas (empty line repeats, :window, :quit)")
                .dim()
        );

        loop {
            let field = controller.view().input.clone();
            let Some(line) = prompt(&field).await? else {
                break;
            };

            match parse_input(&line, &field) {
                Input::Quit => break,
                Input::Window => {
                    if let Err(e) = activate_window(&mut sink).await {
                        println!("{}", style(e).yellow());
                    }
                }
                Input::Submit(orders) => {
                    sink.terminal.reset_tally();
                    let submission = controller.submit(&orders, &mut sink).await;
                    tracing::debug!("Submission finished: {:?}", submission);
                }
            }
        }

        Ok(())
    });

    runtime.shutdown_timeout(std::time::Duration::from_millis(100));
    result
}

async fn activate_window(sink: &mut PopupSink) -> Result<()> {
    let window = sink
        .window
        .as_mut()
        .ok_or_else(|| anyhow!("The popup window needs a browser connection (not --html)"))?;

    match window.activate().await? {
        Activation::Created(id) => tracing::info!("Opened popup window {}", id),
        Activation::Focused(id) => tracing::info!("Focused popup window {}", id),
    }
    Ok(())
}

/// Read one line; `None` at end of input.
async fn prompt(field: &str) -> Result<Option<String>> {
    if field.is_empty() {
        print!("> ");
    } else {
        print!("[{}] > ", field);
    }
    io::stdout().flush()?;

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).map(|n| (n, line))
    })
    .await??;

    Ok(match line {
        (0, _) => None,
        (_, line) => Some(line),
    })
}
