//! Terminal bindings for the authorization prompt

use colored::Colorize;
use langgraph_interrupts::{
    open_in_browser, AuthorizationPrompt, BoxError, FailureKind, FailureNotice, Notifier, PromptView,
};

/// Prints notifications to stdout/stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn info(&self, message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    fn error(&self, notice: &FailureNotice) {
        let title = match notice.kind {
            FailureKind::Cancelled => notice.title.yellow().bold(),
            _ => notice.title.red().bold(),
        };
        eprintln!("{} {}", "✗".red(), title);
        eprintln!("  {}", notice.description);
    }
}

/// Display callback: the interrupt message as the handler's notify step.
pub fn display(message: &str) {
    println!("{} {}", "→".cyan(), message);
}

/// Opener used when the browser must not be launched.
pub fn print_url(url: &str) -> Result<(), BoxError> {
    println!("  Open this URL to continue: {}", url.underline());
    Ok(())
}

/// Opener launching the system browser, also printing the URL as a fallback.
pub fn open_url(url: &str) -> Result<(), BoxError> {
    print_url(url)?;
    open_in_browser(url)
}

/// Render the prompt body and the available actions.
pub fn render(view: &PromptView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Authorization Required".bold()));
    out.push_str(&format!("{}\n", view.markdown));
    if let Some(error) = &view.error {
        out.push_str(&format!("{}\n", error.red()));
    }

    let mut actions = Vec::new();
    if view.can_authorize {
        actions.push("[a]uthorize");
    }
    if view.can_cancel {
        actions.push("[c]ancel");
    }
    if !actions.is_empty() {
        out.push_str(&actions.join("  "));
    }
    out
}

/// Print the current prompt, if there is one.
pub fn show(prompt: &AuthorizationPrompt) {
    if let Some(view) = prompt.view() {
        println!("\n{}", render(&view));
    }
}
