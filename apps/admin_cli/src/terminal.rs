//! Terminal implementations of the controller ports.

use std::{
    io::{self, BufRead, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use controllers::{
    Browser, BrowserError, BrowsingContext, Dialog, DialogResult, DialogService, ModalHandle,
    NavigationTarget, Navigator, ViewHandle,
};
use tracing::{debug, info};
use url::Url;

/// Prints the dialog and reads the pressed button from the input.
/// End of input or a blank line dismisses the dialog.
pub struct TerminalDialogs {
    input: Mutex<Box<dyn BufRead + Send>>,
    output: Mutex<Box<dyn Write + Send>>,
}

impl TerminalDialogs {
    pub fn stdio() -> Self {
        Self::new(Box::new(io::BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn new(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    fn prompt(&self, dialog: &Dialog) -> io::Result<Option<DialogResult>> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| io::Error::other("dialog output poisoned"))?;
        let mut input = self
            .input
            .lock()
            .map_err(|_| io::Error::other("dialog input poisoned"))?;

        write!(output, "{}", render(dialog))?;
        loop {
            output.flush()?;
            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_choice(dialog, &line) {
                Choice::Pressed(result) => return Ok(Some(result)),
                Choice::Dismissed => return Ok(None),
                Choice::Unknown => write!(output, "? ")?,
            }
        }
    }
}

#[async_trait]
impl DialogService for TerminalDialogs {
    /// Needs the multi-threaded runtime: the prompt blocks its worker.
    async fn show(&self, dialog: Dialog) -> Option<DialogResult> {
        match tokio::task::block_in_place(|| self.prompt(&dialog)) {
            Ok(result) => result,
            Err(err) => {
                debug!(error = %err, "dialog input unavailable");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Pressed(DialogResult),
    Dismissed,
    Unknown,
}

pub fn render(dialog: &Dialog) -> String {
    let mut text = format!("\n== {} ==\n{}\n", dialog.title, dialog.message);
    for (index, button) in dialog.buttons.iter().enumerate() {
        text.push_str(&format!("  [{}] {}\n", index + 1, button.label));
    }
    text.push_str("> ");
    text
}

/// Accepts a 1-based button number or a button label (case-insensitive).
pub fn parse_choice(dialog: &Dialog, line: &str) -> Choice {
    let answer = line.trim();
    if answer.is_empty() {
        return Choice::Dismissed;
    }
    if let Ok(number) = answer.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|index| dialog.buttons.get(index))
            .map_or(Choice::Unknown, |button| Choice::Pressed(button.result));
    }
    dialog
        .buttons
        .iter()
        .find(|button| button.label.eq_ignore_ascii_case(answer))
        .map_or(Choice::Unknown, |button| Choice::Pressed(button.result))
}

/// There is no router in a terminal; navigation requests are reported.
pub struct TerminalNavigator {
    current: String,
}

impl TerminalNavigator {
    pub fn at(current: impl Into<String>) -> Self {
        Self {
            current: current.into(),
        }
    }
}

impl Navigator for TerminalNavigator {
    fn go(&self, target: NavigationTarget) {
        info!(state = target.state_name(), "navigation requested");
        match &target {
            NavigationTarget::EditUser { username } => {
                println!("-> {} (username={username})", target.state_name());
            }
            NavigationTarget::File {
                document_id,
                file_id,
            } => {
                println!(
                    "-> {} (document={document_id}, file={file_id})",
                    target.state_name()
                );
            }
            NavigationTarget::Other(name) => println!("-> {name}"),
        }
    }

    fn current_state(&self) -> String {
        self.current.clone()
    }
}

/// Stands in for both the registration view and the file modal.
#[derive(Debug, Default)]
pub struct TerminalView {
    closed: AtomicBool,
}

impl ViewHandle for TerminalView {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!("view closed");
    }
}

impl ModalHandle for TerminalView {
    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!("modal closed");
    }

    fn dismiss(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!("modal dismissed");
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

/// Prints the URL a browser would open.
#[derive(Debug, Default)]
pub struct TerminalBrowser;

struct PrintedContext {
    url: Url,
}

#[async_trait]
impl BrowsingContext for PrintedContext {
    async fn loaded(&mut self) -> Result<(), BrowserError> {
        Ok(())
    }

    fn print(&mut self) -> Result<(), BrowserError> {
        println!("print: {}", self.url);
        Ok(())
    }

    fn close(self: Box<Self>) {
        debug!(url = %self.url, "browsing context closed");
    }
}

impl Browser for TerminalBrowser {
    fn open(&self, url: &Url) -> Result<Box<dyn BrowsingContext>, BrowserError> {
        println!("open: {url}");
        Ok(Box::new(PrintedContext { url: url.clone() }))
    }
}

#[cfg(test)]
#[path = "tests/terminal_tests.rs"]
mod tests;
