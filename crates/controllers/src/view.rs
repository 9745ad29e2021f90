//! Handles onto the enclosing view and onto new browsing contexts.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// A view that can be closed by its controller.
pub trait ViewHandle: Send + Sync {
    fn close(&self);
}

/// A modal distinguishes a confirmed close from a dismissal.
pub trait ModalHandle: Send + Sync {
    fn close(&self);
    fn dismiss(&self);
    fn is_closed(&self) -> bool;
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("failed to open {url}: {reason}")]
    Open { url: String, reason: String },
    #[error("browsing context failed to load: {0}")]
    Load(String),
    #[error("print failed: {0}")]
    Print(String),
}

#[async_trait]
pub trait BrowsingContext: Send {
    async fn loaded(&mut self) -> Result<(), BrowserError>;
    fn print(&mut self) -> Result<(), BrowserError>;
    fn close(self: Box<Self>);
}

pub trait Browser: Send + Sync {
    fn open(&self, url: &Url) -> Result<Box<dyn BrowsingContext>, BrowserError>;
}
