use std::sync::Arc;

use folio_core::{Clock, ContactRepository, Redirector, Shortener};

#[derive(Clone)]
pub struct AppState {
    pub(crate) shortener: Arc<dyn Shortener>,
    pub(crate) redirector: Arc<dyn Redirector>,
    pub(crate) contacts: Arc<dyn ContactRepository>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        shortener: Arc<dyn Shortener>,
        redirector: Arc<dyn Redirector>,
        contacts: Arc<dyn ContactRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shortener,
            redirector,
            contacts,
            clock,
        }
    }
}
