//! HTTP surface of the folio site's server-side utilities: the link
//! shortener API, the `/s/<code>` redirect path and the contact form API.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;
pub mod sweeper;

pub use app::App;
pub use state::AppState;
