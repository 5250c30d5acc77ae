mod contact;
mod health;
mod url;

pub use contact::{ContactRequest, ContactResponse};
pub use health::HealthResponse;
pub use url::{CreateShortUrlRequest, CreateShortUrlResponse};
