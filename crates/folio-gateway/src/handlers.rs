mod contact;
mod health;
mod redirect;
mod shorten;

pub use contact::{contact_method_not_allowed, create_contact_handler};
pub use health::health_handler;
pub use redirect::{not_found_handler, redirect_handler};
pub use shorten::{create_short_url_handler, shorten_method_not_allowed};
