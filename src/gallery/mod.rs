//! Gallery view model, the page-load loader and the per-session controller

pub mod controller;
pub mod loader;
pub mod state;

pub use controller::{CallbackOutcome, GalleryError, LoadMore, SessionController};
pub use loader::load_initial;
pub use state::GalleryState;
