pub mod auth;
pub mod config;
pub mod dribbble;
pub mod gallery;
pub mod http_server;
pub mod pages;

pub use auth::{TokenCookie, TokenExchangeResponse};
pub use config::Config;
pub use dribbble::{DribbbleClient, DribbbleError};
pub use gallery::{GalleryState, SessionController};
pub use http_server::{create_app, run_server, AppState};
