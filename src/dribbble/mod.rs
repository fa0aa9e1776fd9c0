pub mod client;
pub mod pagination;
pub mod types;

pub use client::{DribbbleClient, DribbbleError};
pub use pagination::{has_next_page, parse_link_header};
pub use types::{Shot, ShotImages, ShotPage, UserProfile};
