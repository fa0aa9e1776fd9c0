use crate::dribbble::{Shot, ShotPage, UserProfile};
use serde::Serialize;

/// Everything the gallery view renders from.
///
/// Serialized camelCase so it can be handed to a script unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryState {
    pub is_authorized: bool,
    pub profile: Option<UserProfile>,
    pub items: Vec<Shot>,
    /// 1-based page last fetched; `None` after a failed load
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Only meaningful right after a fetch; `None` when nothing was fetched
    pub has_next_page: Option<bool>,
    pub error: Option<String>,
}

impl GalleryState {
    /// No token: "Integrate" view
    pub fn unauthorized(per_page: u32) -> Self {
        Self {
            is_authorized: false,
            profile: None,
            items: Vec::new(),
            page: Some(1),
            per_page: Some(per_page),
            has_next_page: None,
            error: None,
        }
    }

    /// A token exists but Dribbble could not be reached or refused it.
    /// Stays authorized so the user can still remove the account.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            is_authorized: true,
            profile: None,
            items: Vec::new(),
            page: None,
            per_page: None,
            has_next_page: None,
            error: Some(message.into()),
        }
    }

    /// Freshly authorized, before the first fetch
    pub fn authorized(per_page: u32) -> Self {
        Self {
            is_authorized: true,
            ..Self::unauthorized(per_page)
        }
    }

    /// Profile plus the first page of shots
    pub fn loaded(profile: UserProfile, first_page: ShotPage, per_page: u32) -> Self {
        Self {
            is_authorized: true,
            profile: Some(profile),
            items: first_page.shots,
            page: Some(1),
            per_page: Some(per_page),
            has_next_page: Some(first_page.has_next_page),
            error: None,
        }
    }

    /// Whether a "Show more" control should be offered
    pub fn can_load_more(&self) -> bool {
        self.is_authorized && self.has_next_page == Some(true)
    }
}
