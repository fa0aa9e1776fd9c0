use crate::auth::TokenCookie;
use crate::dribbble::{DribbbleClient, DribbbleError, ShotPage, UserProfile};
use crate::gallery::state::GalleryState;
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, warn};

/// Build the initial view model for a page render.
///
/// Without a token no request is made. With one, the profile and the first
/// page of shots are fetched concurrently and both must succeed; any failure
/// yields the authorized error view.
pub async fn load_initial(
    jar: &CookieJar,
    cookies: &TokenCookie,
    client: &DribbbleClient,
    per_page: u32,
) -> GalleryState {
    let Some(token) = cookies.read(jar) else {
        return GalleryState::unauthorized(per_page);
    };

    match fetch_first_page(client, &token, per_page).await {
        Ok((profile, first_page)) => {
            info!(
                shots = first_page.shots.len(),
                has_next_page = first_page.has_next_page,
                "Loaded gallery"
            );
            GalleryState::loaded(profile, first_page, per_page)
        }
        Err(e) => {
            warn!(error = %e, "Initial gallery load failed");
            GalleryState::failed(e.to_string())
        }
    }
}

/// Profile + page 1, all-or-nothing
pub(crate) async fn fetch_first_page(
    client: &DribbbleClient,
    token: &str,
    per_page: u32,
) -> Result<(UserProfile, ShotPage), DribbbleError> {
    tokio::try_join!(
        client.get_user(token),
        client.list_shots(token, 1, per_page)
    )
}
