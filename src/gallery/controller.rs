use crate::auth::{exchange_token, TokenCookie};
use crate::dribbble::{DribbbleClient, DribbbleError};
use crate::gallery::loader::{fetch_first_page, load_initial};
use crate::gallery::state::GalleryState;
use axum_extra::extract::cookie::CookieJar;
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Not authorized")]
    NotAuthorized,

    #[error(transparent)]
    Dribbble(#[from] DribbbleError),
}

/// Result of processing an OAuth redirect-back
#[derive(Debug)]
pub enum CallbackOutcome {
    /// Code exchanged and the token cookie queued on the jar
    Authorized,
    /// A session already exists; the code was ignored
    AlreadyAuthorized,
    /// The exchange did not produce a usable token
    Failed(String),
}

/// Result of a successful `load_more`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMore {
    Loaded { appended: usize, has_next_page: bool },
    /// The last fetch advertised no further page; nothing was requested
    Exhausted,
}

/// Drives one browser session: authorize redirect, code exchange, paging
/// and account removal.
///
/// The cookie jar is passed into every operation and handed back when it
/// changes. `load_more` takes `&mut self`, so pages for a session are fetched
/// strictly one after another.
pub struct SessionController {
    client: DribbbleClient,
    cookies: TokenCookie,
    per_page: u32,
    state: GalleryState,
}

impl SessionController {
    /// Controller in the unauthorized state
    pub fn new(client: DribbbleClient, cookies: TokenCookie, per_page: u32) -> Self {
        Self {
            client,
            cookies,
            per_page,
            state: GalleryState::unauthorized(per_page),
        }
    }

    /// Controller hydrated by the initial loader
    pub async fn load(
        jar: &CookieJar,
        client: DribbbleClient,
        cookies: TokenCookie,
        per_page: u32,
    ) -> Self {
        let state = load_initial(jar, &cookies, &client, per_page).await;
        Self {
            client,
            cookies,
            per_page,
            state,
        }
    }

    /// Controller whose authorization flag reflects the cookie, without
    /// fetching anything
    pub fn resume(
        jar: &CookieJar,
        client: DribbbleClient,
        cookies: TokenCookie,
        per_page: u32,
    ) -> Self {
        let state = if cookies.read(jar).is_some() {
            GalleryState::authorized(per_page)
        } else {
            GalleryState::unauthorized(per_page)
        };
        Self {
            client,
            cookies,
            per_page,
            state,
        }
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn is_authorized(&self) -> bool {
        self.state.is_authorized
    }

    /// Where "Integrate" sends the browser
    pub fn authorize_url(&self) -> Result<Url, DribbbleError> {
        self.client.authorize_url()
    }

    /// Handle `?code=` on the redirect back from Dribbble.
    ///
    /// Exchanges only while unauthorized, so replaying the callback URL never
    /// triggers a second exchange. After a successful exchange the profile and
    /// page 1 are fetched, leaving the controller ready for `load_more`. A
    /// failed fetch there still yields `Authorized`, with the error in the
    /// view state.
    pub async fn handle_callback(&mut self, jar: CookieJar, code: &str) -> (CookieJar, CallbackOutcome) {
        if self.state.is_authorized {
            debug!("Ignoring authorization code for an existing session");
            return (jar, CallbackOutcome::AlreadyAuthorized);
        }

        let token = match exchange_token(&self.client, Some(code)).await {
            Ok(token) => token,
            Err(e) => return (jar, CallbackOutcome::Failed(e.to_string())),
        };

        match self.cookies.store(jar.clone(), &token) {
            Ok(jar) => {
                self.state = GalleryState::authorized(self.per_page);
                info!("Session authorized");
                if let Err(e) = self.refresh(&jar).await {
                    warn!(error = %e, "Loading the gallery after authorization failed");
                }
                (jar, CallbackOutcome::Authorized)
            }
            Err(e) => {
                warn!(error = %e, "Could not write token cookie");
                (jar, CallbackOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Refetch profile and page 1, replacing the current view state
    pub async fn refresh(&mut self, jar: &CookieJar) -> Result<(), GalleryError> {
        let token = self.token(jar)?;

        match fetch_first_page(&self.client, &token, self.per_page).await {
            Ok((profile, first_page)) => {
                self.state = GalleryState::loaded(profile, first_page, self.per_page);
                Ok(())
            }
            Err(e) => {
                self.state = GalleryState::failed(e.to_string());
                Err(e.into())
            }
        }
    }

    /// Fetch the next page and append it.
    ///
    /// The page counter moves forward by one only when the fetch succeeds, so
    /// calling again after an error retries the same page. Items are appended
    /// as returned, never deduplicated.
    pub async fn load_more(&mut self, jar: &CookieJar) -> Result<LoadMore, GalleryError> {
        let token = self.token(jar)?;

        if self.state.has_next_page == Some(false) {
            return Ok(LoadMore::Exhausted);
        }

        let per_page = *self.state.per_page.get_or_insert(self.per_page);
        let next_page = self.state.page.unwrap_or(1) + 1;

        let page = self
            .client
            .list_shots(&token, next_page, per_page)
            .await
            .inspect_err(|e| warn!(page = next_page, error = %e, "Loading more shots failed"))?;

        let appended = page.shots.len();
        self.state.page = Some(next_page);
        self.state.has_next_page = Some(page.has_next_page);
        if appended > 0 {
            self.state.items.extend(page.shots);
        }

        Ok(LoadMore::Loaded {
            appended,
            has_next_page: page.has_next_page,
        })
    }

    /// Load successive pages until `target_page` is reached, the feed runs
    /// out, or a fetch fails. Returns the page reached.
    pub async fn load_through(&mut self, jar: &CookieJar, target_page: u32) -> u32 {
        while self.state.page.is_some_and(|p| p < target_page) {
            match self.load_more(jar).await {
                Ok(LoadMore::Loaded { .. }) => {}
                Ok(LoadMore::Exhausted) => break,
                Err(e) => {
                    debug!(error = %e, "Stopped paging early");
                    break;
                }
            }
        }
        self.state.page.unwrap_or(1)
    }

    /// Forget the session: queue cookie removal and reset the view
    pub fn remove_account(&mut self, jar: CookieJar) -> CookieJar {
        self.state = GalleryState::unauthorized(self.per_page);
        info!("Account removed");
        self.cookies.clear(jar)
    }

    fn token(&self, jar: &CookieJar) -> Result<String, GalleryError> {
        if !self.state.is_authorized {
            return Err(GalleryError::NotAuthorized);
        }
        self.cookies.read(jar).ok_or(GalleryError::NotAuthorized)
    }
}
