//! Client state container and synchronized operations.
//!
//! [`StoreState`] holds the signed-in user's full data set and exposes the
//! synchronous mutation primitives plus the derived views the UI renders
//! from. [`SyncStore`] wraps it together with the API client and the auth
//! bridge and implements the write-through operations: commit the local
//! mutation, then send the change to the server. The server only becomes
//! the source of truth again on the next full load; a failed write is not
//! retried and the local mutation is not rolled back.
//!
//! Single-threaded cooperative model: every operation takes `&mut self`, so
//! no mutation ever runs concurrently with another, and the
//! mutation -> network -> confirmation sequence inside one operation is
//! strictly ordered.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::calendar::{
    Calendar, DisplayType, Door, DoorState, SharedLinkResponse, TaggedOption, UserData,
    SENTINEL_PERIOD,
};
use crate::error::CoreError;
use crate::sync::api_client::ApiClient;
use crate::sync::auth::{RequestConfig, TokenProvider};

/// Single-slot cache for the last shared-link lookup.
///
/// `result` is `None` when the lookup came back 404; the entry itself
/// records that the lookup was attempted, so repeat fetches of the same id
/// stay off the network.
#[derive(Debug, Clone)]
pub struct SharedCacheEntry {
    pub link_id: String,
    pub result: Option<SharedLinkResponse>,
}

/// Reactive client state.
///
/// Mutation primitives are synchronous, perform no I/O, and always succeed
/// given valid indices; derived views are pure functions of the state,
/// recomputed on read.
#[derive(Debug)]
pub struct StoreState {
    user_data: UserData,
    display_period: i32,
    loading: bool,
    request_config: Option<RequestConfig>,
    shared_cache: Option<SharedCacheEntry>,
}

impl StoreState {
    /// Empty pre-load state: sentinel user data, no period selected.
    pub fn new() -> Self {
        Self {
            user_data: UserData::empty(),
            display_period: SENTINEL_PERIOD,
            loading: false,
            request_config: None,
            shared_cache: None,
        }
    }

    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    pub fn display_period(&self) -> i32 {
        self.display_period
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn request_config(&self) -> Option<&RequestConfig> {
        self.request_config.as_ref()
    }

    pub fn shared_cache(&self) -> Option<&SharedCacheEntry> {
        self.shared_cache.as_ref()
    }

    // ------------------------------------------------------------------
    // Mutation primitives
    // ------------------------------------------------------------------

    /// Sets the door's state tag to `Open`. Idempotent: repeated calls
    /// re-set the same tag.
    ///
    /// # Panics
    ///
    /// Panics when no calendar exists for the displayed period or `day` is
    /// out of range.
    pub fn open_door(&mut self, day: u32) {
        self.door_mut(day).state = DoorState::Open;
    }

    /// Sets the door's state tag to `Done`.
    ///
    /// # Panics
    ///
    /// Same preconditions as [`open_door`](StoreState::open_door).
    pub fn mark_door_done(&mut self, day: u32) {
        self.door_mut(day).state = DoorState::Done;
    }

    /// Stores the distance scale factor on the current period's settings.
    ///
    /// # Panics
    ///
    /// Panics when no calendar exists for the displayed period.
    pub fn set_scale_factor(&mut self, factor: f64) {
        self.current_calendar_mut().settings.distance_factor = factor;
    }

    pub fn set_display_name(&mut self, name: String) {
        self.user_data.display_name = TaggedOption::some(name);
    }

    pub fn set_display_type(&mut self, display_type: DisplayType) {
        self.user_data.display_type = Some(display_type);
    }

    /// Switches which calendar is current. Does not fetch.
    pub fn set_display_period(&mut self, period: i32) {
        self.display_period = period;
    }

    /// Wholesale replacement after a confirmed server response.
    pub fn replace_user_data(&mut self, data: UserData) {
        self.user_data = data;
    }

    /// Replaces the current period's calendar.
    pub fn replace_calendar(&mut self, calendar: Calendar) {
        self.user_data.calendars.insert(self.display_period, calendar);
    }

    /// Clears `shared_link_id` on that period's settings; the local
    /// reflection of a successful unpublish.
    ///
    /// # Panics
    ///
    /// Panics when no calendar exists for `period`.
    pub fn remove_shared_link(&mut self, period: i32) {
        self.user_data
            .calendars
            .get_mut(&period)
            .unwrap_or_else(|| panic!("no calendar for period {period}"))
            .settings
            .shared_link_id = TaggedOption::none();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_request_config(&mut self, config: Option<RequestConfig>) {
        self.request_config = config;
    }

    /// Replaces the single-slot shared-link cache wholesale.
    pub fn set_shared_cache_entry(&mut self, link_id: String, result: Option<SharedLinkResponse>) {
        self.shared_cache = Some(SharedCacheEntry { link_id, result });
    }

    fn current_calendar_mut(&mut self) -> &mut Calendar {
        let period = self.display_period;
        self.user_data
            .calendars
            .get_mut(&period)
            .unwrap_or_else(|| panic!("no calendar for period {period}"))
    }

    fn door_mut(&mut self, day: u32) -> &mut Door {
        let calendar = self.current_calendar_mut();
        let index = (day as usize)
            .checked_sub(1)
            .filter(|i| *i < calendar.doors.len())
            .unwrap_or_else(|| panic!("door day {day} out of range"));
        &mut calendar.doors[index]
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// The calendar for the displayed period, if one exists.
    pub fn current_calendar(&self) -> Option<&Calendar> {
        self.user_data.calendars.get(&self.display_period)
    }

    /// Known periods, sorted descending.
    pub fn periods(&self) -> Vec<i32> {
        self.user_data.calendars.keys().rev().copied().collect()
    }

    /// Current display type; legacy records without one render as doors.
    pub fn display_type(&self) -> DisplayType {
        self.user_data.display_type.unwrap_or(DisplayType::Door)
    }

    /// Current display name, or the empty string when unset.
    pub fn display_name(&self) -> &str {
        self.user_data
            .display_name
            .as_option()
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Shared-link id of the current period, when published.
    pub fn shared_link_id(&self) -> Option<&str> {
        self.current_calendar()
            .and_then(|cal| cal.settings.shared_link_id.as_option())
            .map(String::as_str)
    }

    /// Fully-qualified shareable URL for the current period, when
    /// published. The client uses hash routing.
    pub fn shared_url(&self, origin: &str) -> Option<String> {
        self.shared_link_id()
            .map(|id| format!("{}/#/shared/{id}", origin.trim_end_matches('/')))
    }
}

impl Default for StoreState {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide store: state plus the synchronized operations that keep it
/// consistent with the server.
///
/// Constructed once per session and handed to the view layer by reference;
/// there is no teardown.
pub struct SyncStore {
    state: StoreState,
    api: ApiClient,
    auth: Arc<dyn TokenProvider>,
}

impl SyncStore {
    pub fn new(api: ApiClient, auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            state: StoreState::new(),
            api,
            auth,
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Direct access for view-layer dispatch of local mutations that need
    /// no persistence.
    pub fn state_mut(&mut self) -> &mut StoreState {
        &mut self.state
    }

    /// Drops the memoized request configuration so the next authenticated
    /// call re-derives it from the token provider.
    pub fn invalidate_auth_config(&mut self) {
        self.state.set_request_config(None);
    }

    /// Returns the memoized request configuration, deriving it from the
    /// auth bridge on first use.
    async fn ensure_auth_config(&mut self) -> Result<RequestConfig, CoreError> {
        if let Some(config) = self.state.request_config() {
            return Ok(config.clone());
        }
        debug!("acquiring bearer token");
        let token = self.auth.get_token().await?;
        let config = RequestConfig::from_token(token);
        self.state.set_request_config(Some(config.clone()));
        Ok(config)
    }

    /// Drops the memoized config when the server rejected it, so callers
    /// can retry with a fresh token.
    fn note_auth_failure(&mut self, err: CoreError) -> CoreError {
        if matches!(err, CoreError::Auth(_)) {
            warn!("authorization rejected, dropping memoized request config");
            self.state.set_request_config(None);
        }
        err
    }

    /// Loads the full user record once per session.
    ///
    /// A selected period means the data is already loaded, so this is a
    /// no-op (not a refresh). Otherwise the record is fetched, replaced
    /// wholesale, and the displayed period switched to the server's
    /// `latest_period` before the loading flag clears, so observers never
    /// see a loaded-but-periodless state.
    pub async fn load_user_data(&mut self) -> Result<(), CoreError> {
        if self.state.display_period() > SENTINEL_PERIOD {
            debug!(
                period = self.state.display_period(),
                "user data already loaded"
            );
            return Ok(());
        }
        self.state.set_loading(true);
        let auth = self.ensure_auth_config().await?;
        let result = self.api.fetch_user_data(&auth).await;
        let data = result.map_err(|e| self.note_auth_failure(e))?;
        let period = data.latest_period;
        debug!(period, "user data loaded");
        self.state.replace_user_data(data);
        self.state.set_display_period(period);
        self.state.set_loading(false);
        Ok(())
    }

    /// Writes the entire current user record to the server.
    ///
    /// Full-document overwrite, invoked after every durable local
    /// mutation. The UI already reflects the change before this returns; a
    /// failed write is surfaced to the caller but neither retried nor
    /// rolled back.
    pub async fn persist_current_user_data(&mut self) -> Result<(), CoreError> {
        let auth = self.ensure_auth_config().await?;
        let data = self.state.user_data().clone();
        let result = self.api.store_user_data(&auth, &data).await;
        result.map_err(|e| self.note_auth_failure(e))
    }

    /// Opens a door and persists the change.
    ///
    /// # Panics
    ///
    /// Panics when `day` has no door in the current calendar.
    pub async fn open_door(&mut self, day: u32) -> Result<(), CoreError> {
        self.state.open_door(day);
        self.persist_current_user_data().await
    }

    /// Marks a door done and persists the change.
    ///
    /// # Panics
    ///
    /// Panics when `day` has no door in the current calendar.
    pub async fn mark_door_done(&mut self, day: u32) -> Result<(), CoreError> {
        self.state.mark_door_done(day);
        self.persist_current_user_data().await
    }

    /// Normalizes user input to a positive scale factor, applies it to the
    /// current period, and persists.
    pub async fn set_scale_factor(&mut self, raw: &str) -> Result<(), CoreError> {
        let factor: f64 = raw
            .trim()
            .parse()
            .map_err(|_| CoreError::InvalidInput(format!("`{raw}` is not a number")))?;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "scale factor must be positive, got {factor}"
            )));
        }
        self.state.set_scale_factor(factor);
        self.persist_current_user_data().await
    }

    /// Updates the display name and persists.
    pub async fn set_display_name(&mut self, name: String) -> Result<(), CoreError> {
        self.state.set_display_name(name);
        self.persist_current_user_data().await
    }

    /// Updates the display type and persists.
    pub async fn set_display_type(&mut self, display_type: DisplayType) -> Result<(), CoreError> {
        self.state.set_display_type(display_type);
        self.persist_current_user_data().await
    }

    /// Issues a create/reset request and adopts the server's canonical
    /// copy, including its choice of latest period. Used to seed a new
    /// period or recover server-assigned defaults.
    pub async fn reset_calendar(&mut self) -> Result<(), CoreError> {
        let auth = self.ensure_auth_config().await?;
        let data = self.state.user_data().clone();
        let result = self.api.reset_user_data(&auth, &data).await;
        let data = result.map_err(|e| self.note_auth_failure(e))?;
        let period = data.latest_period;
        self.state.replace_user_data(data);
        self.state.set_display_period(period);
        Ok(())
    }

    /// Publishes the currently displayed period. The server generates the
    /// link id, so its response replaces the user record wholesale.
    pub async fn enable_shared_link(&mut self) -> Result<(), CoreError> {
        let period = self.state.display_period();
        let auth = self.ensure_auth_config().await?;
        let result = self.api.publish_calendar(&auth, period).await;
        let data = result.map_err(|e| self.note_auth_failure(e))?;
        debug!(period, "shared link enabled");
        self.state.replace_user_data(data);
        Ok(())
    }

    /// Unpublishes the currently displayed period, then clears the link id
    /// locally.
    ///
    /// # Panics
    ///
    /// Panics when the current period has no shared link; calling this
    /// without one is a caller error.
    pub async fn disable_shared_link(&mut self) -> Result<(), CoreError> {
        let link_id = self
            .state
            .shared_link_id()
            .expect("disable_shared_link called without a published link")
            .to_string();
        let auth = self.ensure_auth_config().await?;
        let result = self.api.unpublish_calendar(&auth, &link_id).await;
        result.map_err(|e| self.note_auth_failure(e))?;
        debug!(%link_id, "shared link disabled");
        let period = self.state.display_period();
        self.state.remove_shared_link(period);
        Ok(())
    }

    /// Looks up a shared calendar by link id, unauthenticated.
    ///
    /// Idempotent-lookup guard: when `link_id` matches the last attempt,
    /// successful or not-found alike, no network call is made. The cache
    /// holds a single entry; a distinct id evicts the previous one. A 404
    /// is cached as a negative result, any other non-200 status is a hard
    /// failure.
    pub async fn fetch_shared_calendar(&mut self, link_id: &str) -> Result<(), CoreError> {
        if self
            .state
            .shared_cache()
            .is_some_and(|entry| entry.link_id == link_id)
        {
            debug!(%link_id, "shared calendar lookup served from cache");
            return Ok(());
        }
        self.state.set_loading(true);
        let result = self.api.fetch_shared_calendar(link_id).await?;
        if result.is_none() {
            debug!(%link_id, "shared calendar not found");
        }
        self.state.set_shared_cache_entry(link_id.to_string(), result);
        self.state.set_loading(false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{Door, Owner, Settings};

    fn calendar_with_doors(count: u32) -> Calendar {
        let mut calendar = Calendar::empty();
        calendar.owner = Owner {
            name: "runner".to_string(),
        };
        calendar.doors = (1..=count)
            .map(|day| Door {
                day,
                distance: 5.0,
                state: DoorState::Closed,
            })
            .collect();
        calendar
    }

    fn loaded_state(period: i32) -> StoreState {
        let mut data = UserData::empty();
        data.calendars.remove(&SENTINEL_PERIOD);
        data.calendars.insert(period, calendar_with_doors(24));
        data.latest_period = period;
        let mut state = StoreState::new();
        state.replace_user_data(data);
        state.set_display_period(period);
        state
    }

    #[test]
    fn open_door_sets_only_that_door() {
        let mut state = loaded_state(2023);
        state.open_door(3);
        let doors = &state.current_calendar().unwrap().doors;
        assert_eq!(doors[2].state, DoorState::Open);
        for door in doors.iter().filter(|d| d.day != 3) {
            assert_eq!(door.state, DoorState::Closed);
        }
    }

    #[test]
    fn mark_door_done_sets_only_that_door() {
        let mut state = loaded_state(2023);
        state.mark_door_done(24);
        let doors = &state.current_calendar().unwrap().doors;
        assert_eq!(doors[23].state, DoorState::Done);
        assert_eq!(doors[0].state, DoorState::Closed);
    }

    #[test]
    fn door_mutations_are_idempotent() {
        let mut state = loaded_state(2023);
        state.open_door(1);
        state.open_door(1);
        assert_eq!(
            state.current_calendar().unwrap().doors[0].state,
            DoorState::Open
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn door_day_out_of_range_panics() {
        let mut state = loaded_state(2023);
        state.open_door(25);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn door_day_zero_panics() {
        let mut state = loaded_state(2023);
        state.open_door(0);
    }

    #[test]
    fn periods_sort_descending() {
        let mut data = UserData::empty();
        data.calendars.remove(&SENTINEL_PERIOD);
        for period in [2022, 2024, 2023] {
            data.calendars.insert(period, calendar_with_doors(24));
        }
        data.latest_period = 2024;
        let mut state = StoreState::new();
        state.replace_user_data(data);
        state.set_display_period(2024);
        assert_eq!(state.periods(), vec![2024, 2023, 2022]);
    }

    #[test]
    fn display_type_defaults_to_door() {
        let state = loaded_state(2023);
        assert_eq!(state.display_type(), DisplayType::Door);
        let mut state = state;
        state.set_display_type(DisplayType::Monthly);
        assert_eq!(state.display_type(), DisplayType::Monthly);
    }

    #[test]
    fn display_name_unwraps_or_empty() {
        let mut state = loaded_state(2023);
        assert_eq!(state.display_name(), "");
        state.set_display_name("Runner".to_string());
        assert_eq!(state.display_name(), "Runner");
    }

    #[test]
    fn shared_url_requires_link() {
        let mut state = loaded_state(2023);
        assert_eq!(state.shared_url("https://adventrunner.example"), None);

        state.current_calendar_mut().settings.shared_link_id =
            TaggedOption::some("abc123".to_string());
        assert_eq!(state.shared_link_id(), Some("abc123"));
        assert_eq!(
            state.shared_url("https://adventrunner.example/"),
            Some("https://adventrunner.example/#/shared/abc123".to_string())
        );
    }

    #[test]
    fn remove_shared_link_clears_settings() {
        let mut state = loaded_state(2023);
        state.current_calendar_mut().settings.shared_link_id =
            TaggedOption::some("abc123".to_string());
        state.remove_shared_link(2023);
        assert_eq!(state.shared_link_id(), None);
    }

    #[test]
    fn replace_calendar_targets_current_period() {
        let mut state = loaded_state(2023);
        let mut replacement = calendar_with_doors(24);
        replacement.settings.distance_factor = 3.0;
        state.replace_calendar(replacement);
        assert_eq!(
            state.current_calendar().unwrap().settings.distance_factor,
            3.0
        );
    }

    #[test]
    fn fresh_state_holds_sentinel() {
        let state = StoreState::new();
        assert_eq!(state.display_period(), SENTINEL_PERIOD);
        assert!(!state.loading());
        assert!(state.request_config().is_none());
        assert!(state.shared_cache().is_none());
        assert_eq!(state.periods(), vec![SENTINEL_PERIOD]);
        assert_eq!(
            state.current_calendar().unwrap().settings,
            Settings {
                distance_factor: 1.0,
                shared_link_id: TaggedOption::none(),
            }
        );
    }
}
