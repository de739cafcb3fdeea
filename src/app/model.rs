//! Application model types: `App`, the panels, the account form and the
//! transient notices.
//!
//! The `App` struct holds the playlist, the live style preferences and the
//! selection/filter state used by the UI and runtime. It never talks to
//! the engine or the network itself; the runtime does that.

use std::time::{Duration, Instant};

use crate::auth::AuthUser;
use crate::library::{Playlist, matching_indices};
use crate::player::{PlaybackHandle, PlayerState};
use crate::prefs::Preferences;

/// How long a notice stays on screen.
pub const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Which pane owns keyboard input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Panel {
    Library,
    Style,
    Account,
}

impl Panel {
    pub fn next(self) -> Self {
        match self {
            Panel::Library => Panel::Style,
            Panel::Style => Panel::Account,
            Panel::Account => Panel::Library,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Library => "Library",
            Panel::Style => "Style",
            Panel::Account => "Account",
        }
    }
}

/// Rows of the style panel, top to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleRow {
    Theme,
    Size,
    Background,
    FontSize,
    Speed,
    Save,
    Reset,
}

impl StyleRow {
    pub const ALL: [StyleRow; 7] = [
        StyleRow::Theme,
        StyleRow::Size,
        StyleRow::Background,
        StyleRow::FontSize,
        StyleRow::Speed,
        StyleRow::Save,
        StyleRow::Reset,
    ];

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|&r| r == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let pos = Self::ALL.iter().position(|&r| r == self).unwrap_or(0);
        Self::ALL[(pos + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            StyleRow::Theme => "Theme",
            StyleRow::Size => "Player size",
            StyleRow::Background => "Background",
            StyleRow::FontSize => "Font size",
            StyleRow::Speed => "Animation speed",
            StyleRow::Save => "Save style",
            StyleRow::Reset => "Reset to defaults",
        }
    }
}

/// Fields of the account form, top to bottom.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AccountField {
    Email,
    Password,
    Action,
}

impl AccountField {
    pub fn next(self) -> Self {
        match self {
            AccountField::Email => AccountField::Password,
            AccountField::Password => AccountField::Action,
            AccountField::Action => AccountField::Email,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            AccountField::Email => AccountField::Action,
            AccountField::Password => AccountField::Email,
            AccountField::Action => AccountField::Password,
        }
    }
}

/// What submitting the account form does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthMode::SignIn => "Sign in",
            AuthMode::SignUp => "Sign up",
        }
    }
}

/// The account form while signed out.
#[derive(Debug)]
pub struct AccountForm {
    pub email: String,
    pub password: String,
    pub focus: AccountField,
    pub mode: AuthMode,
    /// A request is in flight; further submissions are ignored until it
    /// resolves.
    pub busy: bool,
}

impl Default for AccountForm {
    fn default() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            focus: AccountField::Email,
            mode: AuthMode::SignIn,
            busy: false,
        }
    }
}

impl AccountForm {
    pub fn type_char(&mut self, c: char) {
        match self.focus {
            AccountField::Email => self.email.push(c),
            AccountField::Password => self.password.push(c),
            AccountField::Action => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            AccountField::Email => {
                self.email.pop();
            }
            AccountField::Password => {
                self.password.pop();
            }
            AccountField::Action => {}
        }
    }

    /// Forget the password after any submission, successful or not.
    pub fn clear_password(&mut self) {
        self.password.clear();
    }
}

/// Severity of a transient notice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient status message, shown until it expires.
#[derive(Debug)]
pub struct Notice {
    pub text: String,
    pub level: NoticeLevel,
    pub expires_at: Instant,
}

/// Which bar a mouse drag is currently captured by. While set, every drag
/// update goes to that bar no matter where the pointer is.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DragTarget {
    Progress,
    Volume,
}

/// Everything the UI thread owns: playlist, selection, preferences,
/// account state and transient notices.
pub struct App {
    pub playlist: Playlist,
    pub selected: usize,
    pub player: PlayerState,
    pub playback_handle: Option<PlaybackHandle>,

    pub prefs: Preferences,
    saved_prefs: Preferences,

    pub user: Option<AuthUser>,
    pub account: AccountForm,

    pub panel: Panel,
    pub style_row: StyleRow,

    pub filter_mode: bool,
    pub filter_query: String,

    pub drag: Option<DragTarget>,
    notices: Vec<Notice>,
    started_at: Instant,
}

impl App {
    /// Create a new `App` around a playlist and the last saved preferences.
    pub fn new(playlist: Playlist, prefs: Preferences) -> Self {
        Self {
            playlist,
            selected: 0,
            player: PlayerState::new(),
            playback_handle: None,
            prefs,
            saved_prefs: prefs,
            user: None,
            account: AccountForm::default(),
            panel: Panel::Library,
            style_row: StyleRow::Theme,
            filter_mode: false,
            filter_query: String::new(),
            drag: None,
            notices: Vec::new(),
            started_at: Instant::now(),
        }
    }

    /// Attach the handle used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    /// Indices of playlist tracks matching the active filter, in playlist
    /// order.
    pub fn visible_indices(&self) -> Vec<usize> {
        matching_indices(self.playlist.tracks(), &self.filter_query)
    }

    /// Move selection to the next visible track, wrapping at the end.
    pub fn select_next(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(p) => visible[(p + 1) % visible.len()],
            None => visible[0],
        };
    }

    /// Move selection to the previous visible track, wrapping at the start.
    pub fn select_prev(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            return;
        }
        self.selected = match visible.iter().position(|&i| i == self.selected) {
            Some(0) | None => visible[visible.len() - 1],
            Some(p) => visible[p - 1],
        };
    }

    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    /// Snap `selected` back into the filtered view when it fell outside,
    /// landing on the first visible track.
    pub fn ensure_selected_visible(&mut self) {
        let visible = self.visible_indices();
        if visible.is_empty() {
            self.selected = 0;
            return;
        }
        if !visible.contains(&self.selected) {
            self.selected = visible[0];
        }
    }

    /// Enter filter mode: subsequent typing edits the query.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Clear the active filter entirely.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.ensure_selected_visible();
    }

    /// Adjust the style value row under the cursor. Returns false on the
    /// action rows, which have no value to step.
    pub fn adjust_style(&mut self, forward: bool) -> bool {
        match self.style_row {
            StyleRow::Theme => self.prefs.cycle_theme(forward),
            StyleRow::Size => self.prefs.cycle_player_size(forward),
            StyleRow::Background => self.prefs.cycle_background(forward),
            StyleRow::FontSize => self.prefs.step_font_size(forward),
            StyleRow::Speed => self.prefs.step_animation_speed(forward),
            StyleRow::Save | StyleRow::Reset => return false,
        }
        true
    }

    /// Whether the live preferences differ from the last saved ones.
    pub fn prefs_dirty(&self) -> bool {
        self.prefs != self.saved_prefs
    }

    /// Mark the live preferences as saved.
    pub fn mark_prefs_saved(&mut self) {
        self.saved_prefs = self.prefs;
    }

    /// Replace both live and saved preferences, e.g. after a remote edit
    /// or the initial load. Out-of-range values are clamped on the way in.
    pub fn adopt_prefs(&mut self, prefs: Preferences) {
        self.prefs = prefs.clamped();
        self.saved_prefs = self.prefs;
    }

    pub fn signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Queue a transient notice.
    pub fn push_notice(&mut self, text: impl Into<String>, level: NoticeLevel) {
        self.notices.push(Notice {
            text: text.into(),
            level,
            expires_at: Instant::now() + NOTICE_TTL,
        });
    }

    /// Drop notices that have expired as of `now`.
    pub fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|n| n.expires_at > now);
    }

    /// The notice to show right now: the most recent one still alive.
    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    /// Milliseconds since the app started, for background animation.
    pub fn animation_elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}
