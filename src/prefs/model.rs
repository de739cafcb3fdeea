//! The user preference record and its mutation steps.
//!
//! Preferences apply to the UI immediately on every change but are only
//! persisted when the user saves them explicitly.

use serde::{Deserialize, Serialize};

pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 20;
pub const MIN_ANIMATION_SPEED: f32 = 0.25;
pub const MAX_ANIMATION_SPEED: f32 = 4.0;
const ANIMATION_SPEED_STEP: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Default,
    Dark,
    Light,
    Ocean,
    Sunset,
}

impl Theme {
    pub fn next(self) -> Self {
        match self {
            Self::Default => Self::Dark,
            Self::Dark => Self::Light,
            Self::Light => Self::Ocean,
            Self::Ocean => Self::Sunset,
            Self::Sunset => Self::Default,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Default => Self::Sunset,
            Self::Dark => Self::Default,
            Self::Light => Self::Dark,
            Self::Ocean => Self::Light,
            Self::Sunset => Self::Ocean,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Ocean => "ocean",
            Self::Sunset => "sunset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSize {
    Compact,
    Normal,
    Expanded,
}

impl PlayerSize {
    pub fn next(self) -> Self {
        match self {
            Self::Compact => Self::Normal,
            Self::Normal => Self::Expanded,
            Self::Expanded => Self::Compact,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Compact => Self::Expanded,
            Self::Normal => Self::Compact,
            Self::Expanded => Self::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Normal => "normal",
            Self::Expanded => "expanded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    Solid,
    Gradient,
    Dots,
}

impl Background {
    pub fn next(self) -> Self {
        match self {
            Self::Solid => Self::Gradient,
            Self::Gradient => Self::Dots,
            Self::Dots => Self::Solid,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Solid => Self::Dots,
            Self::Gradient => Self::Solid,
            Self::Dots => Self::Gradient,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Gradient => "gradient",
            Self::Dots => "dots",
        }
    }
}

/// The persisted preference record. Field names follow the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: Theme,
    pub player_size: PlayerSize,
    pub background: Background,
    pub font_size: u8,
    pub animation_speed: f32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: Theme::Default,
            player_size: PlayerSize::Normal,
            background: Background::Solid,
            font_size: 16,
            animation_speed: 1.0,
        }
    }
}

impl Preferences {
    pub fn cycle_theme(&mut self, forward: bool) {
        self.theme = if forward {
            self.theme.next()
        } else {
            self.theme.prev()
        };
    }

    pub fn cycle_player_size(&mut self, forward: bool) {
        self.player_size = if forward {
            self.player_size.next()
        } else {
            self.player_size.prev()
        };
    }

    pub fn cycle_background(&mut self, forward: bool) {
        self.background = if forward {
            self.background.next()
        } else {
            self.background.prev()
        };
    }

    /// Step the font size one point up or down, staying inside
    /// [`MIN_FONT_SIZE`, `MAX_FONT_SIZE`].
    pub fn step_font_size(&mut self, up: bool) {
        self.font_size = if up {
            (self.font_size + 1).min(MAX_FONT_SIZE)
        } else {
            self.font_size.saturating_sub(1).max(MIN_FONT_SIZE)
        };
    }

    /// Step the animation speed a quarter up or down, staying inside
    /// [`MIN_ANIMATION_SPEED`, `MAX_ANIMATION_SPEED`].
    pub fn step_animation_speed(&mut self, up: bool) {
        let next = if up {
            self.animation_speed + ANIMATION_SPEED_STEP
        } else {
            self.animation_speed - ANIMATION_SPEED_STEP
        };
        self.animation_speed = next.clamp(MIN_ANIMATION_SPEED, MAX_ANIMATION_SPEED);
    }

    /// Restore the compiled-in defaults, whatever the current state.
    pub fn reset_to_default(&mut self) {
        *self = Self::default();
    }

    /// Force loaded values into range. Documents read from disk or the
    /// remote store may carry anything.
    pub fn clamped(mut self) -> Self {
        self.font_size = self.font_size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
        if !self.animation_speed.is_finite() {
            self.animation_speed = 1.0;
        }
        self.animation_speed = self
            .animation_speed
            .clamp(MIN_ANIMATION_SPEED, MAX_ANIMATION_SPEED);
        self
    }
}
