//! Colour themes for the presentation layer.
//!
//! Themes are selected by the persisted theme id (1 or 2). Colours are
//! `Srgb<f32>` in the 0.0-1.0 range; convert them to your display's native
//! format when drawing.

use palette::{Mix, Srgb};

use crate::COLOR_OFF;
use crate::types::TimerState;

/// Highest brightness level.
pub const MAX_BRIGHTNESS: u8 = 7;

/// Colours used to draw the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Srgb,
    pub foreground: Srgb,
    pub work: Srgb,
    pub short_break: Srgb,
    pub long_break: Srgb,
    pub alert: Srgb,
}

/// Theme 1: light figures on black.
pub const DARK: Theme = Theme {
    background: Srgb::new(0.0, 0.0, 0.0),
    foreground: Srgb::new(0.9, 0.9, 0.9),
    work: Srgb::new(0.9, 0.2, 0.15),
    short_break: Srgb::new(0.2, 0.8, 0.3),
    long_break: Srgb::new(0.2, 0.5, 0.95),
    alert: Srgb::new(1.0, 0.85, 0.0),
};

/// Theme 2: dark figures on white.
pub const LIGHT: Theme = Theme {
    background: Srgb::new(1.0, 1.0, 1.0),
    foreground: Srgb::new(0.1, 0.1, 0.1),
    work: Srgb::new(0.75, 0.1, 0.1),
    short_break: Srgb::new(0.1, 0.55, 0.2),
    long_break: Srgb::new(0.1, 0.3, 0.7),
    alert: Srgb::new(0.85, 0.45, 0.0),
};

static THEMES: [Theme; 2] = [DARK, LIGHT];

impl Theme {
    /// Theme for a persisted id. Unknown ids fall back to theme 1.
    pub fn from_id(id: u8) -> &'static Theme {
        match id {
            2 => &THEMES[1],
            _ => &THEMES[0],
        }
    }

    /// Accent colour for a timer state.
    pub fn accent(&self, state: TimerState) -> Srgb {
        match state {
            TimerState::Idle => self.foreground,
            TimerState::Work | TimerState::PausedWork | TimerState::WindUp => self.work,
            TimerState::ShortBreak | TimerState::PausedShortBreak => self.short_break,
            TimerState::LongBreak | TimerState::PausedLongBreak => self.long_break,
            TimerState::Alert => self.alert,
        }
    }

    /// Colour to draw the timer in for `state` at a brightness level.
    ///
    /// `flash_lit` is the lit half of an alert blink (see
    /// `TimerEngine::should_flash`), drawn in the background colour.
    pub fn state_color(&self, state: TimerState, flash_lit: bool, brightness: u8) -> Srgb {
        let color = if flash_lit {
            self.background
        } else {
            self.accent(state)
        };
        apply_brightness(color, brightness)
    }
}

/// Dims `color` for a brightness level in `0..=7`. Level 0 is the dimmest
/// visible setting, not off.
pub fn apply_brightness(color: Srgb, level: u8) -> Srgb {
    let factor = (level.min(MAX_BRIGHTNESS) as f32 + 1.0) / (MAX_BRIGHTNESS as f32 + 1.0);
    COLOR_OFF.mix(color, factor)
}
