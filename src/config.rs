//! Timing configuration for the reveal.
//!
//! All pacing lives in one flat [`Timings`] value handed to the engine and
//! threaded through every revealer. Hosts can build it in code or load it
//! from JSON using the camelCase option names.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RevealResult;

/// Tunable pacing of the reveal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timings {
    /// How long a form outline takes to draw before the form element
    /// switches to its final style (ms).
    pub container_pre_draw_delay_ms: u64,
    /// Pause after an element reveal; half of it is spent after the
    /// pre→post class swap (ms).
    pub post_draw_settle_ms: u64,
    /// Border stroke speed in length units per millisecond.
    pub stroke_draw_speed_units_per_ms: f64,
    /// Delay between two typed characters (ms).
    pub per_character_delay_ms: u64,
    /// Pause after a border finishes drawing (ms).
    pub border_settle_ms: u64,
    /// Pause after the last typed character (ms).
    pub text_settle_ms: u64,
    /// Pause after a dynamic slot and its border redraw (ms).
    pub slot_settle_ms: u64,
    /// Pause after the comment board renders a batch (ms).
    pub comment_render_settle_ms: u64,
}

impl Timings {
    /// Standard pacing.
    pub const DEFAULT: Self = Self {
        container_pre_draw_delay_ms: 400,
        post_draw_settle_ms: 100,
        stroke_draw_speed_units_per_ms: 2.5,
        per_character_delay_ms: 50,
        border_settle_ms: 20,
        text_settle_ms: 100,
        slot_settle_ms: 50,
        comment_render_settle_ms: 20,
    };

    /// Every delay zero and an effectively instant stroke.
    ///
    /// Handy for hosts that want the final state without the show.
    pub const INSTANT: Self = Self {
        container_pre_draw_delay_ms: 0,
        post_draw_settle_ms: 0,
        stroke_draw_speed_units_per_ms: f64::INFINITY,
        per_character_delay_ms: 0,
        border_settle_ms: 0,
        text_settle_ms: 0,
        slot_settle_ms: 0,
        comment_render_settle_ms: 0,
    };

    /// Parse from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> RevealResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the stroke speed.
    pub fn with_stroke_speed(mut self, units_per_ms: f64) -> Self {
        self.stroke_draw_speed_units_per_ms = units_per_ms;
        self
    }

    /// Set the per-character delay.
    pub fn with_per_character_delay(mut self, ms: u64) -> Self {
        self.per_character_delay_ms = ms;
        self
    }

    /// Set the form outline delay.
    pub fn with_pre_draw_delay(mut self, ms: u64) -> Self {
        self.container_pre_draw_delay_ms = ms;
        self
    }

    /// Milliseconds a stroke of `length` takes to draw.
    ///
    /// Non-positive or non-finite speeds draw instantly.
    pub fn stroke_duration_ms(&self, length: f64) -> f64 {
        let speed = self.stroke_draw_speed_units_per_ms;
        if speed.is_finite() && speed > 0.0 {
            length / speed
        } else {
            0.0
        }
    }

    pub(crate) fn per_character(&self) -> Duration {
        Duration::from_millis(self.per_character_delay_ms)
    }

    pub(crate) fn text_settle(&self) -> Duration {
        Duration::from_millis(self.text_settle_ms)
    }

    pub(crate) fn pre_draw(&self) -> Duration {
        Duration::from_millis(self.container_pre_draw_delay_ms)
    }

    pub(crate) fn after_transition(&self) -> Duration {
        Duration::from_millis(self.post_draw_settle_ms / 2)
    }

    pub(crate) fn border_settle(&self) -> Duration {
        Duration::from_millis(self.border_settle_ms)
    }

    pub(crate) fn slot_settle(&self) -> Duration {
        Duration::from_millis(self.slot_settle_ms)
    }

    pub(crate) fn comment_render_settle(&self) -> Duration {
        Duration::from_millis(self.comment_render_settle_ms)
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self::DEFAULT
    }
}
