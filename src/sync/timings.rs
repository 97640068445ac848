use serde::{Deserialize, Serialize};
use tracing::warn;

/// Tuning constants of the synchronizer. Milliseconds unless the name says
/// otherwise; pixel values are in scroll-container units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncTimings {
    // Manual scroll
    pub manual_deference_ms: u64,
    pub override_grace_ms: u64,
    pub programmatic_window_ms: u64,
    pub listener_grace_ms: u64,
    pub direction_debounce_ms: u64,
    pub direction_immediate_px: f64,
    pub direction_final_px: f64,
    pub end_threshold_px: f64,
    pub sticky_end_px: f64,

    // Autoscroll
    pub autoscroll_throttle_ms: u64,
    pub scroll_animation_ms: u64,
    pub top_offset_ratio: f64,
    pub top_offset_cap_px: f64,
    pub bottom_offset_ratio: f64,
    pub bottom_offset_cap_px: f64,
    pub position_tolerance_px: f64,
    pub user_ahead_px: f64,

    // Controls
    pub inactivity_hide_ms: u64,
    pub activity_throttle_ms: u64,
    pub hide_suppress_ms: u64,
    pub show_suppress_ms: u64,
    pub show_cooldown_ms: u64,
    pub show_cooldown_coarse_ms: u64,

    // Seeking and rewind
    pub seek_protection_ms: u64,
    pub seek_protection_after_ms: u64,
    pub line_seek_settle_ms: u64,
    pub long_press_ms: u64,
    pub rewind_interval_ms: u64,
    pub rewind_step_secs: f64,
    pub click_block_ms: u64,

    // Restore and toggles
    pub restore_settle_ms: u64,
    pub restore_grace_ms: u64,
    pub restore_echo_ms: u64,
    pub restore_echo_px: f64,
    pub toggle_scroll_suppress_ms: u64,
    pub toggle_ignore_activity_ms: u64,

    // Transport
    pub next_guard_ms: u64,
    pub restart_threshold_secs: f64,
    pub time_update_throttle_ms: u64,
    pub ended_tolerance_secs: f64,
}

impl Default for SyncTimings {
    fn default() -> Self {
        Self {
            manual_deference_ms: 2000,
            override_grace_ms: 3500,
            programmatic_window_ms: 300,
            listener_grace_ms: 300,
            direction_debounce_ms: 200,
            direction_immediate_px: 2.0,
            direction_final_px: 30.0,
            end_threshold_px: 10.0,
            sticky_end_px: 24.0,

            autoscroll_throttle_ms: 50,
            scroll_animation_ms: 300,
            top_offset_ratio: 0.25,
            top_offset_cap_px: 120.0,
            bottom_offset_ratio: 0.1,
            bottom_offset_cap_px: 40.0,
            position_tolerance_px: 20.0,
            user_ahead_px: 50.0,

            inactivity_hide_ms: 5000,
            activity_throttle_ms: 400,
            hide_suppress_ms: 500,
            show_suppress_ms: 400,
            show_cooldown_ms: 400,
            show_cooldown_coarse_ms: 900,

            seek_protection_ms: 2000,
            seek_protection_after_ms: 1500,
            line_seek_settle_ms: 100,
            long_press_ms: 200,
            rewind_interval_ms: 200,
            rewind_step_secs: 5.0,
            click_block_ms: 450,

            restore_settle_ms: 100,
            restore_grace_ms: 1000,
            restore_echo_ms: 500,
            restore_echo_px: 10.0,
            toggle_scroll_suppress_ms: 2000,
            toggle_ignore_activity_ms: 600,

            next_guard_ms: 500,
            restart_threshold_secs: 3.0,
            time_update_throttle_ms: 100,
            ended_tolerance_secs: 0.5,
        }
    }
}

impl SyncTimings {
    /// Autoscroll reclaiming control must come after plain deference ends;
    /// a config that inverts the pair gets the defaults back for both.
    pub fn validated(mut self) -> Self {
        if self.override_grace_ms <= self.manual_deference_ms {
            warn!(
                deference = self.manual_deference_ms,
                grace = self.override_grace_ms,
                "override grace must exceed manual-scroll deference, using defaults"
            );
            let defaults = Self::default();
            self.manual_deference_ms = defaults.manual_deference_ms;
            self.override_grace_ms = defaults.override_grace_ms;
        }
        if self.long_press_ms == 0 {
            self.long_press_ms = Self::default().long_press_ms;
        }
        if self.rewind_interval_ms == 0 {
            self.rewind_interval_ms = Self::default().rewind_interval_ms;
        }
        self
    }
}
