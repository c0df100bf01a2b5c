use crate::core::{Color, HeightClass, SizeClass, TrailStyle};
use crate::descriptor::FireworkType;

pub const DEFAULT_PRIMARY: Color = Color::new(0xff, 0x50, 0x50);
pub const DEFAULT_SECONDARY: Color = Color::new(0x50, 0xa0, 0xff);

/// One scheduled launch. Owned by the timeline, which keeps the list sorted
/// by `time_ms`; `id` is unique and stable across edits. `triggered` is
/// transient playback state, reset on every stop/seek.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LaunchEvent {
    pub id: u64,
    pub time_ms: f64,
    pub launcher_id: u32,
    pub firework_type: FireworkType,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub size: SizeClass,
    pub height: HeightClass,
    pub trail: TrailStyle,
    #[serde(skip)]
    pub triggered: bool,
}

/// Partially specified event, as produced by the host UI or the finale
/// composer. `ShowTimeline::add_event` fills defaults, clamps the time and
/// assigns an id.
#[derive(Clone, Debug, Default)]
pub struct LaunchEventDraft {
    pub time_ms: Option<f64>,
    pub launcher_id: Option<u32>,
    pub firework_type: Option<FireworkType>,
    pub primary_color: Option<Color>,
    pub secondary_color: Option<Color>,
    pub size: Option<SizeClass>,
    pub height: Option<HeightClass>,
    pub trail: Option<TrailStyle>,
}

impl LaunchEventDraft {
    pub fn at(time_ms: f64) -> Self {
        Self {
            time_ms: Some(time_ms),
            ..Self::default()
        }
    }

    pub fn firework_type(mut self, t: FireworkType) -> Self {
        self.firework_type = Some(t);
        self
    }

    pub fn launcher(mut self, id: u32) -> Self {
        self.launcher_id = Some(id);
        self
    }

    pub fn height(mut self, h: HeightClass) -> Self {
        self.height = Some(h);
        self
    }

    pub fn size(mut self, s: SizeClass) -> Self {
        self.size = Some(s);
        self
    }

    pub fn trail(mut self, t: TrailStyle) -> Self {
        self.trail = Some(t);
        self
    }

    pub fn colors(mut self, primary: Color, secondary: Color) -> Self {
        self.primary_color = Some(primary);
        self.secondary_color = Some(secondary);
        self
    }

    /// Resolves the draft into a concrete event. Negative times are clamped
    /// to zero here, at the boundary, never deferred to simulation time.
    pub fn resolve(self, id: u64, default_launcher: u32) -> LaunchEvent {
        LaunchEvent {
            id,
            time_ms: self.time_ms.unwrap_or(0.0).max(0.0),
            launcher_id: self.launcher_id.unwrap_or(default_launcher),
            firework_type: self.firework_type.unwrap_or_default(),
            primary_color: self.primary_color.unwrap_or(DEFAULT_PRIMARY),
            secondary_color: self.secondary_color.unwrap_or(DEFAULT_SECONDARY),
            size: self.size.unwrap_or_default(),
            height: self.height.unwrap_or_default(),
            trail: self.trail.unwrap_or_default(),
            triggered: false,
        }
    }
}

/// Field-level patch for `ShowTimeline::update_event`.
#[derive(Clone, Debug, Default)]
pub struct LaunchEventPatch {
    pub time_ms: Option<f64>,
    pub launcher_id: Option<u32>,
    pub firework_type: Option<FireworkType>,
    pub primary_color: Option<Color>,
    pub secondary_color: Option<Color>,
    pub size: Option<SizeClass>,
    pub height: Option<HeightClass>,
    pub trail: Option<TrailStyle>,
}

impl LaunchEventPatch {
    pub fn time(time_ms: f64) -> Self {
        Self {
            time_ms: Some(time_ms),
            ..Self::default()
        }
    }

    pub fn apply(&self, event: &mut LaunchEvent) {
        if let Some(t) = self.time_ms {
            event.time_ms = t.max(0.0);
        }
        if let Some(l) = self.launcher_id {
            event.launcher_id = l;
        }
        if let Some(t) = self.firework_type {
            event.firework_type = t;
        }
        if let Some(c) = self.primary_color {
            event.primary_color = c;
        }
        if let Some(c) = self.secondary_color {
            event.secondary_color = c;
        }
        if let Some(s) = self.size {
            event.size = s;
        }
        if let Some(h) = self.height {
            event.height = h;
        }
        if let Some(t) = self.trail {
            event.trail = t;
        }
    }
}
