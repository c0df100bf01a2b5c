use crate::context::WindSource;
use crate::core::{Color, DEFAULT_SHOW_DURATION_MS, HeightClass, SizeClass, TrailStyle, WindDirection};
use crate::descriptor::FireworkType;
use crate::error::{PyroError, PyroResult};
use crate::event::{DEFAULT_PRIMARY, DEFAULT_SECONDARY, LaunchEventDraft};
use crate::show::{Launcher, ShowTimeline};

pub const DOCUMENT_VERSION: &str = "1.0";

/// Wind force in px/s per unit of the document's 0–100 wind speed.
const WIND_FORCE_SCALE: f64 = 2.4;

fn default_duration() -> f64 {
    DEFAULT_SHOW_DURATION_MS
}

fn default_background() -> Color {
    Color::new(0x0a, 0x0a, 0x1a)
}

fn default_true() -> bool {
    true
}

/// Host-level display settings, carried verbatim through the document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowSettings {
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default = "default_true")]
    pub show_stars: bool,
}

impl Default for ShowSettings {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            background_color: default_background(),
            show_stars: true,
        }
    }
}

/// Weather collaborator settings. Doubles as the `WindSource` the host can
/// install into the simulation context.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSettings {
    /// 0–100, clamped on use.
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
    pub smoke_enabled: bool,
    /// 1–5, clamped on load.
    pub smoke_density: u8,
}

impl WeatherSettings {
    pub fn wind_force_px_s(&self) -> f64 {
        let magnitude = self.wind_speed.clamp(0.0, 100.0) * WIND_FORCE_SCALE;
        match self.wind_direction {
            WindDirection::Left => -magnitude,
            WindDirection::Right => magnitude,
        }
    }
}

impl WindSource for WeatherSettings {
    fn wind_force(&self) -> f64 {
        self.wind_force_px_s()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioSettings {
    pub enabled: bool,
    /// 0–100.
    pub volume: f64,
    pub crowd_enabled: bool,
}

/// One event as persisted. Enum-like fields are plain strings here and are
/// coerced to safe fallbacks going in, so a hand-edited document can never
/// fail the load outright.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub launcher_id: Option<u32>,
    #[serde(rename = "type", default)]
    pub firework_type: String,
    #[serde(default)]
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub trail: String,
}

/// The versioned persisted/exchanged show document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDocument {
    pub version: String,
    #[serde(default)]
    pub settings: ShowSettings,
    #[serde(default)]
    pub weather: Option<WeatherSettings>,
    #[serde(default)]
    pub audio: Option<AudioSettings>,
    #[serde(default)]
    pub launchers: Vec<Launcher>,
    #[serde(default)]
    pub events: Vec<RawEventRecord>,
}

impl ShowTimeline {
    pub fn to_document(&self) -> ShowDocument {
        ShowDocument {
            version: DOCUMENT_VERSION.to_string(),
            settings: self.settings.clone(),
            weather: self.weather,
            audio: self.audio,
            launchers: self.launchers().to_vec(),
            events: self
                .event_list()
                .iter()
                .map(|e| RawEventRecord {
                    id: Some(e.id),
                    time: e.time_ms,
                    launcher_id: Some(e.launcher_id),
                    firework_type: e.firework_type.name().to_string(),
                    primary_color: e.primary_color.to_hex(),
                    secondary_color: e.secondary_color.to_hex(),
                    size: e.size.name().to_string(),
                    height: e.height.name().to_string(),
                    trail: e.trail.name().to_string(),
                })
                .collect(),
        }
    }

    /// Builds a timeline from a document. Events go back through the normal
    /// `add_event` path rather than being trusted verbatim; missing weather
    /// and audio sections leave those subsystems at their defaults.
    #[tracing::instrument(skip(doc), fields(version = %doc.version, events = doc.events.len()))]
    pub fn from_document(doc: &ShowDocument) -> ShowTimeline {
        if doc.version != DOCUMENT_VERSION {
            tracing::debug!(version = %doc.version, "unknown document version, loading best-effort");
        }

        let mut show = ShowTimeline::new();
        show.settings = doc.settings.clone();
        show.weather = doc.weather.map(|mut w| {
            w.smoke_density = w.smoke_density.clamp(1, 5);
            w
        });
        show.audio = doc.audio;

        if !doc.launchers.is_empty() {
            show.replace_launchers(&doc.launchers);
        }

        for raw in &doc.events {
            let draft = LaunchEventDraft {
                time_ms: Some(raw.time),
                launcher_id: raw.launcher_id,
                firework_type: Some(
                    FireworkType::from_name(&raw.firework_type).unwrap_or_default(),
                ),
                primary_color: Some(Color::parse_or(&raw.primary_color, DEFAULT_PRIMARY)),
                secondary_color: Some(Color::parse_or(&raw.secondary_color, DEFAULT_SECONDARY)),
                size: Some(SizeClass::from_name(&raw.size).unwrap_or_default()),
                height: Some(HeightClass::from_name(&raw.height).unwrap_or_default()),
                trail: Some(TrailStyle::from_name(&raw.trail).unwrap_or_default()),
            };
            show.add_event_with_id(draft, raw.id);
        }
        show
    }

    pub fn to_json(&self) -> PyroResult<String> {
        serde_json::to_string_pretty(&self.to_document())
            .map_err(|e| PyroError::document(e.to_string()))
    }

    pub fn from_json(s: &str) -> PyroResult<ShowTimeline> {
        let doc: ShowDocument =
            serde_json::from_str(s).map_err(|e| PyroError::document(e.to_string()))?;
        Ok(Self::from_document(&doc))
    }
}
