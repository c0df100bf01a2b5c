use crate::core::{Color, Point};

/// Sound effects the simulation can request from the host's audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Launch,
    Burst,
    Crackle,
}

/// Crowd reaction size, graded by how big the burst was.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheerSize {
    Small,
    Medium,
    Large,
}

/// Supplies the signed horizontal wind force (px/s) for the current tick.
pub trait WindSource {
    fn wind_force(&self) -> f64;
}

/// Fire-and-forget audio collaborator. Implementations must not block.
pub trait AudioSink {
    fn play_sound(&mut self, cue: SoundCue, volume: f64);
    fn crowd_cheer(&mut self, size: CheerSize);
}

/// Fire-and-forget smoke collaborator. Implementations must not block.
pub trait SmokeSink {
    fn launch_smoke(&mut self, position: Point);
    fn burst_smoke(&mut self, position: Point, intensity: f64, color: Color);
}

/// Optional capabilities injected into the simulation. Every capability is
/// optional configuration; an absent collaborator makes the corresponding
/// calls silent no-ops, never an error.
#[derive(Default)]
pub struct SimulationContext {
    pub wind: Option<Box<dyn WindSource>>,
    pub audio: Option<Box<dyn AudioSink>>,
    pub smoke: Option<Box<dyn SmokeSink>>,
}

impl SimulationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wind_force(&self) -> f64 {
        self.wind.as_ref().map_or(0.0, |w| w.wind_force())
    }

    pub fn play_sound(&mut self, cue: SoundCue, volume: f64) {
        if let Some(audio) = self.audio.as_mut() {
            audio.play_sound(cue, volume.clamp(0.0, 1.0));
        }
    }

    pub fn crowd_cheer(&mut self, size: CheerSize) {
        if let Some(audio) = self.audio.as_mut() {
            audio.crowd_cheer(size);
        }
    }

    pub fn launch_smoke(&mut self, position: Point) {
        if let Some(smoke) = self.smoke.as_mut() {
            smoke.launch_smoke(position);
        }
    }

    pub fn burst_smoke(&mut self, position: Point, intensity: f64, color: Color) {
        if let Some(smoke) = self.smoke.as_mut() {
            smoke.burst_smoke(position, intensity, color);
        }
    }
}

impl std::fmt::Debug for SimulationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationContext")
            .field("wind", &self.wind.is_some())
            .field("audio", &self.audio.is_some())
            .field("smoke", &self.smoke.is_some())
            .finish()
    }
}

/// Fixed wind, mainly for tests and headless runs.
#[derive(Clone, Copy, Debug)]
pub struct ConstantWind(pub f64);

impl WindSource for ConstantWind {
    fn wind_force(&self) -> f64 {
        self.0
    }
}
