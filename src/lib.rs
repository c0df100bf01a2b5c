#![forbid(unsafe_code)]

pub mod burst;
pub mod context;
pub mod core;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod event;
pub mod finale;
pub mod firework;
pub mod particle;
pub mod show;

pub use context::{AudioSink, CheerSize, SimulationContext, SmokeSink, SoundCue, WindSource};
pub use self::core::{Color, HeightClass, Point, SizeClass, TrailStyle, Vec2, WindDirection};
pub use descriptor::{FireworkType, FireworkTypeDescriptor};
pub use document::{AudioSettings, ShowDocument, ShowSettings, WeatherSettings};
pub use error::{PyroError, PyroResult};
pub use event::{LaunchEvent, LaunchEventDraft, LaunchEventPatch};
pub use finale::{ColorTheme, FinaleComposer, FinaleIntensity, FinaleOptions};
pub use firework::{FireworkEntity, Phase};
pub use particle::{ParticleModel, RenderedParticle};
pub use show::{FrameSnapshot, Launcher, ShowTimeline};
