use rand::Rng;
use rand::seq::SliceRandom;

use crate::core::{Color, HeightClass, SizeClass, TrailStyle};
use crate::descriptor::FireworkType;
use crate::event::LaunchEventDraft;

/// How launch offsets are distributed across the finale window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinaleIntensity {
    /// Back-loaded: `(i/n)² × window`, accelerating toward the climax.
    Gradual,
    /// Even spacing: `(i/n) × window`.
    #[default]
    Steady,
    /// Unordered scatter: `random() × window`.
    Chaos,
}

impl FinaleIntensity {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "gradual" => Some(Self::Gradual),
            "steady" => Some(Self::Steady),
            "chaos" => Some(Self::Chaos),
            _ => None,
        }
    }
}

/// Where finale colors come from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ColorTheme {
    /// A named preset palette; unknown names fall back to `rainbow`.
    Preset(String),
    /// A random preset, picked once per compose.
    #[default]
    Random,
    /// Explicit palette. With two or more entries, primary and secondary
    /// are kept distinct on a best-effort basis.
    Custom(Vec<Color>),
}

const RAINBOW: [Color; 6] = [
    Color::new(0xff, 0x4d, 0x4d),
    Color::new(0xff, 0xa5, 0x00),
    Color::new(0xff, 0xe1, 0x35),
    Color::new(0x4d, 0xd9, 0x6b),
    Color::new(0x4d, 0x9f, 0xff),
    Color::new(0xb3, 0x6b, 0xff),
];

const WARM: [Color; 4] = [
    Color::new(0xff, 0x5a, 0x3c),
    Color::new(0xff, 0x9e, 0x2c),
    Color::new(0xff, 0xd7, 0x00),
    Color::new(0xff, 0x6b, 0x8a),
];

const COOL: [Color; 4] = [
    Color::new(0x3c, 0xa0, 0xff),
    Color::new(0x3c, 0xff, 0xe1),
    Color::new(0x8a, 0x6b, 0xff),
    Color::new(0x6b, 0xff, 0x9e),
];

const GOLD: [Color; 3] = [
    Color::new(0xff, 0xd7, 0x00),
    Color::new(0xff, 0xdf, 0x80),
    Color::new(0xf5, 0xf5, 0xdc),
];

const PRESETS: [(&str, &[Color]); 4] = [
    ("rainbow", &RAINBOW),
    ("warm", &WARM),
    ("cool", &COOL),
    ("gold", &GOLD),
];

#[derive(Clone, Debug)]
pub struct FinaleOptions {
    pub count: usize,
    pub duration_window_ms: f64,
    pub intensity: FinaleIntensity,
    pub theme: ColorTheme,
    /// Allowed type subset; empty means all 14.
    pub allowed_types: Vec<FireworkType>,
    /// Explicit start; `None` uses the caller-supplied default.
    pub start_time_ms: Option<f64>,
}

impl Default for FinaleOptions {
    fn default() -> Self {
        Self {
            count: 10,
            duration_window_ms: 10000.0,
            intensity: FinaleIntensity::Steady,
            theme: ColorTheme::Random,
            allowed_types: Vec::new(),
            start_time_ms: None,
        }
    }
}

pub struct FinaleComposer;

impl FinaleComposer {
    /// Expands a finale request into concrete event drafts. Pure over its
    /// inputs apart from the unseeded randomness; launchers cycle
    /// round-robin through `launcher_ids`.
    pub fn compose(
        options: &FinaleOptions,
        launcher_ids: &[u32],
        default_start_ms: f64,
    ) -> Vec<LaunchEventDraft> {
        let mut rng = rand::thread_rng();
        let start = options.start_time_ms.unwrap_or(default_start_ms).max(0.0);
        let window = options.duration_window_ms.max(0.0);
        let count = options.count;

        let palette = resolve_palette(&options.theme, &mut rng);
        let types: &[FireworkType] = if options.allowed_types.is_empty() {
            &FireworkType::ALL
        } else {
            &options.allowed_types
        };

        (0..count)
            .map(|i| {
                let offset = match options.intensity {
                    FinaleIntensity::Gradual => {
                        (i as f64 / count as f64).powi(2) * window
                    }
                    FinaleIntensity::Steady => i as f64 * window / count as f64,
                    FinaleIntensity::Chaos => rng.r#gen::<f64>() * window,
                };

                let launcher = launcher_ids
                    .get(i % launcher_ids.len().max(1))
                    .copied()
                    .unwrap_or(1);

                let (primary, secondary) = pick_pair(&palette, &mut rng);

                LaunchEventDraft::at(start + offset)
                    .launcher(launcher)
                    .firework_type(*types.choose(&mut rng).unwrap_or(&FireworkType::Chrysanthemum))
                    .size(*SizeClass::ALL.choose(&mut rng).unwrap_or(&SizeClass::Medium))
                    .height(*HeightClass::ALL.choose(&mut rng).unwrap_or(&HeightClass::High))
                    .trail(*TrailStyle::ALL.choose(&mut rng).unwrap_or(&TrailStyle::None))
                    .colors(primary, secondary)
            })
            .collect()
    }
}

pub fn preset_palette(name: &str) -> Option<&'static [Color]> {
    PRESETS.iter().find(|(n, _)| *n == name).map(|(_, p)| *p)
}

fn resolve_palette(theme: &ColorTheme, rng: &mut impl Rng) -> Vec<Color> {
    match theme {
        ColorTheme::Preset(name) => preset_palette(name)
            .unwrap_or(&RAINBOW)
            .to_vec(),
        ColorTheme::Random => {
            let (_, palette) = PRESETS[rng.gen_range(0..PRESETS.len())];
            palette.to_vec()
        }
        ColorTheme::Custom(colors) if colors.is_empty() => RAINBOW.to_vec(),
        ColorTheme::Custom(colors) => colors.clone(),
    }
}

/// Two palette picks, kept distinct on a best-effort basis when the palette
/// allows it.
fn pick_pair(palette: &[Color], rng: &mut impl Rng) -> (Color, Color) {
    let primary = *palette.choose(rng).unwrap_or(&Color::WHITE);
    let mut secondary = *palette.choose(rng).unwrap_or(&Color::WHITE);
    if palette.len() >= 2 {
        for _ in 0..8 {
            if secondary != primary {
                break;
            }
            secondary = *palette.choose(rng).unwrap_or(&Color::WHITE);
        }
    }
    (primary, secondary)
}
