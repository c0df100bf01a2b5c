pub use kurbo::{Point, Vec2};

/// Upper bound on a single integration step. A stalled host (backgrounded
/// tab, debugger pause) must not produce a huge step that destabilizes the
/// integrators.
pub const MAX_TICK_SECS: f64 = 0.1;

/// Trailing buffer appended after the last scheduled event when computing
/// show duration, and the floor for an empty timeline.
pub const TRAILING_BUFFER_MS: f64 = 5000.0;

/// Safety bound on the fading phase: an entity is forced to finish this long
/// after entering it, regardless of pathological particle lifetimes.
pub const FADE_TIMEOUT_MS: f64 = 3000.0;

/// Document-level default for `settings.duration` when absent on load.
pub const DEFAULT_SHOW_DURATION_MS: f64 = 30000.0;

/// Vertical coordinate of the stage floor; launchers sit on it and rockets
/// ascend toward y = 0.
pub const GROUND_Y: f64 = 600.0;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Straight RGB color, serialized as a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` (leading `#` optional). Returns `None` on anything
    /// malformed; callers at the document boundary coerce to a fallback.
    pub fn parse(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    pub fn parse_or(s: &str, fallback: Color) -> Self {
        Self::parse(s).unwrap_or(fallback)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn lerp(a: Color, b: Color, t: f64) -> Color {
        fn mix(a: u8, b: u8, t: f64) -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        }
        Color::new(mix(a.r, b.r, t), mix(a.g, b.g, t), mix(a.b, b.b, t))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as serde::Deserialize>::deserialize(deserializer)?;
        Color::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{s}'")))
    }
}

/// Shell size class. Scales particle count and burst speed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    Small,
    #[default]
    Medium,
    Large,
}

impl SizeClass {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "small" => Some(Self::Small),
            "medium" => Some(Self::Medium),
            "large" => Some(Self::Large),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    pub fn particle_multiplier(self) -> f64 {
        match self {
            Self::Small => 0.6,
            Self::Medium => 1.0,
            Self::Large => 1.5,
        }
    }

    pub fn speed_multiplier(self) -> f64 {
        match self {
            Self::Small => 0.75,
            Self::Medium => 1.0,
            Self::Large => 1.25,
        }
    }

    pub const ALL: [SizeClass; 3] = [Self::Small, Self::Medium, Self::Large];
}

/// Target burst height class. Fixes the rocket's burst altitude and launch
/// speed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HeightClass {
    Low,
    Medium,
    #[default]
    High,
}

impl HeightClass {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Altitude (stage y, smaller is higher) at which the rocket bursts.
    pub fn burst_altitude(self) -> f64 {
        match self {
            Self::Low => 400.0,
            Self::Medium => 280.0,
            Self::High => 150.0,
        }
    }

    /// Initial upward rocket speed, px/s.
    pub fn launch_speed(self) -> f64 {
        match self {
            Self::Low => 360.0,
            Self::Medium => 430.0,
            Self::High => 500.0,
        }
    }

    pub const ALL: [HeightClass; 3] = [Self::Low, Self::Medium, Self::High];
}

/// Particle trail rendering style; scales each particle's trail length.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TrailStyle {
    #[default]
    None,
    Sparkle,
    Comet,
}

impl TrailStyle {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "sparkle" => Some(Self::Sparkle),
            "comet" => Some(Self::Comet),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Sparkle => "sparkle",
            Self::Comet => "comet",
        }
    }

    pub fn length_multiplier(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Sparkle => 0.6,
            Self::Comet => 1.6,
        }
    }

    pub const ALL: [TrailStyle; 3] = [Self::None, Self::Sparkle, Self::Comet];
}

/// Glyph a particle is rendered as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleShape {
    Circle,
    Square,
    Star,
    Spark,
    Ring,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindDirection {
    Left,
    Right,
}
