use crate::core::{ParticleShape, SizeClass};

/// The 14 shell types the engine knows how to burst.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FireworkType {
    /// Safe fallback for unknown type names at the document boundary.
    #[default]
    Chrysanthemum,
    Peony,
    Willow,
    Palm,
    Ring,
    Crossette,
    Strobe,
    Comet,
    Brocade,
    Kamuro,
    Horsetail,
    Heart,
    Saturn,
    Crackling,
}

impl FireworkType {
    pub const ALL: [FireworkType; 14] = [
        Self::Chrysanthemum,
        Self::Peony,
        Self::Willow,
        Self::Palm,
        Self::Ring,
        Self::Crossette,
        Self::Strobe,
        Self::Comet,
        Self::Brocade,
        Self::Kamuro,
        Self::Horsetail,
        Self::Heart,
        Self::Saturn,
        Self::Crackling,
    ];

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == s)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Chrysanthemum => "chrysanthemum",
            Self::Peony => "peony",
            Self::Willow => "willow",
            Self::Palm => "palm",
            Self::Ring => "ring",
            Self::Crossette => "crossette",
            Self::Strobe => "strobe",
            Self::Comet => "comet",
            Self::Brocade => "brocade",
            Self::Kamuro => "kamuro",
            Self::Horsetail => "horsetail",
            Self::Heart => "heart",
            Self::Saturn => "saturn",
            Self::Crackling => "crackling",
        }
    }

    pub fn descriptor(self) -> &'static FireworkTypeDescriptor {
        match self {
            Self::Chrysanthemum => &CHRYSANTHEMUM,
            Self::Peony => &PEONY,
            Self::Willow => &WILLOW,
            Self::Palm => &PALM,
            Self::Ring => &RING,
            Self::Crossette => &CROSSETTE,
            Self::Strobe => &STROBE,
            Self::Comet => &COMET,
            Self::Brocade => &BROCADE,
            Self::Kamuro => &KAMURO,
            Self::Horsetail => &HORSETAIL,
            Self::Heart => &HEART,
            Self::Saturn => &SATURN,
            Self::Crackling => &CRACKLING,
        }
    }
}

/// Per-size particle counts. `medium` is always explicit; missing sizes fall
/// back to `floor(medium × size.particle_multiplier())`.
#[derive(Clone, Copy, Debug)]
pub struct SizeCounts {
    pub small: Option<usize>,
    pub medium: usize,
    pub large: Option<usize>,
}

impl SizeCounts {
    pub const fn of(medium: usize) -> Self {
        Self {
            small: None,
            medium,
            large: None,
        }
    }

    pub fn resolve(&self, size: SizeClass) -> usize {
        let fallback = || (self.medium as f64 * size.particle_multiplier()).floor() as usize;
        match size {
            SizeClass::Small => self.small.unwrap_or_else(fallback),
            SizeClass::Medium => self.medium,
            SizeClass::Large => self.large.unwrap_or_else(fallback),
        }
    }
}

/// Delayed crackle sub-explosion: selected particles each pop into small
/// sparks at their current position.
#[derive(Clone, Copy, Debug)]
pub struct SecondaryBurst {
    pub delay_ms: f64,
    pub count: usize,
}

/// Delayed split: sampled particles each shed child particles that inherit a
/// fraction of the parent velocity.
#[derive(Clone, Copy, Debug)]
pub struct SplitEffect {
    pub delay_ms: f64,
    pub count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomPattern {
    Heart,
    Saturn,
}

/// Static per-type configuration driving the pattern generator and particle
/// physics. One immutable instance per `FireworkType`, fixed at compile time.
#[derive(Clone, Copy, Debug)]
pub struct FireworkTypeDescriptor {
    pub counts: SizeCounts,
    /// Angular spread in degrees; 360 means a full circle.
    pub spread_deg: f64,
    /// Center of the spread, degrees clockwise from straight up.
    pub spread_offset_deg: f64,
    /// Burst speed range, px/s, before the size multiplier.
    pub speed: (f64, f64),
    /// Downward acceleration applied to burst particles, px/s².
    pub gravity: f64,
    /// Per-frame multiplicative drag at 60 Hz.
    pub drag: f64,
    /// Particle lifetime range, ms.
    pub lifetime_ms: (f64, f64),
    pub shape: ParticleShape,
    pub start_size: f64,
    pub end_size: f64,
    /// Trail buffer length before the trail-style multiplier.
    pub trail_length: usize,
    pub secondary_burst: Option<SecondaryBurst>,
    pub split: Option<SplitEffect>,
    pub custom_pattern: Option<CustomPattern>,
    /// Ignore event colors; draw from the gold/silver palette.
    pub force_gold: bool,
    pub twinkle: bool,
    /// Hard on/off flicker, cycles per second.
    pub strobe_hz: Option<f64>,
    /// All particles use the midpoint of the speed range.
    pub uniform_speed: bool,
}

impl FireworkTypeDescriptor {
    const BASE: Self = Self {
        counts: SizeCounts::of(80),
        spread_deg: 360.0,
        spread_offset_deg: 0.0,
        speed: (120.0, 240.0),
        gravity: 180.0,
        drag: 0.98,
        lifetime_ms: (1400.0, 2200.0),
        shape: ParticleShape::Circle,
        start_size: 3.0,
        end_size: 0.5,
        trail_length: 8,
        secondary_burst: None,
        split: None,
        custom_pattern: None,
        force_gold: false,
        twinkle: false,
        strobe_hz: None,
        uniform_speed: false,
    };
}

static CHRYSANTHEMUM: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(90),
    speed: (120.0, 260.0),
    trail_length: 10,
    ..FireworkTypeDescriptor::BASE
};

static PEONY: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts {
        small: Some(64),
        medium: 110,
        large: Some(180),
    },
    speed: (140.0, 240.0),
    trail_length: 3,
    lifetime_ms: (1200.0, 1800.0),
    ..FireworkTypeDescriptor::BASE
};

static WILLOW: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(70),
    speed: (90.0, 150.0),
    gravity: 60.0,
    drag: 0.985,
    lifetime_ms: (2600.0, 3600.0),
    shape: ParticleShape::Spark,
    trail_length: 16,
    force_gold: true,
    ..FireworkTypeDescriptor::BASE
};

static PALM: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(28),
    spread_deg: 120.0,
    speed: (200.0, 300.0),
    gravity: 220.0,
    lifetime_ms: (1600.0, 2400.0),
    shape: ParticleShape::Spark,
    start_size: 4.5,
    trail_length: 14,
    ..FireworkTypeDescriptor::BASE
};

static RING: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(60),
    speed: (170.0, 190.0),
    gravity: 120.0,
    lifetime_ms: (1500.0, 2100.0),
    trail_length: 5,
    uniform_speed: true,
    ..FireworkTypeDescriptor::BASE
};

static CROSSETTE: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(36),
    speed: (130.0, 210.0),
    lifetime_ms: (1800.0, 2600.0),
    start_size: 3.5,
    trail_length: 9,
    split: Some(SplitEffect {
        delay_ms: 600.0,
        count: 4,
    }),
    ..FireworkTypeDescriptor::BASE
};

static STROBE: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(85),
    speed: (100.0, 200.0),
    gravity: 110.0,
    lifetime_ms: (1800.0, 2600.0),
    shape: ParticleShape::Star,
    trail_length: 2,
    strobe_hz: Some(14.0),
    ..FireworkTypeDescriptor::BASE
};

static COMET: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts {
        small: Some(7),
        medium: 12,
        large: Some(20),
    },
    speed: (160.0, 260.0),
    lifetime_ms: (1700.0, 2500.0),
    shape: ParticleShape::Spark,
    start_size: 5.0,
    end_size: 1.0,
    trail_length: 20,
    ..FireworkTypeDescriptor::BASE
};

static BROCADE: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(70),
    speed: (110.0, 220.0),
    gravity: 140.0,
    lifetime_ms: (2000.0, 2800.0),
    shape: ParticleShape::Spark,
    trail_length: 12,
    secondary_burst: Some(SecondaryBurst {
        delay_ms: 900.0,
        count: 20,
    }),
    ..FireworkTypeDescriptor::BASE
};

static KAMURO: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(75),
    speed: (80.0, 140.0),
    gravity: 70.0,
    drag: 0.985,
    lifetime_ms: (2800.0, 3800.0),
    shape: ParticleShape::Spark,
    trail_length: 18,
    force_gold: true,
    twinkle: true,
    ..FireworkTypeDescriptor::BASE
};

static HORSETAIL: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(40),
    spread_deg: 70.0,
    speed: (60.0, 110.0),
    gravity: 260.0,
    lifetime_ms: (2200.0, 3000.0),
    shape: ParticleShape::Spark,
    start_size: 4.0,
    trail_length: 16,
    ..FireworkTypeDescriptor::BASE
};

static HEART: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(48),
    speed: (150.0, 170.0),
    gravity: 100.0,
    lifetime_ms: (1600.0, 2200.0),
    trail_length: 6,
    custom_pattern: Some(CustomPattern::Heart),
    uniform_speed: true,
    ..FireworkTypeDescriptor::BASE
};

static SATURN: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(50),
    speed: (140.0, 220.0),
    gravity: 130.0,
    lifetime_ms: (1600.0, 2400.0),
    trail_length: 7,
    custom_pattern: Some(CustomPattern::Saturn),
    ..FireworkTypeDescriptor::BASE
};

static CRACKLING: FireworkTypeDescriptor = FireworkTypeDescriptor {
    counts: SizeCounts::of(64),
    speed: (120.0, 230.0),
    lifetime_ms: (1500.0, 2300.0),
    shape: ParticleShape::Spark,
    trail_length: 6,
    secondary_burst: Some(SecondaryBurst {
        delay_ms: 500.0,
        count: 26,
    }),
    ..FireworkTypeDescriptor::BASE
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fourteen_types_have_descriptors() {
        assert_eq!(FireworkType::ALL.len(), 14);
        for t in FireworkType::ALL {
            let d = t.descriptor();
            assert!(d.counts.medium > 0, "{} has zero particles", t.name());
            assert!(d.speed.0 <= d.speed.1);
            assert!(d.lifetime_ms.0 <= d.lifetime_ms.1);
            assert!(d.spread_deg > 0.0 && d.spread_deg <= 360.0);
        }
    }

    #[test]
    fn names_roundtrip() {
        for t in FireworkType::ALL {
            assert_eq!(FireworkType::from_name(t.name()), Some(t));
        }
        assert_eq!(FireworkType::from_name("roman-candle"), None);
    }

    #[test]
    fn unknown_type_defaults_to_chrysanthemum() {
        let t = FireworkType::from_name("nope").unwrap_or_default();
        assert_eq!(t, FireworkType::Chrysanthemum);
    }

    #[test]
    fn count_fallback_floors() {
        let counts = SizeCounts::of(90);
        assert_eq!(counts.resolve(SizeClass::Medium), 90);
        // 90 × 0.6 = 54, 90 × 1.5 = 135
        assert_eq!(counts.resolve(SizeClass::Small), 54);
        assert_eq!(counts.resolve(SizeClass::Large), 135);

        // 45 × 0.6 = 27.0 exactly; 47 × 0.6 = 28.2 floors to 28.
        assert_eq!(SizeCounts::of(47).resolve(SizeClass::Small), 28);
    }

    #[test]
    fn explicit_counts_take_precedence() {
        let d = FireworkType::Peony.descriptor();
        assert_eq!(d.counts.resolve(SizeClass::Small), 64);
        assert_eq!(d.counts.resolve(SizeClass::Large), 180);
    }

    #[test]
    fn behavior_flags_are_wired() {
        assert!(FireworkType::Crossette.descriptor().split.is_some());
        assert!(FireworkType::Brocade.descriptor().secondary_burst.is_some());
        assert!(FireworkType::Crackling.descriptor().secondary_burst.is_some());
        assert!(FireworkType::Willow.descriptor().force_gold);
        assert!(FireworkType::Kamuro.descriptor().twinkle);
        assert!(FireworkType::Strobe.descriptor().strobe_hz.is_some());
        assert_eq!(
            FireworkType::Heart.descriptor().custom_pattern,
            Some(CustomPattern::Heart)
        );
        assert_eq!(
            FireworkType::Saturn.descriptor().custom_pattern,
            Some(CustomPattern::Saturn)
        );
    }
}
