use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::Rng;

use crate::core::{Color, ParticleShape, Point, Vec2, lerp};

/// Velocity magnitude (|vx|+|vy|) at which wind coupling bottoms out.
const WIND_INERTIA_SPEED: f64 = 200.0;

/// Twinkle opacity oscillation, cycles per second.
const TWINKLE_HZ: f64 = 6.0;

/// Physics and appearance parameters fixed at spawn, derived from a
/// `FireworkTypeDescriptor` by the pattern generator.
#[derive(Clone, Copy, Debug)]
pub struct ParticleProps {
    pub gravity: f64,
    pub drag: f64,
    pub lifetime_ms: f64,
    pub start_color: Color,
    pub end_color: Color,
    pub start_size: f64,
    pub end_size: f64,
    pub shape: ParticleShape,
    pub trail_capacity: usize,
    pub twinkle: bool,
    pub strobe_hz: Option<f64>,
}

/// A single burst particle: ballistic motion under gravity, wind and drag,
/// with age-interpolated appearance and a bounded trail of past positions.
#[derive(Clone, Debug)]
pub struct ParticleModel {
    pub position: Point,
    pub velocity: Vec2,
    pub age_ms: f64,
    props: ParticleProps,
    trail: VecDeque<Point>,
    // Fixed per-instance randomization, set once at creation.
    rotation: f64,
    phase: f64,
}

impl ParticleModel {
    pub fn new(position: Point, velocity: Vec2, props: ParticleProps) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            position,
            velocity,
            age_ms: 0.0,
            props,
            trail: VecDeque::with_capacity(props.trail_capacity),
            rotation: rng.gen_range(0.0..TAU),
            phase: rng.gen_range(0.0..TAU),
        }
    }

    pub fn props(&self) -> &ParticleProps {
        &self.props
    }

    pub fn lifetime_ms(&self) -> f64 {
        self.props.lifetime_ms
    }

    /// Advances one tick under the given horizontal wind force (px/s).
    /// Returns whether the particle is still alive.
    pub fn advance(&mut self, dt: f64, wind: f64) -> bool {
        if self.props.trail_capacity > 0 {
            self.trail.push_back(self.position);
            while self.trail.len() > self.props.trail_capacity {
                self.trail.pop_front();
            }
        }

        self.velocity.y += self.props.gravity * dt;

        // Faster particles carry more inertia and are pushed less.
        let speed = (self.velocity.x.abs() + self.velocity.y.abs()).min(WIND_INERTIA_SPEED);
        let inertia = 1.0 - speed / (WIND_INERTIA_SPEED * 2.0);
        self.velocity.x += wind * inertia * dt;

        // Descriptor drag is a per-frame factor at 60 Hz; normalize to dt.
        let drag = self.props.drag.powf(dt * 60.0);
        self.velocity = self.velocity * drag;

        self.position += self.velocity * dt;
        self.age_ms += dt * 1000.0;
        self.age_ms < self.props.lifetime_ms
    }

    /// Fraction of the lifetime already spent, clamped to [0, 1].
    pub fn life_fraction(&self) -> f64 {
        (self.age_ms / self.props.lifetime_ms).clamp(0.0, 1.0)
    }

    /// Samples the current appearance: interpolated size/color, base opacity
    /// fading with age, twinkle/strobe modulation, and trail samples with
    /// decaying size and opacity behind the head.
    pub fn render(&self) -> RenderedParticle {
        let t = self.life_fraction();
        let size = lerp(self.props.start_size, self.props.end_size, t);
        let color = Color::lerp(self.props.start_color, self.props.end_color, t);
        let age_secs = self.age_ms / 1000.0;

        let mut alpha = 1.0 - t;
        if self.props.twinkle {
            alpha *= 0.55 + 0.45 * (age_secs * TWINKLE_HZ * TAU + self.phase).sin();
        }
        if let Some(hz) = self.props.strobe_hz {
            if (age_secs * hz * TAU + self.phase).sin() <= 0.0 {
                alpha = 0.0;
            }
        }
        let alpha = alpha.clamp(0.0, 1.0);

        let len = self.trail.len();
        let trail = self
            .trail
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                // Oldest sample first; fade toward the tail.
                let f = (i + 1) as f64 / len as f64;
                TrailSample {
                    position: p,
                    size: size * f * 0.8,
                    alpha: alpha * f * 0.5,
                }
            })
            .collect();

        RenderedParticle {
            position: self.position,
            size,
            color,
            alpha,
            rotation: self.rotation,
            shape: self.props.shape,
            trail,
        }
    }
}

/// One particle as the host should draw it this frame.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderedParticle {
    pub position: Point,
    pub size: f64,
    pub color: Color,
    pub alpha: f64,
    pub rotation: f64,
    pub shape: ParticleShape,
    pub trail: Vec<TrailSample>,
}

#[derive(Clone, Copy, Debug, serde::Serialize)]
pub struct TrailSample {
    pub position: Point,
    pub size: f64,
    pub alpha: f64,
}
