use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::Rng;

use crate::burst::{BurstConfig, BurstPatternGenerator};
use crate::context::{CheerSize, SimulationContext, SoundCue};
use crate::core::{Color, FADE_TIMEOUT_MS, Point, SizeClass};
use crate::descriptor::{FireworkType, FireworkTypeDescriptor};
use crate::event::LaunchEvent;
use crate::particle::{ParticleModel, RenderedParticle};

/// Downward acceleration on the ascending rocket, px/s².
const ROCKET_GRAVITY: f64 = 300.0;

/// Rockets feel only a fraction of the wind particles do.
const ROCKET_WIND_FACTOR: f64 = 0.3;

/// Sinusoidal ascent wobble: horizontal speed amplitude and frequency.
const WOBBLE_AMPLITUDE: f64 = 18.0;
const WOBBLE_HZ: f64 = 2.2;

const ROCKET_TRAIL_LEN: usize = 12;

/// Live particle count below which a bursting entity starts fading.
const FADING_THRESHOLD: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Ascending,
    Bursting,
    Fading,
    Finished,
}

#[derive(Clone, Debug)]
struct RocketState {
    position: Point,
    vertical_velocity: f64,
    horizontal_velocity: f64,
    wobble_phase: f64,
    trail: VecDeque<Point>,
}

/// One rocket-then-burst-then-fade lifecycle. Created when the timeline
/// fires a due event; pruned from the live set once `Finished`.
#[derive(Debug)]
pub struct FireworkEntity {
    event_id: u64,
    firework_type: FireworkType,
    burst_cfg: BurstConfig,
    burst_altitude: f64,
    phase: Phase,
    phase_elapsed_ms: f64,
    rocket: RocketState,
    particles: Vec<ParticleModel>,
    secondary_burst_fired: bool,
    split_fired: bool,
}

impl FireworkEntity {
    /// Spawns the rocket at the launch position and signals the launch side
    /// effects (sound + smoke) through the context.
    pub fn launch(event: &LaunchEvent, position: Point, ctx: &mut SimulationContext) -> Self {
        let mut rng = rand::thread_rng();
        ctx.play_sound(SoundCue::Launch, 0.5);
        ctx.launch_smoke(position);

        Self {
            event_id: event.id,
            firework_type: event.firework_type,
            burst_cfg: BurstConfig {
                center: position,
                size: event.size,
                primary: event.primary_color,
                secondary: event.secondary_color,
                trail_multiplier: event.trail.length_multiplier(),
            },
            burst_altitude: event.height.burst_altitude(),
            phase: Phase::Ascending,
            phase_elapsed_ms: 0.0,
            rocket: RocketState {
                position,
                vertical_velocity: -event.height.launch_speed(),
                horizontal_velocity: 0.0,
                wobble_phase: rng.gen_range(0.0..TAU),
                trail: VecDeque::with_capacity(ROCKET_TRAIL_LEN),
            },
            particles: Vec::new(),
            secondary_burst_fired: false,
            split_fired: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn event_id(&self) -> u64 {
        self.event_id
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn rocket_position(&self) -> Option<Point> {
        (self.phase == Phase::Ascending).then_some(self.rocket.position)
    }

    fn descriptor(&self) -> &'static FireworkTypeDescriptor {
        self.firework_type.descriptor()
    }

    pub fn advance(&mut self, dt: f64, ctx: &mut SimulationContext) {
        self.phase_elapsed_ms += dt * 1000.0;
        match self.phase {
            Phase::Ascending => self.advance_ascending(dt, ctx),
            Phase::Bursting => self.advance_bursting(dt, ctx),
            Phase::Fading => self.advance_fading(dt, ctx),
            Phase::Finished => {}
        }
    }

    fn advance_ascending(&mut self, dt: f64, ctx: &mut SimulationContext) {
        let rocket = &mut self.rocket;
        rocket.trail.push_back(rocket.position);
        while rocket.trail.len() > ROCKET_TRAIL_LEN {
            rocket.trail.pop_front();
        }

        rocket.vertical_velocity += ROCKET_GRAVITY * dt;
        rocket.horizontal_velocity += ctx.wind_force() * ROCKET_WIND_FACTOR * dt;

        let t = self.phase_elapsed_ms / 1000.0;
        let wobble = WOBBLE_AMPLITUDE * (t * WOBBLE_HZ * TAU + rocket.wobble_phase).sin();
        rocket.position.x += (rocket.horizontal_velocity + wobble) * dt;
        rocket.position.y += rocket.vertical_velocity * dt;

        // Apex reached or overshoot: burst exactly once.
        if rocket.position.y <= self.burst_altitude || rocket.vertical_velocity >= 0.0 {
            self.burst(ctx);
        }
    }

    fn burst(&mut self, ctx: &mut SimulationContext) {
        self.burst_cfg.center = self.rocket.position;
        self.particles = BurstPatternGenerator::generate(self.descriptor(), &self.burst_cfg);

        let (volume, intensity, cheer) = match self.burst_cfg.size {
            SizeClass::Small => (0.5, 0.6, None),
            SizeClass::Medium => (0.7, 1.0, Some(CheerSize::Medium)),
            SizeClass::Large => (1.0, 1.6, Some(CheerSize::Large)),
        };
        ctx.play_sound(SoundCue::Burst, volume);
        ctx.burst_smoke(self.rocket.position, intensity, self.burst_cfg.primary);
        if let Some(size) = cheer {
            ctx.crowd_cheer(size);
        }

        tracing::debug!(
            event_id = self.event_id,
            firework_type = self.firework_type.name(),
            particles = self.particles.len(),
            "burst"
        );
        self.transition(Phase::Bursting);
    }

    fn advance_bursting(&mut self, dt: f64, ctx: &mut SimulationContext) {
        let wind = ctx.wind_force();
        self.particles.retain_mut(|p| p.advance(dt, wind));

        if let Some(sb) = self.descriptor().secondary_burst {
            if !self.secondary_burst_fired && self.phase_elapsed_ms >= sb.delay_ms {
                self.fire_secondary_burst(sb.count, ctx);
                self.secondary_burst_fired = true;
            }
        }
        if let Some(split) = self.descriptor().split {
            if !self.split_fired && self.phase_elapsed_ms >= split.delay_ms {
                self.fire_split(split.count);
                self.split_fired = true;
            }
        }

        if self.particles.len() < FADING_THRESHOLD {
            self.transition(Phase::Fading);
        }
    }

    /// Crackle: a random selection of live particles (capped at 30% of the
    /// current count) each pop into small sparks at their current position,
    /// not the burst center.
    fn fire_secondary_burst(&mut self, count: usize, ctx: &mut SimulationContext) {
        let live = self.particles.len();
        let donors = count.min((live as f64 * 0.3).floor() as usize);
        if donors == 0 {
            return;
        }

        let mut rng = rand::thread_rng();
        let picks = rand::seq::index::sample(&mut rng, live, donors);
        let mut sparks = Vec::with_capacity(donors * 8);
        for i in picks {
            let donor = &self.particles[i];
            sparks.extend(BurstPatternGenerator::crackle_sparks(
                donor.position,
                donor.props().start_color,
            ));
        }
        self.particles.extend(sparks);
        ctx.play_sound(SoundCue::Crackle, 0.4);
    }

    /// Split: roughly 60% of live particles each shed child particles that
    /// keep a fraction of the parent velocity plus a radial kick.
    fn fire_split(&mut self, children_per_parent: usize) {
        let live = self.particles.len();
        let parents = (live as f64 * 0.6).floor() as usize;
        if parents == 0 {
            return;
        }

        let mut rng = rand::thread_rng();
        let picks = rand::seq::index::sample(&mut rng, live, parents);
        let mut children = Vec::with_capacity(parents * children_per_parent);
        for i in picks {
            let parent = &self.particles[i];
            children.extend(BurstPatternGenerator::split_children(
                parent,
                children_per_parent,
                parent.props().start_color,
                self.burst_cfg.trail_multiplier,
            ));
        }
        self.particles.extend(children);
    }

    fn advance_fading(&mut self, dt: f64, ctx: &mut SimulationContext) {
        let wind = ctx.wind_force();
        self.particles.retain_mut(|p| p.advance(dt, wind));

        if self.particles.is_empty() || self.phase_elapsed_ms >= FADE_TIMEOUT_MS {
            self.particles.clear();
            self.transition(Phase::Finished);
        }
    }

    fn transition(&mut self, next: Phase) {
        tracing::debug!(event_id = self.event_id, from = ?self.phase, to = ?next, "phase");
        self.phase = next;
        self.phase_elapsed_ms = 0.0;
    }

    /// Current frame contribution: the rocket while ascending, the particle
    /// set afterwards.
    pub fn render(&self) -> EntityFrame {
        match self.phase {
            Phase::Ascending => EntityFrame {
                rocket: Some(RenderedRocket {
                    position: self.rocket.position,
                    trail: self.rocket.trail.iter().copied().collect(),
                    color: self.burst_cfg.primary,
                }),
                particles: Vec::new(),
            },
            _ => EntityFrame {
                rocket: None,
                particles: self.particles.iter().map(ParticleModel::render).collect(),
            },
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderedRocket {
    pub position: Point,
    pub trail: Vec<Point>,
    pub color: Color,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct EntityFrame {
    pub rocket: Option<RenderedRocket>,
    pub particles: Vec<RenderedParticle>,
}
