use std::f64::consts::TAU;

use rand::Rng;

use crate::core::{Color, ParticleShape, Point, SizeClass, Vec2};
use crate::descriptor::{CustomPattern, FireworkTypeDescriptor};
use crate::particle::{ParticleModel, ParticleProps};

/// Palette used by `force_gold` types regardless of the event's colors.
pub const GOLD_SILVER_PALETTE: [Color; 6] = [
    Color::new(0xff, 0xd7, 0x00),
    Color::new(0xff, 0xdf, 0x80),
    Color::new(0xff, 0xc0, 0x4d),
    Color::new(0xf5, 0xf5, 0xdc),
    Color::new(0xe6, 0xe6, 0xe6),
    Color::new(0xff, 0xf8, 0xb0),
];

/// Everything a burst needs besides the descriptor statics: where, how big,
/// which colors, and how long the trails run.
#[derive(Clone, Copy, Debug)]
pub struct BurstConfig {
    pub center: Point,
    pub size: SizeClass,
    pub primary: Color,
    pub secondary: Color,
    pub trail_multiplier: f64,
}

pub struct BurstPatternGenerator;

impl BurstPatternGenerator {
    /// Produces the initial particle set for one burst. Custom topologies
    /// (heart, saturn) bypass the default angle loop entirely.
    pub fn generate(desc: &FireworkTypeDescriptor, cfg: &BurstConfig) -> Vec<ParticleModel> {
        match desc.custom_pattern {
            Some(CustomPattern::Heart) => heart_pattern(desc, cfg),
            Some(CustomPattern::Saturn) => saturn_pattern(desc, cfg),
            None => radial_pattern(desc, cfg),
        }
    }

    /// Eight small sparks radiating from a crackle point. Used by the
    /// delayed secondary-burst effect, which pops sub-explosions at the
    /// current positions of selected particles.
    pub fn crackle_sparks(position: Point, color: Color) -> Vec<ParticleModel> {
        let mut rng = rand::thread_rng();
        let rot = rng.gen_range(0.0..TAU);
        let n = 8;
        (0..n)
            .map(|i| {
                let angle = rot + TAU * i as f64 / n as f64;
                let speed = rng.gen_range(40.0..90.0);
                let props = ParticleProps {
                    gravity: 120.0,
                    drag: 0.97,
                    lifetime_ms: rng.gen_range(300.0..600.0),
                    start_color: color,
                    end_color: ember(color),
                    start_size: 1.5,
                    end_size: 0.2,
                    shape: ParticleShape::Spark,
                    trail_capacity: 0,
                    twinkle: false,
                    strobe_hz: None,
                };
                ParticleModel::new(position, direction(angle) * speed, props)
            })
            .collect()
    }

    /// Children shed by a splitting particle: 30% of the parent's current
    /// velocity blended with a fresh radial kick.
    pub fn split_children(
        parent: &ParticleModel,
        count: usize,
        color: Color,
        trail_multiplier: f64,
    ) -> Vec<ParticleModel> {
        let mut rng = rand::thread_rng();
        (0..count)
            .map(|_| {
                let kick = direction(rng.gen_range(0.0..TAU)) * rng.gen_range(60.0..140.0);
                let velocity = parent.velocity * 0.3 + kick;
                let props = ParticleProps {
                    gravity: 150.0,
                    drag: 0.98,
                    lifetime_ms: rng.gen_range(500.0..900.0),
                    start_color: color,
                    end_color: ember(color),
                    start_size: 2.0,
                    end_size: 0.3,
                    shape: parent.props().shape,
                    trail_capacity: (4.0 * trail_multiplier).round() as usize,
                    twinkle: false,
                    strobe_hz: None,
                };
                ParticleModel::new(parent.position, velocity, props)
            })
            .collect()
    }
}

/// Unit direction for an angle measured clockwise from straight up (screen
/// coordinates, y grows downward).
fn direction(angle: f64) -> Vec2 {
    Vec2::new(angle.sin(), -angle.cos())
}

fn ember(c: Color) -> Color {
    Color::lerp(c, Color::new(40, 24, 8), 0.8)
}

fn pick_color(rng: &mut impl Rng, desc: &FireworkTypeDescriptor, cfg: &BurstConfig) -> Color {
    if desc.force_gold {
        GOLD_SILVER_PALETTE[rng.gen_range(0..GOLD_SILVER_PALETTE.len())]
    } else if rng.gen_bool(0.7) {
        cfg.primary
    } else {
        cfg.secondary
    }
}

fn burst_speed(rng: &mut impl Rng, desc: &FireworkTypeDescriptor, size: SizeClass) -> f64 {
    let base = if desc.uniform_speed || desc.speed.0 >= desc.speed.1 {
        (desc.speed.0 + desc.speed.1) / 2.0
    } else {
        rng.gen_range(desc.speed.0..desc.speed.1)
    };
    base * size.speed_multiplier()
}

fn particle_props(
    rng: &mut impl Rng,
    desc: &FireworkTypeDescriptor,
    cfg: &BurstConfig,
    start_color: Color,
) -> ParticleProps {
    let lifetime_ms = if desc.lifetime_ms.0 >= desc.lifetime_ms.1 {
        desc.lifetime_ms.0
    } else {
        rng.gen_range(desc.lifetime_ms.0..desc.lifetime_ms.1)
    };
    ParticleProps {
        gravity: desc.gravity,
        drag: desc.drag,
        lifetime_ms,
        start_color,
        end_color: ember(start_color),
        start_size: desc.start_size,
        end_size: desc.end_size,
        shape: desc.shape,
        trail_capacity: (desc.trail_length as f64 * cfg.trail_multiplier).round() as usize,
        twinkle: desc.twinkle,
        strobe_hz: desc.strobe_hz,
    }
}

/// Default algorithm: evenly spaced angles around the full circle (with one
/// random whole-pattern rotation), or random angles within a partial spread
/// around its offset.
fn radial_pattern(desc: &FireworkTypeDescriptor, cfg: &BurstConfig) -> Vec<ParticleModel> {
    let mut rng = rand::thread_rng();
    let n = desc.counts.resolve(cfg.size);
    let full_circle = desc.spread_deg >= 360.0;
    let rotation = rng.gen_range(0.0..TAU);

    (0..n)
        .map(|i| {
            let angle = if full_circle {
                rotation + TAU * i as f64 / n as f64
            } else {
                let half = desc.spread_deg / 2.0;
                (desc.spread_offset_deg + rng.gen_range(-half..half)).to_radians()
            };
            let speed = burst_speed(&mut rng, desc, cfg.size);
            let color = pick_color(&mut rng, desc, cfg);
            let props = particle_props(&mut rng, desc, cfg, color);
            ParticleModel::new(cfg.center, direction(angle) * speed, props)
        })
        .collect()
}

/// Parametric heart curve; `HEART_MAX_RADIUS` is the curve's outermost
/// radius, so speeds scale into the descriptor's range.
const HEART_MAX_RADIUS: f64 = 17.0;

fn heart_pattern(desc: &FireworkTypeDescriptor, cfg: &BurstConfig) -> Vec<ParticleModel> {
    let mut rng = rand::thread_rng();
    let n = desc.counts.resolve(cfg.size);
    let base_speed = (desc.speed.0 + desc.speed.1) / 2.0 * cfg.size.speed_multiplier();

    (0..n)
        .map(|i| {
            let t = TAU * i as f64 / n as f64;
            // Classic sixteenth-power heart, y up.
            let x = 16.0 * t.sin().powi(3);
            let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();

            // Polar form of the curve point: radius scales into a speed.
            let radius = x.hypot(y);
            let angle = x.atan2(y);
            let speed = base_speed * radius / HEART_MAX_RADIUS;

            let color = pick_color(&mut rng, desc, cfg);
            let props = particle_props(&mut rng, desc, cfg, color);
            ParticleModel::new(cfg.center, direction(angle) * speed, props)
        })
        .collect()
}

/// Ring particles keep only 30% of their vertical velocity, fall under a
/// much weaker gravity and carry the secondary color; the remaining 60% form
/// a standard radial core.
const SATURN_RING_SHARE: f64 = 0.4;
const SATURN_RING_GRAVITY: f64 = 40.0;

fn saturn_pattern(desc: &FireworkTypeDescriptor, cfg: &BurstConfig) -> Vec<ParticleModel> {
    let mut rng = rand::thread_rng();
    let n = desc.counts.resolve(cfg.size);
    let ring_n = (SATURN_RING_SHARE * n as f64).floor() as usize;
    let mut particles = Vec::with_capacity(n);

    let rotation = rng.gen_range(0.0..TAU);
    let ring_speed = (desc.speed.0 + desc.speed.1) / 2.0 * cfg.size.speed_multiplier();
    for i in 0..ring_n {
        let angle = rotation + TAU * i as f64 / ring_n.max(1) as f64;
        let mut velocity = direction(angle) * ring_speed;
        velocity.y *= 0.3;

        let mut props = particle_props(&mut rng, desc, cfg, cfg.secondary);
        props.gravity = SATURN_RING_GRAVITY;
        props.shape = ParticleShape::Ring;
        particles.push(ParticleModel::new(cfg.center, velocity, props));
    }

    let core_rotation = rng.gen_range(0.0..TAU);
    let core_n = n - ring_n;
    for i in 0..core_n {
        let angle = core_rotation + TAU * i as f64 / core_n.max(1) as f64;
        let speed = burst_speed(&mut rng, desc, cfg.size);
        let color = if rng.gen_bool(0.7) {
            cfg.primary
        } else {
            cfg.secondary
        };
        let props = particle_props(&mut rng, desc, cfg, color);
        particles.push(ParticleModel::new(cfg.center, direction(angle) * speed, props));
    }

    particles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FireworkType;

    fn cfg(size: SizeClass) -> BurstConfig {
        BurstConfig {
            center: Point::new(400.0, 200.0),
            size,
            primary: Color::new(255, 64, 64),
            secondary: Color::new(64, 64, 255),
            trail_multiplier: 1.0,
        }
    }

    fn angle_from_up(v: Vec2) -> f64 {
        let a = v.x.atan2(-v.y);
        if a < 0.0 { a + TAU } else { a }
    }

    #[test]
    fn counts_follow_size_class() {
        let desc = FireworkType::Chrysanthemum.descriptor();
        for size in SizeClass::ALL {
            let got = BurstPatternGenerator::generate(desc, &cfg(size)).len();
            assert_eq!(got, desc.counts.resolve(size));
        }
    }

    #[test]
    fn full_circle_has_no_angular_gap() {
        // Ring is uniform-speed and full-spread, the uniformity reference.
        let desc = FireworkType::Ring.descriptor();
        let particles = BurstPatternGenerator::generate(desc, &cfg(SizeClass::Medium));
        let n = particles.len();

        let mut angles: Vec<f64> = particles
            .iter()
            .map(|p| angle_from_up(p.velocity))
            .collect();
        angles.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let bound = TAU / n as f64 * 1.001;
        for w in angles.windows(2) {
            assert!(w[1] - w[0] <= bound, "gap {} exceeds {}", w[1] - w[0], bound);
        }
        let wrap = angles[0] + TAU - angles[n - 1];
        assert!(wrap <= bound);
    }

    #[test]
    fn uniform_speed_uses_midpoint() {
        let desc = FireworkType::Ring.descriptor();
        let expected = (desc.speed.0 + desc.speed.1) / 2.0;
        for p in BurstPatternGenerator::generate(desc, &cfg(SizeClass::Medium)) {
            assert!((p.velocity.hypot() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn partial_spread_stays_within_bounds() {
        let desc = FireworkType::Palm.descriptor();
        let half = (desc.spread_deg / 2.0).to_radians();
        for p in BurstPatternGenerator::generate(desc, &cfg(SizeClass::Medium)) {
            let a = p.velocity.x.atan2(-p.velocity.y);
            assert!(a.abs() <= half + 1e-9, "angle {a} outside ±{half}");
        }
    }

    #[test]
    fn saturn_ring_share_is_floored() {
        let desc = FireworkType::Saturn.descriptor();
        for size in SizeClass::ALL {
            let n = desc.counts.resolve(size);
            let particles = BurstPatternGenerator::generate(desc, &cfg(size));
            let rings = particles
                .iter()
                .filter(|p| p.props().shape == ParticleShape::Ring)
                .count();
            assert_eq!(rings, (0.4 * n as f64).floor() as usize);
            assert_eq!(particles.len(), n);
        }
    }

    #[test]
    fn saturn_ring_is_flattened_and_recolored() {
        let desc = FireworkType::Saturn.descriptor();
        let config = cfg(SizeClass::Medium);
        for p in BurstPatternGenerator::generate(desc, &config) {
            if p.props().shape == ParticleShape::Ring {
                assert_eq!(p.props().start_color, config.secondary);
                assert_eq!(p.props().gravity, SATURN_RING_GRAVITY);
            } else {
                assert_eq!(p.props().gravity, desc.gravity);
            }
        }
    }

    #[test]
    fn force_gold_ignores_event_colors() {
        let desc = FireworkType::Willow.descriptor();
        for p in BurstPatternGenerator::generate(desc, &cfg(SizeClass::Medium)) {
            assert!(GOLD_SILVER_PALETTE.contains(&p.props().start_color));
        }
    }

    #[test]
    fn heart_produces_full_count_with_varied_speeds() {
        let desc = FireworkType::Heart.descriptor();
        let particles = BurstPatternGenerator::generate(desc, &cfg(SizeClass::Medium));
        assert_eq!(particles.len(), desc.counts.resolve(SizeClass::Medium));

        let speeds: Vec<f64> = particles.iter().map(|p| p.velocity.hypot()).collect();
        let min = speeds.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = speeds.iter().cloned().fold(0.0, f64::max);
        // The lobes reach much further out than the cusp.
        assert!(max > min * 2.0);
    }

    #[test]
    fn crackle_spawns_eight_sparks() {
        let sparks =
            BurstPatternGenerator::crackle_sparks(Point::new(10.0, 10.0), Color::WHITE);
        assert_eq!(sparks.len(), 8);
        for s in &sparks {
            assert_eq!(s.position, Point::new(10.0, 10.0));
            assert!(s.lifetime_ms() < 600.0 + 1e-9);
        }
    }

    #[test]
    fn split_children_blend_parent_velocity() {
        let props = ParticleProps {
            gravity: 100.0,
            drag: 1.0,
            lifetime_ms: 1000.0,
            start_color: Color::WHITE,
            end_color: Color::WHITE,
            start_size: 3.0,
            end_size: 1.0,
            shape: ParticleShape::Circle,
            trail_capacity: 0,
            twinkle: false,
            strobe_hz: None,
        };
        let parent = ParticleModel::new(Point::ZERO, Vec2::new(200.0, 0.0), props);
        let children =
            BurstPatternGenerator::split_children(&parent, 4, Color::WHITE, 1.0);
        assert_eq!(children.len(), 4);
        for c in &children {
            // 30% of parent vx = 60, kick magnitude ≤ 140.
            assert!(c.velocity.x > 60.0 - 140.0 - 1e-9);
            assert!(c.velocity.x < 60.0 + 140.0 + 1e-9);
        }
    }
}
