//! Kinematic integration system.
//!
//! For every alive fighter: random velocity jitter, speed clamp,
//! semi-implicit Euler step, reflective wall collision and cooldown decay.
//! Knocked-out fighters are frozen in place.

use glam::DVec2;
use hecs::World;
use rand::Rng;

use skirmish_core::components::{AttackCooldown, Vitality};
use skirmish_core::constants::{FLOOR_SPEED, JITTER};
use skirmish_core::types::{Position, Rect, Velocity};

/// Speed cap for a configured average speed. Never below `FLOOR_SPEED`.
pub fn speed_cap(configured_speed: f64) -> f64 {
    configured_speed.max(FLOOR_SPEED)
}

/// Run one integration step of `dt` seconds.
///
/// `combat_live` is false once fewer than two fighters remain; attack
/// cooldowns stop counting down at that point.
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    interior: &Rect,
    configured_speed: f64,
    dt: f64,
    combat_live: bool,
) {
    let max_speed = speed_cap(configured_speed);

    for (_entity, (pos, vel, cooldown, vitality)) in world.query_mut::<(
        &mut Position,
        &mut Velocity,
        &mut AttackCooldown,
        &Vitality,
    )>() {
        if !vitality.alive {
            continue;
        }

        let jitter = DVec2::new(rng.gen_range(-JITTER..=JITTER), rng.gen_range(-JITTER..=JITTER));
        let v = clamp_speed(DVec2::from(*vel) + jitter * dt, max_speed);
        let p = DVec2::from(*pos) + v * dt;

        let (p, v) = reflect(p, v, interior);
        *pos = p.into();
        *vel = v.into();

        if combat_live {
            cooldown.remaining_secs = (cooldown.remaining_secs - dt).max(0.0);
        }
    }
}

/// Scale `v` down to `max_speed` if it is faster.
pub fn clamp_speed(v: DVec2, max_speed: f64) -> DVec2 {
    let speed = v.length();
    if speed > max_speed {
        v * (max_speed / speed)
    } else {
        v
    }
}

/// Per-axis wall collision: an axis that left the interior is clamped to the
/// wall and its velocity component negated.
pub fn reflect(mut p: DVec2, mut v: DVec2, interior: &Rect) -> (DVec2, DVec2) {
    if p.x < interior.min.x || p.x > interior.max.x {
        p.x = p.x.clamp(interior.min.x, interior.max.x);
        v.x = -v.x;
    }
    if p.y < interior.min.y || p.y > interior.max.y {
        p.y = p.y.clamp(interior.min.y, interior.max.y);
        v.y = -v.y;
    }
    (p, v)
}
