//! Combat system: cooldown-gated targeting, damage, knockback and knockouts.
//!
//! Attackers are visited in roster order. An off-cooldown fighter makes one
//! independent hit-chance draw per tick; on success it picks the nearest
//! other alive fighter and lands a hit if that target is within range.
//! Nearest-target ties go to the lower roster index.

use glam::DVec2;
use hecs::{Entity, World};
use rand::Rng;
use tracing::{debug, trace};

use skirmish_core::components::{AttackCooldown, Combatant, Health, Vitality};
use skirmish_core::config::SimulationConfig;
use skirmish_core::constants::{
    ATTACK_COOLDOWN, ATTACK_RANGE_SQ, KNOCKBACK_DISTANCE, KNOCKBACK_EPSILON,
};
use skirmish_core::enums::OutOfRangePolicy;
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{Position, Rect};

use crate::store::ImpactMarker;

/// Run the combat system for one tick.
pub fn run<R: Rng + ?Sized>(
    world: &mut World,
    roster: &[Entity],
    impacts: &mut Vec<ImpactMarker>,
    interior: &Rect,
    config: &SimulationConfig,
    rng: &mut R,
    events: &mut Vec<CombatEvent>,
) {
    let mut alive = roster
        .iter()
        .filter(|&&e| world.get::<&Vitality>(e).map(|v| v.alive).unwrap_or(false))
        .count();
    let hit_probability = config.hit_probability();

    for &attacker in roster {
        if alive < 2 {
            break;
        }

        let (attacker_index, attacker_pos) = match world
            .query_one_mut::<(&Combatant, &Position, &Vitality, &AttackCooldown)>(attacker)
        {
            Ok((combatant, pos, vitality, cooldown)) => {
                if !vitality.alive || cooldown.remaining_secs > 0.0 {
                    continue;
                }
                (combatant.index, *pos)
            }
            Err(_) => continue,
        };

        if !rng.gen_bool(hit_probability) {
            continue;
        }

        let Some((target, distance_sq)) = nearest_target(world, roster, attacker, &attacker_pos)
        else {
            continue;
        };

        if distance_sq >= ATTACK_RANGE_SQ {
            if config.out_of_range == OutOfRangePolicy::ConsumeCooldown {
                set_cooldown(world, attacker, ATTACK_COOLDOWN);
            }
            continue;
        }

        let damage = roll_damage(rng, config);
        set_cooldown(world, attacker, ATTACK_COOLDOWN);

        let Ok((combatant, pos, health, vitality)) = world
            .query_one_mut::<(&Combatant, &mut Position, &mut Health, &mut Vitality)>(target)
        else {
            continue;
        };

        health.current = (health.current - damage).max(0.0);
        *pos = interior.clamp(knockback(&attacker_pos, pos));
        let knocked_out = health.current <= 0.0;
        if knocked_out {
            vitality.alive = false;
        }
        let target_index = combatant.index;
        let target_health = health.current;

        impacts.push(ImpactMarker {
            position: *pos,
            age_secs: 0.0,
        });

        trace!(
            attacker = attacker_index,
            target = target_index,
            damage,
            target_health,
            "Hit"
        );
        events.push(CombatEvent::Hit {
            attacker: attacker_index,
            target: target_index,
            damage,
            target_health,
        });

        if knocked_out {
            alive -= 1;
            debug!(
                fighter = target_index,
                by = attacker_index,
                remaining = alive,
                "Fighter knocked out"
            );
            events.push(CombatEvent::Knockout {
                fighter: target_index,
                by: attacker_index,
            });
        }
    }
}

/// Nearest other alive fighter to `from`, with its squared distance.
/// Scans in roster order; the first candidate wins a tie.
pub fn nearest_target(
    world: &World,
    roster: &[Entity],
    attacker: Entity,
    from: &Position,
) -> Option<(Entity, f64)> {
    let mut best: Option<(Entity, f64)> = None;

    for &candidate in roster {
        if candidate == attacker {
            continue;
        }
        let Ok(mut query) = world.query_one::<(&Position, &Vitality)>(candidate) else {
            continue;
        };
        let Some((pos, vitality)) = query.get() else {
            continue;
        };
        if !vitality.alive {
            continue;
        }

        let distance_sq = from.distance_sq_to(pos);
        if best.map_or(true, |(_, closest)| distance_sq < closest) {
            best = Some((candidate, distance_sq));
        }
    }

    best
}

/// Push `target` `KNOCKBACK_DISTANCE` units directly away from `from`.
/// Coincident positions produce no displacement.
pub fn knockback(from: &Position, target: &Position) -> Position {
    let separation = DVec2::from(*target) - DVec2::from(*from);
    let direction = separation / separation.length().max(KNOCKBACK_EPSILON);
    (DVec2::from(*target) + direction * KNOCKBACK_DISTANCE).into()
}

/// Sample damage uniformly from the configured range.
pub fn roll_damage<R: Rng + ?Sized>(rng: &mut R, config: &SimulationConfig) -> f64 {
    if config.damage_max > config.damage_min {
        rng.gen_range(config.damage_min..=config.damage_max)
    } else {
        config.damage_min
    }
}

fn set_cooldown(world: &mut World, entity: Entity, secs: f64) {
    if let Ok(mut cooldown) = world.get::<&mut AttackCooldown>(entity) {
        cooldown.remaining_secs = secs;
    }
}
