//! Tests for the entity store, tick systems and simulation engine.

use std::collections::HashSet;

use hecs::World;

use skirmish_core::components::Vitality;
use skirmish_core::config::{ConfigError, SimulationConfig};
use skirmish_core::constants::*;
use skirmish_core::enums::{LifePhase, OutOfRangePolicy};
use skirmish_core::events::CombatEvent;
use skirmish_core::types::{ArenaBounds, AvatarHandle, Position, Velocity};

use crate::engine::{EngineConfig, SimulationEngine};
use crate::store::ImpactMarker;
use crate::systems::{combat, effects, integrator, lifecycle};

fn avatars(count: u32) -> Vec<AvatarHandle> {
    (0..count).map(AvatarHandle).collect()
}

fn engine_with(simulation: SimulationConfig, avatar_count: u32, seed: u64) -> SimulationEngine {
    let config = EngineConfig {
        seed,
        simulation,
        ..Default::default()
    };
    SimulationEngine::new(config, avatars(avatar_count)).unwrap()
}

/// Two fighters at rest, `gap` units apart on a horizontal line mid-arena.
fn duel(damage: f64, gap: f64, out_of_range: OutOfRangePolicy) -> SimulationEngine {
    let mut engine = engine_with(
        SimulationConfig {
            fighter_count: 2,
            speed: 0.0,
            hit_chance_percent: 100.0,
            damage_min: damage,
            damage_max: damage,
            out_of_range,
        },
        2,
        7,
    );
    let store = engine.store_mut();
    store.place(0, Position::new(250.0 - gap / 2.0, 260.0), Velocity::default());
    store.place(1, Position::new(250.0 + gap / 2.0, 260.0), Velocity::default());
    engine
}

fn hits_in(events: &[CombatEvent]) -> Vec<(u32, u32)> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::Hit {
                attacker, target, ..
            } => Some((*attacker, *target)),
            _ => None,
        })
        .collect()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimulationConfig {
        hit_chance_percent: 40.0,
        ..Default::default()
    };
    let mut engine_a = engine_with(config.clone(), 8, 12345);
    let mut engine_b = engine_with(config, 8, 12345);

    for _ in 0..600 {
        engine_a.tick();
        engine_b.tick();
        let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
        let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = engine_with(SimulationConfig::default(), 8, 111);
    let mut engine_b = engine_with(SimulationConfig::default(), 8, 222);

    let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
    assert_ne!(json_a, json_b, "Different seeds should spawn different layouts");
}

// ---- Entity store ----

#[test]
fn test_spawn_clamps_to_available_avatars() {
    let engine = engine_with(
        SimulationConfig {
            fighter_count: 10,
            ..Default::default()
        },
        4,
        1,
    );
    assert_eq!(engine.store().len(), 4);
    for fighter in engine.store().fighters() {
        assert_eq!(fighter.avatar, AvatarHandle(fighter.index));
    }
}

#[test]
fn test_spawn_initial_state() {
    let engine = engine_with(SimulationConfig::default(), 8, 3);
    let interior = ArenaBounds::default().interior();
    let cap = integrator::speed_cap(SimulationConfig::default().speed);

    let fighters = engine.store().fighters();
    assert_eq!(fighters.len(), 8);
    for (i, fighter) in fighters.iter().enumerate() {
        assert_eq!(fighter.index, i as u32);
        assert!(fighter.alive);
        assert_eq!(fighter.health, MAX_HEALTH);
        assert_eq!(fighter.opacity, 1.0);
        assert_eq!(fighter.attack_cooldown, 0.0);
        assert_eq!(fighter.phase, LifePhase::Alive);
        assert!(interior.contains(&fighter.position));
        assert!(fighter.velocity.speed() <= cap + 1e-9);
    }
    assert!(engine.store().impacts().is_empty());
}

#[test]
fn test_no_avatars_means_empty_roster() {
    let mut engine = engine_with(SimulationConfig::default(), 0, 1);
    assert!(engine.store().is_empty());
    assert!(engine.is_settled());
    engine.tick();
    assert!(engine
        .snapshot()
        .events
        .contains(&CombatEvent::Victory { survivor: None }));
}

#[test]
fn test_reset_mid_run_restores_full_roster() {
    let mut engine = engine_with(
        SimulationConfig {
            fighter_count: 6,
            hit_chance_percent: 100.0,
            damage_min: 40.0,
            damage_max: 60.0,
            ..Default::default()
        },
        5,
        99,
    );
    for _ in 0..200_000 {
        engine.tick();
        if engine.store().alive_count() < 5 {
            break;
        }
    }
    assert!(engine.store().alive_count() < 5, "Expected casualties before reset");

    engine.reset();

    assert_eq!(engine.store().len(), 5);
    assert_eq!(engine.store().alive_count(), 5);
    assert!(engine.store().impacts().is_empty());
    assert!(engine.pending_events().is_empty());
    assert_eq!(engine.time().tick, 0);
    for fighter in engine.store().fighters() {
        assert!(fighter.alive);
        assert_eq!(fighter.health, MAX_HEALTH);
        assert_eq!(fighter.opacity, 1.0);
    }
}

// ---- Invariants over a long battle ----

#[test]
fn test_invariants_hold_every_tick() {
    let config = SimulationConfig {
        fighter_count: 10,
        speed: 80.0,
        hit_chance_percent: 50.0,
        damage_min: 10.0,
        damage_max: 40.0,
        ..Default::default()
    };
    let cap = integrator::speed_cap(config.speed);
    let mut engine = engine_with(config, 10, 2024);
    let interior = ArenaBounds::default().interior();

    let mut previous = engine.store().fighters();
    for _ in 0..6_000 {
        engine.tick();
        let current = engine.store().fighters();

        for (before, after) in previous.iter().zip(&current) {
            assert!((0.0..=MAX_HEALTH).contains(&after.health));
            assert!(interior.contains(&after.position));
            if !before.alive {
                assert!(!after.alive, "Fighter {} came back to life", after.index);
                assert!(after.opacity <= before.opacity);
                assert_eq!(after.position, before.position, "Dead fighters are frozen");
            }
            if after.alive {
                assert_eq!(after.opacity, 1.0);
                assert!(after.velocity.speed() <= cap + 1e-9);
                assert!(after.health > 0.0);
            } else {
                assert_eq!(after.health, 0.0);
            }
        }
        previous = current;
    }
}

#[test]
fn test_targets_are_never_self_or_dead() {
    let mut engine = engine_with(
        SimulationConfig {
            fighter_count: 12,
            hit_chance_percent: 60.0,
            damage_min: 20.0,
            damage_max: 50.0,
            ..Default::default()
        },
        12,
        5,
    );

    let mut total_hits = 0;
    for _ in 0..10_000 {
        let alive_before: HashSet<u32> = engine
            .store()
            .fighters()
            .iter()
            .filter(|f| f.alive)
            .map(|f| f.index)
            .collect();
        engine.tick();
        let snapshot = engine.snapshot();
        for (attacker, target) in hits_in(&snapshot.events) {
            total_hits += 1;
            assert_ne!(attacker, target);
            assert!(alive_before.contains(&attacker));
            assert!(alive_before.contains(&target));
        }
        if snapshot.alive_count < 2 {
            break;
        }
    }
    assert!(total_hits > 0, "Battle produced no hits");
}

// ---- Integrator ----

#[test]
fn test_clamp_speed() {
    let v = integrator::clamp_speed(glam::DVec2::new(30.0, 40.0), 10.0);
    assert!((v.length() - 10.0).abs() < 1e-12);
    assert!((v.x / v.y - 0.75).abs() < 1e-12);

    let slow = glam::DVec2::new(1.0, 1.0);
    assert_eq!(integrator::clamp_speed(slow, 10.0), slow);
}

#[test]
fn test_speed_cap_has_floor() {
    assert_eq!(integrator::speed_cap(0.0), FLOOR_SPEED);
    assert_eq!(integrator::speed_cap(120.0), 120.0);
}

#[test]
fn test_wall_reflection() {
    let interior = ArenaBounds::default().interior();
    let (p, v) = integrator::reflect(
        glam::DVec2::new(interior.max.x + 5.0, 200.0),
        glam::DVec2::new(12.0, -3.0),
        &interior,
    );
    assert_eq!(p.x, interior.max.x);
    assert_eq!(p.y, 200.0);
    assert_eq!(v, glam::DVec2::new(-12.0, -3.0));

    let (p, v) = integrator::reflect(
        glam::DVec2::new(interior.min.x - 1.0, interior.min.y - 1.0),
        glam::DVec2::new(-4.0, -4.0),
        &interior,
    );
    assert_eq!(p, glam::DVec2::new(interior.min.x, interior.min.y));
    assert_eq!(v, glam::DVec2::new(4.0, 4.0));
}

// ---- Combat ----

#[test]
fn test_nearest_target_skips_self_and_dead() {
    let mut world = World::new();
    let alive = Vitality {
        alive: true,
        opacity: 1.0,
    };
    let dead = Vitality {
        alive: false,
        opacity: 0.5,
    };
    let attacker = world.spawn((Position::new(0.0, 0.0), alive));
    let corpse = world.spawn((Position::new(1.0, 0.0), dead));
    let far = world.spawn((Position::new(50.0, 0.0), alive));
    let near = world.spawn((Position::new(0.0, 10.0), alive));
    let roster = [attacker, corpse, far, near];

    let (target, distance_sq) =
        combat::nearest_target(&world, &roster, attacker, &Position::new(0.0, 0.0)).unwrap();
    assert_eq!(target, near);
    assert_eq!(distance_sq, 100.0);

    let lonely = [attacker, corpse];
    assert!(combat::nearest_target(&world, &lonely, attacker, &Position::new(0.0, 0.0)).is_none());
}

#[test]
fn test_nearest_target_tie_goes_to_first_in_roster() {
    let mut world = World::new();
    let alive = Vitality {
        alive: true,
        opacity: 1.0,
    };
    let attacker = world.spawn((Position::new(0.0, 0.0), alive));
    let left = world.spawn((Position::new(-5.0, 0.0), alive));
    let right = world.spawn((Position::new(5.0, 0.0), alive));

    let (target, _) =
        combat::nearest_target(&world, &[attacker, left, right], attacker, &Position::new(0.0, 0.0))
            .unwrap();
    assert_eq!(target, left);
    let (target, _) =
        combat::nearest_target(&world, &[attacker, right, left], attacker, &Position::new(0.0, 0.0))
            .unwrap();
    assert_eq!(target, right);
}

#[test]
fn test_knockback_pushes_directly_away() {
    let pushed = combat::knockback(&Position::new(0.0, 0.0), &Position::new(3.0, 4.0));
    assert!((pushed.x - (3.0 + 0.6 * KNOCKBACK_DISTANCE)).abs() < 1e-9);
    assert!((pushed.y - (4.0 + 0.8 * KNOCKBACK_DISTANCE)).abs() < 1e-9);
}

#[test]
fn test_knockback_zero_distance_is_guarded() {
    let p = Position::new(100.0, 100.0);
    let pushed = combat::knockback(&p, &p);
    assert!(pushed.x.is_finite() && pushed.y.is_finite());
    assert_eq!(pushed, p);
}

#[test]
fn test_exchange_of_blows_in_range() {
    let mut engine = duel(10.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();

    let a = engine.store().fighter(0).unwrap();
    let b = engine.store().fighter(1).unwrap();
    // Roster order: 0 strikes first, then 1 strikes back in the same tick.
    assert_eq!(a.health, 90.0);
    assert_eq!(b.health, 90.0);
    assert_eq!(a.attack_cooldown, ATTACK_COOLDOWN);
    assert_eq!(b.attack_cooldown, ATTACK_COOLDOWN);

    // Each was pushed 8 units apart; jitter at rest moves less than 0.01.
    let gap = a.position.distance_to(&b.position);
    assert!((gap - (100.0 + 2.0 * KNOCKBACK_DISTANCE)).abs() < 0.1, "gap = {gap}");

    assert_eq!(engine.store().impacts().len(), 2);
    let snapshot = engine.snapshot();
    assert_eq!(hits_in(&snapshot.events), vec![(0, 1), (1, 0)]);
    assert_eq!(snapshot.impacts.len(), 2);
    assert!(snapshot.impacts.iter().all(|i| i.intensity > 0.9));
}

#[test]
fn test_cooldown_gates_next_attack() {
    let mut engine = duel(1.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();
    engine.snapshot();

    // 0.35 s at 60 Hz is 21 ticks; nobody may attack before then.
    for _ in 0..19 {
        engine.tick();
        assert!(hits_in(&engine.snapshot().events).is_empty());
    }
    let mut resumed = false;
    for _ in 0..4 {
        engine.tick();
        resumed |= !hits_in(&engine.snapshot().events).is_empty();
    }
    assert!(resumed, "Attacks should resume once the cooldown expires");
}

#[test]
fn test_out_of_range_attempt_is_dropped_without_cooldown() {
    let mut engine = duel(10.0, 300.0, OutOfRangePolicy::Drop);
    engine.tick();

    for fighter in engine.store().fighters() {
        assert_eq!(fighter.health, MAX_HEALTH);
        assert_eq!(fighter.attack_cooldown, 0.0);
    }
    assert!(engine.store().impacts().is_empty());
    assert!(hits_in(engine.pending_events()).is_empty());
}

#[test]
fn test_out_of_range_attempt_can_consume_cooldown() {
    let mut engine = duel(10.0, 300.0, OutOfRangePolicy::ConsumeCooldown);
    engine.tick();

    for fighter in engine.store().fighters() {
        assert_eq!(fighter.health, MAX_HEALTH);
        assert_eq!(fighter.attack_cooldown, ATTACK_COOLDOWN);
    }
    assert!(engine.store().impacts().is_empty());
}

#[test]
fn test_lethal_hit_clamps_health_and_ends_combat() {
    let mut engine = duel(150.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();

    let winner = engine.store().fighter(0).unwrap();
    let loser = engine.store().fighter(1).unwrap();
    assert_eq!(loser.health, 0.0);
    assert!(!loser.alive);
    assert_eq!(loser.phase, LifePhase::Dying);
    // The loser never got its turn.
    assert_eq!(winner.health, MAX_HEALTH);
    assert_eq!(engine.survivor(), Some(0));

    let events = engine.snapshot().events;
    assert!(events.contains(&CombatEvent::Knockout { fighter: 1, by: 0 }));
    assert!(events.contains(&CombatEvent::Victory { survivor: Some(0) }));

    // With one fighter left, cooldowns stop ticking and nobody attacks.
    for _ in 0..60 {
        engine.tick();
    }
    let winner = engine.store().fighter(0).unwrap();
    assert_eq!(winner.attack_cooldown, ATTACK_COOLDOWN);
    assert!(hits_in(&engine.snapshot().events).is_empty());
}

// ---- Lifecycle ----

#[test]
fn test_lifecycle_phases() {
    let phase = |alive, opacity| lifecycle::phase(&Vitality { alive, opacity });
    assert_eq!(phase(true, 1.0), LifePhase::Alive);
    assert_eq!(phase(false, 0.4), LifePhase::Dying);
    assert_eq!(phase(false, 0.0), LifePhase::Retired);
}

#[test]
fn test_knocked_out_fighter_fades_then_retires() {
    let mut engine = duel(150.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();
    let after_hit = engine.store().fighter(1).unwrap().opacity;
    assert!((after_hit - (1.0 - FADE_RATE * DT)).abs() < 1e-9);
    assert!(!engine.is_settled());

    let mut retired_events = 0;
    let mut last = after_hit;
    for _ in 0..60 {
        engine.tick();
        let opacity = engine.store().fighter(1).unwrap().opacity;
        assert!(opacity <= last);
        last = opacity;
        retired_events += engine
            .snapshot()
            .events
            .iter()
            .filter(|e| matches!(e, CombatEvent::Retired { fighter: 1 }))
            .count();
    }

    assert_eq!(last, 0.0);
    assert_eq!(retired_events, 1);
    assert_eq!(engine.store().fighter(1).unwrap().phase, LifePhase::Retired);
    assert!(engine.is_settled());
}

// ---- Effects ----

#[test]
fn test_impacts_age_and_expire() {
    let mut impacts = vec![
        ImpactMarker {
            position: Position::new(1.0, 1.0),
            age_secs: 0.0,
        },
        ImpactMarker {
            position: Position::new(2.0, 2.0),
            age_secs: 0.2,
        },
    ];

    effects::run(&mut impacts, 0.1);
    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].position, Position::new(1.0, 1.0));
    assert!((impacts[0].age_secs - 0.1).abs() < 1e-12);
    assert!((effects::intensity(&impacts[0]) - 0.6).abs() < 1e-9);

    effects::run(&mut impacts, 0.1);
    assert_eq!(impacts.len(), 1);
    effects::run(&mut impacts, 0.1);
    assert!(impacts.is_empty());
}

#[test]
fn test_impacts_expire_inside_engine() {
    let mut engine = duel(5.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();
    assert_eq!(engine.store().impacts().len(), 2);

    for _ in 0..13 {
        engine.tick();
    }
    assert_eq!(engine.store().impacts().len(), 2);
    for _ in 0..2 {
        engine.tick();
    }
    assert!(engine.store().impacts().is_empty());
}

// ---- Engine ----

#[test]
fn test_engine_rejects_invalid_config() {
    let config = EngineConfig {
        simulation: SimulationConfig {
            damage_min: 9.0,
            damage_max: 1.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        SimulationEngine::new(config, avatars(4)),
        Err(ConfigError::DamageRange { .. })
    ));

    let config = EngineConfig {
        tick_rate_hz: 0.0,
        ..Default::default()
    };
    assert!(SimulationEngine::new(config, avatars(4)).is_err());
}

#[test]
fn test_engine_rejects_empty_arena() {
    let config = EngineConfig {
        arena: ArenaBounds {
            width: 30.0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(matches!(
        SimulationEngine::new(config, avatars(4)),
        Err(ConfigError::EmptyArena { .. })
    ));
}

#[test]
fn test_snapshot_drains_events() {
    let mut engine = duel(10.0, 100.0, OutOfRangePolicy::Drop);
    engine.tick();

    let first = engine.snapshot();
    assert_eq!(first.fighters.len(), 2);
    assert_eq!(first.alive_count, 2);
    assert_eq!(first.time.tick, 1);
    assert!(!first.events.is_empty());

    let second = engine.snapshot();
    assert!(second.events.is_empty());
    assert_eq!(second.fighters, first.fighters);
}

// ---- Scenarios ----

#[test]
fn test_duel_from_opposite_corners() {
    let mut engine = engine_with(
        SimulationConfig {
            fighter_count: 2,
            speed: 0.0,
            hit_chance_percent: 100.0,
            damage_min: 50.0,
            damage_max: 50.0,
            ..Default::default()
        },
        2,
        31,
    );
    let interior = ArenaBounds::default().interior();
    engine
        .store_mut()
        .place(0, interior.min, Velocity::new(20.0, 20.0));
    engine
        .store_mut()
        .place(1, interior.max, Velocity::new(-20.0, -20.0));

    let mut received = [0u32; 2];
    for _ in 0..max_run_ticks() {
        engine.tick();
        for (_, target) in hits_in(&engine.snapshot().events) {
            received[target as usize] += 1;
        }
        if engine.store().alive_count() < 2 {
            break;
        }
    }

    let loser = engine
        .store()
        .fighters()
        .into_iter()
        .find(|f| !f.alive)
        .expect("one fighter should be knocked out");
    let winner = engine.store().fighter(1 - loser.index).unwrap();

    assert_eq!(loser.health, 0.0);
    assert_eq!(received[loser.index as usize], 2);
    assert!(winner.alive);
    assert!(received[winner.index as usize] <= 1);
    assert!(winner.health == MAX_HEALTH || winner.health == 50.0);
    assert_eq!(engine.survivor(), Some(winner.index));
}

/// Ticks in the longest run the loop scheduler allows by default.
fn max_run_ticks() -> usize {
    (MAX_RUN_SECS * TICK_RATE) as usize
}

#[test]
fn test_two_fighter_match_terminates() {
    for seed in 0..12 {
        let mut engine = engine_with(
            SimulationConfig {
                fighter_count: 2,
                hit_chance_percent: 100.0,
                damage_min: 5.0,
                damage_max: 25.0,
                ..Default::default()
            },
            2,
            seed,
        );

        for _ in 0..max_run_ticks() {
            engine.tick();
            if engine.is_settled() {
                break;
            }
        }

        assert!(
            engine.is_settled(),
            "seed {seed} still fighting after {MAX_RUN_SECS} s"
        );
        assert!(engine.time().elapsed_secs <= MAX_RUN_SECS);
        assert!(engine.store().alive_count() <= 1);
        for fighter in engine.store().fighters() {
            if !fighter.alive {
                assert_eq!(fighter.opacity, 0.0);
                assert_eq!(fighter.phase, LifePhase::Retired);
            }
        }
    }
}
