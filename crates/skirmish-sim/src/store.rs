//! Entity store: the fighters of one run and the impact markers they leave.
//!
//! Fighters live in a hecs world as component bundles. `roster` maps the
//! stable fighter index to its entity; slots are never removed, a knocked-out
//! fighter stays in place until the next reset. Impact markers are short-lived
//! and stored in a plain list, not as ECS entities.

use hecs::{Entity, World};
use rand::Rng;
use tracing::info;

use skirmish_core::components::{AttackCooldown, Combatant, Health, Vitality};
use skirmish_core::config::SimulationConfig;
use skirmish_core::constants::{MAX_HEALTH, SPAWN_SPEED_FRACTION};
use skirmish_core::state::FighterView;
use skirmish_core::types::{ArenaBounds, AvatarHandle, Position, Velocity};

use crate::systems::{integrator, lifecycle};

/// A combat flash left at the point of impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactMarker {
    pub position: Position,
    pub age_secs: f64,
}

/// Disjoint borrows of the store's fields, handed to the tick systems.
pub(crate) struct StoreParts<'a> {
    pub world: &'a mut World,
    pub roster: &'a [Entity],
    pub impacts: &'a mut Vec<ImpactMarker>,
    pub config: &'a SimulationConfig,
    pub arena: &'a ArenaBounds,
}

/// Owns all mutable fighter state for one run, from spawn to reset.
pub struct EntityStore {
    world: World,
    roster: Vec<Entity>,
    impacts: Vec<ImpactMarker>,
    config: SimulationConfig,
    avatars: Vec<AvatarHandle>,
    arena: ArenaBounds,
}

impl EntityStore {
    /// Spawn a roster of `config.fighter_count` fighters at random interior
    /// positions. The count is clamped to the number of avatars available.
    pub fn spawn<R: Rng + ?Sized>(
        config: SimulationConfig,
        avatars: Vec<AvatarHandle>,
        arena: ArenaBounds,
        rng: &mut R,
    ) -> Self {
        let mut store = Self {
            world: World::new(),
            roster: Vec::new(),
            impacts: Vec::new(),
            config,
            avatars,
            arena,
        };
        store.populate(rng);
        store
    }

    /// Replace every fighter with a fresh roster and clear all impacts.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.world.clear();
        self.roster.clear();
        self.impacts.clear();
        self.populate(rng);
    }

    fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let requested = self.config.fighter_count as usize;
        let count = requested.min(self.avatars.len());
        let interior = self.arena.interior();
        let cap = integrator::speed_cap(self.config.speed);

        self.roster.reserve(count);
        for index in 0..count {
            let position = Position::new(
                rng.gen_range(interior.min.x..=interior.max.x),
                rng.gen_range(interior.min.y..=interior.max.y),
            );
            let heading = rng.gen_range(0.0..std::f64::consts::TAU);
            let speed = cap * rng.gen_range(SPAWN_SPEED_FRACTION.0..=SPAWN_SPEED_FRACTION.1);
            let velocity = Velocity::new(heading.cos() * speed, heading.sin() * speed);

            let entity = self.world.spawn((
                Combatant {
                    index: index as u32,
                    avatar: self.avatars[index % self.avatars.len()],
                },
                position,
                velocity,
                Health {
                    current: MAX_HEALTH,
                },
                Vitality {
                    alive: true,
                    opacity: 1.0,
                },
                AttackCooldown::default(),
            ));
            self.roster.push(entity);
        }

        info!(
            requested,
            spawned = count,
            avatars = self.avatars.len(),
            "Spawned fighter roster"
        );
    }

    /// Number of fighter slots, dead or alive.
    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }

    /// Number of fighters still standing.
    pub fn alive_count(&self) -> usize {
        self.world
            .query::<&Vitality>()
            .iter()
            .filter(|(_, v)| v.alive)
            .count()
    }

    /// Entity for a stable fighter index.
    pub fn entity(&self, index: u32) -> Option<Entity> {
        self.roster.get(index as usize).copied()
    }

    /// Entities in roster (index) order.
    pub fn roster(&self) -> &[Entity] {
        &self.roster
    }

    /// Read-only copy of one fighter.
    pub fn fighter(&self, index: u32) -> Option<FighterView> {
        let entity = self.entity(index)?;
        let mut query = self
            .world
            .query_one::<(
                &Combatant,
                &Position,
                &Velocity,
                &Health,
                &Vitality,
                &AttackCooldown,
            )>(entity)
            .ok()?;
        query.get().map(
            |(combatant, pos, vel, health, vitality, cooldown)| FighterView {
                index: combatant.index,
                position: *pos,
                velocity: *vel,
                health: health.current,
                alive: vitality.alive,
                opacity: vitality.opacity,
                attack_cooldown: cooldown.remaining_secs,
                avatar: combatant.avatar,
                phase: lifecycle::phase(vitality),
            },
        )
    }

    /// Read-only copies of all fighters, in index order.
    pub fn fighters(&self) -> Vec<FighterView> {
        (0..self.roster.len() as u32)
            .filter_map(|index| self.fighter(index))
            .collect()
    }

    pub fn impacts(&self) -> &[ImpactMarker] {
        &self.impacts
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn arena(&self) -> &ArenaBounds {
        &self.arena
    }

    /// Read-only access to the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Split borrow for systems that walk the roster while mutating the world.
    pub(crate) fn parts_mut(&mut self) -> StoreParts<'_> {
        StoreParts {
            world: &mut self.world,
            roster: &self.roster,
            impacts: &mut self.impacts,
            config: &self.config,
            arena: &self.arena,
        }
    }

    /// Overwrite a fighter's kinematic state (for tests that need a fixed layout).
    #[cfg(test)]
    pub(crate) fn place(&mut self, index: u32, position: Position, velocity: Velocity) {
        if let Some(entity) = self.entity(index) {
            if let Ok((pos, vel)) = self
                .world
                .query_one_mut::<(&mut Position, &mut Velocity)>(entity)
            {
                *pos = position;
                *vel = velocity;
            }
        }
    }
}
