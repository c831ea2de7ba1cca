//! Simulation engine: one fixed tick of the battle at a time.
//!
//! `SimulationEngine` owns the entity store and the random source, runs the
//! tick pipeline and produces `RenderSnapshot`s. It has no notion of wall
//! clock time; the loop scheduler decides when and how often to tick.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use skirmish_core::components::Vitality;
use skirmish_core::config::{ConfigError, SimulationConfig};
use skirmish_core::constants::{FADE_EPSILON, TICK_RATE};
use skirmish_core::events::CombatEvent;
use skirmish_core::state::RenderSnapshot;
use skirmish_core::types::{ArenaBounds, AvatarHandle, SimTime};

use crate::store::EntityStore;
use crate::systems;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed. Same seed, config and avatars = same battle.
    pub seed: u64,
    pub simulation: SimulationConfig,
    /// Fixed tick rate the engine integrates at (Hz).
    pub tick_rate_hz: f64,
    pub arena: ArenaBounds,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            simulation: SimulationConfig::default(),
            tick_rate_hz: TICK_RATE,
            arena: ArenaBounds::default(),
        }
    }
}

/// The simulation engine. Owns the entity store and all sim state.
pub struct SimulationEngine {
    store: EntityStore,
    time: SimTime,
    dt: f64,
    rng: ChaCha8Rng,
    events: Vec<CombatEvent>,
    decided: bool,
}

impl SimulationEngine {
    /// Validate the config and spawn the initial roster.
    pub fn new(config: EngineConfig, avatars: Vec<AvatarHandle>) -> Result<Self, ConfigError> {
        config.simulation.validate()?;
        if !config.tick_rate_hz.is_finite() || config.tick_rate_hz <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "tick_rate_hz",
                value: config.tick_rate_hz,
            });
        }
        config.arena.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let store = EntityStore::spawn(config.simulation, avatars, config.arena, &mut rng);
        info!(
            seed = config.seed,
            fighters = store.len(),
            tick_rate_hz = config.tick_rate_hz,
            "Simulation engine ready"
        );

        Ok(Self {
            store,
            time: SimTime::default(),
            dt: 1.0 / config.tick_rate_hz,
            rng,
            events: Vec::new(),
            decided: false,
        })
    }

    /// Advance the simulation by one fixed tick.
    pub fn tick(&mut self) {
        let combat_live = self.store.alive_count() >= 2;
        let parts = self.store.parts_mut();
        let interior = parts.arena.interior();

        // 1. Movement
        systems::integrator::run(
            parts.world,
            &mut self.rng,
            &interior,
            parts.config.speed,
            self.dt,
            combat_live,
        );
        // 2. Combat
        if combat_live {
            systems::combat::run(
                parts.world,
                parts.roster,
                parts.impacts,
                &interior,
                parts.config,
                &mut self.rng,
                &mut self.events,
            );
        }
        // 3. Fade-out of knocked-out fighters
        systems::lifecycle::run(parts.world, self.dt, &mut self.events);
        // 4. Impact marker aging
        systems::effects::run(parts.impacts, self.dt);

        self.time.advance(self.dt);

        if !self.decided && self.store.alive_count() < 2 {
            self.decided = true;
            let survivor = self.survivor();
            info!(
                survivor = ?survivor,
                tick = self.time.tick,
                elapsed_secs = self.time.elapsed_secs,
                "Match decided"
            );
            self.events.push(CombatEvent::Victory { survivor });
        }
    }

    /// Respawn the roster from the same config and clear all run state.
    /// The random source carries on, so a reset produces a new layout.
    pub fn reset(&mut self) {
        self.store.reset(&mut self.rng);
        self.time = SimTime::default();
        self.events.clear();
        self.decided = false;
        info!(fighters = self.store.len(), "Simulation reset");
    }

    /// Build a render snapshot, draining the events collected since the last one.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.store,
            &self.time,
            self.survivor(),
            self.is_settled(),
            events,
        )
    }

    /// True once fewer than two fighters stand and every knocked-out fighter
    /// has faded out.
    pub fn is_settled(&self) -> bool {
        self.store.alive_count() < 2
            && self
                .store
                .world()
                .query::<&Vitality>()
                .iter()
                .all(|(_, v)| v.alive || v.opacity <= FADE_EPSILON)
    }

    /// Index of the last fighter standing, once exactly one remains.
    pub fn survivor(&self) -> Option<u32> {
        if self.store.alive_count() != 1 {
            return None;
        }
        self.store
            .fighters()
            .into_iter()
            .find(|f| f.alive)
            .map(|f| f.index)
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Seconds per tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Get a read-only reference to the entity store.
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Events collected since the last snapshot.
    pub fn pending_events(&self) -> &[CombatEvent] {
        &self.events
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }
}
