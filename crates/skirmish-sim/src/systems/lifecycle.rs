//! Lifecycle system: Alive -> Dying -> Retired.
//!
//! The Alive -> Dying edge is taken by the combat system on a lethal hit.
//! This system fades dying fighters and reports the moment each one retires.
//! There is no way back to Alive short of a full reset.

use hecs::World;
use tracing::debug;

use skirmish_core::components::{Combatant, Vitality};
use skirmish_core::constants::{FADE_EPSILON, FADE_RATE};
use skirmish_core::enums::LifePhase;
use skirmish_core::events::CombatEvent;

/// Derive the lifecycle phase from the stored flags.
pub fn phase(vitality: &Vitality) -> LifePhase {
    if vitality.alive {
        LifePhase::Alive
    } else if vitality.opacity > 0.0 {
        LifePhase::Dying
    } else {
        LifePhase::Retired
    }
}

/// Fade every dying fighter by `FADE_RATE * dt`.
pub fn run(world: &mut World, dt: f64, events: &mut Vec<CombatEvent>) {
    for (_entity, (combatant, vitality)) in world.query_mut::<(&Combatant, &mut Vitality)>() {
        if vitality.alive {
            vitality.opacity = 1.0;
            continue;
        }
        if vitality.opacity <= 0.0 {
            continue;
        }

        vitality.opacity = (vitality.opacity - FADE_RATE * dt).max(0.0);
        if vitality.opacity <= FADE_EPSILON {
            vitality.opacity = 0.0;
            debug!(fighter = combatant.index, "Fighter retired");
            events.push(CombatEvent::Retired {
                fighter: combatant.index,
            });
        }
    }
}
