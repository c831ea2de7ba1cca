//! Systems that operate on the entity store each tick.
//!
//! Systems are free functions over the store (or its ECS world). They do not
//! own state; all state lives in components and the store's impact list.
//! Per tick they run in this order: integrator, combat, lifecycle, effects.

pub mod combat;
pub mod effects;
pub mod integrator;
pub mod lifecycle;
pub mod snapshot;
