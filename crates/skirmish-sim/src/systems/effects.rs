//! Effects system: ages impact markers and drops expired ones.

use skirmish_core::constants::IMPACT_LIFETIME;

use crate::store::ImpactMarker;

/// Age every marker by `dt`, then drop those older than `IMPACT_LIFETIME`.
/// Surviving markers keep their relative order.
pub fn run(impacts: &mut Vec<ImpactMarker>, dt: f64) {
    for marker in impacts.iter_mut() {
        marker.age_secs += dt;
    }
    impacts.retain(|marker| marker.age_secs <= IMPACT_LIFETIME);
}

/// Flash intensity for rendering: 1.0 when fresh, 0.0 when expired.
pub fn intensity(marker: &ImpactMarker) -> f64 {
    (1.0 - marker.age_secs / IMPACT_LIFETIME).clamp(0.0, 1.0)
}
