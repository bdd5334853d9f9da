//! Scene setup for a fresh run

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::renderer::Camera2D;
use crate::settings::Settings;
use crate::sim::{EntityHandler, EntityId, SpawnError};
use crate::sprites::SpriteLibrary;

/// Player start position (top-left)
pub const PLAYER_START: Vec2 = Vec2::new(-90.0, 100.0);

/// Asteroid positions (top-left) of the opening scene
pub const START_ASTEROIDS: [Vec2; 2] = [Vec2::new(0.0, 0.0), Vec2::new(100.0, -300.0)];

/// Build a handler with the player and the opening asteroids
pub fn start(settings: &Settings, sprites: SpriteLibrary) -> Result<EntityHandler, SpawnError> {
    let viewport = Vec2::new(settings.window_width as f32, settings.window_height as f32);
    let mut handler = EntityHandler::new(sprites, Camera2D::centered(viewport), settings.tuning);

    handler.spawn_player(PLAYER_START)?;
    for pos in START_ASTEROIDS {
        handler.spawn_asteroid(pos)?;
    }

    log::info!(
        "scene ready: {} entities ({} bodies)",
        handler.count(),
        handler.bodies().count()
    );
    Ok(handler)
}

/// Scatter `count` asteroids over a square of half-size `extent` around the
/// origin, keeping their centers at least `min_gap` apart
///
/// Deterministic for a given seed. Placement gives up on an asteroid after a
/// bounded number of tries, so fewer than `count` may be spawned.
pub fn scatter_asteroids(
    handler: &mut EntityHandler,
    seed: u64,
    count: usize,
    extent: f32,
    min_gap: f32,
) -> Result<Vec<EntityId>, SpawnError> {
    const MAX_TRIES: usize = 32;

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut spawned = Vec::with_capacity(count);

    for _ in 0..count {
        let mut placed = false;
        for _ in 0..MAX_TRIES {
            let pos = Vec2::new(
                rng.random_range(-extent..extent),
                rng.random_range(-extent..extent),
            );
            // Candidate center, assuming the asteroid sheet's square frame
            let half = handler
                .sprites()
                .frame_size(crate::sprites::ids::ASTEROID_SHEET)
                * 0.5;
            let center = pos + half;
            let clear = handler
                .iter()
                .filter(|(_, ent)| ent.flags.active)
                .all(|(_, ent)| ent.center().distance(center) >= min_gap + ent.radius);
            if clear {
                spawned.push(handler.spawn_asteroid(pos)?);
                placed = true;
                break;
            }
        }
        if !placed {
            log::debug!("no room for another asteroid after {MAX_TRIES} tries");
        }
    }

    log::info!("scattered {} asteroids (seed {seed})", spawned.len());
    Ok(spawned)
}
