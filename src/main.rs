//! Orbit Hop entry point
//!
//! Runs the gameplay core headless with scripted input and logs what happens.
//! The windowed frontend drives the same `EntityHandler` from its frame loop.

use orbit_hop::Settings;
use orbit_hop::renderer::{Camera2D, DrawFlags, DrawList, SpriteInstance};
use orbit_hop::scene;
use orbit_hop::sim::{InputState, PlayerState};
use orbit_hop::sprites::SpriteLibrary;

/// Scripted input: land, run right, jump, run left, idle
fn scripted_input(frame: u32) -> InputState {
    match frame {
        0..=89 => InputState::default(),
        90..=179 => InputState::run(1.0),
        180..=189 => InputState {
            move_x: 1.0,
            jump: true,
            ..Default::default()
        },
        190..=299 => InputState::run(-1.0),
        _ => InputState::default(),
    }
}

fn main() {
    env_logger::init();
    log::info!("Orbit Hop (headless) starting...");

    let settings = Settings::load_or_default(Settings::FILE_NAME);
    let dt = settings.frame_time();
    let flags = DrawFlags {
        show_debug: settings.show_debug,
    };

    let mut handler = match scene::start(&settings, SpriteLibrary::with_default_content()) {
        Ok(handler) => handler,
        Err(e) => {
            log::error!("Could not build scene: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = scene::scatter_asteroids(&mut handler, 0x0b17, 12, 1500.0, 200.0) {
        log::warn!("Scatter stopped early: {e}");
    }

    let mut draw_list = DrawList::new();
    let mut last_state = PlayerState::Idle;

    for frame in 0..360 {
        let input = scripted_input(frame);
        let debug = handler.update(dt, &input);
        if let Some(body) = debug.captured {
            log::info!("frame {frame}: captured by body {body}");
        }

        if let Some(data) = handler.player_data()
            && data.state != last_state
        {
            log::info!("frame {frame}: {:?} -> {:?}", last_state, data.state);
            last_state = data.state;
        }

        if let Some(target) = handler.player().map(|player| player.center()) {
            let camera = Camera2D {
                target,
                ..*handler.camera()
            };
            handler.set_camera(camera);
        }

        draw_list.clear();
        handler.draw(&mut draw_list, flags);
    }

    let instances = draw_list.sprite_instances(handler.sprites());
    log::info!(
        "last frame: {} draw commands, {} sprite instances ({} bytes)",
        draw_list.len(),
        instances.len(),
        SpriteInstance::as_bytes(&instances).len()
    );

    if let (Some(player), Some(data)) = (handler.player(), handler.player_data()) {
        println!(
            "player: state {:?}, anchor {:?}, angle {:.3} rad, height {:.1}, grounded {}",
            data.state,
            data.anchor,
            player.orbit_angle,
            player.orbit_height,
            player.flags.grounded
        );
    }
}
