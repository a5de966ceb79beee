//! Headless autoplay: a bot fires random aims until the game ends.
//!
//! Usage: `hexshot [config.json]`

use bevy::{log::LogPlugin, prelude::*};
use hexshot::{
    AimShot, EngineConfig, EngineSystems, FireShot, GameSession, ShooterState, ShotResolved,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn main() -> AppExit {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    app.add_plugins(hexshot::plugin);

    if let Some(path) = std::env::args().nth(1) {
        match EngineConfig::load(&path) {
            Ok(config) => {
                app.insert_resource(config);
            }
            Err(e) => warn!("Could not load {}: {}, using defaults", path, e),
        }
    }

    app.insert_resource(Autoplay {
        rng: StdRng::from_os_rng(),
    });
    app.add_systems(
        Update,
        (
            autoplay.before(EngineSystems),
            report_shots.after(EngineSystems),
        )
            .run_if(resource_exists::<GameSession>),
    );

    app.run()
}

#[derive(Resource)]
struct Autoplay {
    rng: StdRng,
}

fn autoplay(
    mut bot: ResMut<Autoplay>,
    session: Res<GameSession>,
    state: Res<ShooterState>,
    mut aims: MessageWriter<AimShot>,
    mut fires: MessageWriter<FireShot>,
    mut exit: MessageWriter<AppExit>,
) {
    if session.is_game_over() {
        info!(
            "Game over ({:?}) - score {}, best {}",
            session.status(),
            session.score().score,
            session.high_score()
        );
        exit.write(AppExit::Success);
        return;
    }

    if *state != ShooterState::Ready || session.projectile().is_some() {
        return;
    }

    let direction = Vec2::new(bot.rng.random_range(-1.0..1.0), 1.0);
    aims.write(AimShot { direction });
    fires.write(FireShot { direction });
}

fn report_shots(mut resolved: MessageReader<ShotResolved>, session: Res<GameSession>) {
    for ShotResolved(result) in resolved.read() {
        info!(
            "{:?} at {:?}: {} cleared, {} dropped, {} shots left",
            result.outcome,
            result.placed,
            result.cleared.len(),
            result.dropped.len(),
            session.shots_remaining()
        );
        if result.new_high_score {
            info!("New high score: {}", result.score);
        }
    }
}
