//! The shooter/launcher at the bottom of the playfield.
//!
//! The host aims and fires with messages; these systems feed them to the
//! [`GameSession`], step the projectile once per frame and forward board
//! changes to whoever renders them.

use bevy::prelude::*;

use super::{
    EngineSystems,
    bubble::{BubbleMoved, BubbleRemoved, BubbleSpawned},
    session::{BoardEvent, GameSession},
    state::ShotResolved,
    trajectory::TrajectoryPreview,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ShooterState>();
    app.init_resource::<ShooterState>();

    app.add_message::<AimShot>();
    app.add_message::<FireShot>();
    app.add_message::<RestartGame>();

    app.add_systems(
        Update,
        (
            handle_restart,
            update_preview,
            handle_fire,
            advance_projectile,
            forward_board_events,
        )
            .chain()
            .in_set(EngineSystems)
            .run_if(resource_exists::<GameSession>),
    );
}

/// Whether the shooter can fire.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Reflect, Default)]
#[reflect(Resource)]
pub enum ShooterState {
    /// Ready to fire
    #[default]
    Ready,
    /// Waiting for the projectile to resolve
    Reloading,
}

/// The player moved the aim. Recomputes the [`TrajectoryPreview`].
#[derive(Message, Debug, Clone, Copy)]
pub struct AimShot {
    pub direction: Vec2,
}

/// Fire the loaded bubble.
#[derive(Message, Debug, Clone, Copy)]
pub struct FireShot {
    pub direction: Vec2,
}

#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestartGame;

fn handle_restart(
    mut restarts: MessageReader<RestartGame>,
    mut session: ResMut<GameSession>,
    mut state: ResMut<ShooterState>,
    mut preview: ResMut<TrajectoryPreview>,
) {
    if restarts.read().count() == 0 {
        return;
    }
    session.restart();
    *state = ShooterState::Ready;
    preview.points.clear();
}

/// Only the latest aim of the frame matters.
fn update_preview(
    mut aims: MessageReader<AimShot>,
    session: Res<GameSession>,
    mut preview: ResMut<TrajectoryPreview>,
) {
    let Some(aim) = aims.read().last() else {
        return;
    };
    preview.points = session.preview_trajectory(aim.direction);
    debug!("Preview updated with {} points", preview.points.len());
}

fn handle_fire(
    mut fires: MessageReader<FireShot>,
    mut session: ResMut<GameSession>,
    mut state: ResMut<ShooterState>,
) {
    for fire in fires.read() {
        // Can't fire if not ready
        if *state != ShooterState::Ready {
            debug!("Shooter reloading, ignoring fire");
            continue;
        }
        match session.launch(fire.direction) {
            Ok(_) => *state = ShooterState::Reloading,
            Err(e) => debug!("Fire ignored: {}", e),
        }
    }
}

/// One projectile step per frame; reload once the shot resolves.
fn advance_projectile(
    mut session: ResMut<GameSession>,
    mut state: ResMut<ShooterState>,
    mut resolved: MessageWriter<ShotResolved>,
) {
    let Some(result) = session.tick() else {
        return;
    };
    info!(
        "Shot resolved: {:?}, +{} (score {})",
        result.outcome, result.score_delta, result.score
    );
    resolved.write(ShotResolved(result));
    *state = ShooterState::Ready;
}

fn forward_board_events(
    mut session: ResMut<GameSession>,
    mut spawned: MessageWriter<BubbleSpawned>,
    mut moved: MessageWriter<BubbleMoved>,
    mut removed: MessageWriter<BubbleRemoved>,
) {
    for event in session.drain_events() {
        match event {
            BoardEvent::Created {
                id,
                color,
                position,
            } => {
                spawned.write(BubbleSpawned {
                    id,
                    color,
                    position,
                });
            }
            BoardEvent::Moved { id, position } => {
                moved.write(BubbleMoved { id, position });
            }
            BoardEvent::Removed { id } => {
                removed.write(BubbleRemoved { id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::message::Messages;

    use super::*;
    use crate::game::{
        bubble::{BubbleColor, BubbleId},
        config::EngineConfig,
        hex::AxialCoord,
        highscore::MemoryStore,
        state::GameStatus,
    };

    /// Ids seen on `BubbleRemoved` during the test.
    #[derive(Resource, Default)]
    struct RemovedLog(Vec<BubbleId>);

    fn log_removed(mut removed: MessageReader<BubbleRemoved>, mut log: ResMut<RemovedLog>) {
        log.0.extend(removed.read().map(|m| m.id));
    }

    fn app_with(session: GameSession) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(session);
        app.add_plugins(crate::game::plugin);
        app.init_resource::<RemovedLog>();
        app.add_systems(Update, log_removed.after(EngineSystems));
        app
    }

    fn triangle_session() -> GameSession {
        let mut session =
            GameSession::with_seed(EngineConfig::default(), Box::new(MemoryStore::default()), 7);
        session.clear_board();
        session.spawn_placed(AxialCoord::ORIGIN, BubbleColor::Red).unwrap();
        session
            .spawn_placed(AxialCoord::new(1, -1), BubbleColor::Red)
            .unwrap();
        session.reload_with(BubbleColor::Red);
        session.drain_events();
        session
    }

    fn send<M: Message>(app: &mut App, message: M) {
        app.world_mut().resource_mut::<Messages<M>>().write(message);
    }

    #[test]
    fn plugin_keeps_inserted_session() {
        let mut app = app_with(triangle_session());
        app.update();
        assert_eq!(app.world().resource::<GameSession>().board().len(), 2);
        assert_eq!(*app.world().resource::<ShooterState>(), ShooterState::Ready);
    }

    #[test]
    fn fire_flies_and_reloads() {
        let mut app = app_with(triangle_session());
        send(&mut app, FireShot { direction: Vec2::Y });
        app.update();
        assert_eq!(
            *app.world().resource::<ShooterState>(),
            ShooterState::Reloading
        );

        for _ in 0..100 {
            app.update();
        }
        assert_eq!(*app.world().resource::<ShooterState>(), ShooterState::Ready);
        let session = app.world().resource::<GameSession>();
        assert_eq!(session.score().score, 30);
        assert_eq!(session.status(), GameStatus::Cleared);
        // Two placed bubbles and the projectile.
        assert_eq!(app.world().resource::<RemovedLog>().0.len(), 3);
    }

    #[test]
    fn second_fire_while_reloading_is_ignored() {
        let mut app = app_with(triangle_session());
        send(&mut app, FireShot { direction: Vec2::Y });
        app.update();
        send(&mut app, FireShot { direction: Vec2::Y });
        app.update();
        assert_eq!(app.world().resource::<GameSession>().shots_remaining(), 49);
    }

    #[test]
    fn aim_updates_preview() {
        let mut app = app_with(triangle_session());
        send(&mut app, AimShot { direction: Vec2::Y });
        app.update();
        let preview = app.world().resource::<TrajectoryPreview>();
        let start = EngineConfig::default().shooter_position;
        assert_eq!(preview.points.first(), Some(&start));
        assert!(preview.points.len() >= 2);
    }

    #[test]
    fn restart_refills_board() {
        let mut app = app_with(triangle_session());
        send(&mut app, RestartGame);
        app.update();
        let session = app.world().resource::<GameSession>();
        assert_eq!(session.board().len(), 35);
        assert_eq!(session.score().score, 0);
        // Two placed bubbles and the old loaded one.
        assert_eq!(app.world().resource::<RemovedLog>().0.len(), 3);
    }
}
