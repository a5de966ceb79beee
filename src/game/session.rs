//! The game session: one board, one shooter, one running score.
//!
//! This is the engine's lifecycle API. A shot runs through
//! launch -> per-frame [`tick`](GameSession::tick) -> attachment -> match ->
//! pruning, and comes back as a [`ShotResult`]. Everything the render side
//! needs to know is queued as [`BoardEvent`]s.

use bevy::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

use super::{
    attach::attach,
    bubble::{Bubble, BubbleColor, BubbleId},
    cluster::{clear_match, prune_disconnected},
    config::EngineConfig,
    error::{EngineError, Result},
    grid::{Board, initial_layout},
    highscore::{HighScoreStore, load_or_zero},
    hex::AxialCoord,
    projectile::{Projectile, StepOutcome},
    state::{GameScore, GameStatus, ShotOutcome, ShotResult},
    trajectory::predict_trajectory,
};

/// Changes the render collaborator has to mirror.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardEvent {
    Created {
        id: BubbleId,
        color: BubbleColor,
        position: Vec3,
    },
    Moved {
        id: BubbleId,
        position: Vec3,
    },
    Removed {
        id: BubbleId,
    },
}

#[derive(Resource)]
pub struct GameSession {
    config: EngineConfig,
    board: Board,
    score: GameScore,
    status: GameStatus,
    shots_remaining: u32,
    high_score: u32,
    palette: Vec<BubbleColor>,
    loaded: Bubble,
    next_color: BubbleColor,
    projectile: Option<Projectile>,
    rng: StdRng,
    store: Box<dyn HighScoreStore>,
    events: Vec<BoardEvent>,
    next_id: u32,
}

impl GameSession {
    /// New session with an OS-seeded RNG and a filled board.
    pub fn new(config: EngineConfig, store: Box<dyn HighScoreStore>) -> Self {
        Self::with_rng(config, store, StdRng::from_os_rng())
    }

    /// New session with a fixed seed, for reproducible games.
    pub fn with_seed(config: EngineConfig, store: Box<dyn HighScoreStore>, seed: u64) -> Self {
        Self::with_rng(config, store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: EngineConfig, store: Box<dyn HighScoreStore>, mut rng: StdRng) -> Self {
        let palette = BubbleColor::ALL.to_vec();
        let loaded_color = BubbleColor::random_from(&mut rng, &palette).unwrap_or_default();
        let next_color = BubbleColor::random_from(&mut rng, &palette).unwrap_or_default();
        let high_score = load_or_zero(store.as_ref());
        let loaded = Bubble::new(
            BubbleId(0),
            loaded_color,
            config.bubble_radius,
            config.shooter_position,
        );

        let mut session = Self {
            shots_remaining: config.shots_per_game,
            config,
            board: Board::new(),
            score: GameScore::default(),
            status: GameStatus::Playing,
            high_score,
            palette,
            loaded,
            next_color,
            projectile: None,
            rng,
            store,
            events: Vec::new(),
            next_id: 1,
        };
        let loaded = session.loaded.clone();
        session.push_created(&loaded);
        let rows = session.config.initial_rows;
        session.fill_board(rows);
        session
    }

    /// Replace the board with a fresh hexagonal patch of `rows` rows using
    /// colors from `colors`. The shooter is reloaded from the same palette.
    pub fn init_board(&mut self, rows: i32, colors: &[BubbleColor]) -> Result<&Board> {
        if colors.is_empty() {
            return Err(EngineError::EmptyPalette);
        }
        self.palette = colors.to_vec();
        self.clear_board();
        self.fill_board(rows);
        self.next_color = self.random_color();
        let color = self.random_color();
        self.reload_with(color);
        Ok(&self.board)
    }

    /// Remove every placed bubble without scoring it.
    pub fn clear_board(&mut self) {
        let ids: Vec<BubbleId> = self.board.bubbles().map(|b| b.id).collect();
        self.board.clear();
        for id in ids {
            self.events.push(BoardEvent::Removed { id });
        }
    }

    /// Put a bubble of `color` straight onto `coord`.
    pub fn spawn_placed(&mut self, coord: AxialCoord, color: BubbleColor) -> Result<BubbleId> {
        if self.board.has(coord) {
            return Err(EngineError::OccupiedCell(coord));
        }
        let id = self.alloc_id();
        let bubble = Bubble::placed(id, color, self.config.bubble_radius, coord);
        self.push_created(&bubble);
        self.board.place(bubble)?;
        Ok(id)
    }

    fn fill_board(&mut self, rows: i32) {
        let mut count = 0;
        for coord in initial_layout(rows) {
            let color = self.random_color();
            if self.spawn_placed(coord, color).is_ok() {
                count += 1;
            }
        }
        info!("Spawned {} initial bubbles", count);
    }

    /// Swap the loaded shooter bubble for a new one of `color`.
    pub fn reload_with(&mut self, color: BubbleColor) {
        let id = self.alloc_id();
        let fresh = Bubble::new(id, color, self.config.bubble_radius, self.config.shooter_position);
        let old = std::mem::replace(&mut self.loaded, fresh);
        self.events.push(BoardEvent::Removed { id: old.id });
        let loaded = self.loaded.clone();
        self.push_created(&loaded);
    }

    /// Preview the loaded bubble's path for an aim direction.
    pub fn preview_trajectory(&self, direction: Vec2) -> Vec<Vec3> {
        predict_trajectory(self.loaded.position, direction, &self.board, &self.config)
    }

    /// Fire the loaded bubble. It flies on subsequent [`tick`](Self::tick)s.
    pub fn launch(&mut self, direction: Vec2) -> Result<BubbleId> {
        if self.projectile.is_some() {
            return Err(EngineError::ShotInFlight);
        }
        if self.shots_remaining == 0 {
            return Err(EngineError::OutOfShots);
        }

        let dir = self.config.aim_direction(direction);
        let color = self.next_color;
        self.next_color = self.random_color();

        let id = self.alloc_id();
        let fresh = Bubble::new(id, color, self.config.bubble_radius, self.config.shooter_position);
        let bubble = std::mem::replace(&mut self.loaded, fresh);
        let loaded = self.loaded.clone();
        self.push_created(&loaded);

        self.shots_remaining -= 1;
        info!(
            "Fired {:?} bubble {} in direction {:?} ({} shots left)",
            bubble.color, bubble.id, dir, self.shots_remaining
        );

        let fired = bubble.id;
        self.projectile = Some(Projectile::launch(bubble, dir, &self.config));
        Ok(fired)
    }

    /// Advance the projectile by one frame.
    ///
    /// Returns `None` while it is still flying (or nothing was fired) and
    /// the result once the shot resolves.
    pub fn tick(&mut self) -> Option<ShotResult> {
        let mut projectile = self.projectile.take()?;
        match projectile.step(&self.board, &self.config) {
            StepOutcome::InFlight => {
                self.events.push(BoardEvent::Moved {
                    id: projectile.bubble.id,
                    position: projectile.bubble.position,
                });
                self.projectile = Some(projectile);
                None
            }
            StepOutcome::OutOfBounds => {
                let id = projectile.bubble.id;
                info!("Bubble {} left the playfield", id);
                self.events.push(BoardEvent::Removed { id });
                Some(self.finish(ShotOutcome::Cancelled, id, None, Vec::new(), Vec::new(), 0))
            }
            StepOutcome::Collided(other) => Some(self.resolve(projectile.bubble, other)),
        }
    }

    /// Launch and fly the shot to completion in one call.
    pub fn fire_shot(&mut self, direction: Vec2) -> Result<ShotResult> {
        self.launch(direction)?;
        loop {
            if let Some(result) = self.tick() {
                return Ok(result);
            }
        }
    }

    /// Attach, then clear matches and anything left hanging.
    fn resolve(&mut self, bubble: Bubble, other: AxialCoord) -> ShotResult {
        let id = bubble.id;
        let coord = match attach(&mut self.board, bubble, other) {
            Ok(coord) => coord,
            Err(e) => {
                warn!("Shot {} rejected: {}", id, e);
                self.events.push(BoardEvent::Removed { id });
                return self.finish(ShotOutcome::Rejected, id, None, Vec::new(), Vec::new(), 0);
            }
        };

        info!("Bubble {} landed at {}", id, coord);
        self.events.push(BoardEvent::Moved {
            id,
            position: coord.to_world(self.config.bubble_radius),
        });

        let cleared = clear_match(&mut self.board, coord, self.config.min_match_size);
        let mut delta = self.score.add_cluster(cleared.len(), &self.config);

        let dropped = if cleared.is_empty() {
            Vec::new()
        } else {
            prune_disconnected(&mut self.board, self.config.anchor_row)
        };
        delta += self.score.add_dropped(dropped.len(), &self.config);

        let cleared: Vec<BubbleId> = cleared.iter().map(|b| b.id).collect();
        let dropped: Vec<BubbleId> = dropped.iter().map(|b| b.id).collect();
        for &removed in cleared.iter().chain(&dropped) {
            self.events.push(BoardEvent::Removed { id: removed });
        }

        if !cleared.is_empty() && self.board.is_empty() {
            info!("Board cleared! Final score: {}", self.score.score);
            self.status = GameStatus::Cleared;
        }

        self.finish(ShotOutcome::Attached, id, Some(coord), cleared, dropped, delta)
    }

    fn finish(
        &mut self,
        outcome: ShotOutcome,
        projectile: BubbleId,
        placed: Option<AxialCoord>,
        cleared: Vec<BubbleId>,
        dropped: Vec<BubbleId>,
        score_delta: u32,
    ) -> ShotResult {
        if self.shots_remaining == 0 && self.status == GameStatus::Playing {
            info!("Out of shots. Final score: {}", self.score.score);
            self.status = GameStatus::OutOfShots;
        }

        let new_high_score = self.score.score > self.high_score;
        if new_high_score {
            self.high_score = self.score.score;
            info!("New high score: {}", self.high_score);
            if let Err(e) = self.store.save_high_score(self.high_score) {
                warn!("Failed to save high score: {}", e);
            }
        }

        ShotResult {
            outcome,
            projectile,
            placed,
            cleared,
            dropped,
            score_delta,
            score: self.score.score,
            new_high_score,
            status: self.status,
        }
    }

    /// Start over: empty the board, reset score and shots, refill.
    pub fn restart(&mut self) {
        if let Some(projectile) = self.projectile.take() {
            self.events.push(BoardEvent::Removed {
                id: projectile.bubble.id,
            });
        }
        self.clear_board();
        self.score.reset();
        self.status = GameStatus::Playing;
        self.shots_remaining = self.config.shots_per_game;
        self.high_score = load_or_zero(self.store.as_ref());
        self.fill_board(self.config.initial_rows);
        self.next_color = self.random_color();
        let color = self.random_color();
        self.reload_with(color);
        info!("Game restarted");
    }

    /// Take the queued render events.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn score(&self) -> &GameScore {
        &self.score
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn shots_remaining(&self) -> u32 {
        self.shots_remaining
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn loaded(&self) -> &Bubble {
        &self.loaded
    }

    pub fn next_color(&self) -> BubbleColor {
        self.next_color
    }

    pub fn projectile(&self) -> Option<&Projectile> {
        self.projectile.as_ref()
    }

    fn random_color(&mut self) -> BubbleColor {
        BubbleColor::random_from(&mut self.rng, &self.palette).unwrap_or_default()
    }

    fn alloc_id(&mut self) -> BubbleId {
        let id = BubbleId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_created(&mut self, bubble: &Bubble) {
        self.events.push(BoardEvent::Created {
            id: bubble.id,
            color: bubble.color,
            position: bubble.position,
        });
    }
}
