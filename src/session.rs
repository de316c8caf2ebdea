//! Session state machine: menu -> playing <-> paused -> game over -> menu.
//!
//! The session owns the world and the (optional) open puzzle as disjoint state and
//! glues them together through the world's event outbox. Sound, toasts and the
//! persisted high score are collaborators behind small traits so the whole flow
//! runs on the host in tests.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::engine::{GameEvent, World};
use crate::input::InputState;
use crate::puzzle::{CandidateId, GenePuzzle, MAX_DIFFICULTY, SlotId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Jump,
    GeneEdit,
    GameOver,
}

/// Fire-and-forget audio.
pub trait SoundPlayer {
    fn play(&self, cue: Cue);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
    pub duration_ms: u32,
}

impl Notice {
    fn new(title: &str, body: impl Into<String>, duration_ms: u32) -> Self {
        Self { title: title.to_string(), body: body.into(), duration_ms }
    }
}

pub trait Notifier {
    fn notify(&self, notice: Notice);
}

/// Single persisted scalar. Implementations swallow their own I/O failures.
pub trait ScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, score: u32);
}

/// Sound sink that plays nothing.
pub struct Silent;

impl SoundPlayer for Silent {
    fn play(&self, _cue: Cue) {}
}

impl Notifier for Silent {
    fn notify(&self, _notice: Notice) {}
}

/// Volatile high-score store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: u32,
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.value
    }
    fn save(&mut self, score: u32) {
        self.value = score;
    }
}

/// Which timers / loops the shell must keep alive for the current phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerPlan {
    pub frame_loop: bool,
    pub score_tick: bool,
    pub menu_return: bool,
}

pub struct Session {
    phase: Phase,
    score: u32,
    high_score: u32,
    high_score_announced: bool,
    difficulty: u8,
    world: World,
    puzzle: Option<GenePuzzle>,
    rng: SmallRng,
    sound: Box<dyn SoundPlayer>,
    notifier: Box<dyn Notifier>,
    store: Box<dyn ScoreStore>,
}

impl Session {
    pub fn new(
        config: GameConfig,
        sound: Box<dyn SoundPlayer>,
        notifier: Box<dyn Notifier>,
        store: Box<dyn ScoreStore>,
        mut rng: SmallRng,
    ) -> Self {
        let world_rng = SmallRng::from_rng(&mut rng).unwrap_or_else(|_| SmallRng::seed_from_u64(0));
        let high_score = store.load();
        Self {
            phase: Phase::Menu,
            score: 0,
            high_score,
            high_score_announced: false,
            difficulty: 1,
            world: World::new(config, world_rng),
            puzzle: None,
            rng,
            sound,
            notifier,
            store,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn high_score(&self) -> u32 {
        self.high_score
    }
    pub fn difficulty(&self) -> u8 {
        self.difficulty
    }
    pub fn world(&self) -> &World {
        &self.world
    }
    pub fn puzzle(&self) -> Option<&GenePuzzle> {
        self.puzzle.as_ref()
    }
    pub fn puzzle_open(&self) -> bool {
        self.puzzle.is_some()
    }

    pub fn timer_plan(&self) -> TimerPlan {
        TimerPlan {
            frame_loop: self.phase == Phase::Playing,
            score_tick: self.phase == Phase::Playing,
            menu_return: self.phase == Phase::GameOver,
        }
    }

    /// New game from the menu. Ignored in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Menu {
            return false;
        }
        self.score = 0;
        self.difficulty = 1;
        self.high_score_announced = false;
        self.puzzle = None;
        self.world.reset();
        self.phase = Phase::Playing;
        log::info!("game started (high score {})", self.high_score);
        self.notifier.notify(Notice::new(
            "Gene Jumper Started!",
            "Jump through DNA strands and edit genes to evolve!",
            2_000,
        ));
        true
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            Phase::Menu | Phase::GameOver => return,
        };
        self.world.set_paused(self.phase == Phase::Paused);
    }

    /// Run one simulation frame and react to whatever it raised.
    pub fn frame(&mut self, input: &mut InputState) {
        if self.phase != Phase::Playing {
            return;
        }
        self.world.update(input);
        for event in self.world.drain_events() {
            match event {
                GameEvent::Jumped => self.sound.play(Cue::Jump),
                GameEvent::GeneEditRequested { platform, .. } => {
                    log::debug!("gene edit requested on platform {platform}");
                    self.on_interact();
                }
                GameEvent::GameOver => self.on_game_over(),
            }
        }
        if self.world.player.health == 0 {
            self.on_game_over();
        }
    }

    /// One elapsed second of play.
    pub fn tick_score(&mut self) {
        if self.phase == Phase::Playing {
            self.add_score(1);
        }
    }

    fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        if self.score > self.high_score {
            self.high_score = self.score;
            self.store.save(self.score);
            if !self.high_score_announced {
                self.high_score_announced = true;
                log::info!("new high score {}", self.score);
                self.notifier.notify(Notice::new(
                    "New High Score!",
                    format!("You scored {} points!", self.score),
                    3_000,
                ));
            }
        }
    }

    pub fn on_game_over(&mut self) {
        if !matches!(self.phase, Phase::Playing | Phase::Paused) {
            return;
        }
        self.phase = Phase::GameOver;
        self.puzzle = None;
        self.sound.play(Cue::GameOver);
        log::info!("game over, final score {}", self.score);
        self.notifier.notify(Notice::new(
            "Game Over",
            format!("Final Score: {}. Your DNA integrity has been compromised!", self.score),
            4_000,
        ));
    }

    /// Delayed return after the game-over screen.
    pub fn return_to_menu(&mut self) {
        if self.phase == Phase::GameOver {
            self.phase = Phase::Menu;
        }
    }

    /// Open the gene editor. Scores on opening, whatever the outcome.
    pub fn on_interact(&mut self) -> bool {
        if self.phase != Phase::Playing || self.puzzle.is_some() {
            return false;
        }
        self.puzzle = Some(GenePuzzle::generate(self.difficulty, &mut self.rng));
        self.add_score(10);
        self.sound.play(Cue::GeneEdit);
        log::info!("gene editor opened at difficulty {}", self.difficulty);
        true
    }

    /// Editor input only counts while the game runs; a paused editor is frozen.
    fn editable_puzzle(&mut self) -> Option<&mut GenePuzzle> {
        if self.phase != Phase::Playing {
            return None;
        }
        self.puzzle.as_mut()
    }

    pub fn select_candidate(&mut self, id: CandidateId) -> bool {
        self.editable_puzzle().is_some_and(|p| p.select(id))
    }

    pub fn attempt_pair(&mut self, slot: SlotId) -> bool {
        self.editable_puzzle().is_some_and(|p| p.attempt_pair(slot))
    }

    pub fn reset_puzzle(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        let difficulty = self.difficulty;
        if let Some(p) = self.puzzle.as_mut() {
            p.reset(difficulty, &mut self.rng);
        }
    }

    /// Abandon the editor without rewards.
    pub fn close_puzzle(&mut self) {
        self.puzzle = None;
    }

    /// Apply a finished puzzle: buffs, +50, harder next time, overlay closed.
    pub fn complete_puzzle(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(rewards) = self.puzzle.as_ref().and_then(|p| p.compute_rewards()) else {
            return false;
        };
        self.world.grant(&rewards);
        self.add_score(50);
        self.difficulty = (self.difficulty + 1).min(MAX_DIFFICULTY);
        self.puzzle = None;
        let names = rewards.names();
        log::info!("genetic enhancement complete: {names:?}");
        let body = if names.is_empty() {
            "Gene sequence processed successfully!".to_string()
        } else {
            format!("Unlocked: {}", names.join(", "))
        };
        self.notifier.notify(Notice::new("Genetic Enhancement Complete!", body, 3_000));
        true
    }
}
