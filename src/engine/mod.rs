//! Side-scrolling platformer simulation.
//!
//! `World` owns everything that moves: the player, the fixed platform list, jump
//! particles and the camera. It is advanced once per display frame by `update`
//! (explicit Euler, one frame = one unit step) and drawn by [`render::render`],
//! which only ever sees a shared borrow.
//!
//! The world never calls out. Jumps, gene-edit requests and the fall-death are
//! pushed onto an outbox which the session drains after each frame.

use rand::Rng;
use rand::rngs::SmallRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::input::InputState;
use crate::puzzle::Rewards;

pub mod render;

pub const MAX_HEALTH: u8 = 100;
const JUMP_PARTICLE_RGB: (u8, u8, u8) = (0, 255, 255);

// --- Entities ----------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlatformKind {
    /// Plain DNA strand.
    Plain,
    /// Gene platform: standing in it allows a gene edit.
    Interactive,
}

/// Gene-edit buffs. Multipliers start at 1.0 and only ever grow within a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Abilities {
    pub jump_multiplier: f64,
    pub speed_multiplier: f64,
    pub shield: bool,
}

impl Default for Abilities {
    fn default() -> Self {
        Self { jump_multiplier: 1.0, speed_multiplier: 1.0, shield: false }
    }
}

impl Abilities {
    /// Grant whatever the rewards carry, keep the prior value for everything else.
    pub fn merge(&mut self, rewards: &Rewards) {
        if let Some(m) = rewards.jump_multiplier {
            self.jump_multiplier = self.jump_multiplier.max(m);
        }
        if let Some(m) = rewards.speed_multiplier {
            self.speed_multiplier = self.speed_multiplier.max(m);
        }
        self.shield |= rewards.shield;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vx: f64,
    pub vy: f64,
    pub grounded: bool,
    pub health: u8,
    pub abilities: Abilities,
}

impl Player {
    fn spawn(config: &GameConfig) -> Self {
        Self {
            x: config.spawn.0,
            y: config.spawn.1,
            width: config.player_size.0,
            height: config.player_size.1,
            vx: 0.0,
            vy: 0.0,
            grounded: false,
            health: MAX_HEALTH,
            abilities: Abilities::default(),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    fn overlaps(&self, p: &Platform) -> bool {
        self.x < p.x + p.width
            && self.x + self.width > p.x
            && self.y < p.y + p.height
            && self.y + self.height > p.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: PlatformKind,
    /// Player is standing on it this frame. Recomputed every update.
    pub glowing: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub life: u32,
    pub max_life: u32,
    pub rgb: (u8, u8, u8),
}

impl Particle {
    /// Fade-out alpha in 0..=1.
    pub fn alpha(&self) -> f64 {
        if self.max_life == 0 { 0.0 } else { self.life as f64 / self.max_life as f64 }
    }
}

/// Horizontal-only camera.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub x: f64,
}

/// Signals raised from inside the simulation step.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Jumped,
    GeneEditRequested { platform: usize, player_x: f64, player_y: f64 },
    GameOver,
}

// --- World -------------------------------------------------------------------

pub struct World {
    config: GameConfig,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub particles: Vec<Particle>,
    pub camera: Camera,
    paused: bool,
    dead: bool,
    events: Vec<GameEvent>,
    rng: SmallRng,
}

impl World {
    pub fn new(config: GameConfig, rng: SmallRng) -> Self {
        let mut world = Self {
            player: Player::spawn(&config),
            platforms: Vec::new(),
            particles: Vec::new(),
            camera: Camera::default(),
            paused: false,
            dead: false,
            events: Vec::new(),
            rng,
            config,
        };
        world.reset();
        world
    }

    /// Fresh player at spawn, platforms unlit, no particles, empty outbox.
    pub fn reset(&mut self) {
        self.player = Player::spawn(&self.config);
        self.platforms = self
            .config
            .platforms
            .iter()
            .map(|s| Platform {
                x: s.x,
                y: s.y,
                width: s.width,
                height: s.height,
                kind: s.kind,
                glowing: false,
            })
            .collect();
        self.particles.clear();
        self.camera = Camera::default();
        self.paused = false;
        self.dead = false;
        self.events.clear();
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Take every event raised since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Merge puzzle rewards into the player's abilities.
    pub fn grant(&mut self, rewards: &Rewards) {
        self.player.abilities.merge(rewards);
    }

    /// Advance one frame. Pending jump / interact actions in `input` are consumed.
    pub fn update(&mut self, input: &mut InputState) {
        if self.paused || self.dead {
            return;
        }
        if input.take_jump() {
            self.jump();
        }

        let cfg = &self.config;
        let p = &mut self.player;

        // Horizontal input; friction decays toward rest without snapping to zero.
        if input.left {
            p.vx = -cfg.base_speed * p.abilities.speed_multiplier;
        } else if input.right {
            p.vx = cfg.base_speed * p.abilities.speed_multiplier;
        } else {
            p.vx *= cfg.friction;
        }

        // No terminal velocity.
        p.vy += cfg.gravity;
        p.x += p.vx;
        p.y += p.vy;

        // Interaction is tested at the integrated position, before landing snaps
        // the player flush onto the platform top.
        if input.take_interact() {
            self.interact();
        }

        self.resolve_landings();
        self.clamp_to_world();

        if self.player.y > self.config.death_y {
            self.player.health = 0;
            self.dead = true;
            self.events.push(GameEvent::GameOver);
        }

        self.camera.x = (self.player.x - self.config.camera_lead).max(0.0);
        self.step_particles();
    }

    /// Swept landing test against every platform, in list order. A later platform
    /// may overwrite the snap of an earlier one.
    fn resolve_landings(&mut self) {
        let p = &mut self.player;
        p.grounded = false;
        for plat in &mut self.platforms {
            let landed = p.x < plat.x + plat.width
                && p.x + p.width > plat.x
                && p.bottom() > plat.y
                && p.bottom() < plat.y + plat.height + p.vy;
            if landed {
                p.y = plat.y - p.height;
                p.vy = 0.0;
                p.grounded = true;
            }
            plat.glowing = landed;
        }
    }

    fn clamp_to_world(&mut self) {
        let max_x = self.config.world_width - self.player.width;
        if self.player.x < 0.0 {
            self.player.x = 0.0;
        }
        if self.player.x > max_x {
            self.player.x = max_x;
        }
    }

    fn step_particles(&mut self) {
        for pt in &mut self.particles {
            pt.x += pt.vx;
            pt.y += pt.vy;
            pt.life = pt.life.saturating_sub(1);
        }
        self.particles.retain(|pt| pt.life > 0);
    }

    /// Launch from the ground. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.player.grounded || self.paused || self.dead {
            return false;
        }
        self.player.vy = self.config.jump_force * self.player.abilities.jump_multiplier;
        self.player.grounded = false;
        let feet_x = self.player.x + self.player.width / 2.0;
        let feet_y = self.player.bottom();
        self.burst(feet_x, feet_y, JUMP_PARTICLE_RGB, self.config.jump_burst);
        self.events.push(GameEvent::Jumped);
        true
    }

    /// Request a gene edit if the player overlaps an interactive platform. The first
    /// overlapping platform in list order wins.
    pub fn interact(&mut self) -> Option<usize> {
        let idx = self
            .platforms
            .iter()
            .position(|plat| plat.kind == PlatformKind::Interactive && self.player.overlaps(plat))?;
        self.events.push(GameEvent::GeneEditRequested {
            platform: idx,
            player_x: self.player.x,
            player_y: self.player.y,
        });
        Some(idx)
    }

    fn burst(&mut self, x: f64, y: f64, rgb: (u8, u8, u8), count: usize) {
        let life = self.config.particle_life;
        for _ in 0..count {
            let rng = &mut self.rng;
            self.particles.push(Particle {
                x: x + rng.gen_range(-0.5..0.5) * 20.0,
                y: y + rng.gen_range(-0.5..0.5) * 10.0,
                vx: rng.gen_range(-0.5..0.5) * 4.0,
                vy: rng.gen_range(-0.5..0.5) * 4.0 - 2.0,
                life,
                max_life: life,
                rgb,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn world() -> World {
        World::new(GameConfig::default(), SmallRng::seed_from_u64(7))
    }

    fn held(left: bool, right: bool) -> InputState {
        let mut input = InputState::default();
        input.left = left;
        input.right = right;
        input
    }

    /// Player resting on the first platform (top at y=450).
    fn grounded_world() -> World {
        let mut w = world();
        w.player.x = 50.0;
        w.player.y = 450.0 - w.player.height;
        w.update(&mut InputState::default());
        assert!(w.player.grounded);
        w
    }

    #[test]
    fn landing_zeroes_velocity_and_grounds() {
        let mut w = world();
        w.player.x = 50.0;
        w.player.y = 405.0; // bottom at 445
        w.player.vy = 6.0;
        w.update(&mut InputState::default());
        assert!(w.player.grounded);
        assert_eq!(w.player.vy, 0.0);
        assert_eq!(w.player.bottom(), 450.0);
        assert!(w.platforms[0].glowing);
        assert!(w.platforms[1..].iter().all(|p| !p.glowing));
    }

    #[test]
    fn glow_is_recomputed_each_frame() {
        let mut w = grounded_world();
        assert!(w.platforms[0].glowing);
        assert!(w.jump());
        w.update(&mut InputState::default());
        assert!(!w.platforms[0].glowing);
    }

    #[test]
    fn falling_past_threshold_is_fatal_once() {
        let mut w = world();
        w.player.x = 1100.0; // nothing below
        w.player.y = 590.0;
        w.player.vy = 14.2; // +0.8 gravity = 15
        w.update(&mut InputState::default());
        assert!((w.player.y - 605.0).abs() < 1e-9);
        assert_eq!(w.player.health, 0);
        assert_eq!(w.drain_events(), vec![GameEvent::GameOver]);
        w.update(&mut InputState::default());
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn shield_and_buffs_do_not_prevent_fall_death() {
        for vy in [0.0, 14.2, 60.0] {
            let mut w = world();
            w.grant(&Rewards { jump_multiplier: Some(1.5), speed_multiplier: Some(1.3), shield: true });
            w.player.abilities.jump_multiplier = 10.0;
            w.player.x = 1100.0;
            w.player.y = 600.0 - vy; // one frame later: 600.8
            w.player.vy = vy;
            w.update(&mut held(false, true));
            assert!(w.player.y > 600.0, "vy {vy}");
            assert_eq!(w.player.health, 0, "vy {vy}");
            assert_eq!(w.drain_events(), vec![GameEvent::GameOver], "vy {vy}");
        }
    }

    #[test]
    fn friction_decays_without_snapping() {
        let mut w = world();
        w.player.vx = 5.0;
        w.update(&mut InputState::default());
        assert!((w.player.vx - 4.0).abs() < 1e-9);
        for _ in 0..30 {
            w.update(&mut InputState::default());
        }
        assert!(w.player.vx > 0.0);
    }

    #[test]
    fn movement_uses_speed_multiplier_and_left_wins() {
        let mut w = world();
        w.player.abilities.speed_multiplier = 1.3;
        w.update(&mut held(true, true));
        assert!((w.player.vx + 6.5).abs() < 1e-9);
    }

    #[test]
    fn world_bounds_clamp_both_edges() {
        let mut w = world();
        w.player.x = 2.0;
        w.update(&mut held(true, false));
        assert_eq!(w.player.x, 0.0);
        w.player.x = 1168.0;
        w.update(&mut held(false, true));
        assert_eq!(w.player.x, 1170.0);
    }

    #[test]
    fn camera_keeps_lead_and_never_negative() {
        let mut w = world();
        w.update(&mut InputState::default());
        assert_eq!(w.camera.x, 0.0);
        w.player.x = 700.0;
        w.update(&mut InputState::default());
        assert!((w.camera.x - (w.player.x - 400.0)).abs() < 1e-9);
    }

    #[test]
    fn jump_requires_ground_and_emits_burst() {
        let mut w = world();
        assert!(!w.jump());
        let mut w = grounded_world();
        w.drain_events();
        assert!(w.jump());
        assert!(!w.player.grounded);
        assert_eq!(w.player.vy, -15.0);
        assert_eq!(w.particles.len(), 5);
        assert_eq!(w.drain_events(), vec![GameEvent::Jumped]);
    }

    #[test]
    fn jump_scales_with_multiplier_and_respects_pause() {
        let mut w = grounded_world();
        w.player.abilities.jump_multiplier = 1.5;
        w.set_paused(true);
        assert!(!w.jump());
        w.set_paused(false);
        assert!(w.jump());
        assert_eq!(w.player.vy, -22.5);
    }

    #[test]
    fn particles_age_and_expire() {
        let mut w = grounded_world();
        w.jump();
        for _ in 0..59 {
            w.update(&mut InputState::default());
        }
        assert_eq!(w.particles.len(), 5);
        assert!(w.particles.iter().all(|p| p.life == 1));
        w.update(&mut InputState::default());
        assert!(w.particles.is_empty());
    }

    #[test]
    fn interact_picks_first_overlapping_gene_platform() {
        let mut w = world();
        w.player.x = 460.0;
        w.player.y = 340.0; // straddles the gene platform at y=350
        assert_eq!(w.interact(), Some(2));
        match w.drain_events().as_slice() {
            [GameEvent::GeneEditRequested { platform, .. }] => assert_eq!(*platform, 2),
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn interact_ignores_plain_platforms_and_empty_space() {
        let mut w = world();
        w.player.x = 50.0;
        w.player.y = 440.0;
        assert_eq!(w.interact(), None);
        w.player.y = 100.0;
        assert_eq!(w.interact(), None);
        assert!(w.drain_events().is_empty());
    }

    #[test]
    fn pending_interact_works_while_standing_on_gene_platform() {
        let mut w = world();
        w.player.x = 470.0;
        w.player.y = 350.0 - w.player.height;
        w.update(&mut InputState::default());
        assert!(w.player.grounded);
        let mut input = InputState::default();
        input.press_interact();
        w.update(&mut input);
        assert!(matches!(
            w.drain_events().as_slice(),
            [GameEvent::GeneEditRequested { platform: 2, .. }]
        ));
    }

    #[test]
    fn rewards_never_lower_abilities() {
        let mut w = world();
        w.grant(&Rewards { jump_multiplier: Some(1.5), speed_multiplier: None, shield: true });
        w.grant(&Rewards::default());
        let a = w.player.abilities;
        assert_eq!(a.jump_multiplier, 1.5);
        assert_eq!(a.speed_multiplier, 1.0);
        assert!(a.shield);
    }

    #[test]
    fn reset_restores_spawn_state() {
        let mut w = grounded_world();
        w.jump();
        w.grant(&Rewards { jump_multiplier: Some(1.5), speed_multiplier: Some(1.3), shield: true });
        w.reset();
        assert_eq!(w.player.x, 100.0);
        assert_eq!(w.player.health, MAX_HEALTH);
        assert_eq!(w.player.abilities, Abilities::default());
        assert!(w.particles.is_empty());
        assert!(w.drain_events().is_empty());
    }
}
