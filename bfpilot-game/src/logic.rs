//! # Game logic
//!
//! The platformer core: player kinematics, AABB collision against
//! platforms, and level/goal progression. Rendering is an external
//! collaborator that reads this state; nothing here touches a canvas.
//!
//! All game state lives in one owned struct passed by reference to
//! whoever needs it - there are no ambient globals.

use crate::seed::GameSnapshot;
use bfpilot_vm::Action;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Physics tunables.
///
/// Defaults match the original prototype's feel: heavy friction, light
/// gravity, a jump that clears roughly three player heights.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsConfig {
    /// Visible world width; levels span twice this
    pub world_width: f64,
    /// World height; the ground sits at the bottom
    pub world_height: f64,
    /// Downward acceleration per tick
    pub gravity: f64,
    /// Horizontal acceleration per move action
    pub acceleration: f64,
    /// Horizontal speed clamp
    pub max_speed: f64,
    /// Per-tick multiplier on horizontal velocity
    pub friction: f64,
    /// Upward velocity granted by a jump
    pub jump_strength: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            world_width: 800.0,
            world_height: 500.0,
            gravity: 0.5,
            acceleration: 0.5,
            max_speed: 5.0,
            friction: 0.9,
            jump_strength: 12.0,
        }
    }
}

/// Player hitbox edge length
pub const PLAYER_SIZE: f64 = 30.0;

/// Goal hitbox edge length
pub const GOAL_SIZE: f64 = 30.0;

/// Score awarded for reaching the goal
pub const GOAL_SCORE: u64 = 100;

/// An axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Standard AABB overlap test
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// The player's kinematic state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub x_velocity: f64,
    pub y_velocity: f64,
    /// Set while not standing on a platform; gates jumping
    pub airborne: bool,
}

impl Player {
    fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, PLAYER_SIZE, PLAYER_SIZE)
    }
}

/// The owned game state: player, level geometry, and progression.
#[derive(Debug)]
pub struct GameLogic {
    config: PhysicsConfig,
    player: Player,
    platforms: Vec<Rect>,
    goal: Rect,
    level: u32,
    score: u64,
    rng: StdRng,
}

impl GameLogic {
    /// Create a game with entropy-seeded level generation
    pub fn new(config: PhysicsConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a game with a fixed seed (deterministic levels, for tests)
    pub fn with_seed(config: PhysicsConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: PhysicsConfig, rng: StdRng) -> Self {
        let mut game = Self {
            config,
            player: Player {
                x: 50.0,
                y: config.world_height - 100.0,
                x_velocity: 0.0,
                y_velocity: 0.0,
                airborne: true,
            },
            platforms: Vec::new(),
            goal: Rect::new(0.0, 0.0, GOAL_SIZE, GOAL_SIZE),
            level: 1,
            score: 0,
            rng,
        };
        game.generate_level();
        game
    }

    /// Build the current level: a full-width ground strip, `5 + level`
    /// random platforms, and a goal placed further out each level. The
    /// player is reset to the start with velocities cleared.
    pub fn generate_level(&mut self) {
        let w = self.config.world_width;
        let h = self.config.world_height;

        self.platforms.clear();
        self.platforms.push(Rect::new(0.0, h - 50.0, w * 2.0, 50.0));

        let count = 5 + self.level as usize;
        for _ in 0..count {
            let x = self.rng.gen_range(0.0..(w * 2.0 - 100.0)) + 50.0;
            let y = self.rng.gen_range(0.0..(h - 150.0)) + 100.0;
            let width = self.rng.gen_range(0.0..100.0) + 50.0;
            self.platforms.push(Rect::new(x, y, width, 20.0));
        }

        self.goal = Rect::new(
            w * 1.5 + f64::from(self.level) * 50.0,
            h - 100.0,
            GOAL_SIZE,
            GOAL_SIZE,
        );

        self.player.x = 50.0;
        self.player.y = h - 100.0;
        self.player.x_velocity = 0.0;
        self.player.y_velocity = 0.0;
        self.player.airborne = true;
    }

    /// Apply one discrete action to the player.
    pub fn apply(&mut self, action: Action) {
        let p = &mut self.player;
        match action {
            Action::MoveLeft => {
                p.x_velocity =
                    (p.x_velocity - self.config.acceleration).max(-self.config.max_speed);
            }
            Action::MoveRight => {
                p.x_velocity =
                    (p.x_velocity + self.config.acceleration).min(self.config.max_speed);
            }
            Action::Jump => {
                if !p.airborne {
                    p.y_velocity = -self.config.jump_strength;
                    p.airborne = true;
                }
            }
            Action::Noop => {}
        }
    }

    /// Advance physics one tick: friction, gravity, platform collision,
    /// goal check, world-floor clamp.
    pub fn update(&mut self) {
        let config = self.config;
        let p = &mut self.player;

        p.x_velocity *= config.friction;
        p.x += p.x_velocity;

        p.y_velocity += config.gravity;
        p.y += p.y_velocity;

        let mut on_ground = false;
        for platform in &self.platforms {
            if p.rect().overlaps(platform) {
                on_ground = true;
                p.y = platform.y - PLAYER_SIZE;
                p.y_velocity = 0.0;
                break;
            }
        }
        p.airborne = !on_ground;

        if self.player.rect().overlaps(&self.goal) {
            self.score += GOAL_SCORE;
            self.level += 1;
            self.generate_level();
            return;
        }

        if self.player.y > config.world_height {
            self.player.y = config.world_height - PLAYER_SIZE;
            self.player.y_velocity = 0.0;
        }
    }

    /// Integral snapshot of the observable state, taken by value.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            player_x: self.player.x.floor() as i64,
            player_y: self.player.y.floor() as i64,
            goal_x: self.goal.x.floor() as i64,
            goal_y: self.goal.y.floor() as i64,
            level: self.level,
            score: self.score,
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn platforms(&self) -> &[Rect] {
        &self.platforms
    }

    pub fn goal(&self) -> &Rect {
        &self.goal
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u64 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> GameLogic {
        GameLogic::with_seed(PhysicsConfig::default(), 7)
    }

    #[test]
    fn test_move_right_accelerates_and_clamps() {
        let mut g = game();
        for _ in 0..50 {
            g.apply(Action::MoveRight);
        }
        assert_eq!(g.player().x_velocity, PhysicsConfig::default().max_speed);
    }

    #[test]
    fn test_friction_decays_velocity() {
        let mut g = game();
        g.apply(Action::MoveRight);
        let before = g.player().x_velocity;
        g.update();
        assert!(g.player().x_velocity.abs() < before.abs());
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut g = game();
        for _ in 0..120 {
            g.update();
        }
        // Standing on the top of some platform (the ground strip, unless
        // a random platform sits over the spawn column)
        assert!(!g.player().airborne);
        let y = g.player().y;
        assert!(g.platforms().iter().any(|p| y == p.y - PLAYER_SIZE));
    }

    #[test]
    fn test_jump_only_when_grounded() {
        let mut g = game();
        for _ in 0..120 {
            g.update();
        }
        assert!(!g.player().airborne);

        g.apply(Action::Jump);
        let rising = g.player().y_velocity;
        assert!(rising < 0.0);

        // A second jump mid-air must not restart the arc
        g.update();
        g.apply(Action::Jump);
        assert!(g.player().y_velocity > rising);
    }

    #[test]
    fn test_goal_advances_level_and_resets() {
        let mut g = game();
        let goal = *g.goal();
        // Drop the player straight onto the goal with no platforms in
        // the way so the collision under test is unambiguous
        g.platforms.clear();
        g.player.x = goal.x;
        g.player.y = goal.y;

        g.update();

        assert_eq!(g.score(), GOAL_SCORE);
        assert_eq!(g.level(), 2);
        assert_eq!(g.player().x, 50.0);
        // Next level has one more random platform (plus the ground)
        assert_eq!(g.platforms().len(), 1 + 5 + 2);
    }

    #[test]
    fn test_seeded_levels_are_deterministic() {
        let a = GameLogic::with_seed(PhysicsConfig::default(), 42);
        let b = GameLogic::with_seed(PhysicsConfig::default(), 42);
        assert_eq!(a.platforms(), b.platforms());
        assert_eq!(a.goal(), b.goal());
    }

    #[test]
    fn test_snapshot_is_integral() {
        let mut g = game();
        g.player.x = 123.9;
        let snap = g.snapshot();
        assert_eq!(snap.player_x, 123);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.score, 0);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching edges do not overlap
        let d = Rect::new(10.0, 0.0, 5.0, 5.0);
        assert!(!a.overlaps(&d));
    }
}
