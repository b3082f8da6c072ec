//! # bfpilot game core
//!
//! The platformer and the machinery that lets a sequence model drive it:
//!
//! - [`GameLogic`]: owned game state - player physics, platforms, goal
//! - [`Scheduler`]: the action queue and its asynchronous refill
//!   discipline (one action consumed per tick, at most one oracle call
//!   in flight, stale results discarded by generation token)
//! - [`Trainer`]: the continuous background retraining loop
//! - [`StatusEvent`]: human-readable progress for an external display
//!
//! The frame loop wires these together: `maybe_refill`, `tick`, `apply`,
//! `update`, once per frame. Everything long-running happens on spawned
//! tasks; the frame tick never blocks.

pub mod logic;
pub mod scheduler;
pub mod seed;
pub mod status;
pub mod trainer;

pub use logic::{GameLogic, PhysicsConfig, Player, Rect, GOAL_SCORE, PLAYER_SIZE};
pub use scheduler::{ControlMode, Scheduler, SchedulerConfig};
pub use seed::{derive_seed, GameSnapshot};
pub use status::{emit, status_channel, StatusEvent, StatusReceiver, StatusSender};
pub use trainer::{Trainer, TrainerConfig};
