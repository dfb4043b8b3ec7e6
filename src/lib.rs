//! # signal-rl - Movement Recommendations over a Signal Mesh
//!
//! signal-rl learns where better network throughput lives. It consumes
//! geotagged upload/download samples and recommends a next movement
//! direction using one of two reinforcement-learning policy engines: a
//! tabular Q-learning agent and a neural (DQN) agent with experience
//! replay.
//!
//! The engines expose pure computational contracts: they take a position,
//! the currently observed speeds and a read-only store handle, and return a
//! structured recommendation. Network I/O, persistence daemons and
//! rendering belong to the hosting service.
//!
//! ## Quick Start
//!
//! ```rust
//! use signal_rl::agent::{DqnAgent, QTableAgent};
//! use signal_rl::store::{MemoryStore, SpeedSample};
//! use signal_rl::types::Position;
//!
//! let mut store = MemoryStore::new();
//! store.insert(
//!     Position::new(0, 1),
//!     SpeedSample { upload_speed: 18.0, download_speed: 55.0, timestamp: 1_700_000_000 },
//! );
//!
//! // Tabular engine
//! let mut q_agent = QTableAgent::default();
//! let rec = q_agent.recommend(Position::new(0, 0), 10.0, 20.0, &store).unwrap();
//! println!("go {} to {}", rec.recommended_action, rec.next_position);
//!
//! // Neural engine (2-dimensional state, 4 actions)
//! let mut dqn_agent = DqnAgent::new(2, 4);
//! let rec = dqn_agent.recommend(Position::new(0, 0), 10.0, 20.0, &store).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - The two policy engines and the shared reward function
//! - [`error`] - Error types and result handling
//! - [`network`] - Action-value approximator and the [`network::Approximator`] trait
//! - [`optimizer`] - Gradient-descent optimizers (SGD, Adam)
//! - [`replay_buffer`] - Bounded experience replay
//! - [`store`] - Sample store trait and in-memory implementation
//! - [`types`] - Positions, actions and recommendations

pub mod agent;
pub mod error;
pub mod network;
pub mod optimizer;
pub mod replay_buffer;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;
