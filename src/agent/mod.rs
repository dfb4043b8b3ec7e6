//! Policy engines that turn throughput samples into movement
//! recommendations.
//!
//! Two engines share the same contract (take the current position and
//! speeds, consult the sample store, return a [`Recommendation`]) but learn
//! differently:
//!
//! - [`QTableAgent`] keeps a sparse table of (position, action) values and
//!   applies the one-step Q-learning backup on every recommendation.
//! - [`DqnAgent`] approximates action values with a neural network, stores
//!   transitions in a bounded replay buffer and trains on random
//!   minibatches with a decaying exploration rate.
//!
//! Both engines score a candidate move with the same reward: a fixed linear
//! weighting of the predicted speed change, favoring download improvement.
//!
//! [`Recommendation`]: crate::types::Recommendation

pub mod dqn;
pub mod tabular;

pub use dqn::{DqnAgent, DqnAgentBuilder};
pub use tabular::QTableAgent;

/// Reward for moving from the current speeds to the predicted ones:
/// `0.7 * download_change + 0.3 * upload_change`.
pub fn speed_reward(
    current_upload: f64,
    current_download: f64,
    predicted_upload: f64,
    predicted_download: f64,
) -> f64 {
    let download_change = predicted_download - current_download;
    let upload_change = predicted_upload - current_upload;
    0.7 * download_change + 0.3 * upload_change
}
