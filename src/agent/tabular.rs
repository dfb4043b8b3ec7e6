use rand::seq::SliceRandom;
use rand::{rngs::ThreadRng, Rng};
use std::collections::HashMap;

use crate::agent::speed_reward;
use crate::error::{Result, SignalRlError};
use crate::store::SampleStore;
use crate::types::{calculate_directions, Action, Position, Recommendation};

/// Tabular Q-learning policy engine.
///
/// Keeps a sparse mapping from (position, action) to a learned value; a
/// missing entry means 0.0. The table grows as new positions are visited
/// and is never evicted. Action selection is epsilon-greedy with a fixed
/// exploration rate.
///
/// # Example
///
/// ```rust
/// use signal_rl::agent::QTableAgent;
/// use signal_rl::store::{MemoryStore, SpeedSample};
/// use signal_rl::types::Position;
///
/// let mut store = MemoryStore::new();
/// store.insert(
///     Position::new(1, 0),
///     SpeedSample { upload_speed: 12.0, download_speed: 48.0, timestamp: 0 },
/// );
///
/// let mut agent = QTableAgent::new(0.1, 0.9, 0.1);
/// let rec = agent.recommend(Position::new(0, 0), 10.0, 20.0, &store).unwrap();
/// assert_eq!(rec.next_position, Position::new(0, 0).step(rec.recommended_action));
/// ```
pub struct QTableAgent {
    q_table: HashMap<(Position, Action), f64>,
    /// Learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Exploration rate
    pub epsilon: f64,
    rng: ThreadRng,
}

impl QTableAgent {
    pub fn new(alpha: f64, gamma: f64, epsilon: f64) -> Self {
        QTableAgent {
            q_table: HashMap::new(),
            alpha,
            gamma,
            epsilon,
            rng: rand::thread_rng(),
        }
    }

    /// Learned value for (state, action); 0.0 when the pair was never seen.
    pub fn get_value(&self, state: Position, action: Action) -> f64 {
        self.q_table.get(&(state, action)).copied().unwrap_or(0.0)
    }

    /// Number of (state, action) pairs with a stored value.
    pub fn table_len(&self) -> usize {
        self.q_table.len()
    }

    /// Epsilon-greedy action selection. Exploitation picks the action with
    /// the highest stored value for `state`; ties go to the action listed
    /// first in [`Action::ALL`].
    pub fn choose_action(&mut self, state: Position) -> Action {
        if self.rng.gen::<f64>() < self.epsilon {
            return *Action::ALL
                .choose(&mut self.rng)
                .expect("action set is non-empty by construction");
        }
        self.greedy_action(state)
    }

    fn greedy_action(&self, state: Position) -> Action {
        let mut best = Action::ALL[0];
        let mut best_value = self.get_value(state, best);
        for &action in &Action::ALL[1..] {
            let value = self.get_value(state, action);
            if value > best_value {
                best = action;
                best_value = value;
            }
        }
        best
    }

    /// One-step Q-learning backup:
    /// `new = old + alpha * (reward + gamma * max_a Q(next_state, a) - old)`.
    pub fn update_value(&mut self, state: Position, action: Action, reward: f64, next_state: Position) {
        let max_q_next = Action::ALL
            .iter()
            .map(|&a| self.get_value(next_state, a))
            .fold(f64::NEG_INFINITY, f64::max);
        let old_q = self.get_value(state, action);
        let new_q = old_q + self.alpha * (reward + self.gamma * max_q_next - old_q);
        self.q_table.insert((state, action), new_q);
    }

    /// Recommend a move from `current_position` given the currently
    /// observed speeds.
    ///
    /// Chooses an action, looks the resulting position up in the store (an
    /// absent position predicts 0.0 speeds; the engine does not
    /// interpolate), scores the move with [`speed_reward`], applies the
    /// Q-learning backup for the observed transition and returns the
    /// structured recommendation. Fails with [`SignalRlError::NoData`] when
    /// the store holds no samples; no retries are attempted.
    pub fn recommend(
        &mut self,
        current_position: Position,
        current_upload_speed: f64,
        current_download_speed: f64,
        store: &dyn SampleStore,
    ) -> Result<Recommendation> {
        if store.is_empty() {
            return Err(SignalRlError::NoData);
        }

        let action = self.choose_action(current_position);
        let next_position = current_position.step(action);

        let (predicted_upload_speed, predicted_download_speed) = match store.find(next_position) {
            Some(sample) => (sample.upload_speed, sample.download_speed),
            None => (0.0, 0.0),
        };

        let reward = speed_reward(
            current_upload_speed,
            current_download_speed,
            predicted_upload_speed,
            predicted_download_speed,
        );
        self.update_value(current_position, action, reward, next_position);

        Ok(Recommendation {
            recommended_action: action,
            next_position,
            directions: calculate_directions(current_position, next_position),
            predicted_upload_speed,
            predicted_download_speed,
        })
    }
}

impl Default for QTableAgent {
    /// Default hyperparameters: `alpha = 0.1`, `gamma = 0.9`,
    /// `epsilon = 0.1`.
    fn default() -> Self {
        Self::new(0.1, 0.9, 0.1)
    }
}
