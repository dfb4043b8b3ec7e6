use ndarray::{Array1, ArrayView1};
use rand::{rngs::ThreadRng, Rng};

use crate::agent::speed_reward;
use crate::error::{Result, SignalRlError};
use crate::network::{Activation, Approximator, Layer, NeuralNetwork};
use crate::optimizer::{Adam, OptimizerWrapper};
use crate::replay_buffer::{ReplayBuffer, Transition};
use crate::store::SampleStore;
use crate::types::{calculate_directions, Action, Position, Recommendation};

/// Neural (DQN) policy engine.
///
/// Approximates action values with a trainable function (by default a small
/// [`NeuralNetwork`]; any [`Approximator`] substitutes). Transitions are
/// stored in a bounded replay buffer and trained on in random minibatches,
/// which decorrelates consecutive observations and stabilizes learning.
/// Exploration starts fully random (`epsilon = 1.0`) and decays
/// multiplicatively after every training batch down to a floor.
///
/// # Example
///
/// ```rust
/// use signal_rl::agent::DqnAgent;
/// use ndarray::array;
///
/// let mut agent = DqnAgent::new(2, 4);
/// let action = agent.choose_action(array![0.0, 0.0].view());
/// assert!(action < 4);
/// ```
pub struct DqnAgent<A: Approximator = NeuralNetwork> {
    pub approximator: A,
    pub buffer: ReplayBuffer,
    /// Discount factor
    pub gamma: f32,
    /// Exploration rate, within `[epsilon_min, 1.0]`
    pub epsilon: f32,
    /// Exploration floor; decay never goes below this
    pub epsilon_min: f32,
    /// Multiplicative decay applied to epsilon after each training batch
    pub epsilon_decay: f32,
    /// Learning rate handed to the approximator's fit step
    pub learning_rate: f32,
    /// Minibatch size used by [`DqnAgent::recommend`]
    pub batch_size: usize,
    action_size: usize,
    rng: ThreadRng,
}

impl DqnAgent<NeuralNetwork> {
    /// Create an agent with the default architecture: two ReLU hidden
    /// layers of 24 units, a linear output scoring each action, and an Adam
    /// optimizer.
    pub fn new(state_size: usize, action_size: usize) -> Self {
        assert!(state_size > 0 && action_size > 0);

        let layers = vec![
            Layer::new(state_size, 24, Activation::Relu),
            Layer::new(24, 24, Activation::Relu),
            Layer::new(24, action_size, Activation::Linear),
        ];
        let optimizer = OptimizerWrapper::Adam(Adam::default(&layers));
        let network = NeuralNetwork { layers, optimizer };

        Self::with_approximator(network, action_size)
    }

    /// Persist the approximator's parameters. The replay buffer and epsilon
    /// are transient and not written.
    pub fn save(&self, path: &str) -> Result<()> {
        self.approximator.save(path)
    }

    /// Restore approximator parameters previously written by
    /// [`DqnAgent::save`], replacing the current ones. Buffer and epsilon
    /// are left as they are.
    pub fn load(&mut self, path: &str) -> Result<()> {
        self.approximator = NeuralNetwork::load(path)?;
        Ok(())
    }
}

impl<A: Approximator> DqnAgent<A> {
    /// Default hyperparameters matching [`DqnAgentBuilder`]:
    /// `gamma = 0.95`, `epsilon = 1.0` decaying by `0.995` to a floor of
    /// `0.01`, `learning_rate = 0.001`, buffer capacity 2000, batch size 32.
    pub fn with_approximator(approximator: A, action_size: usize) -> Self {
        assert!(action_size > 0, "action set is non-empty by construction");
        DqnAgent {
            approximator,
            buffer: ReplayBuffer::new(2000),
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            learning_rate: 0.001,
            batch_size: 32,
            action_size,
            rng: rand::thread_rng(),
        }
    }

    pub fn action_size(&self) -> usize {
        self.action_size
    }

    /// Epsilon-greedy action selection over the approximator's predicted
    /// values. Exploitation returns the index of the maximum prediction,
    /// lowest index winning ties.
    pub fn choose_action(&mut self, state: ArrayView1<f32>) -> usize {
        if self.rng.gen::<f32>() < self.epsilon {
            return self.rng.gen_range(0..self.action_size);
        }
        let q_values = self.approximator.predict(state);
        assert_eq!(
            q_values.len(),
            self.action_size,
            "approximator output size must match the action set"
        );
        argmax(&q_values)
    }

    /// Append a transition to the replay buffer, evicting the oldest entry
    /// once capacity is reached.
    pub fn remember(
        &mut self,
        state: Array1<f32>,
        action: usize,
        reward: f32,
        next_state: Array1<f32>,
        done: bool,
    ) {
        assert!(action < self.action_size, "action index out of range");
        self.buffer.push(Transition {
            state,
            action,
            reward,
            next_state,
            done,
        });
    }

    /// Train on one random minibatch of stored transitions.
    ///
    /// A strict no-op (weights and epsilon untouched) while the buffer
    /// holds fewer than `batch_size` transitions. Otherwise each sampled
    /// transition gets a Bellman target (`reward` alone when terminal, else
    /// `reward + gamma * max` predicted value at the next state) and the
    /// approximator is fit toward its own prediction with only the taken
    /// action's entry replaced. All targets are validated before the first
    /// fit, so a non-finite target fails the whole batch with no partial
    /// weight update. After a full batch, epsilon decays toward its floor.
    pub fn replay(&mut self, batch_size: usize) -> Result<()> {
        if self.buffer.len() < batch_size {
            return Ok(());
        }

        let batch = self.buffer.sample(batch_size);
        let mut fits: Vec<(&Array1<f32>, Array1<f32>)> = Vec::with_capacity(batch.len());
        for transition in batch {
            let target = if transition.done {
                transition.reward
            } else {
                let next_q = self.approximator.predict(transition.next_state.view());
                transition.reward + self.gamma * max_value(&next_q)
            };
            if !target.is_finite() {
                return Err(SignalRlError::TrainingError(format!(
                    "non-finite Bellman target {} for action {}",
                    target, transition.action
                )));
            }

            let mut targets = self.approximator.predict(transition.state.view());
            targets[transition.action] = target;
            fits.push((&transition.state, targets));
        }

        for (state, targets) in fits {
            self.approximator.fit(state.view(), targets.view(), self.learning_rate);
        }

        self.epsilon = (self.epsilon * self.epsilon_decay).max(self.epsilon_min);
        Ok(())
    }

    /// Recommend a move from `current_position` given the currently
    /// observed speeds.
    ///
    /// Chooses an action on the position's state vector, looks the
    /// resulting position up in the store (an absent position predicts 0.0
    /// speeds), scores the move with [`speed_reward`], records the
    /// transition and runs one [`DqnAgent::replay`] pass with the
    /// configured batch size. Fails with [`SignalRlError::NoData`] when the
    /// store holds no samples.
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

        let state = current_position.to_state();
        let action_index = self.choose_action(state.view());
        let action = Action::from_index(action_index);
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
        ) as f32;

        self.remember(state, action_index, reward, next_position.to_state(), false);
        self.replay(self.batch_size)?;

        Ok(Recommendation {
            recommended_action: action,
            next_position,
            directions: calculate_directions(current_position, next_position),
            predicted_upload_speed,
            predicted_download_speed,
        })
    }
}

fn max_value(values: &Array1<f32>) -> f32 {
    assert!(!values.is_empty(), "action set is non-empty by construction");
    values.iter().fold(f32::NEG_INFINITY, |max, &v| max.max(v))
}

// Index of the maximum value, lowest index winning ties.
fn argmax(values: &Array1<f32>) -> usize {
    assert!(!values.is_empty(), "action set is non-empty by construction");
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Builder for [`DqnAgent`] with the default network backend.
pub struct DqnAgentBuilder {
    state_size: usize,
    action_size: usize,
    gamma: f32,
    epsilon: f32,
    epsilon_min: f32,
    epsilon_decay: f32,
    learning_rate: f32,
    buffer_capacity: usize,
    batch_size: usize,
}

impl DqnAgentBuilder {
    pub fn new(state_size: usize, action_size: usize) -> Self {
        DqnAgentBuilder {
            state_size,
            action_size,
            gamma: 0.95,
            epsilon: 1.0,
            epsilon_min: 0.01,
            epsilon_decay: 0.995,
            learning_rate: 0.001,
            buffer_capacity: 2000,
            batch_size: 32,
        }
    }

    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn epsilon_min(mut self, epsilon_min: f32) -> Self {
        self.epsilon_min = epsilon_min;
        self
    }

    pub fn epsilon_decay(mut self, epsilon_decay: f32) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn build(self) -> DqnAgent<NeuralNetwork> {
        assert!(
            self.epsilon_min <= self.epsilon,
            "epsilon floor must not exceed the initial epsilon"
        );
        assert!((0.0..=1.0).contains(&self.epsilon_decay));
        assert!(self.batch_size > 0);

        let mut agent = DqnAgent::new(self.state_size, self.action_size);
        agent.buffer = ReplayBuffer::new(self.buffer_capacity);
        agent.gamma = self.gamma;
        agent.epsilon = self.epsilon;
        agent.epsilon_min = self.epsilon_min;
        agent.epsilon_decay = self.epsilon_decay;
        agent.learning_rate = self.learning_rate;
        agent.batch_size = self.batch_size;
        agent
    }
}
