//! Bounded experience replay for the neural policy engine.

use ndarray::Array1;
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::VecDeque;

/// One observed step: state, chosen action index, reward, resulting state
/// and terminal flag. Owned by the buffer until sampled, never mutated
/// after insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f32>,
    pub action: usize,
    pub reward: f32,
    pub next_state: Array1<f32>,
    pub done: bool,
}

/// Fixed-capacity ring buffer of transitions. Once full, pushing evicts the
/// oldest entry; surviving entries keep their relative order.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay buffer capacity must be nonzero");
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Uniform random sample of `batch_size` transitions without
    /// replacement. Returns all transitions when fewer are stored.
    pub fn sample(&self, batch_size: usize) -> Vec<&Transition> {
        let mut rng = thread_rng();
        let mut indices = (0..self.buffer.len()).collect::<Vec<usize>>();
        indices.shuffle(&mut rng);
        indices.truncate(batch_size);
        indices.into_iter().map(|i| &self.buffer[i]).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Transitions in insertion order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }
}
