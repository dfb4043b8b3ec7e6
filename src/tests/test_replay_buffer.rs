use ndarray::array;

use crate::replay_buffer::{ReplayBuffer, Transition};

fn transition(i: usize) -> Transition {
    Transition {
        state: array![i as f32],
        action: i % 4,
        reward: i as f32,
        next_state: array![(i + 1) as f32],
        done: false,
    }
}

#[test]
fn test_push_and_sample() {
    let mut buffer = ReplayBuffer::new(10);
    let t = transition(0);
    buffer.push(t.clone());
    assert_eq!(buffer.len(), 1);
    let sample = buffer.sample(1);
    assert_eq!(sample[0], &t);
}

#[test]
fn test_capacity_evicts_oldest_in_order() {
    let mut buffer = ReplayBuffer::new(3);

    // Insert capacity + 2 transitions
    for i in 0..5 {
        buffer.push(transition(i));
    }

    // The 2 oldest are gone; survivors keep their relative order
    assert_eq!(buffer.len(), 3);
    let states: Vec<f32> = buffer.iter().map(|t| t.state[0]).collect();
    assert_eq!(states, vec![2.0, 3.0, 4.0]);
}

#[test]
fn test_is_empty() {
    let mut buffer = ReplayBuffer::new(10);
    assert!(buffer.is_empty());
    buffer.push(transition(0));
    assert!(!buffer.is_empty());
}

#[test]
fn test_sample_without_replacement() {
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..8 {
        buffer.push(transition(i));
    }

    let sampled = buffer.sample(8);
    assert_eq!(sampled.len(), 8);

    // Without replacement: every stored transition appears exactly once
    let mut rewards: Vec<f32> = sampled.iter().map(|t| t.reward).collect();
    rewards.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(rewards, (0..8).map(|i| i as f32).collect::<Vec<_>>());
}

#[test]
fn test_sample_more_than_stored_returns_all() {
    let mut buffer = ReplayBuffer::new(10);
    for i in 0..5 {
        buffer.push(transition(i));
    }
    assert_eq!(buffer.sample(10).len(), 5);
}

#[test]
fn test_eviction_after_wraparound_keeps_order() {
    let mut buffer = ReplayBuffer::new(4);
    for i in 0..11 {
        buffer.push(transition(i));
    }
    let states: Vec<f32> = buffer.iter().map(|t| t.state[0]).collect();
    assert_eq!(states, vec![7.0, 8.0, 9.0, 10.0]);
}
