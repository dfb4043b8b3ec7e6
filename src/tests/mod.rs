pub mod test_replay_buffer;
pub mod test_tabular;
pub mod test_types;
