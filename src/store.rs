//! Sample store: throughput observations keyed by mesh position.
//!
//! Policy engines consume the store through the [`SampleStore`] trait as a
//! read-only lookup capability; they never write to it. [`MemoryStore`] is
//! the in-process implementation, and can be populated from the JSON
//! document shape produced by the collection backend
//! (`{"position": [x, y], "upload_speed": .., "download_speed": ..,
//! "timestamp": ..}`).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{Result, SignalRlError};
use crate::types::Position;

/// A single throughput observation at a mesh position. Speeds in Mbps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeedSample {
    pub upload_speed: f64,
    pub download_speed: f64,
    /// Seconds since the Unix epoch at collection time.
    pub timestamp: i64,
}

/// Read-only lookup capability over collected samples.
pub trait SampleStore {
    /// Look up the sample recorded at `position`, if any.
    fn find(&self, position: Position) -> Option<SpeedSample>;

    /// Number of positions with a recorded sample.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory sample store backed by a hash map. Re-inserting a position
/// replaces the previous sample (latest observation wins).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    samples: HashMap<Position, SpeedSample>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            samples: HashMap::new(),
        }
    }

    pub fn insert(&mut self, position: Position, sample: SpeedSample) {
        self.samples.insert(position, sample);
    }

    /// Build a store from a JSON array of mesh-point documents.
    ///
    /// A document missing any required field fails the whole load with
    /// [`SignalRlError::InvalidSample`]; nothing is partially ingested.
    pub fn from_json(json: &str) -> Result<Self> {
        let documents: Vec<Value> = serde_json::from_str(json)?;
        let mut store = MemoryStore::new();
        for doc in &documents {
            let (position, sample) = parse_mesh_point(doc)?;
            store.insert(position, sample);
        }
        Ok(store)
    }
}

impl SampleStore for MemoryStore {
    fn find(&self, position: Position) -> Option<SpeedSample> {
        self.samples.get(&position).copied()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

fn parse_mesh_point(doc: &Value) -> Result<(Position, SpeedSample)> {
    let position = doc
        .get("position")
        .and_then(Value::as_array)
        .ok_or_else(|| SignalRlError::invalid_sample("position"))?;
    if position.len() != 2 {
        return Err(SignalRlError::invalid_sample("position"));
    }
    let x = position[0]
        .as_i64()
        .ok_or_else(|| SignalRlError::invalid_sample("position"))?;
    let y = position[1]
        .as_i64()
        .ok_or_else(|| SignalRlError::invalid_sample("position"))?;

    let upload_speed = doc
        .get("upload_speed")
        .and_then(Value::as_f64)
        .ok_or_else(|| SignalRlError::invalid_sample("upload_speed"))?;
    let download_speed = doc
        .get("download_speed")
        .and_then(Value::as_f64)
        .ok_or_else(|| SignalRlError::invalid_sample("download_speed"))?;
    let timestamp = doc
        .get("timestamp")
        .and_then(Value::as_i64)
        .ok_or_else(|| SignalRlError::invalid_sample("timestamp"))?;

    Ok((
        Position::new(x as i32, y as i32),
        SpeedSample {
            upload_speed,
            download_speed,
            timestamp,
        },
    ))
}
