//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use thiserror::Error;

use super::format::{Cassette, Interaction};

/// A cassette that cannot serve the requested call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplayError {
    /// Nothing was recorded for the port/method pair.
    #[error("no interactions recorded for {port}::{method}; recorded pairs: [{available}]")]
    Unrecorded {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Comma-separated `port::method` pairs the cassette does hold.
        available: String,
    },
    /// Every recorded interaction for the pair was already served.
    #[error("all {count} interactions for {port}::{method} consumed (last seq {last_seq})")]
    Exhausted {
        /// Requested port.
        port: String,
        /// Requested method.
        method: String,
        /// Number of recorded interactions.
        count: usize,
        /// Sequence number of the last one.
        last_seq: u64,
    },
}

type Key = (String, String);

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair.
#[derive(Debug)]
pub struct CassetteReplayer {
    queues: HashMap<Key, Vec<Interaction>>,
    cursors: HashMap<Key, usize>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<Key, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = (interaction.port.clone(), interaction.method.clone());
            queues.entry(key).or_default().push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError`] when the pair was never recorded or all of
    /// its interactions have been served.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<&Interaction, ReplayError> {
        let key = (port.to_string(), method.to_string());
        let Some(queue) = self.queues.get(&key) else {
            let mut available: Vec<String> =
                self.queues.keys().map(|(p, m)| format!("{p}::{m}")).collect();
            available.sort();
            return Err(ReplayError::Unrecorded {
                port: key.0,
                method: key.1,
                available: available.join(", "),
            });
        };

        let cursor = self.cursors.entry(key).or_insert(0);
        let Some(interaction) = queue.get(*cursor) else {
            return Err(ReplayError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
                count: queue.len(),
                last_seq: queue.last().map_or(0, |i| i.seq),
            });
        };
        *cursor += 1;
        Ok(interaction)
    }

    /// Number of interactions not served yet, over all pairs.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queues
            .iter()
            .map(|(key, queue)| queue.len() - self.cursors.get(key).copied().unwrap_or(0))
            .sum()
    }
}
