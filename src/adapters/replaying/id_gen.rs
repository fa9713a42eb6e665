//! Replaying adapter for the `IdGenerator` port.

use std::sync::Mutex;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::id_gen::IdGenerator;

/// Replays recorded IDs from a cassette.
pub struct ReplayingIdGenerator {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingIdGenerator {
    /// Creates a new replaying ID generator from a cassette replayer.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl IdGenerator for ReplayingIdGenerator {
    /// # Panics
    ///
    /// Panics when the cassette holds no further string ID, since the
    /// port has no error channel.
    fn generate_id(&self) -> String {
        let mut replayer = self.replayer.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        match replayer.next_interaction("id_gen", "generate_id") {
            Ok(interaction) => match interaction.output.as_str() {
                Some(id) => id.to_string(),
                None => panic!(
                    "id_gen::generate_id: expected string output, got {}",
                    interaction.output
                ),
            },
            Err(e) => panic!("id_gen::generate_id: {e}"),
        }
    }
}
