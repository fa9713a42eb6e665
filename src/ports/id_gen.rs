//! ID generator port.

/// Produces the random tokens used as content-security-policy nonces.
///
/// Replay substitutes a recorded sequence so rendered pages are
/// byte-for-byte reproducible.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh token made of ASCII alphanumerics.
    fn generate_id(&self) -> String;
}
