//! System-wide limits and defaults.

/// Maximum number of oracle signers a single event may register.
/// Resolution scans are linear in the signer set; this bounds them.
pub const MAX_SIGNERS_PER_EVENT: usize = 64;

/// Maximum number of balance entries in one (holder, event) position.
///
/// Entries are never removed, only zeroed, so a position grows with every
/// deposit and every inbound transfer. This cap turns unbounded growth into
/// a deterministic rejection of the append.
pub const MAX_ENTRIES_PER_POSITION: usize = 1024;

/// Length in bytes of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_sane() {
        assert!(MAX_SIGNERS_PER_EVENT >= 3);
        assert!(MAX_ENTRIES_PER_POSITION >= 16);
        assert_eq!(SIGNATURE_LEN, 64);
    }
}
