//! The event registry: creation and M-of-N threshold resolution.

use std::collections::{HashMap, HashSet};

use condpay_types::signing::resolution_digest;
use condpay_types::{
    AccountId, Attestation, CondpayError, Event, EventId, InstanceId, Result,
};

/// Registry of resolvable events, keyed by [`EventId`].
///
/// Events transition `Open → Resolved` exactly once and are never removed.
pub struct EventRegistry {
    /// Instance identity mixed into every resolution digest.
    instance: InstanceId,
    /// All events ever created.
    events: HashMap<EventId, Event>,
}

impl EventRegistry {
    /// Create an empty registry for the given deployment instance.
    #[must_use]
    pub fn new(instance: InstanceId) -> Self {
        Self {
            instance,
            events: HashMap::new(),
        }
    }

    /// Register a new event in the Open state.
    ///
    /// # Errors
    /// - [`CondpayError::DuplicateEvent`] if the id is nil or already used
    /// - [`CondpayError::InvalidSignerSet`] / [`CondpayError::InvalidThreshold`]
    ///   for invalid oracle sets
    pub fn create(&mut self, id: EventId, signers: Vec<AccountId>, threshold: usize) -> Result<()> {
        if self.events.contains_key(&id) {
            return Err(CondpayError::DuplicateEvent(id));
        }
        let event = Event::new(id, signers, threshold)?;

        tracing::info!(
            event = %id,
            signers = event.signers.len(),
            threshold = event.threshold,
            "Event created"
        );
        self.events.insert(id, event);
        Ok(())
    }

    /// Resolve an event with a set of oracle attestations.
    ///
    /// One digest is built over (registry instance, event id, payload); each
    /// attestation is checked against it. Attestations from identities
    /// outside the oracle set, duplicates of an already-counted identity,
    /// and signatures that fail verification are skipped, not fatal. The
    /// scan stops as soon as `threshold` distinct authorized identities have
    /// verified; attestation order never affects the outcome.
    ///
    /// # Errors
    /// - [`CondpayError::EventNotFound`] for unknown ids
    /// - [`CondpayError::AlreadyResolved`] if resolution already happened
    /// - [`CondpayError::ThresholdNotMet`] if fewer attestations than the
    ///   threshold were supplied, or the full scan found fewer distinct
    ///   authorized signers than required — the event stays Open
    pub fn resolve(
        &mut self,
        id: EventId,
        attestations: &[Attestation],
        payload: &[u8],
    ) -> Result<()> {
        let event = self
            .events
            .get_mut(&id)
            .ok_or(CondpayError::EventNotFound(id))?;
        if event.resolved {
            return Err(CondpayError::AlreadyResolved(id));
        }
        if attestations.len() < event.threshold {
            return Err(CondpayError::ThresholdNotMet {
                needed: event.threshold,
                distinct: attestations.len(),
            });
        }

        let digest = resolution_digest(self.instance, id, payload);
        let mut accepted: HashSet<AccountId> = HashSet::with_capacity(event.threshold);

        for attestation in attestations {
            if accepted.len() == event.threshold {
                break;
            }
            if !event.is_authorized(&attestation.signer) {
                tracing::warn!(
                    event = %id,
                    signer = %attestation.signer,
                    "Attestation from unregistered identity skipped"
                );
                continue;
            }
            if accepted.contains(&attestation.signer) {
                // Each identity counts at most once per resolution.
                continue;
            }
            if !attestation.verify(&digest) {
                tracing::warn!(
                    event = %id,
                    signer = %attestation.signer,
                    "Attestation signature failed verification"
                );
                continue;
            }
            accepted.insert(attestation.signer);
        }

        if accepted.len() < event.threshold {
            return Err(CondpayError::ThresholdNotMet {
                needed: event.threshold,
                distinct: accepted.len(),
            });
        }

        event.mark_resolved(payload)?;
        tracing::info!(
            event = %id,
            distinct_signers = accepted.len(),
            payload_len = payload.len(),
            "Event resolved"
        );
        Ok(())
    }

    /// Whether the event has resolved. Unknown ids read as not resolved.
    #[must_use]
    pub fn is_resolved(&self, id: EventId) -> bool {
        self.events.get(&id).is_some_and(|e| e.resolved)
    }

    /// The stored resolution payload.
    ///
    /// # Errors
    /// - [`CondpayError::EventNotFound`] for unknown ids
    /// - [`CondpayError::NotResolved`] if the event is still Open
    pub fn get_resolution(&self, id: EventId) -> Result<&[u8]> {
        let event = self
            .events
            .get(&id)
            .ok_or(CondpayError::EventNotFound(id))?;
        if !event.resolved {
            return Err(CondpayError::NotResolved(id));
        }
        Ok(&event.resolution_payload)
    }

    /// Look up an event definition.
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Number of events ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events have been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The deployment instance identity of this registry.
    #[must_use]
    pub fn instance(&self) -> InstanceId {
        self.instance
    }
}
