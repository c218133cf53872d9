//! Multipart message reassembly.
//!
//! An AIS message may span up to nine NMEA sentences. Fragments arrive
//! in any order, interleaved with fragments of other messages, and may
//! never complete. [`CollectMultipart`] buffers fragments per group,
//! keyed by the sentence's message group id and radio channel, and
//! yields a single combined bit buffer once every slot of a group has
//! been observed.
//!
//! Incomplete groups are bounded two ways: a caller-driven timeout sweep
//! ([`CollectMultipart::cleanup_expired`]) and a hard cap on the number
//! of concurrent groups, enforced by evicting the least recently updated
//! group.

use crate::bits::BitBuffer;
use crate::sentence::Channel;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Source of monotonic time for the reassembler.
///
/// The reassembler stamps a group on every accepted fragment and
/// compares those stamps during [`CollectMultipart::cleanup_expired`].
/// Injecting the clock keeps timeout behavior deterministic under test;
/// production code uses [`MonotonicClock`].
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;
}

/// Default clock reading the host monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock for deterministic tests.
///
/// Clones share the same underlying instant, so a test can keep one
/// handle while the reassembler owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: std::rc::Rc<std::cell::Cell<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> ManualClock {
        ManualClock {
            now: std::rc::Rc::new(std::cell::Cell::new(Instant::now())),
        }
    }

    /// Advances the clock by `duration`.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

impl Default for ManualClock {
    fn default() -> ManualClock {
        ManualClock::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Errors produced by fragment submission.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ReassemblyError {
    /// `fragment_number` outside `1..=fragment_count`, or inconsistent
    /// with the fragment count the group was created with.
    BadFragmentNumber,
    /// Fill-bit count above 5.
    BadFillBits,
    /// A multipart fragment arrived with an empty group id. An empty id
    /// cannot disambiguate concurrent groups, so such fragments are
    /// rejected rather than guessed at.
    EmptyGroupId,
    /// A stored payload failed armor decoding while combining.
    BadPayload,
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
struct GroupKey {
    group_id: String,
    channel: Channel,
}

#[derive(Debug, Clone)]
struct Slot {
    payload: String,
    fill_bits: u8,
}

#[derive(Debug, Clone)]
struct Group {
    slots: Vec<Option<Slot>>,
    received: usize,
    last_update: Instant,
}

/// Fragment-group store.
///
/// One instance serves one NMEA feed. Submission is synchronous and
/// wait-free; expiry only happens when the owner calls
/// [`cleanup_expired`](Self::cleanup_expired).
#[derive(Debug, Clone)]
pub struct CollectMultipart<C = MonotonicClock> {
    groups: HashMap<GroupKey, Group>,
    timeout: Duration,
    max_groups: usize,
    clock: C,
}

impl CollectMultipart<MonotonicClock> {
    /// Creates a store with the given idle timeout and group cap,
    /// reading the host monotonic clock.
    pub fn new(timeout: Duration, max_groups: usize) -> CollectMultipart<MonotonicClock> {
        CollectMultipart::with_clock(timeout, max_groups, MonotonicClock)
    }
}

impl<C: Clock> CollectMultipart<C> {
    /// Creates a store with an injected clock.
    pub fn with_clock(timeout: Duration, max_groups: usize, clock: C) -> CollectMultipart<C> {
        CollectMultipart {
            groups: HashMap::new(),
            timeout,
            max_groups,
            clock,
        }
    }

    /// Submits one fragment.
    ///
    /// Returns `Ok(Some(bits))` with the combined bit buffer when this
    /// fragment completes its group (the group is then removed),
    /// `Ok(None)` when the group is still incomplete, and an error when
    /// the fragment is invalid (no state changes on error).
    ///
    /// A fragment for a slot that is already filled is dropped without
    /// touching the group: the first observation of a slot is
    /// authoritative, and duplicates do not extend the group's life.
    pub fn add_fragment(
        &mut self,
        fragment_number: u8,
        fragment_count: u8,
        group_id: &str,
        channel: Channel,
        payload: &str,
        fill_bits: u8,
    ) -> Result<Option<BitBuffer>, ReassemblyError> {
        if fragment_number < 1 || fragment_number > fragment_count {
            return Err(ReassemblyError::BadFragmentNumber);
        }
        if fill_bits > 5 {
            return Err(ReassemblyError::BadFillBits);
        }
        if group_id.is_empty() {
            return Err(ReassemblyError::EmptyGroupId);
        }

        let key = GroupKey {
            group_id: group_id.to_owned(),
            channel,
        };
        log::trace!(
            "fragment {}/{} for group id = {:?} channel = {} ({} armor chars, {} fill bits)",
            fragment_number,
            fragment_count,
            group_id,
            channel,
            payload.len(),
            fill_bits
        );

        if !self.groups.contains_key(&key) {
            self.evict_to_fit(self.max_groups.saturating_sub(1));
            log::info!(
                "starting collection of group id = {:?} channel = {} with {} fragments",
                group_id,
                channel,
                fragment_count
            );
            self.groups.insert(
                key.clone(),
                Group {
                    slots: vec![None; usize::from(fragment_count)],
                    received: 0,
                    last_update: self.clock.now(),
                },
            );
        }

        // The unwrap cannot fail: the group was just inserted if absent.
        let group = self.groups.get_mut(&key).unwrap();
        let index = usize::from(fragment_number) - 1;
        if index >= group.slots.len() {
            // The sender's declared fragment count disagrees with the
            // count the group was created with.
            log::warn!(
                "fragment {} of {} does not fit group id = {:?} sized for {} fragments",
                fragment_number,
                fragment_count,
                group_id,
                group.slots.len()
            );
            return Err(ReassemblyError::BadFragmentNumber);
        }

        match &group.slots[index] {
            Some(stored) => {
                if stored.payload != payload || stored.fill_bits != fill_bits {
                    log::error!(
                        "fragment {} of group id = {:?} already stored, but its contents differ: \
                         stored = {:?}/{}, just received = {:?}/{}",
                        fragment_number,
                        group_id,
                        stored.payload,
                        stored.fill_bits,
                        payload,
                        fill_bits
                    );
                } else {
                    log::trace!(
                        "fragment {} of group id = {:?} already stored",
                        fragment_number,
                        group_id
                    );
                }
                return Ok(None);
            }
            None => {
                group.slots[index] = Some(Slot {
                    payload: payload.to_owned(),
                    fill_bits,
                });
                group.received += 1;
                group.last_update = self.clock.now();
            }
        }

        if group.received == group.slots.len() {
            // Remove first so the group is released even if a stored
            // payload turns out to be undecodable.
            let group = self.groups.remove(&key).unwrap();
            let combined = combine(&group.slots)?;
            log::info!(
                "completed group id = {:?} channel = {}: {} bits",
                group_id,
                channel,
                combined.len()
            );
            Ok(Some(combined))
        } else {
            Ok(None)
        }
    }

    /// Removes every group whose last update is older than the timeout.
    ///
    /// Sweeping is caller-driven; a group's clock restarts on every
    /// newly stored fragment.
    pub fn cleanup_expired(&mut self) {
        let now = self.clock.now();
        let timeout = self.timeout;
        let before = self.groups.len();
        self.groups
            .retain(|_, group| now.duration_since(group.last_update) <= timeout);
        let expired = before - self.groups.len();
        if expired > 0 {
            log::warn!("expired {} incomplete group(s)", expired);
        }
    }

    /// Drops every incomplete group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Number of incomplete groups currently held.
    pub fn incomplete_count(&self) -> usize {
        self.groups.len()
    }

    /// Replaces the idle timeout used by subsequent sweeps.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Replaces the group cap, evicting the oldest groups if the store
    /// currently exceeds it.
    pub fn set_max_groups(&mut self, max_groups: usize) {
        self.max_groups = max_groups;
        self.evict_to_fit(max_groups);
    }

    /// Evicts least-recently-updated groups until at most `limit`
    /// remain.
    fn evict_to_fit(&mut self, limit: usize) {
        while self.groups.len() > limit {
            let oldest = self
                .groups
                .iter()
                .min_by_key(|(_, group)| group.last_update)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    log::warn!(
                        "evicting incomplete group id = {:?} channel = {} under capacity pressure",
                        key.group_id,
                        key.channel
                    );
                    self.groups.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Concatenates the payload bits of a completed group, trimming the
/// declared fill bits from the final fragment.
fn combine(slots: &[Option<Slot>]) -> Result<BitBuffer, ReassemblyError> {
    let mut combined = BitBuffer::new();
    let last = slots.len() - 1;
    for (index, slot) in slots.iter().enumerate() {
        // A completed group has every slot filled.
        let slot = slot.as_ref().unwrap();
        let mut bits =
            BitBuffer::from_nmea_payload(&slot.payload).map_err(|_| ReassemblyError::BadPayload)?;
        if index == last {
            bits.truncate(bits.len().saturating_sub(usize::from(slot.fill_bits)));
        }
        combined.append_buffer(&bits);
    }
    Ok(combined)
}

#[cfg(test)]
mod test {
    use super::*;

    fn payload_bits(payload: &str, fill_bits: u8) -> BitBuffer {
        let mut bits = BitBuffer::from_nmea_payload(payload).unwrap();
        bits.truncate(bits.len() - usize::from(fill_bits));
        bits
    }

    fn collector() -> CollectMultipart<ManualClock> {
        CollectMultipart::with_clock(Duration::from_secs(60), 100, ManualClock::new())
    }

    #[test]
    fn in_order_completion() {
        let mut collect = collector();
        let first = collect
            .add_fragment(1, 2, "1", Channel::A, "55P5TL01VIaAL@7W", 0)
            .unwrap();
        assert!(first.is_none());
        assert_eq!(collect.incomplete_count(), 1);

        let combined = collect
            .add_fragment(2, 2, "1", Channel::A, "KO@mBplU", 2)
            .unwrap()
            .unwrap();
        assert_eq!(collect.incomplete_count(), 0);
        assert_eq!(combined.len(), 16 * 6 + 8 * 6 - 2);

        let mut expected = payload_bits("55P5TL01VIaAL@7W", 0);
        expected.append_buffer(&payload_bits("KO@mBplU", 2));
        assert_eq!(combined, expected);
    }

    #[test]
    fn out_of_order_completion_matches_in_order() {
        let mut in_order = collector();
        in_order
            .add_fragment(1, 2, "7", Channel::B, "55P5TL01VIaAL@7W", 0)
            .unwrap();
        let forward = in_order
            .add_fragment(2, 2, "7", Channel::B, "KO@mBplU", 2)
            .unwrap()
            .unwrap();

        let mut reversed = collector();
        assert!(reversed
            .add_fragment(2, 2, "7", Channel::B, "KO@mBplU", 2)
            .unwrap()
            .is_none());
        let backward = reversed
            .add_fragment(1, 2, "7", Channel::B, "55P5TL01VIaAL@7W", 0)
            .unwrap()
            .unwrap();

        assert_eq!(forward, backward);
    }

    #[test]
    fn duplicates_are_dropped_and_do_not_extend_timeout() {
        let clock = ManualClock::new();
        let mut collect =
            CollectMultipart::with_clock(Duration::from_secs(10), 100, clock.clone());
        collect
            .add_fragment(1, 3, "4", Channel::A, "0000", 0)
            .unwrap();

        clock.advance(Duration::from_secs(9));
        // Same slot again, even with different contents: dropped.
        assert!(collect
            .add_fragment(1, 3, "4", Channel::A, "1111", 0)
            .unwrap()
            .is_none());
        assert_eq!(collect.incomplete_count(), 1);

        // If the duplicate had refreshed last_update, the group would
        // survive this sweep.
        clock.advance(Duration::from_secs(2));
        collect.cleanup_expired();
        assert_eq!(collect.incomplete_count(), 0);
    }

    #[test]
    fn groups_are_isolated_by_id_and_channel() {
        let mut collect = collector();
        collect
            .add_fragment(1, 2, "1", Channel::A, "0000", 0)
            .unwrap();
        collect
            .add_fragment(1, 2, "1", Channel::B, "1111", 0)
            .unwrap();
        collect
            .add_fragment(1, 2, "2", Channel::A, "2222", 0)
            .unwrap();
        assert_eq!(collect.incomplete_count(), 3);

        let combined = collect
            .add_fragment(2, 2, "1", Channel::B, "3333", 0)
            .unwrap()
            .unwrap();
        let mut expected = payload_bits("1111", 0);
        expected.append_buffer(&payload_bits("3333", 0));
        assert_eq!(combined, expected);
        assert_eq!(collect.incomplete_count(), 2);
    }

    #[test]
    fn timeout_sweep() {
        let clock = ManualClock::new();
        let mut collect = CollectMultipart::with_clock(Duration::from_secs(1), 100, clock.clone());
        collect
            .add_fragment(1, 2, "5", Channel::A, "0000", 0)
            .unwrap();
        assert_eq!(collect.incomplete_count(), 1);

        clock.advance(Duration::from_secs(2));
        collect.cleanup_expired();
        assert_eq!(collect.incomplete_count(), 0);

        // A late second fragment now opens a fresh group.
        assert!(collect
            .add_fragment(2, 2, "5", Channel::A, "1111", 0)
            .unwrap()
            .is_none());
        assert_eq!(collect.incomplete_count(), 1);
    }

    #[test]
    fn new_fragment_resets_group_clock() {
        let clock = ManualClock::new();
        let mut collect = CollectMultipart::with_clock(Duration::from_secs(10), 100, clock.clone());
        collect
            .add_fragment(1, 3, "9", Channel::A, "0000", 0)
            .unwrap();
        clock.advance(Duration::from_secs(8));
        collect
            .add_fragment(2, 3, "9", Channel::A, "1111", 0)
            .unwrap();
        clock.advance(Duration::from_secs(8));
        collect.cleanup_expired();
        // 16 s since creation but only 8 s since the last fragment.
        assert_eq!(collect.incomplete_count(), 1);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let clock = ManualClock::new();
        let mut collect = CollectMultipart::with_clock(Duration::from_secs(60), 2, clock.clone());
        collect
            .add_fragment(1, 2, "1", Channel::A, "0000", 0)
            .unwrap();
        clock.advance(Duration::from_secs(1));
        collect
            .add_fragment(1, 2, "2", Channel::A, "1111", 0)
            .unwrap();
        clock.advance(Duration::from_secs(1));
        collect
            .add_fragment(1, 2, "3", Channel::A, "2222", 0)
            .unwrap();
        assert_eq!(collect.incomplete_count(), 2);

        // Group "1" was evicted: completing it now requires both
        // fragments again, so this second fragment opens a new group.
        assert!(collect
            .add_fragment(2, 2, "1", Channel::A, "3333", 0)
            .unwrap()
            .is_none());
    }

    #[test]
    fn lowering_max_groups_shrinks_store() {
        let clock = ManualClock::new();
        let mut collect = CollectMultipart::with_clock(Duration::from_secs(60), 10, clock.clone());
        for id in ["1", "2", "3", "4"] {
            collect
                .add_fragment(1, 2, id, Channel::A, "0000", 0)
                .unwrap();
            clock.advance(Duration::from_secs(1));
        }
        assert_eq!(collect.incomplete_count(), 4);
        collect.set_max_groups(2);
        assert_eq!(collect.incomplete_count(), 2);

        // The two newest groups survive.
        assert!(collect
            .add_fragment(2, 2, "4", Channel::A, "1111", 0)
            .unwrap()
            .is_some());
    }

    #[test]
    fn rejects_invalid_submissions() {
        let mut collect = collector();
        assert_eq!(
            collect.add_fragment(0, 2, "1", Channel::A, "0000", 0),
            Err(ReassemblyError::BadFragmentNumber)
        );
        assert_eq!(
            collect.add_fragment(3, 2, "1", Channel::A, "0000", 0),
            Err(ReassemblyError::BadFragmentNumber)
        );
        assert_eq!(
            collect.add_fragment(1, 2, "1", Channel::A, "0000", 6),
            Err(ReassemblyError::BadFillBits)
        );
        assert_eq!(
            collect.add_fragment(1, 2, "", Channel::A, "0000", 0),
            Err(ReassemblyError::EmptyGroupId)
        );
        assert_eq!(collect.incomplete_count(), 0);
    }

    #[test]
    fn clear_drops_all_groups() {
        let mut collect = collector();
        collect
            .add_fragment(1, 2, "1", Channel::A, "0000", 0)
            .unwrap();
        collect
            .add_fragment(1, 2, "2", Channel::A, "0000", 0)
            .unwrap();
        collect.clear();
        assert_eq!(collect.incomplete_count(), 0);
    }
}
