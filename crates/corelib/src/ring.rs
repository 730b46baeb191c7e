//! Consistent hash ring.
//!
//! Maps arbitrary string keys to a dynamic set of named servers so that a
//! membership change relocates only the keys owned by the changed server's
//! ring segments (≈ 1/N of them), not nearly all keys as naive modulo
//! placement does.
//!
//! Each server occupies a configurable number of virtual-node positions on
//! the ring, which smooths out the unevenness inherent in hashing a small
//! number of discrete items. Lookup walks clockwise from the key's hash to
//! the first occupied position, wrapping past the top of the numeric space.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::token::RingToken;

/// Interior ring state.
///
/// The member set and the position index are two views of one structure and
/// must never be observed in a torn state; they are only mutated together,
/// under the exclusive lock in [`HashRing`].
#[derive(Debug, Default)]
struct State {
    /// Physical servers currently registered. Ordered, so snapshots come out
    /// lexicographically sorted.
    members: BTreeSet<String>,

    /// Every virtual-node position on the ring, mapped to its owning server.
    /// The ordered keys double as the sorted position sequence used for
    /// clockwise lookup.
    positions: BTreeMap<RingToken, String>,
}

/// A consistent hash ring mapping string keys to named servers.
///
/// All operations are safe to call from concurrent threads: reads take a
/// shared lock, membership changes take the exclusive lock, so a lookup
/// concurrent with a change observes either the old or the new membership,
/// never a mix.
///
/// # Example
///
/// ```
/// use corelib::HashRing;
///
/// let ring = HashRing::new(150);
/// ring.add_server("server-a").unwrap();
/// ring.add_server("server-b").unwrap();
///
/// let owner = ring.get_server("user-42").unwrap();
/// assert!(ring.servers().contains(&owner));
/// ```
#[derive(Debug)]
pub struct HashRing {
    /// Virtual nodes per server, fixed at construction.
    vnodes: usize,
    state: RwLock<State>,
}

impl HashRing {
    /// Create an empty ring with `vnodes` virtual nodes per server.
    ///
    /// Typical values are 50 to 500; more virtual nodes give a smoother
    /// distribution at the cost of memory and slightly slower membership
    /// changes.
    ///
    /// # Panics
    ///
    /// Panics if `vnodes` is zero, which would make the ring permanently
    /// empty.
    pub fn new(vnodes: usize) -> Self {
        assert!(vnodes > 0, "vnodes must be positive");
        Self {
            vnodes,
            state: RwLock::new(State::default()),
        }
    }

    /// Virtual nodes per server.
    pub fn vnodes(&self) -> usize {
        self.vnodes
    }

    /// Register `name` and place its virtual nodes on the ring.
    ///
    /// The insertion is atomic with respect to concurrent readers: no lookup
    /// ever observes a partially inserted server. Afterwards, roughly
    /// 1/(member count) of keys resolve to the new server.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if `name` is already a member. The
    /// ring is unchanged on failure.
    pub fn add_server(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        let mut state = self.state.write();
        if state.members.contains(&name) {
            return Err(Error::AlreadyExists(name));
        }

        for index in 0..self.vnodes {
            let token = RingToken::for_vnode(&name, index);
            state.positions.insert(token, name.clone());
        }
        state.members.insert(name.clone());
        drop(state);

        debug!(server = %name, vnodes = self.vnodes, "server added to ring");
        Ok(())
    }

    /// Remove `name` and vacate its virtual nodes.
    ///
    /// Recomputes the same position hashes insertion produced and removes
    /// them in one atomic step. Keys previously owned by the vacated
    /// positions redistribute to whichever server owns the next position
    /// clockwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `name` is not a member. The ring is
    /// unchanged on failure.
    pub fn remove_server(&self, name: &str) -> Result<()> {
        let mut state = self.state.write();
        if !state.members.remove(name) {
            return Err(Error::NotFound(name.to_string()));
        }

        for index in 0..self.vnodes {
            let token = RingToken::for_vnode(name, index);
            state.positions.remove(&token);
        }
        drop(state);

        debug!(server = %name, "server removed from ring");
        Ok(())
    }

    /// Resolve the server responsible for `key`.
    ///
    /// Hashes the key and returns the owner of the first position at or past
    /// that point; a key hashing beyond the last position wraps around to the
    /// smallest one. The same key always resolves to the same server while
    /// membership is unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyRing`] when no servers are registered.
    pub fn get_server(&self, key: &str) -> Result<String> {
        let state = self.state.read();
        let point = RingToken::from_key(key);
        state
            .positions
            .range(point..)
            .next()
            .or_else(|| state.positions.iter().next())
            .map(|(_, server)| server.clone())
            .ok_or(Error::EmptyRing)
    }

    /// Snapshot of all member names, sorted lexicographically.
    pub fn servers(&self) -> Vec<String> {
        self.state.read().members.iter().cloned().collect()
    }

    /// Count how many of `keys` each member would receive.
    ///
    /// Every current member appears in the result, including those that
    /// receive zero keys. Keys that fail to resolve (e.g. against an empty
    /// ring) are silently skipped. Each individual lookup is atomic; the
    /// batch as a whole is not, so the counts reflect the membership seen by
    /// each lookup in turn.
    pub fn distribution<K: AsRef<str>>(&self, keys: &[K]) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> = self
            .servers()
            .into_iter()
            .map(|server| (server, 0))
            .collect();

        for key in keys {
            if let Ok(server) = self.get_server(key.as_ref()) {
                *counts.entry(server).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Number of distinct member servers (not virtual nodes).
    pub fn len(&self) -> usize {
        self.state.read().members.len()
    }

    /// True when no servers are registered.
    pub fn is_empty(&self) -> bool {
        self.state.read().members.is_empty()
    }

    /// Total number of occupied ring positions.
    ///
    /// Normally `len() * vnodes()`; lower only if distinct virtual nodes
    /// collided on the same hash point.
    pub fn position_count(&self) -> usize {
        self.state.read().positions.len()
    }
}
