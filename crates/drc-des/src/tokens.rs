//! `TokenPool<K>` — predicate-based requests over a fixed set of tokens.
//!
//! "Give me any token matching predicate X" with FIFO fairness: among
//! requests a freed token could satisfy, the one queued first wins.  The
//! model uses this for the shared worker pool, where the predicate is a
//! qualification check, but the pool itself knows nothing about skills.
//!
//! Two grant paths exist on purpose:
//!
//! - [`request`] — the pool picks the lowest-numbered eligible idle token
//!   (or queues the request).  This is first-come-first-serve dispatch.
//! - [`claim`] — the caller already chose a specific idle token (a dispatch
//!   heuristic ranked the candidates) and takes exactly that one.
//!
//! Invariant maintained across both paths: no queued request's predicate
//! matches any idle token.  That holds because requests only queue when no
//! idle token matches, and every release re-checks the queue before the
//! token goes idle.
//!
//! [`request`]: TokenPool::request
//! [`claim`]: TokenPool::claim

use std::collections::VecDeque;

type Predicate = Box<dyn Fn(usize) -> bool>;

struct Waiter<K> {
    key:  K,
    pred: Predicate,
}

/// A fixed token set with predicate-matched granting.
pub struct TokenPool<K> {
    busy:    Vec<bool>,
    waiters: VecDeque<Waiter<K>>,
}

impl<K> TokenPool<K> {
    /// A pool over tokens `0..count`, all initially idle.
    pub fn new(count: usize) -> Self {
        TokenPool {
            busy:    vec![false; count],
            waiters: VecDeque::new(),
        }
    }

    /// Request any token satisfying `pred` for `key`.
    ///
    /// Grants the lowest-numbered eligible idle token immediately, or queues
    /// the request; the grant then arrives through [`release`]'s return
    /// value once an eligible token frees up.
    ///
    /// [`release`]: TokenPool::release
    pub fn request(&mut self, key: K, pred: Predicate) -> Option<usize> {
        let found = (0..self.busy.len()).find(|&t| !self.busy[t] && pred(t));
        match found {
            Some(token) => {
                self.busy[token] = true;
                Some(token)
            }
            None => {
                self.waiters.push_back(Waiter { key, pred });
                None
            }
        }
    }

    /// Take a specific idle token the caller selected.
    ///
    /// # Panics
    /// Panics if the token is already busy — the caller must pick from the
    /// idle set it just observed.
    pub fn claim(&mut self, token: usize) {
        assert!(!self.busy[token], "claim of busy token {token}");
        self.busy[token] = true;
    }

    /// Release a held token.  If the oldest waiting request whose predicate
    /// matches the freed token exists, the token transfers to it and
    /// `(key, token)` is returned so the caller can notify the waiter;
    /// otherwise the token goes idle.
    ///
    /// # Panics
    /// Panics if the token is not currently held.
    pub fn release(&mut self, token: usize) -> Option<(K, usize)> {
        assert!(self.busy[token], "release of idle token {token}");
        let matched = self.waiters.iter().position(|w| (w.pred)(token));
        match matched {
            Some(i) => {
                let waiter = self.waiters.remove(i).expect("position just found");
                // Token stays busy; it transfers straight to the waiter.
                Some((waiter.key, token))
            }
            None => {
                self.busy[token] = false;
                None
            }
        }
    }

    /// Non-blocking check: is some idle token satisfying `pred` available?
    pub fn is_available(&self, pred: impl Fn(usize) -> bool) -> bool {
        (0..self.busy.len()).any(|t| !self.busy[t] && pred(t))
    }

    /// Idle tokens satisfying `pred`, ascending.
    pub fn idle_matching<'a>(
        &'a self,
        pred: impl Fn(usize) -> bool + 'a,
    ) -> impl Iterator<Item = usize> + 'a {
        (0..self.busy.len()).filter(move |&t| !self.busy[t] && pred(t))
    }

    pub fn token_count(&self) -> usize {
        self.busy.len()
    }

    pub fn idle_count(&self) -> usize {
        self.busy.iter().filter(|&&b| !b).count()
    }

    /// Requests queued with no eligible idle token.
    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }
}
