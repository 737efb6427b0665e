//! Insertion Order Module
//!
//! Tracks the order in which currency pairs entered the cache, for FIFO eviction.

use std::collections::VecDeque;

use crate::currency::CurrencyPair;

// == Insertion Order ==
/// Remembers first-insertion order of cached pairs.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Reads never reorder, and re-inserting a tracked pair keeps its place.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    order: VecDeque<CurrencyPair>,
}

impl InsertionOrder {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Record ==
    /// Appends a pair that was not tracked yet.
    pub fn record(&mut self, pair: &CurrencyPair) {
        if !self.contains(pair) {
            self.order.push_back(pair.clone());
        }
    }

    // == Remove ==
    /// Removes a pair from the tracker.
    pub fn remove(&mut self, pair: &CurrencyPair) {
        self.order.retain(|p| p != pair);
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest-inserted pair.
    ///
    /// Returns None if tracker is empty.
    pub fn pop_oldest(&mut self) -> Option<CurrencyPair> {
        self.order.pop_front()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, pair: &CurrencyPair) -> bool {
        self.order.iter().any(|p| p == pair)
    }
}
