//! Bucket-sorted search frontier.
//!
//! [`BucketQueue`] orders label indices by sort cost for Dijkstra/A* style
//! searches. Costs inside a window `[min_cost, min_cost + range)` are sorted
//! into fixed-width buckets; anything above the window waits unsorted in an
//! overflow list until the window rolls forward to it. Insert and extract are
//! amortized O(1); `decrease` scans one bucket.
//!
//! Labels are opaque `u32` indices into the caller's own label array. The queue
//! never reads label state except through the edge cost accessor used by
//! [`BucketQueue::entries`] for diagnostics.

use std::collections::VecDeque;
use std::fmt;

/// Index of a search label owned by the caller.
pub type Label = u32;

/// A two-level bucket queue of labels.
///
/// # Example
///
/// ```
/// use tilegraph::BucketQueue;
///
/// let costs = [5.0f32, 1.0, 3.0];
/// let mut queue = BucketQueue::new(0.0, 10.0, 1.0, |label: u32| costs[label as usize]);
/// for (label, &cost) in costs.iter().enumerate() {
///     queue.add(label as u32, cost);
/// }
/// assert_eq!(queue.pop(), Some(1));
/// assert_eq!(queue.pop(), Some(2));
/// assert_eq!(queue.pop(), Some(0));
/// assert_eq!(queue.pop(), None);
/// ```
pub struct BucketQueue<C> {
    /// Floor the queue was created with; restored by `clear`
    initial_min_cost: f32,
    /// Cost at the start of bucket 0
    min_cost: f32,
    /// Costs at or above this go to overflow
    max_cost: f32,
    range: f32,
    bucket_width: f32,
    inv_bucket_width: f32,
    /// Cursor into `buckets`; only moves forward until the window rolls
    current: usize,
    buckets: Vec<VecDeque<Label>>,
    /// Labels above the window, with the cost they were added at
    overflow: Vec<(Label, f32)>,
    len: usize,
    edge_cost: C,
}

impl<C: Fn(Label) -> f32> BucketQueue<C> {
    /// Create a queue covering `[min_cost, min_cost + range)` with buckets of
    /// `bucket_width`, so `ceil(range / bucket_width)` buckets in total.
    ///
    /// `edge_cost` maps a label to its cost for [`Self::entries`]; ordering
    /// uses only the costs passed to [`Self::add`] and [`Self::decrease`].
    pub fn new(min_cost: f32, range: f32, bucket_width: f32, edge_cost: C) -> Self {
        debug_assert!(range > 0.0, "bucket queue range must be positive");
        debug_assert!(bucket_width > 0.0, "bucket width must be positive");

        let bucket_count = (range / bucket_width).ceil().max(1.0) as usize;

        Self {
            initial_min_cost: min_cost,
            min_cost,
            max_cost: min_cost + range,
            range,
            bucket_width,
            inv_bucket_width: 1.0 / bucket_width,
            current: 0,
            buckets: vec![VecDeque::new(); bucket_count],
            overflow: Vec::new(),
            len: 0,
            edge_cost,
        }
    }

    /// Add a label with its sort cost.
    ///
    /// Costs at or above the window go to overflow. A cost below the start
    /// of the current bucket, including one below the window floor, goes to
    /// the front of the current bucket so it is popped next.
    pub fn add(&mut self, label: Label, sort_cost: f32) {
        self.len += 1;

        if sort_cost >= self.max_cost {
            self.overflow.push((label, sort_cost));
            return;
        }

        if sort_cost < self.current_cost() {
            self.buckets[self.current].push_front(label);
        } else {
            let index = self.raw_bucket_index(sort_cost).max(self.current);
            self.buckets[index].push_back(label);
        }
    }

    /// Move a label to a lower sort cost.
    ///
    /// `previous_cost` must be the cost the label is queued at and must not be
    /// less than `new_cost`. The label is found by scanning the bucket its
    /// previous cost maps to.
    pub fn decrease(&mut self, label: Label, new_cost: f32, previous_cost: f32) {
        debug_assert!(
            new_cost <= previous_cost,
            "decrease called with a higher cost ({new_cost} > {previous_cost})"
        );

        if !self.remove_at_cost(label, previous_cost) && !self.remove_anywhere(label) {
            tracing::warn!(label, previous_cost, "decrease on a label not in the queue");
        }
        self.add(label, new_cost);
    }

    /// Remove and return the label with the lowest bucketed cost.
    ///
    /// Returns `None` once no label remains in any bucket or in overflow.
    pub fn pop(&mut self) -> Option<Label> {
        let last = self.buckets.len() - 1;
        loop {
            while self.current < last && self.buckets[self.current].is_empty() {
                self.current += 1;
            }

            if let Some(label) = self.buckets[self.current].pop_front() {
                self.len -= 1;
                return Some(label);
            }

            if self.overflow.is_empty() {
                return None;
            }
            self.roll_window();
        }
    }

    /// Remove every label and reset the window to the initial floor.
    ///
    /// Bucket capacity is kept for the next search.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.overflow.clear();
        self.min_cost = self.initial_min_cost;
        self.max_cost = self.initial_min_cost + self.range;
        self.current = 0;
        self.len = 0;
    }

    /// Number of queued labels.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cost at the start of the window.
    pub fn min_cost(&self) -> f32 {
        self.min_cost
    }

    /// Cost at which labels start going to overflow.
    pub fn max_cost(&self) -> f32 {
        self.max_cost
    }

    /// Cost at the start of the bucket under the cursor.
    pub fn current_cost(&self) -> f32 {
        self.min_cost + self.current as f32 * self.bucket_width
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Every queued label with its cost from the edge cost accessor, buckets
    /// first in pop order, then overflow.
    pub fn entries(&self) -> Vec<(Label, f32)> {
        self.buckets[self.current..]
            .iter()
            .flatten()
            .copied()
            .chain(self.overflow.iter().map(|&(label, _)| label))
            .map(|label| (label, (self.edge_cost)(label)))
            .collect()
    }

    /// Bucket a cost maps to, ignoring the cursor.
    fn raw_bucket_index(&self, cost: f32) -> usize {
        // Float to int casts saturate: negative offsets map to 0
        let index = ((cost - self.min_cost) * self.inv_bucket_width) as usize;
        index.min(self.buckets.len() - 1)
    }

    fn remove_at_cost(&mut self, label: Label, cost: f32) -> bool {
        if cost >= self.max_cost {
            return match self.overflow.iter().position(|&(l, _)| l == label) {
                Some(pos) => {
                    self.overflow.remove(pos);
                    self.len -= 1;
                    true
                }
                None => false,
            };
        }

        let index = self.raw_bucket_index(cost).max(self.current);
        self.remove_from_bucket(index, label)
    }

    fn remove_anywhere(&mut self, label: Label) -> bool {
        tracing::warn!(label, "label not at its previous cost, scanning all buckets");

        for index in self.current..self.buckets.len() {
            if self.remove_from_bucket(index, label) {
                return true;
            }
        }
        match self.overflow.iter().position(|&(l, _)| l == label) {
            Some(pos) => {
                self.overflow.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    fn remove_from_bucket(&mut self, index: usize, label: Label) -> bool {
        let bucket = &mut self.buckets[index];
        match bucket.iter().position(|&l| l == label) {
            Some(pos) => {
                bucket.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Advance the window to the lowest overflow cost and move every overflow
    /// label that now fits into the buckets. Only called with all buckets empty.
    ///
    /// At large magnitudes `min_cost + range` can round back to `min_cost`,
    /// leaving an empty window. When nothing fits, the labels at the lowest
    /// cost are released into bucket 0 so every roll makes progress.
    fn roll_window(&mut self) {
        let lowest = self
            .overflow
            .iter()
            .map(|&(_, cost)| cost)
            .fold(f32::INFINITY, f32::min);

        if lowest.is_finite() {
            // Whole multiples of `range`, as if rolling one window at a time
            let steps = ((lowest - self.max_cost) / self.range).floor().max(0.0) + 1.0;
            self.min_cost += steps * self.range;
            self.max_cost = self.min_cost + self.range;
        }
        self.current = 0;

        let (min_cost, max_cost, inv) = (self.min_cost, self.max_cost, self.inv_bucket_width);
        let last = self.buckets.len() - 1;
        let buckets = &mut self.buckets;
        let before = self.overflow.len();

        self.overflow.retain(|&(label, cost)| {
            // Infinite costs never enter a window; release them all at once
            if cost < max_cost || !lowest.is_finite() {
                let index = (((cost - min_cost) * inv) as usize).min(last);
                buckets[index].push_back(label);
                false
            } else {
                true
            }
        });

        if self.overflow.len() == before {
            self.overflow.retain(|&(label, cost)| {
                if cost <= lowest {
                    buckets[0].push_back(label);
                    false
                } else {
                    true
                }
            });
        }

        tracing::trace!(
            min_cost = self.min_cost,
            moved = before - self.overflow.len(),
            remaining = self.overflow.len(),
            "rolled bucket queue window"
        );
    }
}

impl<C> fmt::Debug for BucketQueue<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BucketQueue")
            .field("min_cost", &self.min_cost)
            .field("max_cost", &self.max_cost)
            .field("bucket_width", &self.bucket_width)
            .field("bucket_count", &self.buckets.len())
            .field("current", &self.current)
            .field("len", &self.len)
            .field("overflow", &self.overflow.len())
            .finish()
    }
}
