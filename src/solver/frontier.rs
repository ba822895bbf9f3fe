//! Priority queue for branch-and-bound: min-heap on lower bound, FIFO on ties.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ndarray::Array2;

/// A partial tour waiting to be expanded.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Cost already paid along `path` plus the reduction of `reduced`.
    pub lower_bound: f64,
    /// Last stop on `path`.
    pub city: usize,
    /// Stops visited so far, starting at 0, no repeats.
    pub path: Vec<usize>,
    /// Working matrix with used rows/columns blocked and re-reduced.
    pub reduced: Array2<f64>,
    /// Sum of original edge costs along `path`.
    pub accumulated: f64,
}

/// A node tagged with its push order.
#[derive(Debug)]
struct Queued {
    sequence: u64,
    node: SearchNode,
}

impl PartialEq for Queued {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued {}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// BinaryHeap is a max-heap, so both keys are compared in reverse:
// the smallest bound, and among equal bounds the earliest push, comes out first.
impl Ord for Queued {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .node
            .lower_bound
            .total_cmp(&self.node.lower_bound)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-priority frontier of search nodes with a stable tie-break.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Queued>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: SearchNode) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(Queued { sequence, node });
    }

    pub fn pop(&mut self) -> Option<SearchNode> {
        self.heap.pop().map(|q| q.node)
    }

    pub fn peek_bound(&self) -> Option<f64> {
        self.heap.peek().map(|q| q.node.lower_bound)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(city: usize, lower_bound: f64) -> SearchNode {
        SearchNode {
            lower_bound,
            city,
            path: vec![0, city],
            reduced: Array2::zeros((1, 1)),
            accumulated: 0.0,
        }
    }

    #[test]
    fn test_pops_smallest_bound_first() {
        let mut frontier = Frontier::new();
        frontier.push(node(1, 30.0));
        frontier.push(node(2, 10.0));
        frontier.push(node(3, 20.0));

        assert_eq!(frontier.peek_bound(), Some(10.0));
        assert_eq!(frontier.pop().unwrap().city, 2);
        assert_eq!(frontier.pop().unwrap().city, 3);
        assert_eq!(frontier.pop().unwrap().city, 1);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_ties_pop_in_push_order() {
        let mut frontier = Frontier::new();
        for city in [4, 2, 7, 1] {
            frontier.push(node(city, 5.0));
        }
        let order: Vec<usize> = std::iter::from_fn(|| frontier.pop().map(|n| n.city)).collect();
        assert_eq!(order, vec![4, 2, 7, 1]);
    }

    #[test]
    fn test_len() {
        let mut frontier = Frontier::new();
        frontier.push(node(1, 1.0));
        frontier.push(node(2, 1.0));
        assert_eq!(frontier.len(), 2);
        frontier.pop();
        assert_eq!(frontier.len(), 1);
    }
}
