//! Behavioural tests for the bounded neighbour queue.

use proptest::prelude::*;
use rstest::rstest;

use crate::hnsw::{NeighbourQueue, QueueOrder};

#[rstest]
fn min_first_pops_worst_first() {
    let mut queue = NeighbourQueue::min_first(4);
    for (id, score) in [(1, 0.9), (2, 0.1), (3, 0.5), (4, 0.7)] {
        assert!(queue.push(id, score));
    }
    let popped: Vec<usize> = std::iter::from_fn(|| queue.pop().map(|n| n.id)).collect();
    assert_eq!(popped, vec![2, 3, 4, 1]);
}

#[rstest]
fn max_first_pops_best_first() {
    let mut queue = NeighbourQueue::max_first(4);
    for (id, score) in [(1, 0.9), (2, 0.1), (3, 0.5), (4, 0.7)] {
        assert!(queue.push(id, score));
    }
    let popped: Vec<usize> = std::iter::from_fn(|| queue.pop().map(|n| n.id)).collect();
    assert_eq!(popped, vec![1, 4, 3, 2]);
}

#[rstest]
#[case(QueueOrder::MinFirst)]
#[case(QueueOrder::MaxFirst)]
fn equal_scores_pop_smaller_id_first(#[case] order: QueueOrder) {
    let mut queue = NeighbourQueue::new(4, order);
    for id in [9, 3, 7] {
        assert!(queue.push(id, 0.5));
    }
    let popped: Vec<usize> = std::iter::from_fn(|| queue.pop().map(|n| n.id)).collect();
    assert_eq!(popped, vec![3, 7, 9]);
}

#[rstest]
fn full_min_first_queue_evicts_its_worst() {
    let mut queue = NeighbourQueue::min_first(2);
    assert!(queue.push(1, 0.2));
    assert!(queue.push(2, 0.4));
    assert!(queue.push(3, 0.6), "a better entry must displace the worst");
    assert!(!queue.push(4, 0.1), "a worse entry must be rejected");
    assert_eq!(queue.nodes(), vec![3, 2]);
}

#[rstest]
fn full_max_first_queue_evicts_its_worst() {
    let mut queue = NeighbourQueue::max_first(3);
    for (id, score) in [(1, 0.5), (2, 0.3), (3, 0.8)] {
        assert!(queue.push(id, score));
    }
    assert!(queue.push(4, 0.4), "0.4 must displace the weakest (0.3)");
    assert!(!queue.push(5, 0.1), "0.1 is weaker than everything kept");
    let mut kept = queue.nodes();
    kept.sort_unstable();
    assert_eq!(kept, vec![1, 3, 4]);
    assert_eq!(queue.top().map(|n| n.id), Some(3), "best stays on top");
}

#[rstest]
fn nodes_lists_descending_score_regardless_of_insertion_order() {
    let mut queue = NeighbourQueue::min_first(8);
    for (id, score) in [(5, 0.1), (1, 0.9), (4, 0.9), (2, 0.3)] {
        queue.push(id, score);
    }
    assert_eq!(queue.nodes(), vec![1, 4, 2, 5]);
}

#[rstest]
fn scores_round_trip_through_encoding() {
    let mut queue = NeighbourQueue::min_first(4);
    queue.push(0, -1.5);
    queue.push(1, 0.0);
    queue.push(2, 0.25);
    let entries = queue.entries();
    let scores: Vec<f32> = entries.iter().map(|n| n.score).collect();
    assert_eq!(scores, vec![0.25, 0.0, -1.5]);
}

#[rstest]
fn incomplete_and_visited_markers_default_clear() {
    let queue = NeighbourQueue::min_first(1);
    assert!(!queue.incomplete());
    assert_eq!(queue.visited_count(), 0);
}

proptest! {
    /// Both orientations retain exactly the highest-scoring `capacity`
    /// entries, matching a sorted reference model. Scores are made distinct
    /// per id because retention on exact ties drains opposite heap ends in
    /// the two orientations.
    #[test]
    fn retains_top_capacity_by_score(
        scores in proptest::collection::vec(0u32..1_000, 1..60),
        capacity in 1usize..12,
        max_first in any::<bool>(),
    ) {
        let order = if max_first { QueueOrder::MaxFirst } else { QueueOrder::MinFirst };
        let mut queue = NeighbourQueue::new(capacity, order);
        let distinct: Vec<f32> = scores
            .iter()
            .enumerate()
            .map(|(id, &score)| score as f32 * 64.0 + id as f32)
            .collect();
        for (id, &score) in distinct.iter().enumerate() {
            queue.push(id, score);
        }

        let mut model: Vec<(usize, f32)> = distinct.iter().copied().enumerate().collect();
        model.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        model.truncate(capacity);
        let mut expected: Vec<usize> = model.into_iter().map(|(id, _)| id).collect();
        expected.sort_unstable();

        let mut kept = queue.nodes();
        kept.sort_unstable();
        prop_assert_eq!(kept, expected);
    }
}
