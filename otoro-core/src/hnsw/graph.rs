//! Concurrent on-heap layered graph.
//!
//! Level 0 holds every inserted node; upper levels hold a geometrically
//! sparser subset. Per-level node maps are sharded concurrent maps, so slot
//! creation, neighbour updates, and reads all proceed without a graph-wide
//! lock. The entry point is a compare-and-swap cell whose level only ever
//! increases.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;

use crate::memory::neighbour_set_bytes;

use super::error::HnswError;
use super::neighbours::{ConcurrentNeighbourSet, NeighbourArray};
use super::types::EntryPoint;

/// Concurrent hierarchical graph over provider ordinals.
#[derive(Debug)]
pub struct HnswGraph {
    max_connections: usize,
    layers: DashMap<usize, DashMap<usize, ConcurrentNeighbourSet>>,
    entry: ArcSwapOption<EntryPoint>,
}

impl HnswGraph {
    /// Creates an empty graph with the given per-node fan-out bound.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when `max_connections` is
    /// zero.
    pub fn new(max_connections: usize) -> Result<Self, HnswError> {
        if max_connections == 0 {
            return Err(HnswError::InvalidParameters {
                reason: "max_connections must be greater than zero".into(),
            });
        }
        Ok(Self {
            max_connections,
            layers: DashMap::new(),
            entry: ArcSwapOption::const_empty(),
        })
    }

    /// Returns the fan-out bound for levels above 0.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Returns the neighbour capacity at `level`: the base layer allows
    /// twice the upper-level fan-out.
    #[must_use]
    pub fn max_connections_for_level(&self, level: usize) -> usize {
        if level == 0 {
            self.max_connections * 2
        } else {
            self.max_connections
        }
    }

    /// Creates the neighbour-set slot for `node` at `level`.
    ///
    /// Idempotent and safe to call in any order across levels and nodes;
    /// callers inserting a node are responsible for creating its slot on
    /// every level from 0 to the node's top level.
    pub fn add_node(&self, level: usize, node: usize) {
        let layer = self.layers.entry(level).or_default();
        layer
            .entry(node)
            .or_insert_with(|| ConcurrentNeighbourSet::new(node, self.max_connections_for_level(level)));
    }

    /// Returns a handle to the neighbour set of `node` at `level`, when the
    /// slot exists.
    #[must_use]
    pub fn neighbours(&self, level: usize, node: usize) -> Option<ConcurrentNeighbourSet> {
        self.layers
            .get(&level)
            .and_then(|layer| layer.get(&node).map(|set| set.value().clone()))
    }

    /// Returns the number of nodes on the base layer.
    #[must_use]
    pub fn size(&self) -> usize {
        self.layers.get(&0).map_or(0, |layer| layer.len())
    }

    /// Returns one more than the highest populated level, or zero for an
    /// empty graph.
    #[must_use]
    pub fn num_levels(&self) -> usize {
        self.layers
            .iter()
            .filter(|layer| !layer.value().is_empty())
            .map(|layer| *layer.key() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns the ids present at `level`, ascending, as a point-in-time
    /// snapshot.
    #[must_use]
    pub fn nodes_on_level(&self, level: usize) -> Vec<usize> {
        let mut nodes: Vec<usize> = self
            .layers
            .get(&level)
            .map(|layer| layer.iter().map(|slot| *slot.key()).collect())
            .unwrap_or_default();
        nodes.sort_unstable();
        nodes
    }

    /// Returns the current entry point, absent before the first insert.
    #[must_use]
    pub fn entry(&self) -> Option<EntryPoint> {
        self.entry.load().as_deref().copied()
    }

    /// Installs `(node, level)` as the entry point iff none exists yet.
    ///
    /// Returns whether this call won the installation.
    pub fn try_set_initial_entry(&self, node: usize, level: usize) -> bool {
        let previous = self
            .entry
            .compare_and_swap(&None::<Arc<EntryPoint>>, Some(Arc::new(EntryPoint { node, level })));
        previous.is_none()
    }

    /// Promotes the entry point to `(node, level)` iff `level` strictly
    /// exceeds the current entry level.
    ///
    /// Returns whether the promotion was installed. The entry level is
    /// monotone: concurrent promotions settle on the highest level offered.
    pub fn try_promote_entry(&self, node: usize, level: usize) -> bool {
        let mut current = self.entry.load_full();
        loop {
            match current.as_deref() {
                None => return false,
                Some(entry) if level <= entry.level => return false,
                Some(_) => {}
            }
            let replacement = Some(Arc::new(EntryPoint { node, level }));
            let previous = self.entry.compare_and_swap(&current, replacement);
            if option_ptr_eq(&current, &previous) {
                tracing::debug!(node, level, "entry point promoted");
                return true;
            }
            current = (*previous).clone();
        }
    }

    /// Returns a stateful single-threaded read cursor. Each reader thread
    /// obtains its own view; a view is cheap and holds no locks.
    #[must_use]
    pub fn view(&self) -> GraphView<'_> {
        GraphView {
            graph: self,
            cursor: None,
            position: 0,
        }
    }

    /// Returns the estimated resident bytes of the graph structure,
    /// excluding vector storage (the provider owns that).
    #[must_use]
    pub fn ram_bytes_used(&self) -> u64 {
        let mut total = std::mem::size_of::<Self>() as u64;
        for layer in self.layers.iter() {
            let per_set = neighbour_set_bytes(self.max_connections_for_level(*layer.key()));
            total += layer.value().len() as u64 * per_set;
        }
        total
    }
}

fn option_ptr_eq(left: &Option<Arc<EntryPoint>>, right: &Option<Arc<EntryPoint>>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        _ => false,
    }
}

/// Seek-then-iterate cursor over one node's neighbours at one level.
///
/// # Examples
/// ```
/// use otoro_core::HnswGraph;
///
/// let graph = HnswGraph::new(4)?;
/// graph.add_node(0, 0);
/// let mut view = graph.view();
/// assert!(view.seek(0, 0));
/// assert_eq!(view.next_neighbour(), None);
/// # Ok::<(), otoro_core::HnswError>(())
/// ```
#[derive(Debug)]
pub struct GraphView<'graph> {
    graph: &'graph HnswGraph,
    cursor: Option<Arc<NeighbourArray>>,
    position: usize,
}

impl GraphView<'_> {
    /// Positions the cursor on the neighbours of `node` at `level`.
    ///
    /// Returns whether the slot exists. The cursor captures one published
    /// snapshot; neighbour updates racing with iteration are not observed
    /// mid-walk.
    pub fn seek(&mut self, level: usize, node: usize) -> bool {
        self.position = 0;
        self.cursor = self
            .graph
            .neighbours(level, node)
            .map(|set| set.snapshot());
        self.cursor.is_some()
    }

    /// Returns the next neighbour id, or `None` once the current position
    /// is exhausted or nothing has been sought.
    pub fn next_neighbour(&mut self) -> Option<usize> {
        let cursor = self.cursor.as_ref()?;
        let entry = cursor.entries.get(self.position)?;
        self.position += 1;
        Some(entry.id)
    }
}
