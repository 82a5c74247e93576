//! Traversal strategies over a built [`LabelHierarchy`].
//!
//! Every strategy follows the same pull protocol:
//!
//! ```text
//! NotStarted --begin(seeds)--> Active --advance()...--> AtEnd
//! ```
//!
//! `begin` first replays the previous frame's placed labels (stale ids are
//! skipped), then the strategy's own walk takes over. [`LabelIterator`] also
//! implements [`Iterator`], calling `begin(&[])` on the first `next()`.

pub mod composite;
pub mod depth_first;
pub mod frustum;
pub mod full_sort;
pub mod options;
pub mod quadruples;
pub mod queue;
mod seeds;

use glam::DVec3;

pub use composite::CompositeIterator;
pub use depth_first::DepthFirstIterator;
pub use frustum::FrustumIterator;
pub use full_sort::{FullSortIterator, SortedNode};
pub use options::{FrustumSearch, TraversalOptions, FULL_SORT_LABEL_BUDGET, MAXIMUM_NODES_QUEUED};
pub use queue::QueueIterator;

use crate::anchors::AnchorId;
use crate::hierarchy::{LabelHierarchy, NodeGeometry, NodeId, SpatialIndex};
use crate::view::{Containment, ViewSnapshot};

/// Which walk to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraversalStrategy {
  Frustum,
  FullSort,
  /// Quadtree or octree queue, picked from the hierarchy's dimension.
  Queue,
  DepthFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraversalState {
  NotStarted,
  Active,
  AtEnd,
}

/// Frustum and apparent-size test shared by the culling strategies.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeCulling<'h> {
  index: &'h SpatialIndex,
  view: ViewSnapshot,
  size_limit: f64,
}

impl<'h> NodeCulling<'h> {
  pub(crate) fn new(index: &'h SpatialIndex, view: ViewSnapshot, size_limit: f64) -> Self {
    Self {
      index,
      view,
      size_limit,
    }
  }

  #[inline]
  pub(crate) fn index(&self) -> &'h SpatialIndex {
    self.index
  }

  #[inline]
  pub(crate) fn eye(&self) -> DVec3 {
    self.view.eye
  }

  pub(crate) fn classify(&self, id: NodeId) -> Containment {
    let bounds = self.index.node(id).geometry().bounds(self.index.dimension());
    self.view.frustum.classify(&bounds)
  }

  #[inline]
  pub(crate) fn distance_squared(&self, id: NodeId) -> f64 {
    self.index.node(id).geometry().center.distance_squared(self.view.eye)
  }

  /// In the frustum and not too small to matter from here.
  pub(crate) fn accepts(&self, id: NodeId) -> bool {
    if self.classify(id) == Containment::Outside {
      return false;
    }
    let half = self.index.node(id).geometry().size * 0.5;
    half * half >= self.distance_squared(id) * self.size_limit
  }
}

#[derive(Clone, Debug)]
pub enum IteratorKind<'h> {
  Frustum(FrustumIterator<'h>),
  FullSort(FullSortIterator<'h>),
  QueueQuad(QueueIterator<'h>),
  QueueOctree(QueueIterator<'h>),
  DepthFirst(DepthFirstIterator<'h>),
  Composite(CompositeIterator<'h>),
}

/// A prepared traversal. Borrows the hierarchy, so the tree cannot be
/// rebuilt while one is alive.
#[derive(Clone, Debug)]
pub struct LabelIterator<'h> {
  kind: IteratorKind<'h>,
  state: TraversalState,
  /// The current label was already handed out by `next()`.
  consumed: bool,
}

macro_rules! dispatch {
  ($self:expr, $it:ident => $body:expr) => {
    match $self {
      IteratorKind::Frustum($it) => $body,
      IteratorKind::FullSort($it) => $body,
      IteratorKind::QueueQuad($it) => $body,
      IteratorKind::QueueOctree($it) => $body,
      IteratorKind::DepthFirst($it) => $body,
      IteratorKind::Composite($it) => $body,
    }
  };
}

impl<'h> LabelIterator<'h> {
  pub fn new(kind: IteratorKind<'h>) -> Self {
    Self {
      kind,
      state: TraversalState::NotStarted,
      consumed: false,
    }
  }

  /// Round-robin over `(iterator, repeat_count)` parts.
  pub fn composite(parts: Vec<(LabelIterator<'h>, usize)>) -> Self {
    Self::new(IteratorKind::Composite(CompositeIterator::new(parts)))
  }

  #[inline]
  pub fn kind(&self) -> &IteratorKind<'h> {
    &self.kind
  }

  #[inline]
  pub fn state(&self) -> TraversalState {
    self.state
  }

  pub fn name(&self) -> &'static str {
    match self.kind {
      IteratorKind::Frustum(_) => "frustum",
      IteratorKind::FullSort(_) => "full_sort",
      IteratorKind::QueueQuad(_) => "queue_quad",
      IteratorKind::QueueOctree(_) => "queue_octree",
      IteratorKind::DepthFirst(_) => "depth_first",
      IteratorKind::Composite(_) => "composite",
    }
  }

  /// Start (or restart) the walk, replaying `seeds` first.
  pub fn begin(&mut self, seeds: &[AnchorId]) {
    dispatch!(&mut self.kind, it => it.begin(seeds));
    self.consumed = false;
    self.state = TraversalState::Active;
    self.sync_end();
  }

  /// Move to the next label. Starts the walk if needed; no-op at the end.
  pub fn advance(&mut self) {
    match self.state {
      TraversalState::NotStarted => self.begin(&[]),
      TraversalState::Active => {
        dispatch!(&mut self.kind, it => it.advance());
        self.consumed = false;
        self.sync_end();
      }
      TraversalState::AtEnd => {}
    }
  }

  #[inline]
  pub fn is_at_end(&self) -> bool {
    self.state == TraversalState::AtEnd
  }

  /// Anchor at the current position.
  pub fn label_id(&self) -> Option<AnchorId> {
    if self.state != TraversalState::Active {
      return None;
    }
    dispatch!(&self.kind, it => it.label_id())
  }

  /// Center and edge length of the node being visited. `None` while seeds
  /// are replayed.
  pub fn node_geometry(&self) -> Option<NodeGeometry> {
    if self.state != TraversalState::Active {
      return None;
    }
    dispatch!(&self.kind, it => it.node_geometry())
  }

  /// Nodes that yielded or were walked through so far.
  pub fn nodes_visited(&self) -> usize {
    match &self.kind {
      IteratorKind::Frustum(it) => it.nodes_visited(),
      IteratorKind::FullSort(it) => it.sorted_nodes().len(),
      IteratorKind::QueueQuad(it) | IteratorKind::QueueOctree(it) => it.nodes_visited(),
      IteratorKind::DepthFirst(it) => it.nodes_visited(),
      IteratorKind::Composite(it) => it.nodes_visited(),
    }
  }

  fn sync_end(&mut self) {
    let at_end = dispatch!(&self.kind, it => it.is_at_end());
    if at_end {
      self.state = TraversalState::AtEnd;
      tracing::debug!(
        strategy = self.name(),
        nodes = self.nodes_visited(),
        "traversal finished"
      );
    }
  }
}

impl Iterator for LabelIterator<'_> {
  type Item = AnchorId;

  fn next(&mut self) -> Option<AnchorId> {
    match self.state {
      TraversalState::NotStarted => self.begin(&[]),
      TraversalState::Active if self.consumed => self.advance(),
      _ => {}
    }
    let id = self.label_id()?;
    self.consumed = true;
    Some(id)
  }
}

impl LabelHierarchy {
  /// Prepare a traversal for one frame.
  pub fn iterator(
    &self,
    strategy: TraversalStrategy,
    view: &ViewSnapshot,
    options: &TraversalOptions,
  ) -> LabelIterator<'_> {
    let index = self.index();
    let anchors = self.anchor_count();
    let culling = NodeCulling::new(index, *view, options.size_limit);
    let kind = match strategy {
      TraversalStrategy::Frustum => IteratorKind::Frustum(FrustumIterator::new(
        index,
        anchors,
        *view,
        options.frustum_search,
      )),
      TraversalStrategy::FullSort => IteratorKind::FullSort(FullSortIterator::new(
        culling,
        anchors,
        options.full_sort_label_budget,
        options.positions_as_normals,
      )),
      TraversalStrategy::Queue => {
        let queue = QueueIterator::new(culling, anchors, options.queue_node_budget);
        if self.is_quadtree() {
          IteratorKind::QueueQuad(queue)
        } else {
          IteratorKind::QueueOctree(queue)
        }
      }
      TraversalStrategy::DepthFirst => {
        IteratorKind::DepthFirst(DepthFirstIterator::new(culling, anchors))
      }
    };
    LabelIterator::new(kind)
  }
}
