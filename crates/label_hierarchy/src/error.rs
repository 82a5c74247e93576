//! Error types for hierarchy construction.

use thiserror::Error;

/// Errors raised while configuring or building a label hierarchy.
///
/// Traversal never fails; only inputs handed to the builder are checked.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HierarchyError {
  #[error("target label count must be at least 1")]
  ZeroTargetLabelCount,

  #[error("maximum depth {requested} exceeds the supported limit of {limit}")]
  DepthTooLarge { requested: u32, limit: u32 },

  #[error("attribute `{name}` has {actual} entries but there are {expected} anchors")]
  AttributeLength {
    name: &'static str,
    expected: usize,
    actual: usize,
  },

  #[error("anchor {id} has a non-finite coordinate")]
  NonFiniteCoordinate { id: usize },

  #[error("anchor id {id} is out of range for {count} anchors")]
  AnchorOutOfRange { id: usize, count: usize },
}
