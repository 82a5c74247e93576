use std::cmp::Ordering;

use glam::DVec3;

use super::*;

// =========================================================================
// Construction and validation
// =========================================================================

#[test]
fn test_new_rejects_non_finite() {
  let err = AnchorSet::new(vec![DVec3::ZERO, DVec3::new(f64::NAN, 0.0, 0.0)]).unwrap_err();
  assert_eq!(err, HierarchyError::NonFiniteCoordinate { id: 1 });
}

#[test]
fn test_attribute_length_mismatch() {
  let set = AnchorSet::new(vec![DVec3::ZERO; 3]).unwrap();
  let err = set.with_priorities(vec![1.0, 2.0]).unwrap_err();
  assert_eq!(
    err,
    HierarchyError::AttributeLength {
      name: "priority",
      expected: 3,
      actual: 2
    }
  );
}

#[test]
fn test_optional_attributes_are_readable() {
  let set = AnchorSet::new(vec![DVec3::ZERO, DVec3::ONE])
    .unwrap()
    .with_priorities(vec![0.5, 2.0])
    .unwrap()
    .with_labels(vec!["a".into(), "b".into()])
    .unwrap()
    .with_icon_indices(vec![3, 4])
    .unwrap();

  assert_eq!(set.priority(1), Some(2.0));
  assert_eq!(set.label(0), Some("a"));
  assert_eq!(set.icon_index(1), Some(4));
  assert_eq!(set.orientation(0), None);
  assert_eq!(set.size(5), None);
}

// =========================================================================
// Generation tracking
// =========================================================================

#[test]
fn test_set_position_bumps_generation() {
  let mut set = AnchorSet::new(vec![DVec3::ZERO; 2]).unwrap();
  let before = set.stamp();
  set.set_position(1, DVec3::ONE).unwrap();
  assert_ne!(before, set.stamp());
  assert_eq!(set.position(1), Some(DVec3::ONE));
}

#[test]
fn test_set_position_out_of_range() {
  let mut set = AnchorSet::new(vec![DVec3::ZERO; 2]).unwrap();
  let err = set.set_position(7, DVec3::ONE).unwrap_err();
  assert_eq!(err, HierarchyError::AnchorOutOfRange { id: 7, count: 2 });
  assert_eq!(set.generation(), 0);
}

#[test]
fn test_clone_gets_distinct_stamp() {
  let set = AnchorSet::new(vec![DVec3::ZERO]).unwrap();
  let copy = set.clone();
  assert_eq!(set.generation(), copy.generation());
  assert_ne!(set.stamp(), copy.stamp());
}

// =========================================================================
// Ranking
// =========================================================================

#[test]
fn test_ranking_without_priorities_is_by_id() {
  let ranking = AnchorRanking::new(None);
  assert_eq!(ranking.compare(1, 2), Ordering::Less);
  assert_eq!(ranking.compare(2, 1), Ordering::Greater);
  assert_eq!(ranking.compare(4, 4), Ordering::Equal);
}

#[test]
fn test_ranking_priority_descending_then_id() {
  let priorities = [1.0, 5.0, 5.0, 3.0];
  let ranking = AnchorRanking::new(Some(&priorities));
  assert_eq!(ranking.sorted_ids(4), vec![1, 2, 3, 0]);
}

#[test]
fn test_ranking_nan_is_deterministic() {
  let priorities = [f64::NAN, 1.0, f64::NAN];
  let ranking = AnchorRanking::new(Some(&priorities));
  let first = ranking.sorted_ids(3);
  let second = ranking.sorted_ids(3);
  assert_eq!(first, second);
  assert_eq!(first.len(), 3);
}
