use glam::Vec3;

use super::*;
use crate::types::Point;

// =========================================================================
// NodePath
// =========================================================================

#[test]
fn test_root_path() {
  let root = NodePath::root();
  assert!(root.is_root());
  assert_eq!(root.depth(), 0);
  assert_eq!(root.to_string(), "r");
  assert_eq!(root.parent(), None);
  assert_eq!(root.octant(), None);
}

/// Child paths append one digit per level.
#[test]
fn test_child_path_names() {
  let path = NodePath::root().child(0).child(4);
  assert_eq!(path.to_string(), "r04");
  assert_eq!(path.depth(), 2);
  assert_eq!(path.digits(), &[0, 4]);
  assert_eq!(path.octant(), Some(4));
}

/// parent(child(path, octant)) == path for every octant.
#[test]
fn test_child_parent_roundtrip() {
  let original = NodePath::root().child(7).child(3);
  for octant in 0u8..8 {
    let child = original.child(octant);
    assert_eq!(child.parent().as_ref(), Some(&original), "octant {octant}");
  }
}

#[test]
fn test_parse_path() {
  assert_eq!("r".parse::<NodePath>().unwrap(), NodePath::root());
  assert_eq!(
    "r170".parse::<NodePath>().unwrap(),
    NodePath::root().child(1).child(7).child(0)
  );
  assert!("170".parse::<NodePath>().is_err());
  assert!("r18".parse::<NodePath>().is_err());
  assert!("rx".parse::<NodePath>().is_err());
}

/// Sorting paths yields depth-first pre-order.
#[test]
fn test_path_order_is_preorder() {
  let mut paths: Vec<NodePath> = ["r1", "r01", "r", "r0", "r00", "r7"]
    .iter()
    .map(|s| s.parse().unwrap())
    .collect();
  paths.sort();
  let names: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
  assert_eq!(names, ["r", "r0", "r00", "r01", "r1", "r7"]);
}

// =========================================================================
// ChildMask
// =========================================================================

#[test]
fn test_child_mask() {
  let mut mask = ChildMask::EMPTY;
  assert!(mask.is_empty());

  mask.insert(0);
  mask.insert(5);
  mask.insert(5);

  assert_eq!(mask.bits(), 0b0010_0001);
  assert_eq!(mask.count(), 2);
  assert!(mask.contains(0));
  assert!(mask.contains(5));
  assert!(!mask.contains(1));
  assert!(!mask.contains(9));
  assert_eq!(mask.iter().collect::<Vec<_>>(), vec![0, 5]);
}

// =========================================================================
// OctreeNode
// =========================================================================

fn leaf(path: NodePath, count: usize) -> OctreeNode {
  let cube = BoundingCube::new(Vec3::ZERO, 1.0);
  let sample: PointBuffer = (0..count).map(|i| Point::at(i as f32, 0.0, 0.0)).collect();
  OctreeNode::new(path, cube, sample, ChildMask::EMPTY)
}

fn sparse_tree() -> OctreeNode {
  let root_path = NodePath::root();
  let mask = ChildMask::from_bits(0b1000_0100);
  let mut root = OctreeNode::new(
    root_path.clone(),
    BoundingCube::new(Vec3::ZERO, 2.0),
    PointBuffer::new(),
    mask,
  );
  root.set_children(vec![leaf(root_path.child(2), 3), leaf(root_path.child(7), 1)]);
  root
}

#[test]
fn test_child_lookup_by_octant() {
  let root = sparse_tree();
  assert_eq!(root.child(2).map(|n| n.point_count()), Some(3));
  assert_eq!(root.child(7).map(|n| n.point_count()), Some(1));
  assert!(root.child(0).is_none());
  assert!(root.child(3).is_none());
  assert!(!root.is_leaf());
  assert!(root.child(2).unwrap().is_leaf());
}

#[test]
fn test_iter_preorder() {
  let root = sparse_tree();
  let names: Vec<String> = root.iter().map(|n| n.path().to_string()).collect();
  assert_eq!(names, ["r", "r2", "r7"]);
}

/// Releasing the sample keeps the stored count for the descriptor.
#[test]
fn test_release_sample_keeps_count() {
  let mut node = leaf(NodePath::root(), 5);
  node.release_sample();
  assert!(node.sample().is_empty());
  assert_eq!(node.point_count(), 5);
  assert_eq!(node.summary().point_count, 5);
}
