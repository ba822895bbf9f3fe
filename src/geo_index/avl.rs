//! AVL tree keyed by latitude: node storage, rotations and pruned traversal.
//!
//! Nodes own their children through `Box`, so a rotation is a handful of
//! `take()`s and moves followed by height recomputation. Equal latitudes are
//! inserted to the right; after rotations an equal key may end up on either
//! side, so the ordering invariant is `left <= node <= right`.

use crate::distance::{haversine_km, latitude_span_deg};
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// How a radius search decides which subtrees to descend into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pruning {
    /// Convert the radius to a latitude span and descend only into subtrees
    /// whose latitude range can overlap `center.lat ± span`. Never drops a match.
    #[default]
    LatitudeBand,
    /// Compare the raw radius against the child's own latitude, as the first
    /// version of the planner did. Can miss matches deeper in a pruned subtree.
    ChildKey,
}

type Link<P> = Option<Box<AvlNode<P>>>;

#[derive(Debug, Clone)]
struct AvlNode<P> {
    point: Point,
    payload: P,
    height: usize,
    left: Link<P>,
    right: Link<P>,
}

fn height<P>(link: &Link<P>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

impl<P> AvlNode<P> {
    fn leaf(point: Point, payload: P) -> Box<Self> {
        Box::new(Self {
            point,
            payload,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn latitude(&self) -> f64 {
        self.point.latitude()
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn rotate_right<P>(mut node: Box<AvlNode<P>>) -> Box<AvlNode<P>> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left<P>(mut node: Box<AvlNode<P>>) -> Box<AvlNode<P>> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

/// Restore the balance invariant at `node`, assuming both subtrees are balanced.
///
/// The case is picked from the heavy child's balance factor rather than by
/// comparing keys, so runs of equal latitudes still rotate.
fn rebalance<P>(mut node: Box<AvlNode<P>>) -> Box<AvlNode<P>> {
    node.update_height();
    let balance = node.balance_factor();

    if balance > 1 {
        // left-right: straighten the left child first
        if node.left.as_ref().map_or(0, |l| l.balance_factor()) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }

    if balance < -1 {
        // right-left
        if node.right.as_ref().map_or(0, |r| r.balance_factor()) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }

    node
}

fn insert_node<P>(link: Link<P>, point: Point, payload: P) -> Box<AvlNode<P>> {
    match link {
        None => AvlNode::leaf(point, payload),
        Some(mut node) => {
            if point.latitude() < node.latitude() {
                node.left = Some(insert_node(node.left.take(), point, payload));
            } else {
                node.right = Some(insert_node(node.right.take(), point, payload));
            }
            rebalance(node)
        }
    }
}

/// Returns the subtree height if ordering, height bookkeeping and balance all hold.
fn checked_height<P>(link: &Link<P>, low: f64, high: f64) -> Option<usize> {
    let Some(node) = link else {
        return Some(0);
    };
    let lat = node.latitude();
    if lat < low || lat > high {
        return None;
    }
    let left = checked_height(&node.left, low, lat)?;
    let right = checked_height(&node.right, lat, high)?;
    if left.abs_diff(right) > 1 || node.height != 1 + left.max(right) {
        return None;
    }
    Some(node.height)
}

/// Records matched by a radius search, plus how many nodes the traversal touched.
#[derive(Debug)]
pub struct RadiusScan<'a, P> {
    pub hits: Vec<(&'a Point, &'a P)>,
    pub nodes_visited: usize,
}

struct RadiusQuery {
    center: Point,
    radius_km: f64,
    min_latitude: f64,
    max_latitude: f64,
    pruning: Pruning,
}

fn scan_node<'a, P>(node: &'a AvlNode<P>, query: &RadiusQuery, scan: &mut RadiusScan<'a, P>) {
    scan.nodes_visited += 1;

    if haversine_km(&query.center, &node.point) <= query.radius_km {
        scan.hits.push((&node.point, &node.payload));
    }

    let (go_left, go_right) = match query.pruning {
        Pruning::LatitudeBand => (
            node.latitude() >= query.min_latitude,
            node.latitude() <= query.max_latitude,
        ),
        Pruning::ChildKey => (
            node.left.as_ref().map_or(false, |l| {
                query.center.latitude() - query.radius_km <= l.latitude()
            }),
            node.right.as_ref().map_or(false, |r| {
                query.center.latitude() + query.radius_km >= r.latitude()
            }),
        ),
    };

    if go_left {
        if let Some(left) = node.left.as_deref() {
            scan_node(left, query, scan);
        }
    }
    if go_right {
        if let Some(right) = node.right.as_deref() {
            scan_node(right, query, scan);
        }
    }
}

/// A height-balanced binary search tree over latitude.
#[derive(Debug, Clone)]
pub struct AvlTree<P> {
    root: Link<P>,
    len: usize,
}

impl<P> AvlTree<P> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root: 0 when empty, 1 for a single record.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Insert without coordinate validation; callers check the point first.
    pub fn insert(&mut self, point: Point, payload: P) {
        let root = self.root.take();
        self.root = Some(insert_node(root, point, payload));
        self.len += 1;
    }

    /// In-order iterator, ascending by latitude.
    pub fn iter(&self) -> Iter<'_, P> {
        Iter::new(&self.root)
    }

    /// Verify ordering, stored heights and the balance bound at every node.
    pub fn is_balanced(&self) -> bool {
        checked_height(&self.root, f64::NEG_INFINITY, f64::INFINITY).is_some()
    }

    pub fn scan_radius(&self, center: &Point, radius_km: f64, pruning: Pruning) -> RadiusScan<'_, P> {
        let mut scan = RadiusScan {
            hits: Vec::new(),
            nodes_visited: 0,
        };
        // NaN fails this check too
        if !(radius_km >= 0.0) {
            return scan;
        }

        let span = latitude_span_deg(radius_km);
        let query = RadiusQuery {
            center: *center,
            radius_km,
            min_latitude: center.latitude() - span,
            max_latitude: center.latitude() + span,
            pruning,
        };
        if let Some(root) = self.root.as_deref() {
            scan_node(root, &query, &mut scan);
        }
        scan
    }
}

impl<P> Default for AvlTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowing in-order iterator over an [`AvlTree`].
pub struct Iter<'a, P> {
    stack: Vec<&'a AvlNode<P>>,
}

impl<'a, P> Iter<'a, P> {
    fn new(root: &'a Link<P>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a AvlNode<P>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, P> Iterator for Iter<'a, P> {
    type Item = (&'a Point, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some((&node.point, &node.payload))
    }
}
