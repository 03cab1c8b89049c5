//! A red-black tree of disjoint [`Interval`]s, augmented with the maximum end
//! offset of every subtree.
//!
//! The tree is built for the tagger's one-sentence lifetime: intervals are
//! only ever added, never removed, and the caller guarantees that nothing it
//! inserts overlaps what is already stored. Insertion itself only rejects
//! exact duplicates.
//!
//! Nodes live in a `Vec` arena and refer to each other by index. Index `0`
//! is the black sentinel standing in for every missing child and for the
//! root's parent, so rotations and fixups never need `Option` juggling.

use crate::interval::Interval;

type NodeId = usize;

/// Sentinel slot shared by all leaves.
const NIL: NodeId = 0;

#[derive(Debug, Clone)]
struct Node {
    interval: Interval,
    parent: NodeId,
    left: NodeId,
    right: NodeId,
    black: bool,
    /// Largest `end()` in the subtree rooted here.
    max_end: usize,
}

impl Node {
    fn sentinel() -> Self {
        Node {
            interval: Interval::point(0),
            parent: NIL,
            left: NIL,
            right: NIL,
            black: true,
            max_end: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IntervalTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for IntervalTree {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalTree {
    pub fn new() -> Self {
        IntervalTree {
            nodes: vec![Node::sentinel()],
            root: NIL,
        }
    }

    /// Number of intervals stored.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn contains(&self, interval: &Interval) -> bool {
        self.search(interval) != NIL
    }

    pub fn minimum(&self) -> Option<Interval> {
        self.interval_of(self.minimum_node(self.root))
    }

    pub fn maximum(&self) -> Option<Interval> {
        self.interval_of(self.maximum_node(self.root))
    }

    /// The interval following `interval` in ascending order. `None` if
    /// `interval` is the maximum or is not stored at all.
    pub fn successor(&self, interval: &Interval) -> Option<Interval> {
        let n = self.search(interval);
        if n == NIL {
            return None;
        }
        self.interval_of(self.successor_node(n))
    }

    /// The interval preceding `interval` in ascending order. `None` if
    /// `interval` is the minimum or is not stored at all.
    pub fn predecessor(&self, interval: &Interval) -> Option<Interval> {
        let n = self.search(interval);
        if n == NIL {
            return None;
        }
        self.interval_of(self.predecessor_node(n))
    }

    /// Where a candidate span may start.
    ///
    /// Checks the point `query.end()` against the stored intervals, descending
    /// by start offset. If that point lands inside a stored interval, the first
    /// offset past that interval is returned; otherwise `query.start()` comes
    /// back unchanged, meaning the candidate can be placed as is.
    ///
    /// Only the end point is checked and `max_end` is not used for pruning.
    /// The tagger's scan order makes that sufficient: every stored interval is
    /// at least as long as the candidate, so a candidate can only run into one
    /// through its end.
    pub fn next_available(&self, query: &Interval) -> usize {
        let at_end = Interval::point(query.end());
        let mut curr = self.root;
        while curr != NIL {
            let node = &self.nodes[curr];
            if node.interval.overlaps(&at_end) {
                return node.interval.end() + 1;
            }
            curr = if query.end() < node.interval.start() {
                node.left
            } else {
                node.right
            };
        }
        query.start()
    }

    /// Some stored interval overlapping `query`, found with the classic
    /// max-end pruned descent. Exact for any query, unlike
    /// [`next_available`](Self::next_available).
    pub fn first_overlap(&self, query: &Interval) -> Option<Interval> {
        let mut x = self.root;
        while x != NIL && !self.nodes[x].interval.overlaps(query) {
            let left = self.nodes[x].left;
            x = if left != NIL && self.nodes[left].max_end >= query.start() {
                left
            } else {
                self.nodes[x].right
            };
        }
        self.interval_of(x)
    }

    /// Ascending in-order traversal.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            next: self.minimum_node(self.root),
        }
    }

    // ── Insertion ────────────────────────────────────────────────────────

    /// Insert `interval`, returning whether the tree changed.
    ///
    /// An interval equal to a stored one is ignored. Overlap with stored
    /// intervals is not checked; the caller must rule it out.
    pub fn insert(&mut self, interval: Interval) -> bool {
        let mut y = NIL;
        let mut x = self.root;

        while x != NIL {
            y = x;
            let node = &mut self.nodes[x];
            node.max_end = node.max_end.max(interval.end());
            x = match interval.cmp(&node.interval) {
                std::cmp::Ordering::Equal => return false,
                std::cmp::Ordering::Less => node.left,
                std::cmp::Ordering::Greater => node.right,
            };
        }

        let z = self.nodes.len();
        self.nodes.push(Node {
            interval,
            parent: y,
            left: NIL,
            right: NIL,
            black: false,
            max_end: interval.end(),
        });

        if y == NIL {
            self.root = z;
            self.nodes[z].black = true;
        } else {
            if interval < self.nodes[y].interval {
                self.nodes[y].left = z;
            } else {
                self.nodes[y].right = z;
            }
            self.insert_fixup(z);
        }
        true
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.is_red(self.nodes[z].parent) {
            let p = self.nodes[z].parent;
            let g = self.nodes[p].parent;
            if p == self.nodes[g].left {
                let uncle = self.nodes[g].right;
                if self.is_red(uncle) {
                    self.nodes[p].black = true;
                    self.nodes[uncle].black = true;
                    self.nodes[g].black = false;
                    z = g;
                } else {
                    if z == self.nodes[p].right {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.nodes[z].parent;
                    let g = self.nodes[p].parent;
                    self.nodes[p].black = true;
                    self.nodes[g].black = false;
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.nodes[g].left;
                if self.is_red(uncle) {
                    self.nodes[p].black = true;
                    self.nodes[uncle].black = true;
                    self.nodes[g].black = false;
                    z = g;
                } else {
                    if z == self.nodes[p].left {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.nodes[z].parent;
                    let g = self.nodes[p].parent;
                    self.nodes[p].black = true;
                    self.nodes[g].black = false;
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.nodes[root].black = true;
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x].right;
        let y_left = self.nodes[y].left;

        self.nodes[x].right = y_left;
        if y_left != NIL {
            self.nodes[y_left].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y].left = x;
        self.nodes[x].parent = y;

        self.reset_max_end(x);
        self.reset_max_end(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x].left;
        let y_right = self.nodes[y].right;

        self.nodes[x].left = y_right;
        if y_right != NIL {
            self.nodes[y_right].parent = x;
        }
        self.replace_child(x, y);
        self.nodes[y].right = x;
        self.nodes[x].parent = y;

        self.reset_max_end(x);
        self.reset_max_end(y);
    }

    /// Hang `y` where `x` used to hang under `x`'s parent.
    fn replace_child(&mut self, x: NodeId, y: NodeId) {
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        if parent == NIL {
            self.root = y;
        } else if x == self.nodes[parent].left {
            self.nodes[parent].left = y;
        } else {
            self.nodes[parent].right = y;
        }
    }

    fn reset_max_end(&mut self, n: NodeId) {
        let node = &self.nodes[n];
        let mut val = node.interval.end();
        if node.left != NIL {
            val = val.max(self.nodes[node.left].max_end);
        }
        if node.right != NIL {
            val = val.max(self.nodes[node.right].max_end);
        }
        self.nodes[n].max_end = val;
    }

    // ── Navigation helpers ───────────────────────────────────────────────

    fn is_red(&self, n: NodeId) -> bool {
        !self.nodes[n].black
    }

    fn interval_of(&self, n: NodeId) -> Option<Interval> {
        (n != NIL).then(|| self.nodes[n].interval)
    }

    fn search(&self, interval: &Interval) -> NodeId {
        let mut n = self.root;
        while n != NIL {
            n = match interval.cmp(&self.nodes[n].interval) {
                std::cmp::Ordering::Equal => return n,
                std::cmp::Ordering::Less => self.nodes[n].left,
                std::cmp::Ordering::Greater => self.nodes[n].right,
            };
        }
        NIL
    }

    fn minimum_node(&self, mut n: NodeId) -> NodeId {
        if n == NIL {
            return NIL;
        }
        while self.nodes[n].left != NIL {
            n = self.nodes[n].left;
        }
        n
    }

    fn maximum_node(&self, mut n: NodeId) -> NodeId {
        if n == NIL {
            return NIL;
        }
        while self.nodes[n].right != NIL {
            n = self.nodes[n].right;
        }
        n
    }

    fn successor_node(&self, n: NodeId) -> NodeId {
        if self.nodes[n].right != NIL {
            return self.minimum_node(self.nodes[n].right);
        }
        let mut x = n;
        let mut y = self.nodes[n].parent;
        while y != NIL && x == self.nodes[y].right {
            x = y;
            y = self.nodes[y].parent;
        }
        y
    }

    fn predecessor_node(&self, n: NodeId) -> NodeId {
        if self.nodes[n].left != NIL {
            return self.maximum_node(self.nodes[n].left);
        }
        let mut x = n;
        let mut y = self.nodes[n].parent;
        while y != NIL && x == self.nodes[y].left {
            x = y;
            y = self.nodes[y].parent;
        }
        y
    }
}

/// In-order iterator over a tree's intervals.
pub struct Iter<'a> {
    tree: &'a IntervalTree,
    next: NodeId,
}

impl Iterator for Iter<'_> {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        if self.next == NIL {
            return None;
        }
        let current = self.next;
        self.next = self.tree.successor_node(current);
        Some(self.tree.nodes[current].interval)
    }
}

impl<'a> IntoIterator for &'a IntervalTree {
    type Item = Interval;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

// ── Invariant checks ─────────────────────────────────────────────────────

#[cfg(test)]
impl IntervalTree {
    pub(crate) fn is_bst(&self) -> bool {
        self.is_bst_from(self.root, None, None)
    }

    fn is_bst_from(&self, n: NodeId, min: Option<Interval>, max: Option<Interval>) -> bool {
        if n == NIL {
            return true;
        }
        let iv = self.nodes[n].interval;
        if min.is_some_and(|m| iv <= m) || max.is_some_and(|m| iv >= m) {
            return false;
        }
        self.is_bst_from(self.nodes[n].left, min, Some(iv))
            && self.is_bst_from(self.nodes[n].right, Some(iv), max)
    }

    pub(crate) fn is_balanced(&self) -> bool {
        let mut black = 0;
        let mut x = self.root;
        while x != NIL {
            if self.nodes[x].black {
                black += 1;
            }
            x = self.nodes[x].left;
        }
        self.is_balanced_from(self.root, black)
    }

    fn is_balanced_from(&self, n: NodeId, mut black: usize) -> bool {
        if n == NIL {
            return black == 0;
        }
        if self.nodes[n].black {
            if black == 0 {
                return false;
            }
            black -= 1;
        }
        self.is_balanced_from(self.nodes[n].left, black)
            && self.is_balanced_from(self.nodes[n].right, black)
    }

    pub(crate) fn has_valid_red_coloring(&self) -> bool {
        self.root == NIL || (self.nodes[self.root].black && self.red_ok_from(self.root))
    }

    fn red_ok_from(&self, n: NodeId) -> bool {
        if n == NIL {
            return true;
        }
        let node = &self.nodes[n];
        if !node.black && (self.is_red(node.left) || self.is_red(node.right)) {
            return false;
        }
        self.red_ok_from(node.left) && self.red_ok_from(node.right)
    }

    pub(crate) fn has_consistent_max_ends(&self) -> bool {
        self.max_end_ok_from(self.root)
    }

    fn max_end_ok_from(&self, n: NodeId) -> bool {
        if n == NIL {
            return true;
        }
        let node = &self.nodes[n];
        let mut expected = node.interval.end();
        if node.left != NIL {
            expected = expected.max(self.nodes[node.left].max_end);
        }
        if node.right != NIL {
            expected = expected.max(self.nodes[node.right].max_end);
        }
        node.max_end == expected && self.max_end_ok_from(node.left) && self.max_end_ok_from(node.right)
    }
}
