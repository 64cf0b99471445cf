//! Work queue: a binary min-heap over nodes, ordered by the priority key.

use crate::solver::node::Node;

/// Vec-backed binary min-heap. The smallest priority sits at the front;
/// ties on the lower bound are already broken inside the key (see
/// [`Node::priority`]), which keeps the pop order deterministic.
#[derive(Debug, Default)]
pub(crate) struct NodeQueue {
    heap: Vec<Node>,
}

impl NodeQueue {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn push(&mut self, node: Node) {
        self.heap.push(node);
        self.sift_up(self.heap.len() - 1);
    }

    pub fn pop(&mut self) -> Option<Node> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let node = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        node
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !Self::precedes(&self.heap[index], &self.heap[parent]) {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;
            if left < self.heap.len() && Self::precedes(&self.heap[left], &self.heap[smallest]) {
                smallest = left;
            }
            if right < self.heap.len() && Self::precedes(&self.heap[right], &self.heap[smallest]) {
                smallest = right;
            }
            if smallest == index {
                return;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }

    #[inline]
    fn precedes(a: &Node, b: &Node) -> bool {
        a.priority().total_cmp(&b.priority()).is_lt()
    }
}
