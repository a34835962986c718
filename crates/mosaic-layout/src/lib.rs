// Partition engine for the image grid.
// Implements mosaic_core::GridEngine by repeatedly bisecting the largest tile.

mod node;

use std::collections::{HashMap, VecDeque};

use mosaic_core::{
    GridEngine, GridError, GridResult, Size, SlotChange, SlotIndex, SlotKind, SlotPlacement,
};

pub use node::PartitionNode;

// ──────────────────────────────────────────────
// PartitionTracker
// ──────────────────────────────────────────────

/// Default ceiling on real image slots.
pub const DEFAULT_MAX_SLOTS: usize = 11;

/// The slot the overflow indicator will occupy.
#[derive(Debug, Clone, Copy, PartialEq)]
enum OverflowAnchor {
    /// An existing node, looked up by index.
    Placed(SlotIndex),
    /// The node the next split would create; not part of the partition yet.
    Projected(PartitionNode),
}

pub struct PartitionTracker {
    container: Size,
    /// Split order. The front is always the least-subdivided node, so popping
    /// it and pushing both halves to the back splits the largest tile first.
    queue: VecDeque<SlotIndex>,
    nodes: HashMap<SlotIndex, PartitionNode>,
    anchor: Option<OverflowAnchor>,
    max_slots: usize,
    image_count: usize,
    extra_count: usize,
    overflow_shown: bool,
}

impl PartitionTracker {
    pub fn new() -> Self {
        Self {
            container: Size::default(),
            queue: VecDeque::new(),
            nodes: HashMap::new(),
            anchor: None,
            max_slots: DEFAULT_MAX_SLOTS,
            image_count: 0,
            extra_count: 0,
            overflow_shown: false,
        }
    }

    pub fn with_max_slots(max_slots: usize) -> GridResult<Self> {
        if max_slots == 0 {
            return Err(GridError::InvalidArgument(
                "max slots has to be greater than 0".to_string(),
            ));
        }
        let mut tracker = Self::new();
        tracker.max_slots = max_slots;
        Ok(tracker)
    }

    // ── Geometry ──

    /// Discard all nodes and partition `container` into `count` tiles from scratch.
    pub fn rebuild(&mut self, container: Size, count: usize) {
        self.update_layout(container, count, true);
    }

    /// Grow the partition to `count` tiles, splitting only what is needed.
    /// Falls back to a full rebuild when the container changed or when
    /// `count` does not exceed the current node count.
    pub fn extend(&mut self, container: Size, count: usize) {
        self.update_layout(container, count, false);
    }

    fn update_layout(&mut self, container: Size, count: usize, reset: bool) {
        let start = if reset || container != self.container || self.queue.len() >= count {
            self.queue.clear();
            self.nodes.clear();
            self.anchor = None;
            self.container = container;
            0
        } else {
            self.queue.len()
        };

        for i in start..count {
            if i == 0 {
                self.nodes.insert(0, PartitionNode::new(container));
                self.queue.push_back(0);
                self.anchor = Some(OverflowAnchor::Placed(0));
                continue;
            }

            let Some(head) = self.queue.pop_front() else {
                break;
            };
            let Some(mut fresh) = self.nodes.get_mut(&head).map(|node| node.split()) else {
                break;
            };
            fresh.set_index(i);
            self.queue.push_back(i);
            self.queue.push_back(head);
            self.nodes.insert(i, fresh);

            let dominates = match self.anchor_node() {
                Some(anchor) => fresh.dominates(&anchor),
                None => true,
            };
            if dominates {
                self.anchor = Some(OverflowAnchor::Placed(i));
            }
        }

        // Look one split ahead so the overflow indicator lands where the next
        // tile would have gone.
        if !self.queue.is_empty() && self.queue.len() <= self.max_slots {
            let head = self.queue.front().and_then(|i| self.nodes.get(i));
            if let Some(head) = head {
                let (_, mut projected) = head.peek_split();
                projected.set_index(self.queue.len());
                let dominates = match self.anchor_node() {
                    Some(anchor) => projected.dominates(&anchor),
                    None => true,
                };
                if dominates {
                    self.anchor = Some(OverflowAnchor::Projected(projected));
                }
            }
        }

        log::debug!(
            "partition {}x{}: {} nodes (from {}), {} tracks, anchor {:?}",
            container.width,
            container.height,
            self.queue.len(),
            start,
            self.column_count(),
            self.anchor_node().map(|n| n.index())
        );
    }

    fn anchor_node(&self) -> Option<PartitionNode> {
        match self.anchor? {
            OverflowAnchor::Placed(index) => self.nodes.get(&index).copied(),
            OverflowAnchor::Projected(node) => Some(node),
        }
    }

    /// Number of grid tracks along each axis needed to place every node on
    /// whole cells. The newest node is always among the most subdivided.
    pub fn column_count(&self) -> u32 {
        self.queue
            .back()
            .and_then(|i| self.nodes.get(i))
            .map(|node| node.finest_divisor())
            .unwrap_or(1)
    }

    pub fn container(&self) -> Size {
        self.container
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn node(&self, index: SlotIndex) -> Option<&PartitionNode> {
        self.nodes.get(&index)
    }

    /// Nodes in split-queue order (least subdivided first).
    pub fn nodes(&self) -> impl Iterator<Item = &PartitionNode> + '_ {
        self.queue.iter().filter_map(|i| self.nodes.get(i))
    }

    /// The node whose slot the overflow indicator occupies, or will occupy
    /// once the ceiling is exceeded.
    pub fn overflow_anchor(&self) -> Option<PartitionNode> {
        self.anchor_node()
    }

    // ── Slot bookkeeping ──

    pub fn max_slots(&self) -> usize {
        self.max_slots
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn extra_count(&self) -> usize {
        self.extra_count
    }

    pub fn has_overflow(&self) -> bool {
        self.overflow_shown
    }

    /// Images plus the overflow indicator, if shown.
    pub fn slot_count(&self) -> usize {
        self.image_count + usize::from(self.overflow_shown)
    }

    /// Node index currently showing the overflow indicator.
    pub fn overflow_slot_index(&self) -> Option<SlotIndex> {
        if !self.overflow_shown {
            return None;
        }
        self.anchor_node().map(|node| node.index())
    }

    /// Append an image.
    pub fn push(&mut self) -> GridResult<SlotChange> {
        self.insert_at(self.image_count)
    }

    /// Insert an image at `index` (`0..=image_count`). Exceeding the ceiling
    /// evicts the last image and shows or bumps the overflow indicator.
    pub fn insert_at(&mut self, index: usize) -> GridResult<SlotChange> {
        if index > self.image_count {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.image_count,
            });
        }

        if self.slot_count() <= self.max_slots {
            self.update_layout(self.container, self.slot_count() + 1, false);
        }
        self.image_count += 1;
        let evicted = self.handle_overflow();

        Ok(SlotChange {
            inserted: Some(index),
            removed: None,
            evicted,
        })
    }

    /// Remove the image at `index` (`0..image_count`). The partition is
    /// rebuilt from scratch, and any overflow indicator is dropped because
    /// the image count is now below the ceiling.
    pub fn remove_at(&mut self, index: usize) -> GridResult<SlotChange> {
        if index >= self.image_count {
            return Err(GridError::IndexOutOfRange {
                index,
                len: self.image_count,
            });
        }

        self.image_count -= 1;
        if self.image_count < self.max_slots {
            self.extra_count = 0;
        }
        if self.overflow_shown {
            self.overflow_shown = false;
            self.extra_count = 0;
        }
        self.update_layout(self.container, self.slot_count(), true);

        Ok(SlotChange {
            inserted: None,
            removed: Some(index),
            evicted: 0,
        })
    }

    /// Change the ceiling. Lowering it below the image count evicts the
    /// excess from the end and shows the overflow indicator; raising it above
    /// the image count removes the indicator.
    pub fn set_max_slots(&mut self, max_slots: usize) -> GridResult<SlotChange> {
        if max_slots == 0 {
            return Err(GridError::InvalidArgument(
                "max slots has to be greater than 0".to_string(),
            ));
        }
        self.max_slots = max_slots;

        let mut change = SlotChange::default();
        if self.image_count > max_slots {
            change.evicted = self.handle_overflow();
        } else if self.image_count < max_slots && self.overflow_shown {
            self.overflow_shown = false;
            self.extra_count = 0;
            self.update_layout(self.container, self.slot_count(), true);
        } else {
            // The look-ahead depends on the ceiling.
            self.update_layout(self.container, self.slot_count(), true);
        }
        Ok(change)
    }

    /// Set the number shown on the overflow indicator. If the image count is
    /// below the ceiling, the ceiling is first lowered to the image count.
    /// Zero removes the indicator.
    pub fn set_extra_count(&mut self, count: usize) -> GridResult<SlotChange> {
        if count > 0 && self.image_count == 0 {
            return Err(GridError::InvalidArgument(
                "cannot show hidden images without any image".to_string(),
            ));
        }

        let mut change = SlotChange::default();
        if self.image_count > 0 && self.image_count < self.max_slots {
            change = self.set_max_slots(self.image_count)?;
        }
        self.extra_count = count;

        if count == 0 {
            if self.overflow_shown {
                self.overflow_shown = false;
                self.update_layout(self.container, self.slot_count(), true);
            }
        } else {
            change.evicted += self.handle_overflow();
        }
        Ok(change)
    }

    /// Evict images beyond the ceiling and make sure the overflow indicator
    /// is placed once there is something to count. Returns the number evicted.
    fn handle_overflow(&mut self) -> usize {
        let mut evicted = 0;
        if self.image_count >= self.max_slots {
            evicted = self.image_count - self.max_slots;
            if evicted > 0 {
                self.image_count -= evicted;
                self.extra_count += evicted;
                log::debug!("evicted {} images, {} hidden", evicted, self.extra_count);
            }
            self.update_layout(self.container, self.slot_count(), true);
        }

        if self.extra_count > 0 && !self.overflow_shown {
            if self.slot_count() <= self.max_slots {
                self.update_layout(self.container, self.slot_count() + 1, false);
            }
            self.overflow_shown = true;
            if self.image_count >= self.max_slots {
                self.update_layout(self.container, self.slot_count(), true);
            }
        }
        evicted
    }
}

impl Default for PartitionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GridEngine for PartitionTracker {
    /// Size invalidation: rebuild for the current slots.
    fn resize(&mut self, size: Size) {
        self.update_layout(size, self.slot_count(), true);
    }

    fn insert_at(&mut self, index: usize) -> GridResult<SlotChange> {
        PartitionTracker::insert_at(self, index)
    }

    fn remove_at(&mut self, index: usize) -> GridResult<SlotChange> {
        PartitionTracker::remove_at(self, index)
    }

    fn column_count(&self) -> u32 {
        PartitionTracker::column_count(self)
    }

    /// One placement per node, in index order. Images fill every node except
    /// the overflow anchor, in image order.
    fn placements(&self) -> Vec<SlotPlacement> {
        let tracks = self.column_count();
        let overflow = self.overflow_slot_index();
        let mut next_image = 0;

        (0..self.nodes.len())
            .filter_map(|i| self.nodes.get(&i))
            .map(|node| {
                let kind = if Some(node.index()) == overflow {
                    SlotKind::Overflow
                } else {
                    next_image += 1;
                    SlotKind::Image(next_image - 1)
                };
                SlotPlacement {
                    index: node.index(),
                    kind,
                    cell: node.cell_spec(tracks),
                    rect: node.rect(),
                }
            })
            .collect()
    }
}
