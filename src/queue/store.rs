use crate::models::{BufferedMessage, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the head of the queue.
    Up,
    /// Towards the tail of the queue.
    Down,
}

/// Ordered buffer of messages waiting for delivery.
///
/// Pure data structure: every operation is total and none of them know
/// anything about the backend or the UI. Ids are unique within a store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStore {
    items: Vec<BufferedMessage>,
}

impl QueueStore {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_items(items: Vec<BufferedMessage>) -> Self {
        let mut store = Self::new();
        store.replace_all(items);
        store
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[BufferedMessage] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&BufferedMessage> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut BufferedMessage> {
        self.items.get_mut(index)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.items.iter().any(|m| &m.id == id)
    }

    pub fn append(&mut self, message: BufferedMessage) {
        debug_assert!(!self.contains(&message.id), "duplicate message id");
        self.items.push(message);
    }

    pub fn pop_front(&mut self) -> Option<BufferedMessage> {
        if self.items.is_empty() {
            return None;
        }
        Some(self.items.remove(0))
    }

    /// Removes the earliest entry matching `predicate`, leaving the relative
    /// order of everything else intact.
    pub fn pop_first<P>(&mut self, predicate: P) -> Option<BufferedMessage>
    where
        P: Fn(&BufferedMessage) -> bool,
    {
        let index = self.items.iter().position(predicate)?;
        Some(self.items.remove(index))
    }

    /// Swaps the entry at `index` with its neighbour. Returns the entry's new
    /// index, or `None` when there is no neighbour in that direction.
    pub fn move_adjacent(&mut self, index: usize, direction: Direction) -> Option<usize> {
        if index >= self.items.len() {
            return None;
        }
        let target = match direction {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => {
                let next = index + 1;
                if next >= self.items.len() {
                    return None;
                }
                next
            }
        };
        self.items.swap(index, target);
        Some(target)
    }

    pub fn remove(&mut self, index: usize) -> Option<BufferedMessage> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.items.remove(index))
    }

    pub fn replace_all(&mut self, items: Vec<BufferedMessage>) {
        self.items = items;
        debug_assert!(self.ids_unique(), "duplicate message id after replace");
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn ids_unique(&self) -> bool {
        let mut seen = std::collections::HashSet::new();
        self.items.iter().all(|m| seen.insert(&m.id))
    }
}
