//! Byte-budgeted LRU Cache
//!
//! Entries live in a slot arena and are linked into a recency list through
//! `prev`/`next` slot indices, so no node owns another. The most recently used
//! entry is the head; eviction always takes the tail.
//!
//! Every entry is charged `key.len() + value.len()` bytes. While a positive
//! budget is exceeded after an `add`, the tail is evicted. A budget of zero or
//! less disables eviction.

use std::collections::HashMap;

/// Anything stored in the cache reports how many bytes it occupies.
pub trait Value {
    fn len(&self) -> usize;
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

/// Called with every entry removed because of capacity pressure.
pub type OnEvicted<V> = Box<dyn FnMut(String, V) + Send>;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: Value> Entry<V> {
    fn charge(&self) -> i64 {
        (self.key.len() + self.value.len()) as i64
    }
}

pub struct LruCache<V> {
    max_bytes: i64,
    used_bytes: i64,
    slots: Vec<Option<Entry<V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    index: HashMap<String, usize>,
    on_evicted: Option<OnEvicted<V>>,
}

impl<V: Value> LruCache<V> {
    pub fn new(max_bytes: i64, on_evicted: Option<OnEvicted<V>>) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted,
        }
    }

    /// Inserts or replaces `key`, marks it most recently used and evicts from
    /// the tail until the budget holds again.
    pub fn add(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&slot) = self.index.get(&key) {
            if let Some(entry) = self.slots[slot].as_mut() {
                self.used_bytes += value.len() as i64 - entry.value.len() as i64;
                entry.value = value;
            }
            self.detach(slot);
            self.attach_front(slot);
        } else {
            let entry = Entry {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            };
            self.used_bytes += entry.charge();
            let slot = self.alloc(entry);
            self.attach_front(slot);
            self.index.insert(key, slot);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    /// Looks up `key` and, on a hit, moves it to the head of the recency list.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let slot = *self.index.get(key)?;
        self.detach(slot);
        self.attach_front(slot);
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    /// Evicts the least recently used entry. No-op on an empty cache.
    pub fn remove_oldest(&mut self) {
        let Some(slot) = self.tail else {
            return;
        };
        self.detach(slot);
        let Some(entry) = self.slots[slot].take() else {
            return;
        };
        self.free.push(slot);
        self.index.remove(&entry.key);
        self.used_bytes -= entry.charge();

        if let Some(on_evicted) = self.on_evicted.as_mut() {
            on_evicted(entry.key, entry.value);
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn bytes_used(&self) -> i64 {
        self.used_bytes
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let Some(entry) = self.slots[slot].as_ref() else {
                break;
            };
            keys.push(entry.key.as_str());
            cursor = entry.next;
        }
        keys
    }

    fn alloc(&mut self, entry: Entry<V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(entry);
                slot
            }
            None => {
                self.slots.push(Some(entry));
                self.slots.len() - 1
            }
        }
    }

    fn detach(&mut self, slot: usize) {
        let (prev, next) = match self.slots[slot].as_ref() {
            Some(entry) => (entry.prev, entry.next),
            None => return,
        };

        match prev {
            Some(prev) => {
                if let Some(entry) = self.slots[prev].as_mut() {
                    entry.next = next;
                }
            }
            None => self.head = next,
        }

        match next {
            Some(next) => {
                if let Some(entry) = self.slots[next].as_mut() {
                    entry.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(entry) = self.slots[slot].as_mut() {
            entry.prev = None;
            entry.next = None;
        }
    }

    fn attach_front(&mut self, slot: usize) {
        let old_head = self.head;
        if let Some(entry) = self.slots[slot].as_mut() {
            entry.prev = None;
            entry.next = old_head;
        }

        match old_head {
            Some(head) => {
                if let Some(entry) = self.slots[head].as_mut() {
                    entry.prev = Some(slot);
                }
            }
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }
}

impl<V> std::fmt::Debug for LruCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LruCache")
            .field("max_bytes", &self.max_bytes)
            .field("used_bytes", &self.used_bytes)
            .field("len", &self.index.len())
            .finish()
    }
}
