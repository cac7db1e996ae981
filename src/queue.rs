//! Sorted intrusive singly-linked lists of [`WorkItem`]s.
//!
//! Every operation here assumes the caller already holds the crate's
//! critical section — this module does no locking of its own, it only
//! manipulates raw `next` pointers embedded in the items themselves.

use core::cell::UnsafeCell;

use crate::work_item::WorkItem;

/// An intrusive list ordered by an externally supplied key, ascending, ties
/// broken by insertion order (stable insert: a new item goes immediately
/// before the first existing item whose key is strictly greater).
pub struct SortedQueue {
    head: UnsafeCell<*const WorkItem>,
}

// SAFETY: all access happens under the crate's critical section, see
// module docs; single core means no concurrent writer to race.
unsafe impl Sync for SortedQueue {}

impl SortedQueue {
    pub const fn new() -> Self {
        Self {
            head: UnsafeCell::new(core::ptr::null()),
        }
    }

    /// Caller must hold the critical section.
    pub unsafe fn is_empty(&self) -> bool {
        (*self.head.get()).is_null()
    }

    /// Caller must hold the critical section.
    pub unsafe fn head(&self) -> Option<&'static WorkItem> {
        (*self.head.get() as *const WorkItem).as_ref()
    }

    /// Inserts `item` keeping the list sorted ascending by `key`, stable on
    /// ties. Caller must hold the critical section.
    pub unsafe fn insert_by_key(&self, item: &'static WorkItem, key: impl Fn(&WorkItem) -> i64) {
        let item_key = key(item);
        let mut prev: *const WorkItem = core::ptr::null();
        let mut cur = *self.head.get();

        while let Some(cur_ref) = (cur as *const WorkItem).as_ref() {
            if key(cur_ref) > item_key {
                break;
            }
            prev = cur;
            cur = cur_ref.next();
        }

        item.set_next(cur);
        if let Some(prev_ref) = (prev as *const WorkItem).as_ref() {
            prev_ref.set_next(item as *const WorkItem);
        } else {
            *self.head.get() = item as *const WorkItem;
        }
    }

    /// Removes and returns the head item, if any. Caller must hold the
    /// critical section.
    pub unsafe fn pop_front(&self) -> Option<&'static WorkItem> {
        let head_ptr = *self.head.get();
        let head_ref = (head_ptr as *const WorkItem).as_ref()?;
        *self.head.get() = head_ref.next();
        head_ref.set_next(core::ptr::null());
        Some(head_ref)
    }

    /// Removes `item` from the list if present; no-op otherwise. Caller
    /// must hold the critical section.
    pub unsafe fn remove(&self, item: &'static WorkItem) {
        let mut prev: *const WorkItem = core::ptr::null();
        let mut cur = *self.head.get();

        while let Some(cur_ref) = (cur as *const WorkItem).as_ref() {
            if cur as *const WorkItem == item as *const WorkItem {
                let next = cur_ref.next();
                if let Some(prev_ref) = (prev as *const WorkItem).as_ref() {
                    prev_ref.set_next(next);
                } else {
                    *self.head.get() = next;
                }
                item.set_next(core::ptr::null());
                return;
            }
            prev = cur;
            cur = cur_ref.next();
        }
    }
}
