//! Circular bidirectional cursors over list snapshots.
//!
//! A cursor owns a shallow copy of a list taken when it was created. Later
//! changes to the live list are not visible through the cursor, and
//! [`Cursor::remove`] only edits the snapshot.

use crate::types::Value;

/// Cursor over a point-in-time copy of a list.
///
/// The position starts at `-1` (before the first element) and wraps past
/// either end.
#[derive(Clone, Debug)]
pub struct Cursor {
    position: isize,
    snapshot: Vec<Value>,
    /// Key the cursor was created for. [`Cursor::set`] writes this.
    key: Value,
    /// Construction argument. [`Cursor::set`] returns this.
    marker: Value,
}

impl Cursor {
    pub fn new(snapshot: Vec<Value>, key: Value, marker: Value) -> Self {
        Self {
            position: -1,
            snapshot,
            key,
            marker,
        }
    }

    /// Cursor over a plain list with no key or marker.
    pub fn over(snapshot: Vec<Value>) -> Self {
        Self::new(snapshot, Value::Undefined, Value::Undefined)
    }

    pub fn position(&self) -> isize {
        self.position
    }

    pub fn snapshot(&self) -> &[Value] {
        &self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }

    fn move_by(&mut self, delta: isize) -> isize {
        let target = self.position + delta;
        let last = self.snapshot.len() as isize - 1;
        self.position = if target < 0 {
            last
        } else if target > last {
            0
        } else {
            target
        };
        self.position
    }

    fn current(&self) -> Value {
        if self.position < 0 {
            return Value::Undefined;
        }
        self.snapshot
            .get(self.position as usize)
            .cloned()
            .unwrap_or_default()
    }

    /// Advance one step, wrapping to the start, and return that element.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Value {
        self.move_by(1);
        self.current()
    }

    /// Retreat one step, wrapping to the end, and return that element.
    pub fn prev(&mut self) -> Value {
        self.move_by(-1);
        self.current()
    }

    /// Advance one step and return the new position.
    pub fn next_index(&mut self) -> isize {
        self.move_by(1)
    }

    /// Retreat one step and return the new position.
    pub fn prev_index(&mut self) -> isize {
        self.move_by(-1)
    }

    /// False only when the next step would land on `len`.
    pub fn has_next(&self) -> bool {
        self.position + 1 != self.snapshot.len() as isize
    }

    /// False only when the previous step would land on position `0`.
    ///
    /// At position `0` itself this still reports `true`.
    pub fn has_prev(&self) -> bool {
        self.position - 1 != 0
    }

    /// Remove the element at the current position from the snapshot.
    ///
    /// A position of `-1` addresses the last element. If the removal leaves
    /// the position one past the end, the cursor steps back.
    pub fn remove(&mut self) -> Vec<Value> {
        let len = self.snapshot.len() as isize;
        let at = if self.position < 0 {
            (len + self.position).max(0)
        } else {
            self.position.min(len)
        };
        let removed = if at < len {
            vec![self.snapshot.remove(at as usize)]
        } else {
            Vec::new()
        };
        if self.snapshot.len() as isize == self.position {
            self.prev();
        }
        removed
    }

    /// Overwrite the current element and return the construction argument.
    ///
    /// The element is overwritten with the cursor's key; the argument is
    /// ignored. Positions before the first element write nothing.
    pub fn set(&mut self, _value: Value) -> Value {
        if self.position >= 0 {
            if let Some(slot) = self.snapshot.get_mut(self.position as usize) {
                *slot = self.key.clone();
            }
        }
        self.marker.clone()
    }
}
