//! Main Workspace struct tying all components together.

use crate::cursor::Cursor;
use crate::error::Result;
use crate::lists::{ListStore, StoreStats};
use crate::operations::{list, Operation, OperationKind, Outcome, Placement};
use crate::pagination::PaginationState;
use crate::types::{Key, Value};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Equality key used by `unique`. Elements with equal keys are duplicates.
pub type UniqueKeyFn = fn(&Value) -> String;

/// Workspace configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Initial shared page size. `0` leaves pagination disabled.
    pub page_size: usize,

    /// Seed for `shuffle`. Drawn from the OS when unset.
    pub rng_seed: Option<u64>,
}

impl WorkspaceConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A set of keyed lists with shared pagination.
///
/// Provides a unified interface for:
/// - Lazily creating lists through `first`/`last`
/// - Reading and editing lists in place
/// - Capturing and restoring baselines (`commit`/`reset`)
/// - Cursors and pagination
///
/// Each workspace is independent; nothing is shared between instances.
pub struct Workspace {
    /// Workspace configuration.
    config: WorkspaceConfig,

    /// Active and original lists.
    lists: ListStore,

    /// Page size and current page, shared by every key.
    pagination: RwLock<PaginationState>,

    /// Randomness for `shuffle`.
    rng: Mutex<StdRng>,

    /// Equality key for `unique`.
    unique_key: UniqueKeyFn,

    /// Serializes dispatch so each fetch, apply and write-back is atomic.
    /// Reentrant so a callable run by `compose` may call back in.
    dispatch_lock: ReentrantMutex<()>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_config(WorkspaceConfig::default())
    }

    pub fn with_config(config: WorkspaceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            pagination: RwLock::new(PaginationState::with_page_size(config.page_size)),
            rng: Mutex::new(rng),
            lists: ListStore::new(),
            unique_key: Value::coerce_to_string,
            dispatch_lock: ReentrantMutex::new(()),
            config,
        }
    }

    /// Replace the equality key used by `unique`.
    pub fn with_unique_key(mut self, key: UniqueKeyFn) -> Self {
        self.unique_key = key;
        self
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    // --- Dispatch ---

    /// Run `op` against the list behind `key`.
    ///
    /// A named key without an active list yields [`Outcome::Absent`] unless
    /// the call is `first`/`last` with items (which creates the list and
    /// captures it as the baseline) or `iterator` (which iterates an empty
    /// list). Literal keys are operated on directly and never stored.
    ///
    /// Operations that produce no value of their own return the working
    /// list as it stood after the operation ran; for `reset` that is the
    /// list being replaced.
    pub fn execute(&self, key: impl Into<Key>, op: Operation) -> Result<Outcome> {
        let key = key.into();
        let kind = op.kind();
        trace!(operation = %kind, key = %key, "dispatch");

        let _lock = self.dispatch_lock.lock();

        let (mut cur, initializing) = match &key {
            Key::Literal(items) => (items.clone(), false),
            Key::Named(name) => match self.lists.get_active(name) {
                Some(list) => (list, false),
                None if op.creates_list() => (Vec::new(), true),
                None if kind == OperationKind::Iterator => (Vec::new(), false),
                None => return Ok(Outcome::Absent),
            },
        };

        let produced = self.apply(&key, &mut cur, op)?;

        if let Key::Named(name) = &key {
            if initializing {
                debug!(operation = %kind, key = %name, len = cur.len(), "list created");
                self.lists.set_active(name, cur.clone());
                self.lists.set_original(name, cur.clone());
            } else if kind.is_mutating() {
                self.lists.set_active(name, cur.clone());
            }
        }

        Ok(produced.unwrap_or(Outcome::List(cur)))
    }

    /// Run an operation by name with loosely typed arguments.
    pub fn call(&self, name: &str, key: impl Into<Key>, args: Vec<Value>) -> Result<Outcome> {
        let kind: OperationKind = name.parse()?;
        let op = Operation::from_args(kind, args)?;
        self.execute(key, op)
    }

    /// Apply one operation to the working list. `None` means "return the
    /// working list".
    fn apply(&self, key: &Key, cur: &mut Vec<Value>, op: Operation) -> Result<Option<Outcome>> {
        let out = match op {
            Operation::Get { index } => Some(Outcome::Value(list::get(cur, index))),
            Operation::Set { index, value } => Some(Outcome::Value(list::set(cur, index, value))),
            Operation::Insert {
                placement,
                pivot,
                items,
            } => {
                list::insert(cur, placement, &pivot, items);
                None
            }
            Operation::Size => Some(Outcome::Count(cur.len())),
            Operation::First { items } | Operation::FirstX { items } => {
                list::first(cur, items).map(Outcome::List)
            }
            Operation::Last { items } | Operation::LastX { items } => {
                list::last(cur, items).map(Outcome::List)
            }
            Operation::Range { start, end } => Some(Outcome::List(list::range(cur, start, end))),
            Operation::Remove { count, value } => {
                list::remove(cur, count, &value);
                None
            }
            Operation::Unique => {
                list::unique_by(cur, self.unique_key);
                None
            }
            Operation::Shuffle => {
                list::shuffle(cur, &mut *self.rng.lock());
                None
            }
            Operation::Compose { args } => Some(Outcome::Value(list::compose(cur, args)?)),
            Operation::Sequence { args } => Some(Outcome::Value(list::sequence(cur, args)?)),
            Operation::Commit => {
                if let Some(name) = key.name() {
                    debug!(key = %name, len = cur.len(), "committed");
                    self.lists.set_original(name, cur.clone());
                }
                None
            }
            Operation::Reset => match key.name() {
                Some(name) => {
                    debug!(key = %name, "reset");
                    match self.lists.get_original(name) {
                        Some(original) => self.lists.set_active(name, original),
                        None => {
                            self.lists.remove_active(name);
                        }
                    }
                    None
                }
                None => None,
            },
            Operation::Unset => {
                if let Some(name) = key.name() {
                    debug!(key = %name, "unset");
                    self.lists.delete(name);
                }
                None
            }
            Operation::Iterator { marker } => {
                let snapshot = match key {
                    Key::Named(name) if marker.as_str() == Some("original") => {
                        self.lists.get_original(name).unwrap_or_default()
                    }
                    _ => cur.clone(),
                };
                Some(Outcome::Cursor(Cursor::new(snapshot, key.to_value(), marker)))
            }
            Operation::Paginate { size } => {
                let mut pagination = self.pagination.write();
                pagination.paginate(size);
                debug!(page_size = pagination.page_size, "pagination changed");
                None
            }
            Operation::Page { number } => match number {
                Some(n) if n != 0 => Some(Outcome::List(self.pagination.write().page(cur, n))),
                _ => Some(Outcome::Page(self.pagination.read().current_page)),
            },
            Operation::TotalPages => {
                Some(Outcome::Count(self.pagination.read().total_pages(cur.len())))
            }
        };
        Ok(out)
    }

    // --- Operations ---

    pub fn get(&self, key: impl Into<Key>, index: isize) -> Result<Outcome> {
        self.execute(key, Operation::Get { index })
    }

    pub fn set(
        &self,
        key: impl Into<Key>,
        index: isize,
        value: impl Into<Value>,
    ) -> Result<Outcome> {
        self.execute(
            key,
            Operation::Set {
                index,
                value: value.into(),
            },
        )
    }

    pub fn insert(
        &self,
        key: impl Into<Key>,
        placement: impl Into<Placement>,
        pivot: impl Into<Value>,
        items: Vec<Value>,
    ) -> Result<Outcome> {
        self.execute(
            key,
            Operation::Insert {
                placement: placement.into(),
                pivot: pivot.into(),
                items,
            },
        )
    }

    pub fn size(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Size)
    }

    /// Prepend `items`, creating the list if needed; or peek at the head.
    pub fn first(&self, key: impl Into<Key>, items: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::First { items })
    }

    /// Like [`Workspace::first`] but never creates a list.
    pub fn firstx(&self, key: impl Into<Key>, items: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::FirstX { items })
    }

    /// Append `items`, creating the list if needed; or peek.
    ///
    /// The peek returns the slice `[len - 2, 1)`, which is empty for lists
    /// longer than two.
    pub fn last(&self, key: impl Into<Key>, items: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::Last { items })
    }

    /// Like [`Workspace::last`] but never creates a list.
    pub fn lastx(&self, key: impl Into<Key>, items: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::LastX { items })
    }

    pub fn range(&self, key: impl Into<Key>, start: isize, end: Option<isize>) -> Result<Outcome> {
        self.execute(key, Operation::Range { start, end })
    }

    pub fn remove(
        &self,
        key: impl Into<Key>,
        count: isize,
        value: impl Into<Value>,
    ) -> Result<Outcome> {
        self.execute(
            key,
            Operation::Remove {
                count,
                value: value.into(),
            },
        )
    }

    pub fn unique(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Unique)
    }

    pub fn shuffle(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Shuffle)
    }

    pub fn compose(&self, key: impl Into<Key>, args: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::Compose { args })
    }

    pub fn sequence(&self, key: impl Into<Key>, args: Vec<Value>) -> Result<Outcome> {
        self.execute(key, Operation::Sequence { args })
    }

    pub fn commit(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Commit)
    }

    pub fn reset(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Reset)
    }

    pub fn unset(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::Unset)
    }

    /// Cursor over a copy of the active list.
    pub fn iterator(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(
            key,
            Operation::Iterator {
                marker: Value::Undefined,
            },
        )
    }

    /// Cursor over a copy of the baseline list.
    pub fn iterator_original(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(
            key,
            Operation::Iterator {
                marker: Value::from("original"),
            },
        )
    }

    pub fn paginate(&self, key: impl Into<Key>, size: i64) -> Result<Outcome> {
        self.execute(key, Operation::Paginate { size })
    }

    pub fn page(&self, key: impl Into<Key>, number: Option<i64>) -> Result<Outcome> {
        self.execute(key, Operation::Page { number })
    }

    pub fn total_pages(&self, key: impl Into<Key>) -> Result<Outcome> {
        self.execute(key, Operation::TotalPages)
    }

    // --- Introspection ---

    pub fn contains(&self, key: &str) -> bool {
        self.lists.contains(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.lists.keys()
    }

    /// Copy of the active list for `key`.
    pub fn active(&self, key: &str) -> Option<Vec<Value>> {
        self.lists.get_active(key)
    }

    /// Copy of the baseline list for `key`.
    pub fn original(&self, key: &str) -> Option<Vec<Value>> {
        self.lists.get_original(key)
    }

    pub fn pagination(&self) -> PaginationState {
        *self.pagination.read()
    }

    pub fn stats(&self) -> StoreStats {
        self.lists.stats()
    }
}
