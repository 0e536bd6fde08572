//! The operation vocabulary.
//!
//! Every supported operation is an [`OperationKind`]; an [`Operation`]
//! carries its typed arguments. The workspace dispatches on `Operation`
//! with an exhaustive match, so adding a kind forces every dispatch site
//! to handle it.

pub mod list;

use crate::cursor::Cursor;
use crate::error::{ListError, Result};
use crate::types::Value;
use std::fmt;
use std::str::FromStr;

/// Where `insert` places new items relative to the pivot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
    Before,
    #[default]
    After,
}

impl From<&str> for Placement {
    /// Only the exact string `"before"` selects [`Placement::Before`].
    fn from(s: &str) -> Self {
        if s == "before" {
            Placement::Before
        } else {
            Placement::After
        }
    }
}

/// Operation names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Get,
    Set,
    Insert,
    Size,
    First,
    FirstX,
    Last,
    LastX,
    Range,
    Remove,
    Unique,
    Shuffle,
    Compose,
    Sequence,
    Commit,
    Reset,
    Unset,
    Iterator,
    Paginate,
    Page,
    TotalPages,
}

impl OperationKind {
    pub const ALL: [OperationKind; 21] = [
        OperationKind::Get,
        OperationKind::Set,
        OperationKind::Insert,
        OperationKind::Size,
        OperationKind::First,
        OperationKind::FirstX,
        OperationKind::Last,
        OperationKind::LastX,
        OperationKind::Range,
        OperationKind::Remove,
        OperationKind::Unique,
        OperationKind::Shuffle,
        OperationKind::Compose,
        OperationKind::Sequence,
        OperationKind::Commit,
        OperationKind::Reset,
        OperationKind::Unset,
        OperationKind::Iterator,
        OperationKind::Paginate,
        OperationKind::Page,
        OperationKind::TotalPages,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OperationKind::Get => "get",
            OperationKind::Set => "set",
            OperationKind::Insert => "insert",
            OperationKind::Size => "size",
            OperationKind::First => "first",
            OperationKind::FirstX => "firstx",
            OperationKind::Last => "last",
            OperationKind::LastX => "lastx",
            OperationKind::Range => "range",
            OperationKind::Remove => "remove",
            OperationKind::Unique => "unique",
            OperationKind::Shuffle => "shuffle",
            OperationKind::Compose => "compose",
            OperationKind::Sequence => "sequence",
            OperationKind::Commit => "commit",
            OperationKind::Reset => "reset",
            OperationKind::Unset => "unset",
            OperationKind::Iterator => "iterator",
            OperationKind::Paginate => "paginate",
            OperationKind::Page => "page",
            OperationKind::TotalPages => "totalPages",
        }
    }

    /// Kinds allowed to create a missing list, given at least one item.
    pub fn auto_creates(self) -> bool {
        matches!(self, OperationKind::First | OperationKind::Last)
    }

    /// Kinds that may change the working list in place.
    pub fn is_mutating(self) -> bool {
        matches!(
            self,
            OperationKind::Set
                | OperationKind::Insert
                | OperationKind::First
                | OperationKind::FirstX
                | OperationKind::Last
                | OperationKind::LastX
                | OperationKind::Remove
                | OperationKind::Unique
                | OperationKind::Shuffle
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self> {
        OperationKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ListError::UnknownOperation(s.to_string()))
    }
}

/// An operation with its arguments.
#[derive(Clone, Debug)]
pub enum Operation {
    Get { index: isize },
    Set { index: isize, value: Value },
    Insert { placement: Placement, pivot: Value, items: Vec<Value> },
    Size,
    First { items: Vec<Value> },
    FirstX { items: Vec<Value> },
    Last { items: Vec<Value> },
    LastX { items: Vec<Value> },
    Range { start: isize, end: Option<isize> },
    Remove { count: isize, value: Value },
    Unique,
    Shuffle,
    Compose { args: Vec<Value> },
    Sequence { args: Vec<Value> },
    Commit,
    Reset,
    Unset,
    /// `marker` is the construction argument; the string `"original"`
    /// selects the baseline list.
    Iterator { marker: Value },
    Paginate { size: i64 },
    /// `None` (or `Some(0)`) reports the current page.
    Page { number: Option<i64> },
    TotalPages,
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Get { .. } => OperationKind::Get,
            Operation::Set { .. } => OperationKind::Set,
            Operation::Insert { .. } => OperationKind::Insert,
            Operation::Size => OperationKind::Size,
            Operation::First { .. } => OperationKind::First,
            Operation::FirstX { .. } => OperationKind::FirstX,
            Operation::Last { .. } => OperationKind::Last,
            Operation::LastX { .. } => OperationKind::LastX,
            Operation::Range { .. } => OperationKind::Range,
            Operation::Remove { .. } => OperationKind::Remove,
            Operation::Unique => OperationKind::Unique,
            Operation::Shuffle => OperationKind::Shuffle,
            Operation::Compose { .. } => OperationKind::Compose,
            Operation::Sequence { .. } => OperationKind::Sequence,
            Operation::Commit => OperationKind::Commit,
            Operation::Reset => OperationKind::Reset,
            Operation::Unset => OperationKind::Unset,
            Operation::Iterator { .. } => OperationKind::Iterator,
            Operation::Paginate { .. } => OperationKind::Paginate,
            Operation::Page { .. } => OperationKind::Page,
            Operation::TotalPages => OperationKind::TotalPages,
        }
    }

    /// True when this call may create a missing list.
    pub fn creates_list(&self) -> bool {
        match self {
            Operation::First { items } | Operation::Last { items } => !items.is_empty(),
            _ => false,
        }
    }

    /// Build an operation from a loosely typed argument list.
    ///
    /// Missing arguments read as `undefined`; index-like arguments must be
    /// integral numbers.
    pub fn from_args(kind: OperationKind, args: Vec<Value>) -> Result<Self> {
        let mut args = args.into_iter();

        let op = match kind {
            OperationKind::Get => Operation::Get {
                index: required_index(kind, &take(&mut args))?,
            },
            OperationKind::Set => Operation::Set {
                index: required_index(kind, &take(&mut args))?,
                value: take(&mut args),
            },
            OperationKind::Insert => {
                let placement = match take(&mut args) {
                    Value::Str(s) => Placement::from(s.as_str()),
                    _ => Placement::After,
                };
                let pivot = take(&mut args);
                Operation::Insert {
                    placement,
                    pivot,
                    items: args.collect(),
                }
            }
            OperationKind::Size => Operation::Size,
            OperationKind::First => Operation::First {
                items: args.collect(),
            },
            OperationKind::FirstX => Operation::FirstX {
                items: args.collect(),
            },
            OperationKind::Last => Operation::Last {
                items: args.collect(),
            },
            OperationKind::LastX => Operation::LastX {
                items: args.collect(),
            },
            OperationKind::Range => {
                let start = required_index(kind, &take(&mut args))?;
                let end = optional_index(kind, &take(&mut args))?;
                Operation::Range { start, end }
            }
            OperationKind::Remove => Operation::Remove {
                count: required_index(kind, &take(&mut args))?,
                value: take(&mut args),
            },
            OperationKind::Unique => Operation::Unique,
            OperationKind::Shuffle => Operation::Shuffle,
            OperationKind::Compose => Operation::Compose {
                args: args.collect(),
            },
            OperationKind::Sequence => Operation::Sequence {
                args: args.collect(),
            },
            OperationKind::Commit => Operation::Commit,
            OperationKind::Reset => Operation::Reset,
            OperationKind::Unset => Operation::Unset,
            OperationKind::Iterator => Operation::Iterator { marker: take(&mut args) },
            OperationKind::Paginate => Operation::Paginate {
                size: optional_index(kind, &take(&mut args))?.unwrap_or(0) as i64,
            },
            OperationKind::Page => Operation::Page {
                number: optional_index(kind, &take(&mut args))?.map(|n| n as i64),
            },
            OperationKind::TotalPages => Operation::TotalPages,
        };
        Ok(op)
    }
}

fn take(args: &mut std::vec::IntoIter<Value>) -> Value {
    args.next().unwrap_or_default()
}

fn required_index(kind: OperationKind, value: &Value) -> Result<isize> {
    value.as_index().ok_or_else(|| ListError::InvalidArguments {
        operation: kind.name(),
        reason: format!("expected an integer, got {}", value.type_name()),
    })
}

fn optional_index(kind: OperationKind, value: &Value) -> Result<Option<isize>> {
    match value {
        Value::Undefined | Value::Null => Ok(None),
        other => required_index(kind, other).map(Some),
    }
}

/// Result of a dispatched operation.
#[derive(Clone, Debug)]
pub enum Outcome {
    /// The key has no list and the operation may not create one.
    Absent,
    /// A single element.
    Value(Value),
    /// A list: either a non-destructive slice or the working list after a
    /// mutation.
    List(Vec<Value>),
    /// A length or page count.
    Count(usize),
    /// The shared current page number.
    Page(usize),
    Cursor(Cursor),
}

impl Outcome {
    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }

    pub fn into_list(self) -> Option<Vec<Value>> {
        match self {
            Outcome::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_cursor(self) -> Option<Cursor> {
        match self {
            Outcome::Cursor(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// `Count` or `Page` as a number.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Outcome::Count(n) | Outcome::Page(n) => Some(*n),
            _ => None,
        }
    }
}
