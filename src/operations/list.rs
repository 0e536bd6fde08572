//! Pure list operations.
//!
//! Each function works on the caller's working list. Functions that return
//! `Option<Vec<Value>>` return `None` when they mutated the list in place
//! and `Some` when they only read from it.

use crate::error::{ListError, Result};
use crate::operations::Placement;
use crate::types::Value;
use rand::Rng;
use std::collections::HashSet;

/// Resolve a possibly negative index against `len`. No bounds check.
pub fn normalize_index(index: isize, len: usize) -> isize {
    if index >= 0 {
        index
    } else {
        len as isize + index
    }
}

/// Copy `[start, end)` out of `list`.
///
/// Negative bounds count back from the end; both bounds are clamped to
/// `[0, len]` and an empty result is returned when `start >= end`.
pub fn slice(list: &[Value], start: isize, end: isize) -> Vec<Value> {
    let len = list.len() as isize;
    let clamp = |i: isize| -> usize {
        if i < 0 {
            (len + i).max(0) as usize
        } else {
            i.min(len) as usize
        }
    };
    let (start, end) = (clamp(start), clamp(end));
    if start >= end {
        return Vec::new();
    }
    list[start..end].to_vec()
}

/// Element at `index`, or `Undefined` when out of range.
pub fn get(list: &[Value], index: isize) -> Value {
    let i = normalize_index(index, list.len());
    if i < 0 {
        return Value::Undefined;
    }
    list.get(i as usize).cloned().unwrap_or_default()
}

/// Assign `value` at `index` and return it.
///
/// Writing past the end pads the list with `Undefined`. An index that is
/// still negative after normalization touches nothing.
pub fn set(list: &mut Vec<Value>, index: isize, value: Value) -> Value {
    let i = normalize_index(index, list.len());
    if i < 0 {
        return value;
    }
    let i = i as usize;
    if i >= list.len() {
        list.resize(i + 1, Value::Undefined);
    }
    list[i] = value.clone();
    value
}

/// Insert `items` next to the last element strictly equal to `pivot`.
///
/// Leaves the list untouched when the pivot is missing.
pub fn insert(list: &mut Vec<Value>, placement: Placement, pivot: &Value, items: Vec<Value>) {
    let Some(found) = list.iter().rposition(|v| v.strict_eq(pivot)) else {
        return;
    };
    let at = match placement {
        Placement::Before => found,
        Placement::After => found + 1,
    };
    list.splice(at..at, items);
}

/// Prepend `items` in order, or peek at the head when there are none.
pub fn first(list: &mut Vec<Value>, items: Vec<Value>) -> Option<Vec<Value>> {
    if items.is_empty() {
        return Some(slice(list, 0, 1));
    }
    list.splice(0..0, items);
    None
}

/// Append `items` in order, or peek when there are none.
///
/// The peek is the slice `[len - 2, 1)`. That yields the head for lists of
/// one or two elements and nothing for longer lists, not the last element.
pub fn last(list: &mut Vec<Value>, items: Vec<Value>) -> Option<Vec<Value>> {
    if items.is_empty() {
        let len = list.len() as isize;
        return Some(slice(list, len - 2, 1));
    }
    list.extend(items);
    None
}

/// Copy of `[lo, hi)` where the bounds are normalized and sorted.
///
/// A missing `end`, or an `end` of `0`, reads as "to the end".
pub fn range(list: &[Value], start: isize, end: Option<isize>) -> Vec<Value> {
    let len = list.len();
    let a = normalize_index(start, len);
    let b = match end {
        Some(e) if e != 0 => normalize_index(e, len),
        _ => len as isize,
    };
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    slice(list, lo, hi)
}

/// Remove up to `|count|` elements strictly equal to `value`.
///
/// `count == 0` removes every match. A positive count removes the
/// lowest-indexed matches, a negative count the highest-indexed ones.
pub fn remove(list: &mut Vec<Value>, count: isize, value: &Value) {
    let len = list.len();
    let max = if count == 0 {
        len
    } else {
        count.unsigned_abs()
    };
    let from_left = count > 0;

    let mut hits = Vec::new();
    for i in (0..len).rev() {
        if list[i].strict_eq(value) {
            hits.push(i);
            if !from_left && hits.len() == max {
                break;
            }
        }
    }

    hits.sort_unstable();
    hits.truncate(max);

    for &i in hits.iter().rev() {
        list.remove(i);
    }
}

/// Deduplicate in place using string coercion as the equality key.
pub fn unique(list: &mut Vec<Value>) {
    unique_by(list, Value::coerce_to_string);
}

/// Deduplicate in place, keeping the rightmost occurrence of each key.
///
/// Survivors keep their original relative order.
pub fn unique_by<F>(list: &mut Vec<Value>, key: F)
where
    F: Fn(&Value) -> String,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(list.len());
    for value in list.drain(..).rev() {
        if seen.insert(key(&value)) {
            kept.push(value);
        }
    }
    kept.reverse();
    *list = kept;
}

/// In-place shuffle.
///
/// With `n` elements remaining the last one is swapped with a partner drawn
/// from `[0, n - 1)`, so an element never swaps with itself while more than
/// one remains. For two or more elements the result never leaves an element
/// in its starting slot.
pub fn shuffle<R: Rng + ?Sized>(list: &mut [Value], rng: &mut R) {
    let mut remaining = list.len();
    while remaining > 0 {
        let partner = if remaining > 1 {
            rng.gen_range(0..remaining - 1)
        } else {
            0
        };
        remaining -= 1;
        list.swap(remaining, partner);
    }
}

fn invoke(list: &[Value], index: usize, args: &[Value]) -> Result<Value> {
    match &list[index] {
        Value::Func(f) => f.call(args),
        other => Err(ListError::NotCallable {
            index,
            found: other.type_name(),
        }),
    }
}

/// Call every element tail to head, feeding each result to the next call.
///
/// With an empty list the arguments come back as a list.
pub fn compose(list: &[Value], args: Vec<Value>) -> Result<Value> {
    let mut last = Value::list(args);
    for index in (0..list.len()).rev() {
        last = invoke(list, index, &last.as_arguments())?;
    }
    Ok(last)
}

/// Call the final element once per list element, feeding each result to
/// the next call.
///
/// The position never advances, so only the last function is ever invoked.
pub fn sequence(list: &[Value], args: Vec<Value>) -> Result<Value> {
    let mut last = Value::list(args);
    let len = list.len();
    for _ in 0..len {
        last = invoke(list, len - 1, &last.as_arguments())?;
    }
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::values;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_get_negative_index() {
        let list = values([1, 2, 3, 4, 5]);
        assert_eq!(get(&list, 0), Value::from(1));
        assert_eq!(get(&list, -1), Value::from(5));
        assert_eq!(get(&list, -2), get(&list, 3));
        assert!(get(&list, 5).is_undefined());
        assert!(get(&list, -6).is_undefined());
    }

    #[test]
    fn test_set_pads_past_end() {
        let mut list = values([1, 2]);
        assert_eq!(set(&mut list, -1, Value::from(9)), Value::from(9));
        assert_eq!(list, values([1, 9]));

        set(&mut list, 3, Value::from("x"));
        assert_eq!(list.len(), 4);
        assert!(list[2].is_undefined());

        set(&mut list, -10, Value::from(0));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_insert_after_and_before() {
        let mut list = values([1, 2, 3, 4]);
        insert(&mut list, Placement::After, &Value::from(3), values(["x", "y"]));
        assert_eq!(
            list,
            vec![
                Value::from(1),
                Value::from(2),
                Value::from(3),
                Value::from("x"),
                Value::from("y"),
                Value::from(4),
            ]
        );

        let mut list = values([1, 2, 3, 4]);
        insert(&mut list, Placement::Before, &Value::from(3), values(["x"]));
        assert_eq!(
            list,
            vec![
                Value::from(1),
                Value::from(2),
                Value::from("x"),
                Value::from(3),
                Value::from(4),
            ]
        );
    }

    #[test]
    fn test_insert_uses_last_pivot() {
        let mut list = values([3, 1, 3]);
        insert(&mut list, Placement::After, &Value::from(3), values([0]));
        assert_eq!(list, values([3, 1, 3, 0]));
    }

    #[test]
    fn test_insert_missing_pivot_is_noop() {
        let mut list = values([1, 2]);
        insert(&mut list, Placement::After, &Value::from("1"), values([0]));
        assert_eq!(list, values([1, 2]));
    }

    #[test]
    fn test_first_prepends_in_order() {
        let mut list = values([3]);
        assert!(first(&mut list, values([1, 2])).is_none());
        assert_eq!(list, values([1, 2, 3]));
        assert_eq!(first(&mut list, vec![]), Some(values([1])));
        assert_eq!(first(&mut Vec::new(), vec![]), Some(vec![]));
    }

    #[test]
    fn test_last_appends_in_order() {
        let mut list = values([1]);
        assert!(last(&mut list, values([2, 3])).is_none());
        assert_eq!(list, values([1, 2, 3]));
    }

    #[test]
    fn test_last_peek_slices_from_len_minus_two_to_one() {
        assert_eq!(last(&mut values([7]), vec![]), Some(values([7])));
        assert_eq!(last(&mut values([7, 8]), vec![]), Some(values([7])));
        assert_eq!(last(&mut values([7, 8, 9]), vec![]), Some(vec![]));
        assert_eq!(last(&mut values([1, 2, 3, 4, 5]), vec![]), Some(vec![]));
        assert_eq!(last(&mut Vec::new(), vec![]), Some(vec![]));
    }

    #[test]
    fn test_range() {
        let list = values([10, 20, 30, 40, 50]);
        assert_eq!(range(&list, 1, Some(3)), values([20, 30]));
        assert_eq!(range(&list, -2, None), values([40, 50]));
        assert_eq!(range(&list, 3, Some(1)), values([20, 30]));
        assert_eq!(range(&list, 1, Some(-1)), values([20, 30, 40]));
        assert_eq!(range(&list, 2, Some(0)), values([30, 40, 50]));
        assert_eq!(range(&list, -10, Some(2)), values([10, 20]));
    }

    #[test]
    fn test_remove_all() {
        let mut list = values([1, 2, 2, 3]);
        remove(&mut list, 0, &Value::from(2));
        assert_eq!(list, values([1, 3]));
    }

    #[test]
    fn test_remove_positive_takes_lowest_indexed() {
        let mut list = vec![
            Value::from(2),
            Value::from("a"),
            Value::from(2),
            Value::from("b"),
            Value::from(2),
        ];
        remove(&mut list, 2, &Value::from(2));
        assert_eq!(list, vec![Value::from("a"), Value::from("b"), Value::from(2)]);

        let mut list = values([1, 2, 2, 3]);
        remove(&mut list, 1, &Value::from(2));
        assert_eq!(list, values([1, 2, 3]));
    }

    #[test]
    fn test_remove_negative_takes_highest_indexed() {
        let mut list = vec![
            Value::from(2),
            Value::from("a"),
            Value::from(2),
            Value::from("b"),
            Value::from(2),
        ];
        remove(&mut list, -2, &Value::from(2));
        assert_eq!(list, vec![Value::from(2), Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_remove_with_large_index_counts() {
        // Indices past 9 must sort numerically.
        let mut list = values([0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1]);
        remove(&mut list, 3, &Value::from(1));
        assert_eq!(list, values([0, 1, 1, 1, 1, 1, 1, 1, 1]));
        remove(&mut list, -8, &Value::from(1));
        assert_eq!(list, values([0]));
    }

    #[test]
    fn test_remove_is_strict() {
        let mut list = vec![Value::from(1), Value::from("1")];
        remove(&mut list, 0, &Value::from(1));
        assert_eq!(list, vec![Value::from("1")]);
    }

    #[test]
    fn test_unique_keeps_rightmost_in_order() {
        let mut list = values([1, 2, 1, 3, 2]);
        unique(&mut list);
        assert_eq!(list, values([1, 3, 2]));
    }

    #[test]
    fn test_unique_coerces_to_string() {
        let mut list = vec![Value::from("1"), Value::from(1)];
        unique(&mut list);
        assert_eq!(list, vec![Value::from(1)]);
    }

    #[test]
    fn test_unique_by_custom_key() {
        let mut list = vec![Value::from("1"), Value::from(1)];
        unique_by(&mut list, |v| format!("{}:{}", v.type_name(), v));
        assert_eq!(list, vec![Value::from("1"), Value::from(1)]);
    }

    #[test]
    fn test_shuffle_never_leaves_an_element_in_place() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let mut list = values([0, 1, 2, 3, 4, 5]);
            shuffle(&mut list, &mut rng);
            for (i, v) in list.iter().enumerate() {
                assert_ne!(v, &Value::from(i));
            }
        }
    }

    #[test]
    fn test_shuffle_small_lists() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<Value> = Vec::new();
        shuffle(&mut empty, &mut rng);
        assert!(empty.is_empty());

        let mut one = values([1]);
        shuffle(&mut one, &mut rng);
        assert_eq!(one, values([1]));

        let mut two = values([1, 2]);
        shuffle(&mut two, &mut rng);
        assert_eq!(two, values([2, 1]));
    }

    fn number_fn(name: &str, f: fn(f64) -> f64) -> Value {
        Value::func(name, move |args| {
            let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
            Ok(Value::from(f(n)))
        })
    }

    #[test]
    fn test_compose_runs_tail_to_head() {
        let list = vec![number_fn("double", |n| n * 2.0), number_fn("inc", |n| n + 1.0)];
        // double(inc(3))
        assert_eq!(compose(&list, values([3])).unwrap(), Value::from(8));
    }

    #[test]
    fn test_compose_empty_returns_arguments() {
        let result = compose(&[], values([1, 2])).unwrap();
        assert_eq!(result.as_arguments(), values([1, 2]));
    }

    #[test]
    fn test_compose_not_callable() {
        let list = vec![number_fn("inc", |n| n + 1.0), Value::from(5)];
        let err = compose(&list, values([1])).unwrap_err();
        assert!(matches!(err, ListError::NotCallable { index: 1, found: "number" }));
    }

    #[test]
    fn test_compose_propagates_invocation_error() {
        let list = vec![Value::func("boom", |_| Err(ListError::Invocation("boom".into())))];
        let err = compose(&list, vec![]).unwrap_err();
        assert!(matches!(err, ListError::Invocation(msg) if msg == "boom"));
    }

    #[test]
    fn test_sequence_only_calls_last_element() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let list = vec![
            Value::from("not a function"),
            number_fn("inc", |n| n + 1.0),
            Value::func("double", move |args| {
                counter.fetch_add(1, Ordering::SeqCst);
                let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
                Ok(Value::from(n * 2.0))
            }),
        ];
        assert_eq!(sequence(&list, values([1])).unwrap(), Value::from(8));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_sequence_not_callable() {
        let list = vec![number_fn("inc", |n| n + 1.0), Value::Null];
        let err = sequence(&list, vec![]).unwrap_err();
        assert!(matches!(err, ListError::NotCallable { index: 1, found: "null" }));
    }

    #[test]
    fn test_slice_clamps() {
        let list = values([1, 2, 3]);
        assert_eq!(slice(&list, -1, 3), values([3]));
        assert_eq!(slice(&list, -5, 1), values([1]));
        assert!(slice(&list, 2, 1).is_empty());
        assert_eq!(slice(&list, 0, 10), values([1, 2, 3]));
        assert!(slice(&list, -2, 0).is_empty());
    }
}
