//! Dual-state list storage.
//!
//! Every key maps to two independent lists: the *active* working list and
//! the *original* baseline used for rollback. Copies between the two are
//! shallow; elements that are themselves shared lists or objects stay
//! aliased.

mod store;

pub use store::{ListStore, StoreStats};
