//! Usage tracking: which words and sentences have been shown, and when
//!
//! The record keeps flat normalized sets for fast duplicate lookups plus a
//! dated learning log for historical review. The store owns the record and
//! writes it through to a JSON file after every mutation.

mod record;
mod store;

pub use record::UsageRecord;
pub use store::UsageStore;
