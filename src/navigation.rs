//! Address grammar, history, and the filter/address synchronizer.

pub mod address;
pub mod history;
pub mod sync;

pub use address::{format_address, parse_address, ParsedAddress};
pub use history::{History, InMemoryHistory, SharedHistory};
pub use sync::{NavigationSynchronizer, SyncState};
