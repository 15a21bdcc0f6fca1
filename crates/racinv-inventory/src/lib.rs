//! racinv-inventory: iDRAC hardware inventory
//!
//! Parses `racadm hwinventory` output into keyed records and filters them by
//! device type and field name.

pub mod collector;
pub mod error;
pub mod filter;
pub mod parser;
pub mod types;

pub use collector::{DEFAULT_TIMEOUT, HWINVENTORY_COMMAND, InventoryCollector};
pub use error::{InventoryError, ParseError};
pub use filter::filter;
pub use parser::{IdGenerator, InventoryParser, UuidGenerator, parse_inventory};
pub use types::{
    Criteria, DEVICE_TYPE_FIELD, InventoryRecord, InventorySet, RecordId, Selection, TargetSet,
    WILDCARD,
};
