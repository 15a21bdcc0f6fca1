//! Parser for `racadm hwinventory` output
//!
//! The output is a flat list of blocks, each opened by a section marker and
//! followed by `key = value` lines:
//!
//! ```text
//! [InstanceID: NIC.Slot.1-1-1]
//! Device Type = NIC
//! Product Name = Broadcom Gigabit Ethernet BCM5720
//! -------------------------------------------------------------------
//! ```
//!
//! Every marker opens a new record, even when two markers carry the same
//! instance id, so records are keyed by a freshly generated id with the
//! marker's tag appended.

use tracing::{debug, trace};
use uuid::Uuid;

use crate::error::ParseError;
use crate::types::{InventoryRecord, InventorySet, RecordId};

/// Prefix of a line that opens a new record
const SECTION_PREFIX: &str = "[InstanceID:";

/// Source of the unique part of record ids
pub trait IdGenerator {
    /// Produce an id not returned before by this generator
    ///
    /// # Errors
    /// Returns `ParseError::IdGeneration` if no id can be produced
    fn next_id(&mut self) -> Result<String, ParseError>;
}

/// Random UUID v4 ids
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&mut self) -> Result<String, ParseError> {
        Ok(Uuid::new_v4().to_string())
    }
}

impl<F> IdGenerator for F
where
    F: FnMut() -> Result<String, ParseError>,
{
    fn next_id(&mut self) -> Result<String, ParseError> {
        self()
    }
}

/// Line-oriented inventory parser
#[derive(Debug, Default)]
pub struct InventoryParser<G = UuidGenerator> {
    ids: G,
}

impl InventoryParser<UuidGenerator> {
    /// Parser that keys records with random UUIDs
    #[must_use]
    pub fn new() -> Self {
        Self { ids: UuidGenerator }
    }
}

impl<G: IdGenerator> InventoryParser<G> {
    /// Parser that takes record ids from `ids`
    pub fn with_id_generator(ids: G) -> Self {
        Self { ids }
    }

    /// Parse raw command output into records
    ///
    /// Blank lines and lines starting with `-` are skipped. Markers and
    /// separators must start in the first column; property lines may be
    /// indented. Property lines are
    /// split on the first `=`, so values may themselves contain `=`. Empty
    /// input yields an empty set.
    ///
    /// # Errors
    /// Returns `ParseError` naming the first offending line if a marker has no
    /// tag, a property line has no `=` or no key, or a property appears before
    /// the first marker. Id generation failures and duplicate ids are also
    /// errors.
    pub fn parse(&mut self, raw: &str) -> Result<InventorySet, ParseError> {
        let mut inventory = InventorySet::new();
        let mut current: Option<RecordId> = None;

        for (idx, raw_line) in raw.lines().enumerate() {
            let line_no = idx + 1;

            // Whitespace-only lines count as blank; nothing else is trimmed
            // before classification
            if raw_line.trim().is_empty() || raw_line.starts_with('-') {
                continue;
            }

            if raw_line.starts_with(SECTION_PREFIX) {
                let tag = section_tag(raw_line).ok_or_else(|| ParseError::MalformedSection {
                    line_no,
                    line: raw_line.to_string(),
                })?;

                let id = RecordId::new(&self.ids.next_id()?, tag);
                trace!(line_no, id = %id, "opening section");

                inventory
                    .try_insert(id.clone(), InventoryRecord::new())
                    .map_err(|dup| ParseError::DuplicateId(dup.to_string()))?;
                current = Some(id);
                continue;
            }

            let (key, value) = split_property(raw_line).ok_or_else(|| ParseError::MalformedProperty {
                line_no,
                line: raw_line.to_string(),
            })?;

            let record = current
                .as_ref()
                .and_then(|id| inventory.get_mut(id))
                .ok_or_else(|| ParseError::OrphanProperty {
                    line_no,
                    line: raw_line.to_string(),
                })?;
            record.insert(key, value);
        }

        debug!(records = inventory.len(), "parsed inventory");

        Ok(inventory)
    }
}

/// Parse raw command output with random record ids
///
/// # Errors
/// See [`InventoryParser::parse`].
pub fn parse_inventory(raw: &str) -> Result<InventorySet, ParseError> {
    InventoryParser::new().parse(raw)
}

/// Second whitespace-separated token inside the marker brackets
fn section_tag(line: &str) -> Option<&str> {
    line.trim_end()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split_whitespace()
        .nth(1)
}

/// Split `key = value` on the first `=`, trimming both sides
fn split_property(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
