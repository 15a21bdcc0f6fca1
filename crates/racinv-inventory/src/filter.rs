//! Record selection by device type and field projection

use tracing::debug;

use crate::types::{Criteria, InventorySet, TargetSet};

/// Select records by `Device Type` and keep only the selected fields
///
/// A record without a `Device Type` property has type `""`, which only an
/// explicit empty-string selection matches. Matching nothing is not an error.
pub fn filter(inventory: &InventorySet, criteria: &Criteria) -> TargetSet {
    let target: TargetSet = inventory
        .iter()
        .filter(|(_, record)| {
            criteria
                .types
                .contains(record.device_type().unwrap_or_default())
        })
        .map(|(id, record)| (id.clone(), record.project(&criteria.fields)))
        .collect();

    debug!(
        total = inventory.len(),
        selected = target.len(),
        "filtered inventory"
    );

    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InventoryRecord, RecordId, Selection};

    fn record(pairs: &[(&str, &str)]) -> InventoryRecord {
        pairs.iter().copied().collect()
    }

    fn sample() -> InventorySet {
        [
            (
                RecordId::new("a", "NIC.Slot.1"),
                record(&[("Device Type", "NIC"), ("Product Name", "Example NIC")]),
            ),
            (
                RecordId::new("b", "FC.Slot.1"),
                record(&[("Device Type", "FC"), ("Product Name", "Example FC")]),
            ),
            (
                RecordId::new("c", "CPU.Socket.1"),
                record(&[
                    ("Device Type", "CPU"),
                    ("Model", "Intel(R) Xeon(R) Silver 4210"),
                    ("Number Of Cores", "10"),
                ]),
            ),
            (
                RecordId::new("d", "System.Embedded.1"),
                record(&[("Model", "PowerEdge R640")]),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn criteria(types: &[&str], fields: &[&str]) -> Criteria {
        Criteria::new(
            Selection::from_values(types.iter().copied()),
            Selection::from_values(fields.iter().copied()),
        )
    }

    #[test]
    fn test_filter_by_type_all_fields() {
        let target = filter(&sample(), &criteria(&["NIC"], &["all"]));

        assert_eq!(target.len(), 1);
        let (id, nic) = target.iter().next().unwrap();
        assert_eq!(id, &RecordId::new("a", "NIC.Slot.1"));
        assert_eq!(
            nic,
            &record(&[("Device Type", "NIC"), ("Product Name", "Example NIC")])
        );
    }

    #[test]
    fn test_type_wildcard_keeps_every_id() {
        let inventory = sample();
        let target = filter(&inventory, &criteria(&["all"], &["Model"]));

        assert!(target.ids().eq(inventory.ids()));
    }

    #[test]
    fn test_wildcard_includes_records_without_device_type() {
        let target = filter(&sample(), &criteria(&["all"], &["all"]));
        assert_eq!(target, sample());
    }

    #[test]
    fn test_explicit_types_are_subset() {
        let inventory = sample();
        let target = filter(&inventory, &criteria(&["NIC", "FC"], &["all"]));

        assert_eq!(target.len(), 2);
        assert!(target.ids().all(|id| inventory.get(id).is_some()));
    }

    #[test]
    fn test_missing_device_type_matches_empty_string_only() {
        let target = filter(&sample(), &criteria(&[""], &["all"]));

        assert_eq!(target.len(), 1);
        assert_eq!(
            target.records().next().unwrap().get("Model"),
            Some("PowerEdge R640")
        );
    }

    #[test]
    fn test_field_projection_is_intersection() {
        let target = filter(
            &sample(),
            &criteria(&["CPU", "NIC"], &["Model", "Product Name", "Serial Number"]),
        );

        let cpu = target.get(&RecordId::new("c", "CPU.Socket.1")).unwrap();
        assert_eq!(cpu.keys().collect::<Vec<_>>(), vec!["Model"]);

        let nic = target.get(&RecordId::new("a", "NIC.Slot.1")).unwrap();
        assert_eq!(nic.keys().collect::<Vec<_>>(), vec!["Product Name"]);
    }

    #[test]
    fn test_record_kept_even_if_no_field_matches() {
        let target = filter(&sample(), &criteria(&["FC"], &["Serial Number"]));

        assert_eq!(target.len(), 1);
        assert!(target.records().next().unwrap().is_empty());
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        assert!(filter(&sample(), &criteria(&["GPU"], &["all"])).is_empty());
        assert!(filter(&InventorySet::new(), &criteria(&["all"], &["all"])).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let criteria = criteria(&["NIC", "CPU"], &["Device Type", "Model"]);
        let once = filter(&sample(), &criteria);
        let twice = filter(&once, &criteria);

        assert_eq!(once, twice);
    }
}
