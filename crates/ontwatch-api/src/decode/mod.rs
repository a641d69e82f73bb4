// Record decoders
//
// One module per telemetry domain. Each exposes a pure `decode_*` function
// from a parsed `Envelope` to typed records (so it can be tested against
// captured markup), plus a `Session::load_*` method that performs the
// warm-up view and data fetch before decoding.
//
// Every decoder checks the envelope status first and never returns partial
// data for a failed fetch.

mod clients;
mod device;
mod dhcp;
mod interface;
mod wan;
mod wlan;

use std::collections::HashMap;

use crate::markup::FieldMap;

pub use clients::{decode_lan_clients, decode_wifi_clients};
pub use device::decode_device_info;
pub use dhcp::{decode_dhcp_leases, decode_dhcp_settings};
pub use interface::{IFACE_FIELD_WIDTH, decode_interface_counters, slice_windows};
pub use wan::decode_wan_status;
pub use wlan::decode_access_points;

/// Index a collection by one of its fields for correlation lookups.
///
/// Records whose key is empty are skipped. When a key repeats, the first
/// record in collection order wins.
pub(crate) fn index_by<'a>(records: &'a [FieldMap], key: &str) -> HashMap<&'a str, &'a FieldMap> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        if let Some(id) = record.get(key).filter(|id| !id.is_empty()) {
            index.entry(id).or_insert(record);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_keeps_first_match_and_skips_empty_keys() {
        let records: Vec<FieldMap> = vec![
            [("_InstID", "1"), ("v", "first")].into_iter().collect(),
            [("_InstID", ""), ("v", "blank")].into_iter().collect(),
            [("_InstID", "1"), ("v", "second")].into_iter().collect(),
            [("v", "keyless")].into_iter().collect(),
        ];
        let index = index_by(&records, "_InstID");
        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].text("v"), "first");
    }
}
