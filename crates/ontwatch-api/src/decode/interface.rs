// Interface counters
//
// The LAN status page reports every physical port inside a single Instance
// as one flat run of values, `IFACE_FIELD_WIDTH` per port, with the names
// listed once per port in the same order.

use crate::error::Error;
use crate::markup::{Envelope, paired};
use crate::models::{Duplex, InterfaceCounters, LinkSpeed};
use crate::resource::{MenuData, MenuView};
use crate::session::Session;

const PON_PORT_STATUS: &str = "OBJ_PON_PORT_BASIC_STATUS_ID";

/// Values per physical interface.
pub const IFACE_FIELD_WIDTH: usize = 16;

/// Split a flat value run into complete windows; a trailing partial window
/// is dropped.
pub fn slice_windows<T>(values: &[T], width: usize) -> Vec<&[T]> {
    if width == 0 {
        return Vec::new();
    }
    values.chunks_exact(width).collect()
}

/// Decode counters for the first interface.
///
/// Additional interfaces are not distinguished. Fewer than one full window
/// of values yields all-zero counters. Only an explicit failure status is
/// rejected.
pub fn decode_interface_counters(envelope: &Envelope) -> Result<InterfaceCounters, Error> {
    envelope.ensure_not_failed()?;

    let instance = envelope.first_instance(PON_PORT_STATUS);
    let names = instance.names();
    let values = instance.values();
    let names = &names[..names.len().min(IFACE_FIELD_WIDTH)];

    let Some(window) = slice_windows(&values, IFACE_FIELD_WIDTH).into_iter().next() else {
        return Ok(InterfaceCounters::default());
    };
    let m = paired(names, window);

    Ok(InterfaceCounters {
        discards_in: m.int("InDiscard"),
        discards_out: m.int("OutDiscard"),
        errors_in: m.int("InError"),
        errors_out: m.int("OutError"),
        multicast_in: m.int("InMulticast"),
        multicast_out: m.int("OutMulticast"),
        unicast_in: m.int("InUnicast"),
        unicast_out: m.int("OutUnicast"),
        bytes_in: m.int("InBytes"),
        bytes_out: m.int("OutBytes"),
        packets_in: m.int("InPkts"),
        packets_out: m.int("OutPkts"),
        status: m.int("Status"),
        duplex: Duplex::from_code(m.int("Duplex")),
        speed: LinkSpeed::from_code(m.int("Speed")),
    })
}

impl Session {
    /// Load traffic counters and link state of the first interface.
    pub async fn load_interface_counters(&self) -> Result<InterfaceCounters, Error> {
        self.warm_up(MenuView::LocalNetStatus).await;
        let envelope = self.fetch(MenuData::LanInfo).await?;
        decode_interface_counters(&envelope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fmt::Write as _;

    use pretty_assertions::assert_eq;

    use super::*;

    const NAMES: [&str; IFACE_FIELD_WIDTH] = [
        "InDiscard",
        "OutDiscard",
        "InError",
        "OutError",
        "InMulticast",
        "OutMulticast",
        "InUnicast",
        "OutUnicast",
        "InBytes",
        "OutBytes",
        "InPkts",
        "OutPkts",
        "Status",
        "Duplex",
        "Speed",
        "RxPower",
    ];

    /// A page listing `ports` interfaces, names repeated per port, followed
    /// by `extra` stray values.
    fn page(ports: &[[u32; IFACE_FIELD_WIDTH]], extra: usize) -> String {
        let mut instance = String::new();
        for values in ports {
            for (name, value) in NAMES.iter().zip(values) {
                write!(instance, "<ParaName>{name}</ParaName><ParaValue>{value}</ParaValue>")
                    .unwrap();
            }
        }
        for _ in 0..extra {
            instance.push_str("<ParaValue>99</ParaValue>");
        }
        format!(
            "<ajax_response_xml_root><{PON_PORT_STATUS}><Instance>{instance}</Instance>\
             </{PON_PORT_STATUS}></ajax_response_xml_root>"
        )
    }

    fn port(seed: u32) -> [u32; IFACE_FIELD_WIDTH] {
        let mut values = [0; IFACE_FIELD_WIDTH];
        for (i, v) in values.iter_mut().enumerate() {
            *v = seed + u32::try_from(i).unwrap();
        }
        values[12] = 1; // Status
        values[13] = 2; // Duplex
        values[14] = 3; // Speed
        values
    }

    #[test]
    fn windows_drop_trailing_remainder() {
        let values: Vec<u32> = (0..33).collect();
        let windows = slice_windows(&values, IFACE_FIELD_WIDTH);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], &values[..16]);
        assert_eq!(windows[1], &values[16..32]);
        assert!(slice_windows(&values, 0).is_empty());
    }

    #[test]
    fn keeps_only_first_interface() {
        let body = page(&[port(100), port(500)], 1);
        let counters = decode_interface_counters(&Envelope::parse(body.as_bytes()).unwrap())
            .unwrap();
        assert_eq!(
            counters,
            InterfaceCounters {
                discards_in: 100,
                discards_out: 101,
                errors_in: 102,
                errors_out: 103,
                multicast_in: 104,
                multicast_out: 105,
                unicast_in: 106,
                unicast_out: 107,
                bytes_in: 108,
                bytes_out: 109,
                packets_in: 110,
                packets_out: 111,
                status: 1,
                duplex: Duplex::Full,
                speed: LinkSpeed::Mbps1000,
            }
        );
    }

    #[test]
    fn short_value_run_yields_zero_counters() {
        let body = "<ajax_response_xml_root><OBJ_PON_PORT_BASIC_STATUS_ID><Instance>\
                    <ParaName>InBytes</ParaName><ParaValue>5</ParaValue>\
                    </Instance></OBJ_PON_PORT_BASIC_STATUS_ID></ajax_response_xml_root>";
        let counters = decode_interface_counters(&Envelope::parse(body.as_bytes()).unwrap())
            .unwrap();
        assert_eq!(counters, InterfaceCounters::default());
        assert_eq!(counters.duplex.as_str(), "unknown");
        assert_eq!(counters.speed.as_str(), "0");
    }
}
