// Domain records
//
// Flat, immutable value types decoded fresh on every scrape. Every field has
// a zero value (`""` or `0`) used when the appliance omits it, so decoding
// never fails on a missing key.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, Serializer};

// ── Enumerated codes ─────────────────────────────────────────────────

/// Ethernet link speed as reported by the appliance's numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkSpeed {
    Mbps10,
    Mbps100,
    Mbps1000,
    /// Any code outside `1..=3`, including "link down".
    #[default]
    Unknown,
}

impl LinkSpeed {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Mbps10,
            2 => Self::Mbps100,
            3 => Self::Mbps1000,
            _ => Self::Unknown,
        }
    }

    /// Speed in Mbps as a label, `"0"` when unknown.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mbps10 => "10",
            Self::Mbps100 => "100",
            Self::Mbps1000 => "1000",
            Self::Unknown => "0",
        }
    }
}

/// Ethernet duplex mode as reported by the appliance's numeric code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Duplex {
    Half,
    Full,
    #[default]
    Unknown,
}

impl Duplex {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Half,
            2 => Self::Full,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Half => "half",
            Self::Full => "full",
            Self::Unknown => "unknown",
        }
    }
}

macro_rules! label_enum {
    ($($ty:ty),+) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    )+};
}

label_enum!(LinkSpeed, Duplex);

/// A credential echoed back by the appliance. Redacted in `Debug`.
#[derive(Debug)]
pub struct Redacted(SecretString);

impl Default for Redacted {
    fn default() -> Self {
        Self(SecretString::from(String::new()))
    }
}

impl From<String> for Redacted {
    fn from(value: String) -> Self {
        Self(SecretString::from(value))
    }
}

impl ExposeSecret<str> for Redacted {
    fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Identity and health of the appliance itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub manufacturer_oui: String,
    pub version_date: String,
    pub boot_version: String,
    pub software_version: String,
    pub software_version_extended: String,
    pub serial_number: String,
    pub model: String,
    pub hardware_version: String,
    /// Per-core CPU usage in percent, core 1 first.
    pub cpu_usage: [i64; 4],
    /// Memory usage in percent.
    pub memory_usage: i64,
    /// Seconds since power-on.
    pub uptime: i64,
}

/// Counters for the first physical interface on the status page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterfaceCounters {
    pub discards_in: i64,
    pub discards_out: i64,
    pub errors_in: i64,
    pub errors_out: i64,
    pub multicast_in: i64,
    pub multicast_out: i64,
    pub unicast_in: i64,
    pub unicast_out: i64,
    pub bytes_in: i64,
    pub bytes_out: i64,
    pub packets_in: i64,
    pub packets_out: i64,
    /// Link status code, `1` = up.
    pub status: i64,
    pub duplex: Duplex,
    pub speed: LinkSpeed,
}

// ── WAN ──────────────────────────────────────────────────────────────

/// Full parameter set of the active WAN connection.
///
/// The PPPoE credentials are decoded but never serialized.
#[derive(Debug, Default, Serialize)]
pub struct WanStatus {
    pub conn_trigger: String,
    pub uptime: i64,
    pub is_nat: i64,
    #[serde(skip)]
    pub username: String,
    pub conn_error: String,
    pub xdsl_mode: String,
    pub wan_type: String,
    pub wan_cname: String,
    pub ip_mode: String,
    pub trans_type: String,
    pub pppoe_service_name: String,
    pub mode: String,
    pub uplink: i64,
    pub page_type: i64,
    pub vlan_enable: i64,
    pub str_serv_list: String,
    pub conn_status6: String,
    pub inst_id: String,
    pub enable: i64,
    pub dscp: i64,
    pub priority: i64,
    pub vlan_id: i64,
    pub subnet_mask: String,
    pub auth_type: String,
    pub mtu: i64,
    pub dns1: String,
    pub dns3: String,
    pub gateway: String,
    pub work_if_mac: String,
    pub serv_list: String,
    pub link_mode: String,
    pub is_def_gw: i64,
    #[serde(skip)]
    pub password: Redacted,
    pub ip_address: String,
    pub dns2: String,
    pub enable_pass_through: i64,
    pub conn_status: String,
}

// ── Clients ──────────────────────────────────────────────────────────

/// A wired host from the LAN device list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanClient {
    pub hostname: String,
    pub ip_address: String,
    pub ipv6_address: String,
    pub mac_address: String,
    pub alias: String,
}

/// An associated wireless station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiClient {
    pub inst_id: String,
    /// Name of the AP the station is associated with.
    pub alias: String,
    /// ESSID of that AP, `""` when the AP isn't listed.
    pub essid: String,
    pub hostname: String,
    pub ip_address: String,
    pub ipv6_address: String,
    pub mac_address: String,
    pub rssi: i64,
    pub tx_rate: i64,
    pub rx_rate: i64,
    pub snr: i64,
    pub noise: i64,
    pub link_time: i64,
    pub mode: String,
    pub mcs: i64,
    pub band: String,
}

// ── WLAN ─────────────────────────────────────────────────────────────

/// One access point (SSID on a radio), merged from its configuration,
/// driver statistics and band facets.
///
/// Values are kept as the appliance's strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiAccessPoint {
    pub inst_id: String,
    pub alias: String,
    pub essid: String,
    pub bssid: String,
    pub band: String,
    pub enable: String,
    pub channel: String,
    pub encryption: String,
    pub bytes_sent: String,
    pub bytes_received: String,
}

// ── DHCP ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DhcpLease {
    pub inst_id: String,
    pub port: String,
    pub ip_address: String,
    /// Remaining lease time in seconds.
    pub expires_in: i64,
    pub mac_address: String,
    pub hostname: String,
}

/// DHCP server configuration merged with the LAN DNS assignment settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DhcpServerSettings {
    pub inst_id: String,
    pub sub_mask: String,
    pub dns_server1: String,
    pub dns_server2: String,
    pub lease_time: i64,
    pub max_address: String,
    pub subnet_mask: String,
    pub dns_server_source: String,
    pub ip_address: String,
    pub server_enable: i64,
    pub min_address: String,
    pub ipv4_dns_origin: String,
    pub ipv4_assign_lan_ip: String,
    pub ipv6_dns_origin: String,
    pub ipv6_assign_lan_ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplex_codes() {
        assert_eq!(Duplex::from_code(1).as_str(), "half");
        assert_eq!(Duplex::from_code(2).as_str(), "full");
        assert_eq!(Duplex::from_code(0).as_str(), "unknown");
        assert_eq!(Duplex::from_code(7).as_str(), "unknown");
    }

    #[test]
    fn speed_codes() {
        assert_eq!(LinkSpeed::from_code(1).as_str(), "10");
        assert_eq!(LinkSpeed::from_code(2).as_str(), "100");
        assert_eq!(LinkSpeed::from_code(3).as_str(), "1000");
        assert_eq!(LinkSpeed::from_code(9).as_str(), "0");
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn enums_serialize_as_labels() {
        let json = serde_json::to_string(&(Duplex::Full, LinkSpeed::Mbps1000)).unwrap();
        assert_eq!(json, r#"["full","1000"]"#);
    }
}
