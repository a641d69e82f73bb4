// ── Record flattening ──
//
// Format-neutral (metric, labels, value) samples for sinks that expose
// records as gauges and counters. Metric and label names are stable: they
// are what dashboards built on this exporter query.

use serde::Serialize;

use ontwatch_api::{
    DeviceInfo, DhcpLease, DhcpServerSettings, InterfaceCounters, LanClient, WanStatus,
    WifiAccessPoint, WifiClient,
};

use crate::record::Record;

/// Whether a sample only ever grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    Gauge,
    Counter,
}

/// A single flattened observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub name: &'static str,
    pub kind: SampleType,
    /// Label pairs in declaration order.
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

impl Sample {
    fn gauge(name: &'static str, value: f64) -> Self {
        Self {
            name,
            kind: SampleType::Gauge,
            labels: Vec::new(),
            value,
        }
    }

    fn counter(name: &'static str, value: i64) -> Self {
        Self {
            kind: SampleType::Counter,
            ..Self::gauge(name, to_f64(value))
        }
    }

    /// An info-style gauge: all data lives in labels, value is `1`.
    fn info(name: &'static str, labels: Vec<(&'static str, String)>) -> Self {
        Self {
            labels,
            ..Self::gauge(name, 1.0)
        }
    }

    fn label(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.labels.push((key, value.into()));
        self
    }

    pub fn label_value(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn to_f64(value: i64) -> f64 {
    value as f64
}

impl Record {
    /// Flatten into samples.
    pub fn samples(&self) -> Vec<Sample> {
        match self {
            Self::DeviceInfo(r) => device_samples(r),
            Self::InterfaceCounters(r) => counter_samples(r),
            Self::WanStatus(r) => vec![wan_sample(r)],
            Self::LanClient(r) => vec![lan_client_sample(r)],
            Self::WifiClient(r) => vec![wifi_client_sample(r)],
            Self::WifiAccessPoint(r) => vec![access_point_sample(r)],
            Self::DhcpLease(r) => vec![lease_sample(r)],
            Self::DhcpSettings(r) => vec![dhcp_settings_sample(r)],
        }
    }
}

fn device_samples(r: &DeviceInfo) -> Vec<Sample> {
    let mut out = vec![Sample::info(
        "ont_device_info",
        vec![
            ("manufacturer", r.manufacturer.clone()),
            ("manufacturer_oui", r.manufacturer_oui.clone()),
            ("version_date", r.version_date.clone()),
            ("boot_version", r.boot_version.clone()),
            ("software_version", r.software_version.clone()),
            ("software_version_extended", r.software_version_extended.clone()),
            ("serial_number", r.serial_number.clone()),
            ("model", r.model.clone()),
            ("hardware_version", r.hardware_version.clone()),
        ],
    )];
    for (core, usage) in (1u8..).zip(r.cpu_usage) {
        out.push(Sample::gauge("ont_usage_cpu", to_f64(usage)).label("core", core.to_string()));
    }
    out.push(Sample::gauge("ont_usage_memory", to_f64(r.memory_usage)));
    out.push(Sample::counter("ont_device_uptime", r.uptime));
    out
}

fn counter_samples(r: &InterfaceCounters) -> Vec<Sample> {
    let directed = |name: &'static str, value_in: i64, value_out: i64| {
        [
            Sample::counter(name, value_in).label("direction", "in"),
            Sample::counter(name, value_out).label("direction", "out"),
        ]
    };
    let packets = |direction: &'static str, kind: &'static str, value: i64| {
        Sample::counter("ont_packets_total", value)
            .label("direction", direction)
            .label("type", kind)
    };

    let mut out = Vec::with_capacity(11);
    out.extend(directed("ont_octets_total", r.bytes_in, r.bytes_out));
    out.push(packets("in", "unicast", r.unicast_in));
    out.push(packets("out", "unicast", r.unicast_out));
    out.push(packets("in", "multicast", r.multicast_in));
    out.push(packets("out", "multicast", r.multicast_out));
    out.extend(directed("ont_packets_errors_total", r.errors_in, r.errors_out));
    out.extend(directed("ont_packets_discards_total", r.discards_in, r.discards_out));
    out.push(
        Sample::gauge("ont_ethernet_status", to_f64(r.status))
            .label("speed", r.speed.as_str())
            .label("duplex", r.duplex.as_str()),
    );
    out
}

fn wan_sample(r: &WanStatus) -> Sample {
    Sample::info(
        "ont_wan_internet_status",
        vec![
            ("conn_trigger", r.conn_trigger.clone()),
            ("uptime", r.uptime.to_string()),
            ("is_nat", r.is_nat.to_string()),
            ("conn_error", r.conn_error.clone()),
            ("xdsl_mode", r.xdsl_mode.clone()),
            ("wan_type", r.wan_type.clone()),
            ("wan_cname", r.wan_cname.clone()),
            ("ip_mode", r.ip_mode.clone()),
            ("trans_type", r.trans_type.clone()),
            ("pppoe_service_name", r.pppoe_service_name.clone()),
            ("mode", r.mode.clone()),
            ("uplink", r.uplink.to_string()),
            ("page_type", r.page_type.to_string()),
            ("vlan_enable", r.vlan_enable.to_string()),
            ("str_serv_list", r.str_serv_list.clone()),
            ("conn_status6", r.conn_status6.clone()),
            ("inst_id", r.inst_id.clone()),
            ("enable", r.enable.to_string()),
            ("dscp", r.dscp.to_string()),
            ("priority", r.priority.to_string()),
            ("vlanid", r.vlan_id.to_string()),
            ("subnet_mask", r.subnet_mask.clone()),
            ("auth_type", r.auth_type.clone()),
            ("mtu", r.mtu.to_string()),
            ("dns1", r.dns1.clone()),
            ("dns3", r.dns3.clone()),
            ("gateway", r.gateway.clone()),
            ("work_if_mac", r.work_if_mac.clone()),
            ("serv_list", r.serv_list.clone()),
            ("link_mode", r.link_mode.clone()),
            ("is_def_gw", r.is_def_gw.to_string()),
            ("ip_address", r.ip_address.clone()),
            ("dns2", r.dns2.clone()),
            ("enable_pass_through", r.enable_pass_through.to_string()),
            ("conn_status", r.conn_status.clone()),
        ],
    )
}

fn lan_client_sample(r: &LanClient) -> Sample {
    Sample::info(
        "ont_lan_client_status",
        vec![
            ("hostname", r.hostname.clone()),
            ("ip", r.ip_address.clone()),
            ("ipv6", r.ipv6_address.clone()),
            ("mac", r.mac_address.clone()),
            ("alias", r.alias.clone()),
        ],
    )
}

fn wifi_client_sample(r: &WifiClient) -> Sample {
    Sample::info(
        "ont_wlan_client_status",
        vec![
            ("hostname", r.hostname.clone()),
            ("ip", r.ip_address.clone()),
            ("ipv6", r.ipv6_address.clone()),
            ("mac", r.mac_address.clone()),
            ("alias", r.alias.clone()),
            ("essid", r.essid.clone()),
            ("rssi", r.rssi.to_string()),
            ("tx_rate", r.tx_rate.to_string()),
            ("rx_rate", r.rx_rate.to_string()),
            ("snr", r.snr.to_string()),
            ("noise", r.noise.to_string()),
            ("link_time", r.link_time.to_string()),
            ("mode", r.mode.clone()),
            ("mcs", r.mcs.to_string()),
            ("band", r.band.clone()),
        ],
    )
}

fn access_point_sample(r: &WifiAccessPoint) -> Sample {
    Sample::info(
        "ont_wlan_ap_status",
        vec![
            ("inst_id", r.inst_id.clone()),
            ("alias", r.alias.clone()),
            ("essid", r.essid.clone()),
            ("bssid", r.bssid.clone()),
            ("band", r.band.clone()),
            ("enable", r.enable.clone()),
            ("channel", r.channel.clone()),
            ("encryption", r.encryption.clone()),
            ("bytes_sent", r.bytes_sent.clone()),
            ("bytes_received", r.bytes_received.clone()),
        ],
    )
}

fn lease_sample(r: &DhcpLease) -> Sample {
    Sample::info(
        "ont_lan_dhcp_host",
        vec![
            ("inst_id", r.inst_id.clone()),
            ("phy_port_name", r.port.clone()),
            ("ip_addr", r.ip_address.clone()),
            ("expired_time", r.expires_in.to_string()),
            ("mac_addr", r.mac_address.clone()),
            ("host_name", r.hostname.clone()),
        ],
    )
}

fn dhcp_settings_sample(r: &DhcpServerSettings) -> Sample {
    Sample::info(
        "ont_lan_dhcp_settings",
        vec![
            ("inst_id", r.inst_id.clone()),
            ("sub_mask", r.sub_mask.clone()),
            ("dns_server1", r.dns_server1.clone()),
            ("dns_server2", r.dns_server2.clone()),
            ("lease_time", r.lease_time.to_string()),
            ("max_address", r.max_address.clone()),
            ("subnet_mask", r.subnet_mask.clone()),
            ("dns_server_source", r.dns_server_source.clone()),
            ("ip_addr", r.ip_address.clone()),
            ("server_enable", r.server_enable.to_string()),
            ("min_address", r.min_address.clone()),
            ("ipv4_dns_origin", r.ipv4_dns_origin.clone()),
            ("ipv4_assign_lan_ip", r.ipv4_assign_lan_ip.clone()),
            ("ipv6_dns_origin", r.ipv6_dns_origin.clone()),
            ("ipv6_assign_lan_ip", r.ipv6_assign_lan_ip.clone()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use ontwatch_api::{Duplex, LinkSpeed};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn device_info_yields_per_core_usage() {
        let record = Record::DeviceInfo(DeviceInfo {
            model: "F670L".into(),
            cpu_usage: [10, 20, 30, 40],
            memory_usage: 55,
            uptime: 120,
            ..DeviceInfo::default()
        });
        let samples = record.samples();
        assert_eq!(samples.len(), 7);
        assert_eq!(samples[0].name, "ont_device_info");
        assert_eq!(samples[0].label_value("model"), Some("F670L"));

        let cores: Vec<(Option<&str>, f64)> = samples
            .iter()
            .filter(|s| s.name == "ont_usage_cpu")
            .map(|s| (s.label_value("core"), s.value))
            .collect();
        assert_eq!(
            cores,
            vec![
                (Some("1"), 10.0),
                (Some("2"), 20.0),
                (Some("3"), 30.0),
                (Some("4"), 40.0)
            ]
        );
        assert_eq!(samples[6].kind, SampleType::Counter);
    }

    #[test]
    fn counters_split_by_direction_and_type() {
        let record = Record::InterfaceCounters(InterfaceCounters {
            bytes_in: 100,
            bytes_out: 200,
            multicast_out: 7,
            status: 1,
            duplex: Duplex::Full,
            speed: LinkSpeed::Mbps1000,
            ..InterfaceCounters::default()
        });
        let samples = record.samples();
        assert_eq!(samples.len(), 11);

        let octets_out = samples
            .iter()
            .find(|s| s.name == "ont_octets_total" && s.label_value("direction") == Some("out"))
            .map(|s| s.value);
        assert_eq!(octets_out, Some(200.0));

        let multicast_out = samples
            .iter()
            .find(|s| {
                s.name == "ont_packets_total"
                    && s.label_value("direction") == Some("out")
                    && s.label_value("type") == Some("multicast")
            })
            .map(|s| s.value);
        assert_eq!(multicast_out, Some(7.0));

        let link = samples.last().map(|s| (s.label_value("speed"), s.label_value("duplex")));
        assert_eq!(link, Some((Some("1000"), Some("full"))));
    }

    #[test]
    fn wan_labels_never_carry_credentials() {
        let record = Record::WanStatus(WanStatus {
            username: "subscriber".into(),
            password: "hunter2".to_owned().into(),
            conn_status: "Connected".into(),
            ..WanStatus::default()
        });
        let sample = &record.samples()[0];
        assert_eq!(sample.labels.len(), 35);
        assert_eq!(sample.label_value("conn_status"), Some("Connected"));
        assert!(sample.labels.iter().all(|(_, v)| v != "subscriber" && v != "hunter2"));
    }
}
