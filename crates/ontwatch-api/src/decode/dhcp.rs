use crate::error::Error;
use crate::markup::Envelope;
use crate::models::{DhcpLease, DhcpServerSettings};
use crate::resource::{MenuData, MenuView};
use crate::session::Session;

const HOST_INFO: &str = "OBJ_DHCPHOSTINFO_ID";
const SERVER_CONFIG: &str = "OBJ_Br0AndDhcpsHosCfg_ID";
const LAN_DNS: &str = "OBJ_LANDNS_ID";

/// Decode active DHCP leases, one per Instance.
pub fn decode_dhcp_leases(envelope: &Envelope) -> Result<Vec<DhcpLease>, Error> {
    envelope.ensure_success()?;
    Ok(envelope
        .interleaved_records(HOST_INFO)
        .iter()
        .map(|m| DhcpLease {
            inst_id: m.text("_InstID"),
            port: m.text("PhyPortName"),
            ip_address: m.text("IPAddr"),
            expires_in: m.int("ExpiredTime"),
            mac_address: m.text("MACAddr"),
            hostname: m.text("HostName"),
        })
        .collect())
}

/// Decode the DHCP server settings.
///
/// Server fields and DNS assignment fields come from two sections with
/// disjoint field names; each field is read from its own section only.
pub fn decode_dhcp_settings(envelope: &Envelope) -> Result<DhcpServerSettings, Error> {
    envelope.ensure_success()?;
    let server = envelope.first_instance(SERVER_CONFIG).interleaved();
    let dns = envelope.first_instance(LAN_DNS).interleaved();

    Ok(DhcpServerSettings {
        inst_id: server.text("_InstID"),
        sub_mask: server.text("SubMask"),
        dns_server1: server.text("DNSServer1"),
        dns_server2: server.text("DNSServer2"),
        lease_time: server.int("LeaseTime"),
        max_address: server.text("MaxAddress"),
        subnet_mask: server.text("SubnetMask"),
        dns_server_source: server.text("DnsServerSource"),
        ip_address: server.text("IPAddr"),
        server_enable: server.int("ServerEnable"),
        min_address: server.text("MinAddress"),
        ipv4_dns_origin: dns.text("Ipv4DnsOrigin"),
        ipv4_assign_lan_ip: dns.text("IPv4AssignLANIP"),
        ipv6_dns_origin: dns.text("Ipv6DnsOrigin"),
        ipv6_assign_lan_ip: dns.text("IPv6AssignLANIP"),
    })
}

impl Session {
    /// Load active DHCP leases.
    pub async fn load_dhcp_leases(&self) -> Result<Vec<DhcpLease>, Error> {
        self.warm_up(MenuView::LanMgrIpv4).await;
        let envelope = self.fetch(MenuData::DhcpHostInfo).await?;
        decode_dhcp_leases(&envelope)
    }

    /// Load DHCP server and DNS assignment settings.
    pub async fn load_dhcp_settings(&self) -> Result<DhcpServerSettings, Error> {
        let envelope = self.fetch(MenuData::DhcpBasicCfg).await?;
        decode_dhcp_settings(&envelope)
    }
}
