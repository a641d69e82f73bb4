use crate::decode::index_by;
use crate::error::Error;
use crate::markup::Envelope;
use crate::models::{LanClient, WifiClient};
use crate::resource::MenuData;
use crate::session::Session;

const LAN_DEVICES: &str = "OBJ_ACCESSDEV_ID";
const WLAN_STATIONS: &str = "OBJ_WLAN_AD_ID";
const WLAN_APS: &str = "OBJ_WLANAP_ID";

/// Decode the wired host list, one record per Instance.
pub fn decode_lan_clients(envelope: &Envelope) -> Result<Vec<LanClient>, Error> {
    envelope.ensure_success()?;
    Ok(envelope
        .paired_records(LAN_DEVICES)
        .iter()
        .map(|m| LanClient {
            hostname: m.text("HostName"),
            ip_address: m.text("IPAddress"),
            ipv6_address: m.text("IPV6Address"),
            mac_address: m.text("MACAddress"),
            alias: m.text("AliasName"),
        })
        .collect())
}

/// Decode associated wireless stations.
///
/// Each station names its AP by `AliasName`; when the page also lists the
/// APs, that alias is joined against their instance ids to fill `essid`.
pub fn decode_wifi_clients(envelope: &Envelope) -> Result<Vec<WifiClient>, Error> {
    envelope.ensure_success()?;

    let aps = envelope.interleaved_records(WLAN_APS);
    let ap_by_id = index_by(&aps, "_InstID");

    Ok(envelope
        .paired_records(WLAN_STATIONS)
        .iter()
        .map(|m| {
            let alias = m.text("AliasName");
            let essid = ap_by_id
                .get(alias.as_str())
                .map(|ap| ap.text("ESSID"))
                .unwrap_or_default();
            WifiClient {
                inst_id: m.text("_InstID"),
                essid,
                alias,
                hostname: m.text("HostName"),
                ip_address: m.text("IPAddress"),
                ipv6_address: m.text("IPV6Address"),
                mac_address: m.text("MACAddress"),
                rssi: m.int("RSSI"),
                tx_rate: m.int("TxRate"),
                rx_rate: m.int("RxRate"),
                snr: m.int("SNR"),
                noise: m.int("NOISE"),
                link_time: m.int("LinkTime"),
                mode: m.text("CurrentMode"),
                mcs: m.int("MCS"),
                band: m.text("BAND"),
            }
        })
        .collect())
}

impl Session {
    /// Load the wired LAN host list.
    pub async fn load_lan_clients(&self) -> Result<Vec<LanClient>, Error> {
        let envelope = self.fetch(MenuData::LanClients).await?;
        decode_lan_clients(&envelope)
    }

    /// Load associated Wi-Fi stations.
    pub async fn load_wifi_clients(&self) -> Result<Vec<WifiClient>, Error> {
        let envelope = self.fetch(MenuData::WlanClients).await?;
        decode_wifi_clients(&envelope)
    }
}
