// Wi-Fi access points
//
// The WLAN status page describes each AP in three unrelated sections:
// configuration (`OBJ_WLANAP_ID`), driver statistics (`OBJ_WLANCONFIGDRV_ID`,
// keyed by the AP's own instance id) and radio settings
// (`OBJ_WLANSETTING_ID`, keyed by the AP's `WLANViewName`). The two lookup
// collections are indexed once, then each AP is resolved against them.

use crate::decode::index_by;
use crate::error::Error;
use crate::markup::{Envelope, FieldMap};
use crate::models::WifiAccessPoint;
use crate::resource::{MenuData, MenuView};
use crate::session::Session;

const AP_CONFIG: &str = "OBJ_WLANAP_ID";
const AP_DRIVER: &str = "OBJ_WLANCONFIGDRV_ID";
const RADIO_SETTINGS: &str = "OBJ_WLANSETTING_ID";

/// Decode access points with their driver statistics and band.
///
/// An AP without a matching driver record or radio leaves those fields
/// empty. Radios with an empty band are not eligible for the band join.
pub fn decode_access_points(envelope: &Envelope) -> Result<Vec<WifiAccessPoint>, Error> {
    envelope.ensure_success()?;

    let drivers = envelope.interleaved_records(AP_DRIVER);
    let driver_by_id = index_by(&drivers, "_InstID");

    let radios: Vec<FieldMap> = envelope
        .interleaved_records(RADIO_SETTINGS)
        .into_iter()
        .filter(|r| r.get("Band").is_some_and(|b| !b.is_empty()))
        .collect();
    let band_by_view = index_by(&radios, "_InstID");

    Ok(envelope
        .interleaved_records(AP_CONFIG)
        .iter()
        .map(|m| {
            let inst_id = m.text("_InstID");
            let driver = driver_by_id.get(inst_id.as_str());
            let driver_field = |key: &str| driver.map(|d| d.text(key)).unwrap_or_default();
            let band = band_by_view
                .get(m.get("WLANViewName").unwrap_or_default())
                .map(|r| r.text("Band"))
                .unwrap_or_default();

            let encryption = match m.get("11iEncryptType") {
                Some(enc) if !enc.is_empty() => enc.to_owned(),
                _ => m.text("WPAEncryptType"),
            };

            WifiAccessPoint {
                alias: m.text("Alias"),
                essid: m.text("ESSID"),
                bssid: driver_field("Bssid"),
                band,
                enable: m.text("Enable"),
                channel: driver_field("ChannelInUsed"),
                encryption,
                bytes_sent: driver_field("TotalBytesSent"),
                bytes_received: driver_field("TotalBytesReceived"),
                inst_id,
            }
        })
        .collect())
}

impl Session {
    /// Load configured access points.
    pub async fn load_access_points(&self) -> Result<Vec<WifiAccessPoint>, Error> {
        self.warm_up(MenuView::LocalNetStatus).await;
        let envelope = self.fetch(MenuData::WlanStatus).await?;
        decode_access_points(&envelope)
    }
}
