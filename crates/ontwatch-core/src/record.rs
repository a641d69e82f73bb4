// ── Emitted records ──
//
// The unit handed to a `MetricsSink`: one decoded domain record tagged with
// the telemetry domain it belongs to.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};

use ontwatch_api::{
    DeviceInfo, DhcpLease, DhcpServerSettings, InterfaceCounters, LanClient, WanStatus,
    WifiAccessPoint, WifiClient,
};

/// The eight telemetry domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RecordKind {
    DeviceInfo,
    InterfaceCounters,
    WanStatus,
    LanClient,
    WifiClient,
    WifiAccessPoint,
    DhcpLease,
    DhcpSettings,
}

/// One decoded record.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Record {
    DeviceInfo(DeviceInfo),
    InterfaceCounters(InterfaceCounters),
    WanStatus(WanStatus),
    LanClient(LanClient),
    WifiClient(WifiClient),
    WifiAccessPoint(WifiAccessPoint),
    DhcpLease(DhcpLease),
    DhcpSettings(DhcpServerSettings),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::DeviceInfo(_) => RecordKind::DeviceInfo,
            Self::InterfaceCounters(_) => RecordKind::InterfaceCounters,
            Self::WanStatus(_) => RecordKind::WanStatus,
            Self::LanClient(_) => RecordKind::LanClient,
            Self::WifiClient(_) => RecordKind::WifiClient,
            Self::WifiAccessPoint(_) => RecordKind::WifiAccessPoint,
            Self::DhcpLease(_) => RecordKind::DhcpLease,
            Self::DhcpSettings(_) => RecordKind::DhcpSettings,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let record = Record::LanClient(LanClient {
            hostname: "nas".into(),
            ..LanClient::default()
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "lan_client");
        assert_eq!(json["hostname"], "nas");
    }

    #[test]
    fn kind_names_match_serde_tags() {
        let record = Record::DhcpSettings(DhcpServerSettings::default());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], record.kind().as_ref());
        assert_eq!(RecordKind::iter().count(), 8);
    }
}
