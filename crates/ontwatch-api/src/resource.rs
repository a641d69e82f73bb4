// Logical resources exposed by the appliance's web UI
//
// Every resource is addressed by a query string against the endpoint root.
// The query strings mirror what the appliance's own JavaScript sends,
// including its quirks, because the firmware matches on them literally.

/// A page-view navigation call.
///
/// The appliance primes per-page server state when its UI "opens" a menu
/// page. Some data calls return stale or empty data unless the matching
/// view was requested first; the response body is never used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuView {
    /// Device status page.
    StatusMgr,
    /// Local network status page (LAN ports, Wi-Fi).
    LocalNetStatus,
    /// Ethernet WAN status page.
    EthWanStatus,
    /// LAN IPv4 management page (DHCP).
    LanMgrIpv4,
}

impl MenuView {
    pub fn tag(self) -> &'static str {
        match self {
            Self::StatusMgr => "statusMgr",
            Self::LocalNetStatus => "localNetStatus",
            Self::EthWanStatus => "ethWanStatus",
            Self::LanMgrIpv4 => "lanMgrIpv4",
        }
    }

    /// `_type=menuView&_tag={tag}&Menu3Location=0&_{ts}`
    ///
    /// The cache-buster has no `=`; that's what the web UI sends.
    pub fn query(self, ts: i64) -> String {
        format!(
            "_type=menuView&_tag={}&Menu3Location=0&_{ts}",
            self.tag()
        )
    }
}

/// A data call returning an `ajax_response_xml_root` envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuData {
    DeviceInfo,
    LanInfo,
    WlanClients,
    LanClients,
    WanInternetStatus,
    WlanStatus,
    DhcpHostInfo,
    DhcpBasicCfg,
}

impl MenuData {
    pub fn tag(self) -> &'static str {
        match self {
            Self::DeviceInfo => "devmgr_statusmgr_lua.lua",
            Self::LanInfo => "status_lan_info_lua.lua",
            Self::WlanClients => "wlan_client_stat_lua.lua",
            Self::LanClients => "accessdev_landevs_lua.lua",
            Self::WanInternetStatus => "wan_internetstatus_lua.lua",
            Self::WlanStatus => "wlan_wlanstatus_lua.lua",
            Self::DhcpHostInfo => "Localnet_LanMgrIpv4_DHCPHostInfo_lua.lua",
            Self::DhcpBasicCfg => "Localnet_LanMgrIpv4_DHCPBasicCfg_lua.lua",
        }
    }

    fn extra_params(self) -> &'static str {
        match self {
            Self::WanInternetStatus => "&TypeUplink=2&pageType=1",
            _ => "",
        }
    }

    /// `_type=menuData&_tag={tag}[&extra]&_={ts}`
    pub fn query(self, ts: i64) -> String {
        format!(
            "_type=menuData&_tag={}{}&_={ts}",
            self.tag(),
            self.extra_params()
        )
    }
}

/// Query for the login entry point (anonymous session token and form POST).
pub(crate) const LOGIN_ENTRY: &str = "_type=loginData&_tag=login_entry";

/// Query for the per-attempt login challenge token.
pub(crate) const LOGIN_TOKEN: &str = "_type=loginData&_tag=login_token";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_view_query_keeps_bare_cache_buster() {
        assert_eq!(
            MenuView::LocalNetStatus.query(1_700_000_000),
            "_type=menuView&_tag=localNetStatus&Menu3Location=0&_1700000000"
        );
    }

    #[test]
    fn menu_data_query_appends_timestamp() {
        assert_eq!(
            MenuData::LanClients.query(42),
            "_type=menuData&_tag=accessdev_landevs_lua.lua&_=42"
        );
    }

    #[test]
    fn wan_status_query_carries_uplink_params() {
        assert_eq!(
            MenuData::WanInternetStatus.query(7),
            "_type=menuData&_tag=wan_internetstatus_lua.lua&TypeUplink=2&pageType=1&_=7"
        );
    }
}
