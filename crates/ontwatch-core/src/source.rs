// ── Telemetry source ──
//
// The fetch side of a collection cycle. `ontwatch_api::Session` is the real
// implementation; tests substitute scripted sources.

use std::future::Future;

use tracing::debug;

use ontwatch_api::{
    DeviceInfo, DhcpLease, DhcpServerSettings, InterfaceCounters, LanClient, MenuView, Session,
    WanStatus, WifiAccessPoint, WifiClient,
};

use crate::config::ExporterConfig;
use crate::error::CoreError;

/// One fetch-and-decode operation per telemetry domain.
pub trait TelemetrySource: Send + Sync {
    fn device_info(&self) -> impl Future<Output = Result<DeviceInfo, CoreError>> + Send;

    fn interface_counters(
        &self,
    ) -> impl Future<Output = Result<InterfaceCounters, CoreError>> + Send;

    /// Open the WAN status page so later WAN data calls see fresh state.
    fn prime_wan_status(&self) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn wifi_clients(&self) -> impl Future<Output = Result<Vec<WifiClient>, CoreError>> + Send;

    fn lan_clients(&self) -> impl Future<Output = Result<Vec<LanClient>, CoreError>> + Send;

    fn wan_status(&self) -> impl Future<Output = Result<WanStatus, CoreError>> + Send;

    fn access_points(
        &self,
    ) -> impl Future<Output = Result<Vec<WifiAccessPoint>, CoreError>> + Send;

    fn dhcp_leases(&self) -> impl Future<Output = Result<Vec<DhcpLease>, CoreError>> + Send;

    fn dhcp_settings(
        &self,
    ) -> impl Future<Output = Result<DhcpServerSettings, CoreError>> + Send;
}

impl TelemetrySource for Session {
    async fn device_info(&self) -> Result<DeviceInfo, CoreError> {
        Ok(self.load_device_info().await?)
    }

    async fn interface_counters(&self) -> Result<InterfaceCounters, CoreError> {
        Ok(self.load_interface_counters().await?)
    }

    async fn prime_wan_status(&self) -> Result<(), CoreError> {
        Ok(self.view(MenuView::EthWanStatus).await?)
    }

    async fn wifi_clients(&self) -> Result<Vec<WifiClient>, CoreError> {
        Ok(self.load_wifi_clients().await?)
    }

    async fn lan_clients(&self) -> Result<Vec<LanClient>, CoreError> {
        Ok(self.load_lan_clients().await?)
    }

    async fn wan_status(&self) -> Result<WanStatus, CoreError> {
        Ok(self.load_wan_status().await?)
    }

    async fn access_points(&self) -> Result<Vec<WifiAccessPoint>, CoreError> {
        Ok(self.load_access_points().await?)
    }

    async fn dhcp_leases(&self) -> Result<Vec<DhcpLease>, CoreError> {
        Ok(self.load_dhcp_leases().await?)
    }

    async fn dhcp_settings(&self) -> Result<DhcpServerSettings, CoreError> {
        Ok(self.load_dhcp_settings().await?)
    }
}

/// Log in to the configured appliance.
pub async fn connect(config: &ExporterConfig) -> Result<Session, CoreError> {
    let session = Session::login(
        config.endpoint.clone(),
        &config.username,
        &config.password,
        &config.transport(),
    )
    .await?;
    debug!(token_len = session.session_token().len(), "session established");
    Ok(session)
}
