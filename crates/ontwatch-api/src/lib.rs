// ontwatch-api: Session-authenticated client for ONT web-management interfaces
//
// The appliance has no structured API. Telemetry is scraped by replaying the
// AJAX calls its web UI issues and decoding the loosely-typed markup that
// comes back into typed records.

pub mod decode;
pub mod error;
pub mod markup;
pub mod models;
pub mod resource;
pub mod session;
pub mod transport;

pub use error::Error;
pub use markup::{Envelope, FieldMap, ResultStatus};
pub use models::{
    DeviceInfo, DhcpLease, DhcpServerSettings, Duplex, InterfaceCounters, LanClient, LinkSpeed,
    Redacted, WanStatus, WifiAccessPoint, WifiClient,
};
pub use resource::{MenuData, MenuView};
pub use session::Session;
pub use transport::TransportConfig;
