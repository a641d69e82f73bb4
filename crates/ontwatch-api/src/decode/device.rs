use crate::error::Error;
use crate::markup::Envelope;
use crate::models::DeviceInfo;
use crate::resource::{MenuData, MenuView};
use crate::session::Session;

const DEVINFO: &str = "OBJ_DEVINFO_ID";
const CPU_MEM_USAGE: &str = "OBJ_CPUMEMUSAGE_ID";
const POWER_ON_TIME: &str = "OBJ_POWERONTIME_ID";

/// Decode the device status page.
///
/// Identity, usage and uptime come from three single-instance sections.
/// The page omits `IF_ERRORSTR` on success, so only an explicit failure is
/// rejected.
pub fn decode_device_info(envelope: &Envelope) -> Result<DeviceInfo, Error> {
    envelope.ensure_not_failed()?;

    let ident = envelope.first_instance(DEVINFO).paired();
    let usage = envelope.first_instance(CPU_MEM_USAGE).paired();
    let power = envelope.first_instance(POWER_ON_TIME).paired();

    Ok(DeviceInfo {
        manufacturer: ident.text("ManuFacturer"),
        manufacturer_oui: ident.text("ManuFacturerOui"),
        version_date: ident.text("VerDate"),
        boot_version: ident.text("BootVer"),
        software_version: ident.text("SoftwareVer"),
        software_version_extended: ident.text("SoftwareVerExtent"),
        serial_number: ident.text("SerialNumber"),
        model: ident.text("ModelName"),
        hardware_version: ident.text("HardwareVer"),
        cpu_usage: [
            usage.int("CpuUsage1"),
            usage.int("CpuUsage2"),
            usage.int("CpuUsage3"),
            usage.int("CpuUsage4"),
        ],
        memory_usage: usage.int("MemUsage"),
        uptime: power.int("PowerOnTime"),
    })
}

impl Session {
    /// Load device identity, CPU/memory usage and uptime.
    pub async fn load_device_info(&self) -> Result<DeviceInfo, Error> {
        self.warm_up(MenuView::StatusMgr).await;
        let envelope = self.fetch(MenuData::DeviceInfo).await?;
        decode_device_info(&envelope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::markup::ResultStatus;

    const STATUS_PAGE: &str = r"<ajax_response_xml_root>
<OBJ_DEVINFO_ID><Instance>
<ParaName>ManuFacturer</ParaName><ParaValue>ZTE</ParaValue>
<ParaName>ModelName</ParaName><ParaValue>F670L</ParaValue>
<ParaName>SerialNumber</ParaName><ParaValue>ZTEG12345678</ParaValue>
<ParaName>SoftwareVer</ParaName><ParaValue>V9.0.11P1N12</ParaValue>
</Instance></OBJ_DEVINFO_ID>
<OBJ_CPUMEMUSAGE_ID><Instance>
<ParaName>CpuUsage1</ParaName><ParaValue>12</ParaValue>
<ParaName>CpuUsage2</ParaName><ParaValue>7</ParaValue>
<ParaName>CpuUsage3</ParaName><ParaValue>n/a</ParaValue>
<ParaName>MemUsage</ParaName><ParaValue>48</ParaValue>
</Instance></OBJ_CPUMEMUSAGE_ID>
<OBJ_POWERONTIME_ID><Instance>
<ParaName>PowerOnTime</ParaName><ParaValue>86400</ParaValue>
</Instance></OBJ_POWERONTIME_ID>
</ajax_response_xml_root>";

    #[test]
    fn decodes_all_three_sections() {
        let env = Envelope::parse(STATUS_PAGE.as_bytes()).unwrap();
        let info = decode_device_info(&env).unwrap();
        assert_eq!(
            info,
            DeviceInfo {
                manufacturer: "ZTE".into(),
                model: "F670L".into(),
                serial_number: "ZTEG12345678".into(),
                software_version: "V9.0.11P1N12".into(),
                cpu_usage: [12, 7, 0, 0],
                memory_usage: 48,
                uptime: 86400,
                ..DeviceInfo::default()
            }
        );
    }

    #[test]
    fn only_one_known_field_leaves_the_rest_zero() {
        let body = "<ajax_response_xml_root><OBJ_POWERONTIME_ID><Instance>\
                    <ParaName>PowerOnTime</ParaName><ParaValue>5</ParaValue>\
                    </Instance></OBJ_POWERONTIME_ID></ajax_response_xml_root>";
        let info = decode_device_info(&Envelope::parse(body.as_bytes()).unwrap()).unwrap();
        assert_eq!(
            info,
            DeviceInfo {
                uptime: 5,
                ..DeviceInfo::default()
            }
        );
    }

    #[test]
    fn explicit_failure_is_rejected() {
        let body = "<ajax_response_xml_root><IF_ERRORSTR>SessionTimeout</IF_ERRORSTR></ajax_response_xml_root>";
        let err = decode_device_info(&Envelope::parse(body.as_bytes()).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::Appliance {
                status: ResultStatus::SessionTimeout
            }
        ));
    }
}
