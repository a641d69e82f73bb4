use crate::error::Error;
use crate::markup::Envelope;
use crate::models::WanStatus;
use crate::resource::{MenuData, MenuView};
use crate::session::Session;

// Section name as spelled by the firmware.
const WAN_CONFIG: &str = "ID_WAN_COMFIG";

/// Decode the active WAN connection's parameters.
pub fn decode_wan_status(envelope: &Envelope) -> Result<WanStatus, Error> {
    envelope.ensure_success()?;
    let m = envelope.first_instance(WAN_CONFIG).paired();

    Ok(WanStatus {
        conn_trigger: m.text("ConnTrigger"),
        uptime: m.int("UpTime"),
        is_nat: m.int("IsNAT"),
        username: m.text("UserName"),
        conn_error: m.text("ConnError"),
        xdsl_mode: m.text("xdslMode"),
        wan_type: m.text("wantype"),
        wan_cname: m.text("WANCName"),
        ip_mode: m.text("IpMode"),
        trans_type: m.text("TransType"),
        pppoe_service_name: m.text("PPPoeServiceName"),
        mode: m.text("mode"),
        uplink: m.int("uplink"),
        page_type: m.int("pageType"),
        vlan_enable: m.int("VlanEnable"),
        str_serv_list: m.text("StrServList"),
        conn_status6: m.text("ConnStatus6"),
        inst_id: m.text("_InstID"),
        enable: m.int("Enable"),
        dscp: m.int("DSCP"),
        priority: m.int("Priority"),
        vlan_id: m.int("VLANID"),
        subnet_mask: m.text("SubnetMask"),
        auth_type: m.text("AuthType"),
        mtu: m.int("MTU"),
        dns1: m.text("DNS1"),
        dns3: m.text("DNS3"),
        gateway: m.text("GateWay"),
        work_if_mac: m.text("WorkIFMac"),
        serv_list: m.text("ServList"),
        link_mode: m.text("linkMode"),
        is_def_gw: m.int("IsDefGW"),
        password: m.text("Password").into(),
        ip_address: m.text("IPAddress"),
        dns2: m.text("DNS2"),
        enable_pass_through: m.int("EnablePassThrough"),
        conn_status: m.text("ConnStatus"),
    })
}

impl Session {
    /// Load the WAN internet status page.
    pub async fn load_wan_status(&self) -> Result<WanStatus, Error> {
        self.warm_up(MenuView::EthWanStatus).await;
        let envelope = self.fetch(MenuData::WanInternetStatus).await?;
        decode_wan_status(&envelope)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::markup::ResultStatus;

    const WAN_PAGE: &str = r"<ajax_response_xml_root>
<IF_ERRORSTR>SUCC</IF_ERRORSTR>
<ID_WAN_COMFIG><Instance>
<ParaName>WANCName</ParaName><ParaValue>omci_ipv4_pppoe_1</ParaValue>
<ParaName>UpTime</ParaName><ParaValue>3600</ParaValue>
<ParaName>MTU</ParaName><ParaValue>1492</ParaValue>
<ParaName>UserName</ParaName><ParaValue>subscriber@isp</ParaValue>
<ParaName>Password</ParaName><ParaValue>hunter2</ParaValue>
<ParaName>ConnStatus</ParaName><ParaValue>Connected</ParaValue>
<ParaName>VLANID</ParaName><ParaValue>abc</ParaValue>
<ParaName>FutureField</ParaName><ParaValue>x</ParaValue>
</Instance></ID_WAN_COMFIG>
</ajax_response_xml_root>";

    #[test]
    fn decodes_connection_parameters() {
        let wan = decode_wan_status(&Envelope::parse(WAN_PAGE.as_bytes()).unwrap()).unwrap();
        assert_eq!(wan.wan_cname, "omci_ipv4_pppoe_1");
        assert_eq!(wan.uptime, 3600);
        assert_eq!(wan.mtu, 1492);
        assert_eq!(wan.conn_status, "Connected");
        assert_eq!(wan.vlan_id, 0);
        assert_eq!(wan.gateway, "");
        assert_eq!(wan.username, "subscriber@isp");
        assert_eq!(wan.password.expose_secret(), "hunter2");
    }

    #[test]
    fn credentials_are_not_serialized() {
        let wan = decode_wan_status(&Envelope::parse(WAN_PAGE.as_bytes()).unwrap()).unwrap();
        let json = serde_json::to_value(&wan).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("username").is_none());
        assert!(!json.to_string().contains("hunter2"));
        assert!(!format!("{wan:?}").contains("hunter2"));
    }

    #[test]
    fn absent_status_is_rejected() {
        let body = "<ajax_response_xml_root><ID_WAN_COMFIG/></ajax_response_xml_root>";
        let err = decode_wan_status(&Envelope::parse(body.as_bytes()).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::Appliance {
                status: ResultStatus::Unreported
            }
        ));
    }
}
