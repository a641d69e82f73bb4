// Markup normalizer
//
// Parses the appliance's `ajax_response_xml_root` envelope into an ordered
// list of sections, each holding its repeated `Instance` blocks as raw tagged
// tokens. Turning those tokens into field maps is left to `pairing`, because
// different endpoints encode name/value pairs differently.
//
//   <ajax_response_xml_root>
//     <IF_ERRORSTR>SUCC</IF_ERRORSTR>
//     <OBJ_ACCESSDEV_ID>
//       <Instance>
//         <ParaName>HostName</ParaName><ParaValue>laptop</ParaValue>
//       </Instance>
//     </OBJ_ACCESSDEV_ID>
//   </ajax_response_xml_root>

mod pairing;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use quick_xml::events::{BytesText, Event};
use quick_xml::reader::Reader;
use serde::Serialize;

use crate::error::Error;

pub use pairing::{FieldMap, Token, TokenKind, interleaved, paired};

/// Root element of every data reply.
pub const ROOT_ELEMENT: &str = "ajax_response_xml_root";

const STATUS_FIELD: &str = "IF_ERRORSTR";
const INSTANCE_ELEMENT: &str = "Instance";

// ── ResultStatus ─────────────────────────────────────────────────────

/// Envelope-level outcome reported by the appliance in `IF_ERRORSTR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ResultStatus {
    /// `SUCC`
    Success,
    /// `SessionTimeout`: the cookie session is no longer valid.
    SessionTimeout,
    /// Any other machine-readable failure reason.
    Failed(String),
    /// The envelope carried no status at all.
    Unreported,
}

impl ResultStatus {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Self::Unreported,
            Some("SUCC") => Self::Success,
            Some("SessionTimeout") => Self::SessionTimeout,
            Some(other) => Self::Failed(other.to_owned()),
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCC"),
            Self::SessionTimeout => f.write_str("SessionTimeout"),
            Self::Failed(reason) => f.write_str(reason),
            Self::Unreported => f.write_str("no status"),
        }
    }
}

// ── Envelope ─────────────────────────────────────────────────────────

/// One repeated record unit, kept as its raw ordered child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Instance {
    tokens: Vec<Token>,
}

impl Instance {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Every `ParaName` text, in document order.
    pub fn names(&self) -> Vec<&str> {
        self.texts_of(TokenKind::Name)
    }

    /// Every `ParaValue` text, in document order.
    pub fn values(&self) -> Vec<&str> {
        self.texts_of(TokenKind::Value)
    }

    fn texts_of(&self, kind: TokenKind) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.text.as_str())
            .collect()
    }

    /// Decode with positional pairing of the name and value lists.
    pub fn paired(&self) -> FieldMap {
        paired(&self.names(), &self.values())
    }

    /// Decode with the name→value pending-key state machine.
    pub fn interleaved(&self) -> FieldMap {
        interleaved(self.tokens.iter())
    }
}

/// A top-level child of the envelope root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Section {
    instances: Vec<Instance>,
}

/// A parsed appliance reply.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    status: Option<String>,
    /// Text of leaf elements directly below the root (`IF_ERRORID`, ...).
    fields: HashMap<String, String>,
    sections: HashMap<String, Section>,
    /// Character data directly inside the root element.
    text: String,
}

impl Envelope {
    /// Parse a raw reply body.
    ///
    /// Fails with [`Error::Protocol`] on malformed markup, a missing root, or
    /// a root element other than `ajax_response_xml_root` (the appliance
    /// answers stale sessions with an HTML login page).
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        Parser::default().run(body)
    }

    pub fn status(&self) -> ResultStatus {
        ResultStatus::from_raw(self.status.as_deref())
    }

    /// Fail unless the appliance explicitly reported `SUCC`.
    pub fn ensure_success(&self) -> Result<(), Error> {
        match self.status() {
            ResultStatus::Success => Ok(()),
            status => Err(Error::Appliance { status }),
        }
    }

    /// Fail only if the appliance explicitly reported a non-success status.
    ///
    /// Some pages never fill `IF_ERRORSTR` on success.
    pub fn ensure_not_failed(&self) -> Result<(), Error> {
        match self.status() {
            ResultStatus::Success | ResultStatus::Unreported => Ok(()),
            status => Err(Error::Appliance { status }),
        }
    }

    /// Text of a leaf element directly below the root.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Trimmed character data of the root element itself.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Instance blocks of a section, in document order. Empty if absent.
    pub fn instances(&self, section: &str) -> &[Instance] {
        self.sections
            .get(section)
            .map_or(&[][..], |s| s.instances.as_slice())
    }

    /// Positionally paired field maps, one per instance.
    pub fn paired_records(&self, section: &str) -> Vec<FieldMap> {
        self.instances(section).iter().map(Instance::paired).collect()
    }

    /// State-machine paired field maps, one per instance.
    pub fn interleaved_records(&self, section: &str) -> Vec<FieldMap> {
        self.instances(section)
            .iter()
            .map(Instance::interleaved)
            .collect()
    }

    /// First instance of a single-instance section, or an empty instance.
    pub fn first_instance(&self, section: &str) -> Cow<'_, Instance> {
        self.instances(section)
            .first()
            .map_or_else(|| Cow::Owned(Instance::default()), Cow::Borrowed)
    }
}

// ── Parser ───────────────────────────────────────────────────────────

/// Depth-tracking event consumer.
///
/// Depth 1 is the root, depth 2 a section or status field, depth 3 an
/// `Instance`, depth 4 a `ParaName`/`ParaValue` (or unrelated) token.
#[derive(Default)]
struct Parser {
    envelope: Envelope,
    depth: usize,
    root_seen: bool,
    top_name: String,
    top_text: String,
    top_has_children: bool,
    instance: Option<Instance>,
    token: Option<Token>,
}

impl Parser {
    fn run(mut self, body: &[u8]) -> Result<Envelope, Error> {
        let mut reader = Reader::from_reader(body);
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                Error::protocol(
                    format!("malformed markup at byte {}: {e}", reader.buffer_position()),
                    body,
                )
            })?;

            match event {
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    self.open(&name, body)?;
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    self.open(&name, body)?;
                    self.close();
                }
                Event::End(_) => self.close(),
                Event::Text(t) => self.text(&unescape_lossy(&t)),
                Event::CData(c) => self.text(&String::from_utf8_lossy(&c.into_inner())),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !self.root_seen {
            return Err(Error::protocol("empty reply: no root element", body));
        }
        Ok(self.envelope)
    }

    fn open(&mut self, name: &str, body: &[u8]) -> Result<(), Error> {
        match self.depth {
            0 => {
                if self.root_seen {
                    return Err(Error::protocol("multiple root elements", body));
                }
                if name != ROOT_ELEMENT {
                    return Err(Error::protocol(
                        format!("expected <{ROOT_ELEMENT}>, found <{name}>"),
                        body,
                    ));
                }
                self.root_seen = true;
            }
            1 => {
                self.top_name = name.to_owned();
                self.top_text.clear();
                self.top_has_children = false;
            }
            2 => {
                self.top_has_children = true;
                if name == INSTANCE_ELEMENT {
                    self.instance = Some(Instance::default());
                }
            }
            3 => {
                if self.instance.is_some() {
                    self.token = Some(Token::new(TokenKind::from_tag(name), String::new()));
                }
            }
            _ => {}
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        match self.depth {
            1 => {
                let name = std::mem::take(&mut self.top_name);
                let text = std::mem::take(&mut self.top_text);
                if self.top_has_children {
                    self.envelope.sections.entry(name).or_default();
                } else {
                    if name == STATUS_FIELD {
                        self.envelope.status = Some(text.clone());
                    }
                    self.envelope.fields.insert(name, text);
                }
            }
            2 => {
                if let Some(instance) = self.instance.take() {
                    self.envelope
                        .sections
                        .entry(self.top_name.clone())
                        .or_default()
                        .instances
                        .push(instance);
                }
            }
            3 => {
                if let (Some(instance), Some(token)) = (self.instance.as_mut(), self.token.take()) {
                    instance.tokens.push(token);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        match self.depth {
            1 => self.envelope.text.push_str(text),
            2 => self.top_text.push_str(text),
            4 => {
                if let Some(token) = self.token.as_mut() {
                    token.text.push_str(text);
                }
            }
            _ => {}
        }
    }
}

/// Resolve entities; fall back to the raw text for entities XML doesn't
/// define (the firmware occasionally emits HTML ones).
fn unescape_lossy(text: &BytesText<'_>) -> String {
    text.unescape().map_or_else(
        |_| String::from_utf8_lossy(text).into_owned(),
        Cow::into_owned,
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LAN_CLIENTS: &str = r"<ajax_response_xml_root>
<IF_ERRORSTR>SUCC</IF_ERRORSTR>
<IF_ERRORID>0</IF_ERRORID>
<OBJ_ACCESSDEV_ID>
<Instance>
<ParaName>HostName</ParaName><ParaValue>laptop</ParaValue>
<ParaName>MACAddress</ParaName><ParaValue>aa:bb:cc:dd:ee:01</ParaValue>
</Instance>
<Instance>
<ParaName>HostName</ParaName><ParaValue>printer &amp; scanner</ParaValue>
</Instance>
</OBJ_ACCESSDEV_ID>
</ajax_response_xml_root>";

    #[test]
    fn parses_status_fields_and_sections() {
        let env = Envelope::parse(LAN_CLIENTS.as_bytes()).unwrap();
        assert_eq!(env.status(), ResultStatus::Success);
        assert_eq!(env.field("IF_ERRORID"), Some("0"));
        assert_eq!(env.instances("OBJ_ACCESSDEV_ID").len(), 2);

        let records = env.paired_records("OBJ_ACCESSDEV_ID");
        assert_eq!(records[0].text("HostName"), "laptop");
        assert_eq!(records[0].text("MACAddress"), "aa:bb:cc:dd:ee:01");
        assert_eq!(records[1].text("HostName"), "printer & scanner");
    }

    #[test]
    fn missing_section_yields_no_instances() {
        let env = Envelope::parse(LAN_CLIENTS.as_bytes()).unwrap();
        assert!(env.instances("OBJ_NOPE_ID").is_empty());
        assert!(env.first_instance("OBJ_NOPE_ID").tokens().is_empty());
    }

    #[test]
    fn session_timeout_is_distinguished() {
        let body = "<ajax_response_xml_root><IF_ERRORSTR>SessionTimeout</IF_ERRORSTR></ajax_response_xml_root>";
        let env = Envelope::parse(body.as_bytes()).unwrap();
        assert_eq!(env.status(), ResultStatus::SessionTimeout);
        assert!(env.ensure_success().unwrap_err().is_session_timeout());
        assert!(env.ensure_not_failed().is_err());
    }

    #[test]
    fn absent_status_passes_lenient_check_only() {
        let body = "<ajax_response_xml_root><OBJ_X_ID/></ajax_response_xml_root>";
        let env = Envelope::parse(body.as_bytes()).unwrap();
        assert_eq!(env.status(), ResultStatus::Unreported);
        assert!(env.ensure_not_failed().is_ok());
        assert!(matches!(
            env.ensure_success(),
            Err(Error::Appliance {
                status: ResultStatus::Unreported
            })
        ));
    }

    #[test]
    fn root_text_carries_login_token() {
        let env = Envelope::parse(b"<ajax_response_xml_root> 83920174 </ajax_response_xml_root>")
            .unwrap();
        assert_eq!(env.text(), "83920174");
    }

    #[test]
    fn html_login_page_is_a_protocol_error() {
        let err = Envelope::parse(b"<html><body>login</body></html>").unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[test]
    fn empty_body_is_a_protocol_error() {
        assert!(matches!(
            Envelope::parse(b""),
            Err(Error::Protocol { .. })
        ));
    }

    #[test]
    fn self_closing_value_is_an_empty_string() {
        let body = "<ajax_response_xml_root><OBJ_X_ID><Instance>\
                    <ParaName>IPV6Address</ParaName><ParaValue/>\
                    </Instance></OBJ_X_ID></ajax_response_xml_root>";
        let env = Envelope::parse(body.as_bytes()).unwrap();
        let rec = &env.paired_records("OBJ_X_ID")[0];
        assert!(rec.contains("IPV6Address"));
        assert_eq!(rec.text("IPV6Address"), "");
    }
}
