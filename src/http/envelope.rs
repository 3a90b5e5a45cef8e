//! Envelope construction and parsing

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

/// Namespace of every operation of the remote web services
pub const SERVICE_NAMESPACE: &str = "http://www.twinfield.com/";

/// The SOAP operations used by the tap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapAction {
    Logon,
    SelectCompany,
    Abandon,
    ProcessXmlString,
}

impl SoapAction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Logon => "Logon",
            Self::SelectCompany => "SelectCompany",
            Self::Abandon => "Abandon",
            Self::ProcessXmlString => "ProcessXmlString",
        }
    }

    /// Value of the `SOAPAction` header, quoted
    pub fn header_value(self) -> String {
        format!("\"{}{}\"", SERVICE_NAMESPACE, self.name())
    }

    /// Element carrying the operation's result in the response body
    pub fn result_element(self) -> String {
        format!("{}Result", self.name())
    }
}

/// Build a SOAP 1.1 envelope for `action` with the given parameters.
///
/// Parameter values are escaped. `session_id` adds the session header.
pub fn build(action: SoapAction, params: &[(&str, &str)], session_id: Option<&str>) -> String {
    let mut out = String::from(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">"#,
    );

    if let Some(id) = session_id {
        out.push_str(&format!(
            r#"<soap:Header><Header xmlns="{SERVICE_NAMESPACE}"><SessionID>{}</SessionID></Header></soap:Header>"#,
            escape(id)
        ));
    }

    out.push_str("<soap:Body>");
    if params.is_empty() {
        out.push_str(&format!(
            r#"<{} xmlns="{SERVICE_NAMESPACE}" />"#,
            action.name()
        ));
    } else {
        out.push_str(&format!(r#"<{} xmlns="{SERVICE_NAMESPACE}">"#, action.name()));
        for (name, value) in params {
            out.push_str(&format!("<{name}>{}</{name}>", escape(*value)));
        }
        out.push_str(&format!("</{}>", action.name()));
    }
    out.push_str("</soap:Body></soap:Envelope>");
    out
}

/// Text of the first element whose local name is `local_name`.
///
/// Entities are resolved, so an escaped XML payload comes back as XML.
/// An empty element yields `Some("")`.
pub fn find_element_text(xml: &str, local_name: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    let target = local_name.as_bytes();
    let mut depth_in_target = 0usize;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if depth_in_target > 0 {
                    depth_in_target += 1;
                } else if e.local_name().as_ref() == target {
                    depth_in_target = 1;
                }
            }
            Ok(Event::Empty(e)) => {
                if depth_in_target == 0 && e.local_name().as_ref() == target {
                    return Ok(Some(String::new()));
                }
            }
            Ok(Event::Text(t)) if depth_in_target > 0 => {
                let value = t
                    .unescape()
                    .map_err(|e| Error::xml(format!("bad text in <{local_name}>: {e}")))?;
                text.push_str(&value);
            }
            Ok(Event::CData(c)) if depth_in_target > 0 => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) if depth_in_target > 0 => {
                depth_in_target -= 1;
                if depth_in_target == 0 {
                    return Ok(Some(text));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(Error::xml(format!(
                    "malformed envelope at position {}: {e}",
                    reader.error_position()
                )))
            }
        }
    }
}

/// The `faultstring` of a SOAP fault, if the envelope carries one
pub fn find_fault(xml: &str) -> Result<Option<String>> {
    if find_element_text(xml, "Fault")?.is_none() {
        return Ok(None);
    }
    let message = find_element_text(xml, "faultstring")?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown fault".to_string());
    Ok(Some(message))
}
