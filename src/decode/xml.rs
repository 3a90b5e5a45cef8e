//! Shared XML helpers

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use std::io::Cursor;

/// Verify that `text` is a single well-formed XML element
pub fn check_well_formed(text: &str) -> Result<()> {
    let mut reader = Reader::from_str(text);
    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Ok(Event::Empty(_)) => {
                if depth == 0 {
                    roots += 1;
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Text(t)) if depth == 0 => {
                let text = t
                    .unescape()
                    .map_err(|e| Error::xml(format!("bad text at top level: {e}")))?;
                if !text.trim().is_empty() {
                    return Err(Error::xml(format!(
                        "text outside of the root element: '{}'",
                        text.trim()
                    )));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::xml(format!(
                    "at position {}: {e}",
                    reader.error_position()
                )))
            }
        }
    }

    if depth != 0 {
        return Err(Error::xml("unclosed element at end of document"));
    }
    match roots {
        1 => Ok(()),
        0 => Err(Error::xml("document has no root element")),
        n => Err(Error::xml(format!("document has {n} root elements"))),
    }
}

/// Re-indent an XML document for display
pub fn pretty_print(text: &str) -> Result<String> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    loop {
        match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => writer
                .write_event(event)
                .map_err(|e| Error::xml(format!("failed to write XML: {e}")))?,
            Err(e) => {
                return Err(Error::xml(format!(
                    "at position {}: {e}",
                    reader.error_position()
                )))
            }
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::xml(format!("output is not UTF-8: {e}")))
}
