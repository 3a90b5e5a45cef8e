//! Browse response decoder

use super::types::BrowseTable;
use crate::error::{Error, Result};
use crate::types::RawRow;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Decoder for browse (tabular report) responses
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowseDecoder;

impl BrowseDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a browse response into ordered raw rows
    pub fn decode(&self, body: &str) -> Result<Vec<RawRow>> {
        Ok(decode_browse(body)?.rows)
    }

    /// Decode a browse response, keeping the header labels
    pub fn decode_table(&self, body: &str) -> Result<BrowseTable> {
        decode_browse(body)
    }
}

/// Where the reader currently is inside the document
enum Section {
    Header,
    Row { cells: Vec<Option<String>> },
}

/// Parse a browse response.
///
/// A root carrying `result="0"` is reported as a remote failure with the
/// messages found in the document.
pub fn decode_browse(body: &str) -> Result<BrowseTable> {
    let mut reader = Reader::from_str(body);
    let mut table = BrowseTable::default();

    let mut depth = 0usize;
    let mut children = 0usize;
    let mut section: Option<Section> = None;
    let mut cell: Option<String> = None;
    let mut saw_root = false;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::xml(format!(
                "invalid browse response at position {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                match depth {
                    0 => {
                        saw_root = true;
                        check_result(&e, body)?;
                    }
                    1 => {
                        section = Some(open_section(children));
                        children += 1;
                    }
                    2 => match section.as_mut() {
                        Some(Section::Header) => table.columns.push(label_of(&e)?),
                        Some(Section::Row { .. }) => cell = Some(String::new()),
                        None => {}
                    },
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(e) => match depth {
                0 => {
                    saw_root = true;
                    check_result(&e, body)?;
                }
                1 => {
                    // An empty header or row contributes no cells
                    if let Section::Row { cells } = open_section(children) {
                        finish_row(&mut table, cells)?;
                    }
                    children += 1;
                }
                2 => match section.as_mut() {
                    Some(Section::Header) => table.columns.push(label_of(&e)?),
                    Some(Section::Row { cells }) => cells.push(None),
                    None => {}
                },
                _ => {}
            },
            Event::Text(t) if depth == 3 => {
                if let Some(text) = cell.as_mut() {
                    let value = t
                        .unescape()
                        .map_err(|e| Error::xml(format!("invalid cell text: {e}")))?;
                    text.push_str(&value);
                }
            }
            Event::CData(t) if depth == 3 => {
                if let Some(text) = cell.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    1 => {
                        if let Some(Section::Row { cells }) = section.take() {
                            finish_row(&mut table, cells)?;
                        }
                    }
                    2 => {
                        if let (Some(text), Some(Section::Row { cells })) =
                            (cell.take(), section.as_mut())
                        {
                            cells.push((!text.is_empty()).then_some(text));
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::xml("browse response is empty"));
    }
    Ok(table)
}

fn open_section(index: usize) -> Section {
    if index == 0 {
        Section::Header
    } else {
        Section::Row { cells: Vec::new() }
    }
}

/// Pair a row's cells with the header labels, dropping trailing extras
fn finish_row(table: &mut BrowseTable, cells: Vec<Option<String>>) -> Result<()> {
    if cells.len() < table.columns.len() {
        return Err(Error::xml(format!(
            "row {} has {} cells but the header has {} columns",
            table.rows.len() + 1,
            cells.len(),
            table.columns.len()
        )));
    }

    let row: RawRow = table.columns.iter().cloned().zip(cells).collect();
    table.rows.push(row);
    Ok(())
}

fn label_of(e: &BytesStart<'_>) -> Result<String> {
    Ok(attribute(e, "label")?.unwrap_or_default())
}

fn attribute(e: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    let attr = e
        .try_get_attribute(name)
        .map_err(|err| Error::xml(format!("invalid attribute '{name}': {err}")))?;
    match attr {
        Some(attr) => {
            let value = attr
                .unescape_value()
                .map_err(|err| Error::xml(format!("invalid attribute '{name}': {err}")))?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

/// Fail when the root reports `result="0"`
fn check_result(root: &BytesStart<'_>, body: &str) -> Result<()> {
    if attribute(root, "result")?.as_deref() != Some("0") {
        return Ok(());
    }

    let messages = collect_messages(body);
    if messages.is_empty() {
        Err(Error::remote("request was rejected without a message"))
    } else {
        Err(Error::remote(messages.join("; ")))
    }
}

/// Every non-empty `msg` attribute in the document
fn collect_messages(body: &str) -> Vec<String> {
    let mut reader = Reader::from_str(body);
    let mut messages = Vec::new();

    while let Ok(event) = reader.read_event() {
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if let Ok(Some(msg)) = attribute(&e, "msg") {
                    if !msg.is_empty() && !messages.contains(&msg) {
                        messages.push(msg);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    messages
}
