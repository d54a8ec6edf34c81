//! Redirect-list (ASX playlist) parsing.
//!
//! ASX files are loosely written XML: element and attribute names vary in
//! case and hrefs often carry bare `&` characters. Only the first reference
//! element with an `href` is consulted.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

const REFERENCE_ELEMENT: &[u8] = b"ref";
const HREF_ATTRIBUTE: &[u8] = b"href";

/// Returns the `href` of the first reference element in `document`.
///
/// Reference elements without an `href` are skipped. Returns `Ok(None)`
/// when the document has no usable reference element.
///
/// # Errors
///
/// Returns the XML reader error when the document is not parseable.
pub(crate) fn first_reference_href(document: &str) -> Result<Option<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(document);
    reader.config_mut().check_end_names = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element) => {
                if element
                    .local_name()
                    .as_ref()
                    .eq_ignore_ascii_case(REFERENCE_ELEMENT)
                    && let Some(href) = href_attribute(&element)?
                {
                    return Ok(Some(href));
                }
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn href_attribute(element: &BytesStart<'_>) -> Result<Option<String>, quick_xml::Error> {
    for attribute in element.attributes() {
        let attribute = attribute?;
        if !attribute
            .key
            .local_name()
            .as_ref()
            .eq_ignore_ascii_case(HREF_ATTRIBUTE)
        {
            continue;
        }
        // Unescaping fails on bare '&' in query strings; keep the raw value then.
        let value = attribute.unescape_value().map_or_else(
            |_| String::from_utf8_lossy(&attribute.value).into_owned(),
            std::borrow::Cow::into_owned,
        );
        let value = value.trim();
        if !value.is_empty() {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}
