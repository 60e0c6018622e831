//! Streaming element reader
//!
//! Wraps a `quick_xml` pull parser and pushes one [`RawElement`] per opened
//! element to a callback. The event buffer and the element are reused, so
//! memory stays bounded by the longest single tag regardless of input size.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::error::{IngestError, IngestResult};
use crate::health::RawElement;

/// Streaming reader producing tag-open events
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    element: RawElement,
    depth: usize,
    seen_root: bool,
}

impl<R: BufRead> ElementReader<R> {
    /// Create a reader over a buffered byte stream
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.trim_text(true);
        reader.check_end_names(true);

        Self {
            reader,
            buf: Vec::with_capacity(4 * 1024),
            element: RawElement::default(),
            depth: 0,
            seen_root: false,
        }
    }

    /// Drive the whole document, handing each opened element to `handle`
    ///
    /// Each element is fully handled before the next byte is read.
    /// Returns the number of elements seen.
    pub fn for_each_element<F>(mut self, mut handle: F) -> IngestResult<u64>
    where
        F: FnMut(&RawElement),
    {
        let mut count = 0u64;
        while self.advance()? {
            count += 1;
            handle(&self.element);
        }
        Ok(count)
    }

    /// Read until the next opened element; `false` at end of document
    fn advance(&mut self) -> IngestResult<bool> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(IngestError::malformed(
                        self.reader.buffer_position() as u64,
                        e.to_string(),
                    ))
                }
            };
            let position = self.reader.buffer_position() as u64;

            match event {
                Event::Start(start) => {
                    open_root(&mut self.seen_root, self.depth, position)?;
                    self.depth += 1;
                    fill_element(&mut self.element, &start, position)?;
                    return Ok(true);
                }
                Event::Empty(start) => {
                    open_root(&mut self.seen_root, self.depth, position)?;
                    fill_element(&mut self.element, &start, position)?;
                    return Ok(true);
                }
                Event::End(_) => {
                    self.depth = self.depth.checked_sub(1).ok_or_else(|| {
                        IngestError::malformed(position, "closing tag without matching open tag")
                    })?;
                }
                Event::Text(_) | Event::CData(_) if self.depth == 0 => {
                    return Err(IngestError::malformed(
                        position,
                        "character data outside the root element",
                    ));
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(IngestError::malformed(
                            position,
                            format!("unexpected end of input with {} unclosed element(s)", self.depth),
                        ));
                    }
                    if !self.seen_root {
                        return Err(IngestError::malformed(position, "document has no root element"));
                    }
                    return Ok(false);
                }
                // Declarations, DTD, comments, processing instructions, nested text
                _ => {}
            }
        }
    }
}

/// Reject a second top-level element
fn open_root(seen_root: &mut bool, depth: usize, position: u64) -> IngestResult<()> {
    if depth == 0 {
        if *seen_root {
            return Err(IngestError::malformed(position, "multiple root elements"));
        }
        *seen_root = true;
    }
    Ok(())
}

fn fill_element(element: &mut RawElement, start: &BytesStart<'_>, position: u64) -> IngestResult<()> {
    element.clear();

    let local = start.local_name();
    let name = std::str::from_utf8(local.as_ref())
        .map_err(|e| IngestError::malformed(position, e.to_string()))?;
    element.name.push_str(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| IngestError::malformed(position, e.to_string()))?;
        let key = attr.key.local_name();
        let key = std::str::from_utf8(key.as_ref())
            .map_err(|e| IngestError::malformed(position, e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| IngestError::malformed(position, e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(())
}
