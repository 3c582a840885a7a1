//! Structural events extracted from markup.
//!
//! The extractor consumes a flat stream of [`StructuralEvent`]s rather than
//! markup text, so grammar handling can be tested against hand-built event
//! sequences. [`HtmlEvents`] is the production front-end: an iterator that
//! pulls events out of an HTML string.

use std::collections::VecDeque;

use quick_xml::events::Event;
use quick_xml::Reader;

/// One structural event in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuralEvent {
    /// An element opened.
    Enter {
        /// Lowercase tag name.
        tag: String,
        /// Attributes in document order.
        attributes: Vec<(String, String)>,
    },
    /// One run of character data, entity references resolved, adjacent
    /// chunks coalesced.
    Text(String),
    /// An element closed.
    Leave {
        /// Lowercase tag name.
        tag: String,
    },
}

impl StructuralEvent {
    /// Build an enter event.
    pub fn enter(tag: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        StructuralEvent::Enter {
            tag: tag.into(),
            attributes,
        }
    }

    /// Build a text event.
    pub fn text(content: impl Into<String>) -> Self {
        StructuralEvent::Text(content.into())
    }

    /// Build a leave event.
    pub fn leave(tag: impl Into<String>) -> Self {
        StructuralEvent::Leave { tag: tag.into() }
    }

    /// Attribute lookup on an enter event; `None` for other variants.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            StructuralEvent::Enter { attributes, .. } => attributes
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }
}

/// Elements that never carry content and are not closed in serialized HTML.
/// Each one is synthesized as enter-then-leave so depth tracking stays
/// aligned with the markup.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Iterator over structural events in an HTML string.
///
/// Permissive by contract: malformed markup never fails the stream. Void
/// elements are closed synthetically, unknown entity references pass through
/// verbatim, and a reader-level syntax error logs a warning and ends the
/// stream early with whatever was read so far.
pub struct HtmlEvents<'a> {
    reader: Reader<&'a [u8]>,
    queued: VecDeque<StructuralEvent>,
    text: String,
    done: bool,
}

impl<'a> HtmlEvents<'a> {
    /// Start reading events from an HTML string.
    pub fn new(html: &'a str) -> Self {
        let mut reader = Reader::from_str(html);
        // Serialized HTML is not well-formed XML. Mismatched and stray close
        // tags must come through as events, not reader errors.
        let config = reader.config_mut();
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.allow_dangling_amp = true;
        Self {
            reader,
            queued: VecDeque::new(),
            text: String::new(),
            done: false,
        }
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let content = std::mem::take(&mut self.text);
            self.queued.push_back(StructuralEvent::Text(content));
        }
    }

    fn enter_event(e: &quick_xml::events::BytesStart<'_>) -> StructuralEvent {
        let tag = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.as_ref()).to_lowercase(),
                    String::from_utf8_lossy(&attr.value).into_owned(),
                )
            })
            .collect();
        StructuralEvent::Enter { tag, attributes }
    }

    /// Pull reader events until at least one structural event is queued or
    /// the input ends.
    fn fill(&mut self) {
        while self.queued.is_empty() && !self.done {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.flush_text();
                    let event = Self::enter_event(&e);
                    let tag = match &event {
                        StructuralEvent::Enter { tag, .. } => tag.clone(),
                        _ => unreachable!(),
                    };
                    self.queued.push_back(event);
                    // Serialized HTML leaves void elements unclosed.
                    if is_void(&tag) {
                        self.queued.push_back(StructuralEvent::Leave { tag });
                    }
                }
                Ok(Event::Empty(e)) => {
                    self.flush_text();
                    let event = Self::enter_event(&e);
                    let tag = match &event {
                        StructuralEvent::Enter { tag, .. } => tag.clone(),
                        _ => unreachable!(),
                    };
                    self.queued.push_back(event);
                    self.queued.push_back(StructuralEvent::Leave { tag });
                }
                Ok(Event::End(e)) => {
                    let tag = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                    // The synthetic leave already went out for these.
                    if !is_void(&tag) {
                        self.flush_text();
                        self.queued.push_back(StructuralEvent::Leave { tag });
                    }
                }
                Ok(Event::Text(e)) => {
                    self.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
                Ok(Event::CData(e)) => {
                    self.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
                Ok(Event::GeneralRef(e)) => {
                    let entity = String::from_utf8_lossy(e.as_ref()).into_owned();
                    match resolve_entity(&entity) {
                        Some(resolved) => self.text.push_str(&resolved),
                        None => {
                            // Keep unknown references verbatim; the text
                            // fields carry raw HTML anyway.
                            self.text.push('&');
                            self.text.push_str(&entity);
                            self.text.push(';');
                        }
                    }
                }
                Ok(Event::Eof) => {
                    self.flush_text();
                    self.done = true;
                }
                Ok(_) => {}
                Err(e) => {
                    log::warn!("markup error at byte {}: {e}", self.reader.buffer_position());
                    self.flush_text();
                    self.done = true;
                }
            }
        }
    }
}

impl Iterator for HtmlEvents<'_> {
    type Item = StructuralEvent;

    fn next(&mut self) -> Option<StructuralEvent> {
        if self.queued.is_empty() {
            self.fill();
        }
        self.queued.pop_front()
    }
}

/// Resolve an entity reference to its character data.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        "nbsp" => return Some("\u{a0}".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16) {
            return char::from_u32(code).map(|c| c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#') {
        if let Ok(code) = dec.parse::<u32>() {
            return char::from_u32(code).map(|c| c.to_string());
        }
    }

    None
}
