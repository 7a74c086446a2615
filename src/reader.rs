use std::io::{self, BufRead, ErrorKind};

use log::{debug, trace};
use xmltree::{Element, XMLNode};

use crate::error::Error;
use crate::event::{Event, EventBlock, Weight, XmlAttr};
use crate::tags::*;

/// How to treat a stream that stops inside an event or has mis-nested
/// event tags
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Truncation {
    /// Report it as an error after the last complete event
    #[default]
    Error,
    /// End the event sequence quietly after the last complete event
    Ignore,
}

/// Reader configuration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    pub truncation: Truncation,
}

/// How the event stream ended
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamEnd {
    /// End of input outside any event
    Clean,
    /// End of input inside an event
    Truncated { line_number: usize },
    /// Mis-nested event tag
    Malformed { line_number: usize },
}

/// Streaming reader for events in the LHEF format
///
/// Only one event is held in memory at a time. Anything outside the
/// `<event>` blocks, like the header or the `<init>` block, is skipped.
#[derive(Debug)]
pub struct Reader<T> {
    stream: T,
    options: ReaderOptions,
    line_number: usize,
    state: State,
    end: Option<StreamEnd>,
}

#[derive(Debug)]
enum State {
    Outside,
    InEvent {
        block: EventBlock,
        /// Start line and collected text of a `<wgt>` entry
        weight: Option<(usize, String)>,
    },
}

impl<T: BufRead> Reader<T> {
    /// Create a new LHEF reader
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// let file = std::fs::File::open("events.lhe").unwrap();
    /// let file = std::io::BufReader::new(file);
    /// let reader = lhekin::Reader::new(file);
    /// ```
    pub fn new(stream: T) -> Reader<T> {
        Self::with_options(stream, ReaderOptions::default())
    }

    pub fn with_options(stream: T, options: ReaderOptions) -> Reader<T> {
        Reader {
            stream,
            options,
            line_number: 0,
            state: State::Outside,
            end: None,
        }
    }

    pub fn options(&self) -> ReaderOptions {
        self.options
    }

    /// Number of lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// How the stream ended, or `None` if there may be more events
    pub fn stream_end(&self) -> Option<StreamEnd> {
        self.end
    }

    /// Get the next event
    ///
    /// An event that fails to parse is returned as an error, reading
    /// continues with the following event on the next call. This includes
    /// events with lines that are not valid UTF-8.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// let file = std::fs::File::open("events.lhe").unwrap();
    /// let file = std::io::BufReader::new(file);
    /// let mut reader = lhekin::Reader::new(file);
    ///
    /// let event = reader.event().unwrap();
    /// match event {
    ///    Some(event) => println!("Found an event."),
    ///    None => println!("Reached end of event file."),
    /// }
    /// ```
    pub fn event(&mut self) -> Result<Option<Event>, Error> {
        if self.end.is_some() {
            return Ok(None);
        }
        let mut line = String::new();
        loop {
            line.clear();
            match self.stream.read_line(&mut line) {
                Ok(0) => return self.finish(),
                Ok(_) => {}
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    // the offending line is consumed
                    self.line_number += 1;
                    self.skip_line(err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
            self.line_number += 1;
            let text = line.trim();
            self.state = match std::mem::replace(&mut self.state, State::Outside) {
                State::Outside => {
                    if is_event_start(text) {
                        State::InEvent {
                            block: open_event(text, self.line_number),
                            weight: None,
                        }
                    } else if text == EVENT_END {
                        return self.malformed(text);
                    } else {
                        if text.starts_with(WGT_START) {
                            debug!(
                                "Discarding weight outside event in line {}",
                                self.line_number
                            );
                        }
                        State::Outside
                    }
                }
                State::InEvent { mut block, mut weight } => {
                    if text == EVENT_END {
                        if let Some((line_number, text)) = weight {
                            block
                                .error
                                .get_or_insert(Error::MalformedWeight { line_number, line: text });
                        }
                        trace!("Finished event in line {}", self.line_number);
                        return Event::from_block(block).map(Some);
                    }
                    if is_event_start(text) {
                        return self.malformed(text);
                    }
                    block.lines.push(line.trim_end().to_owned());
                    match weight.as_mut() {
                        Some((_, buf)) => {
                            buf.push('\n');
                            buf.push_str(text);
                        }
                        None if text.starts_with(WGT_START) => {
                            weight = Some((self.line_number, text.to_owned()))
                        }
                        None => {}
                    }
                    if matches!(&weight, Some((_, buf)) if buf.contains(WGT_END)) {
                        if let Some((line_number, text)) = weight.take() {
                            match parse_weight(&text) {
                                Some(w) => block.weights.push(w),
                                None => {
                                    block
                                        .error
                                        .get_or_insert(Error::MalformedWeight { line_number, line: text });
                                }
                            }
                        }
                    }
                    State::InEvent { block, weight }
                }
            }
        }
    }

    /// Skip a line that is not valid UTF-8
    ///
    /// Inside an event, this invalidates the event.
    fn skip_line(&mut self, err: io::Error) {
        match &mut self.state {
            State::Outside => debug!("Skipping unreadable line {}", self.line_number),
            State::InEvent { block, .. } => {
                debug!("Unreadable line {} in event", self.line_number);
                block.error.get_or_insert(err.into());
            }
        }
    }

    fn finish(&mut self) -> Result<Option<Event>, Error> {
        match std::mem::replace(&mut self.state, State::Outside) {
            State::Outside => {
                debug!("Event stream ended after {} lines", self.line_number);
                self.end = Some(StreamEnd::Clean);
                Ok(None)
            }
            State::InEvent { .. } => {
                let line_number = self.line_number;
                debug!("Event stream truncated in line {}", line_number);
                self.end = Some(StreamEnd::Truncated { line_number });
                match self.options.truncation {
                    Truncation::Error => Err(Error::StreamTruncated { line_number }),
                    Truncation::Ignore => Ok(None),
                }
            }
        }
    }

    fn malformed(&mut self, text: &str) -> Result<Option<Event>, Error> {
        let line_number = self.line_number;
        debug!("Mis-nested event tag in line {}", line_number);
        self.end = Some(StreamEnd::Malformed { line_number });
        match self.options.truncation {
            Truncation::Error => Err(Error::MalformedMarkup {
                line_number,
                line: text.to_owned(),
            }),
            Truncation::Ignore => Ok(None),
        }
    }
}

impl<T: BufRead> Iterator for Reader<T> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.event().transpose()
    }
}

fn open_event(tag_line: &str, line_number: usize) -> EventBlock {
    let mut block = EventBlock {
        first_line: line_number + 1,
        ..Default::default()
    };
    let (tag, title) = match tag_line.find('>') {
        Some(idx) => tag_line.split_at(idx + 1),
        None => (tag_line, ""),
    };
    match extract_xml_attr(tag) {
        Some(attr) => block.attr = attr,
        None => {
            block.error = Some(Error::MalformedTag {
                line_number,
                line: tag_line.to_owned(),
            })
        }
    }
    let title = title.trim();
    if !title.is_empty() {
        block.title = Some(title.to_owned());
    }
    block
}

fn parse_weight(text: &str) -> Option<Weight> {
    let element = Element::parse(text.as_bytes()).ok()?;
    let value: String = element
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let value = fast_float::parse(value.trim()).ok()?;
    let id = element.attributes.get("id").cloned();
    Some(Weight { id, value })
}

fn extract_xml_attr_str(xml_tag: &str) -> Option<&str> {
    let tag = xml_tag.trim().strip_suffix('>')?;
    let tag = tag.strip_suffix('/').unwrap_or(tag);
    match tag.split_once(char::is_whitespace) {
        None => Some(""),
        Some((_, attr)) => Some(attr.trim_start()),
    }
}

struct Attr<'a> {
    name: &'a str,
    value: &'a str,
}

fn next_attr(attr_str: &str) -> Option<(Option<Attr>, &str)> {
    let mut rem = attr_str.trim_start();
    if rem.is_empty() {
        return Some((None, rem));
    }
    let name_end = rem.find(|c: char| c.is_whitespace() || c == '=')?;
    let name = &rem[..name_end];
    rem = rem[name_end..].trim_start();
    rem = rem.strip_prefix('=')?.trim_start();
    let quote = rem.chars().next().filter(|&c| c == '\'' || c == '"')?;
    rem = &rem[1..];
    let value_end = rem.find(quote)?;
    let value = &rem[..value_end];
    rem = rem[value_end + 1..].trim_start();
    Some((Some(Attr { name, value }), rem))
}

fn extract_xml_attr(xml_tag: &str) -> Option<XmlAttr> {
    let mut attr_str = extract_xml_attr_str(xml_tag)?;
    let mut attr = XmlAttr::new();
    loop {
        let (parsed, rem) = next_attr(attr_str)?;
        match parsed {
            None => return Some(attr),
            Some(next_attr) => {
                attr.insert(next_attr.name.to_owned(), next_attr.value.to_owned());
            }
        };
        attr_str = rem;
    }
}
