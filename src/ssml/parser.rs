use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::FrontendError;
use crate::normalizer::split_whitespace_indices;
use crate::phonemes::Phonemes;
use crate::types::{Alphabet, ProsodyProps, SsmlProps};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagName {
    Speak,
    Prosody,
    Phoneme,
    Sub,
    SayAs,
}

impl TagName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "speak" => Some(Self::Speak),
            "prosody" => Some(Self::Prosody),
            "phoneme" => Some(Self::Phoneme),
            "sub" => Some(Self::Sub),
            "say-as" => Some(Self::SayAs),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Speak => "speak",
            Self::Prosody => "prosody",
            Self::Phoneme => "phoneme",
            Self::Sub => "sub",
            Self::SayAs => "say-as",
        }
    }

    /// Tags whose whole content becomes a single word.
    pub fn is_annotation(self) -> bool {
        matches!(self, Self::Phoneme | Self::Sub | Self::SayAs)
    }
}

/// A word read from the document, with its span in the markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmlWord {
    /// Unescaped text; the tokens of an annotation span joined by spaces.
    pub text: String,
    pub start_byte_offset: usize,
    pub end_byte_offset: usize,
    /// Innermost enclosing tag.
    pub props: SsmlProps,
    /// Prosody in effect, merged over nested `<prosody>` tags.
    pub prosody: Option<ProsodyProps>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    NotStarted,
    InDocument,
    Finished,
}

#[derive(Debug, Clone)]
struct OpenTag {
    name: TagName,
    props: SsmlProps,
}

/// Pending annotation content.
#[derive(Debug, Default)]
enum SpanState {
    #[default]
    Idle,
    Accumulating {
        start: usize,
        end: usize,
        tokens: Vec<String>,
    },
}

/// Validating state machine over SSML events.
pub struct SsmlParser<'p> {
    phonemes: &'p Phonemes,
    state: ParserState,
    stack: Vec<OpenTag>,
    span: SpanState,
    words: Vec<SsmlWord>,
}

impl<'p> SsmlParser<'p> {
    pub fn new(phonemes: &'p Phonemes) -> Self {
        Self {
            phonemes,
            state: ParserState::NotStarted,
            stack: Vec::new(),
            span: SpanState::Idle,
            words: Vec::new(),
        }
    }

    /// Runs a whole document through the state machine.
    ///
    /// An unclosed document is not an error here; [`Self::get_text`] reports it.
    pub fn parse(phonemes: &'p Phonemes, markup: &str) -> Result<Self, FrontendError> {
        let mut parser = Self::new(phonemes);
        parser.feed(markup)?;
        Ok(parser)
    }

    pub fn feed(&mut self, markup: &str) -> Result<(), FrontendError> {
        let mut reader = Reader::from_str(markup);
        reader.config_mut().check_end_names = false;

        loop {
            let start = reader.buffer_position() as usize;
            let event = reader.read_event().map_err(|e| {
                FrontendError::validation(format!("malformed markup near byte {start}: {e}"))
            })?;
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(tag) => {
                    let (name, attrs) = tag_parts(&tag)?;
                    self.handle_start_tag(&name, &attrs)?;
                }
                Event::Empty(tag) => {
                    let (name, attrs) = tag_parts(&tag)?;
                    self.handle_start_tag(&name, &attrs)?;
                    self.handle_end_tag(&name)?;
                }
                Event::End(tag) => {
                    let qname = tag.name();
                    let name = utf8(qname.as_ref())?;
                    self.handle_end_tag(name)?;
                }
                Event::Text(_) => self.handle_text(&markup[start..end], start)?,
                Event::CData(_) => {
                    // "<![CDATA[" .. "]]>"
                    let inner = markup.get(start + 9..end.saturating_sub(3)).unwrap_or("");
                    self.push_text(inner, start + 9, false)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    fn active_prosody(&self) -> Option<&ProsodyProps> {
        self.stack.iter().rev().find_map(|tag| match &tag.props {
            SsmlProps::Prosody(props) => Some(props),
            _ => None,
        })
    }

    pub fn handle_start_tag(&mut self, name: &str, attrs: &[(String, String)]) -> Result<(), FrontendError> {
        if self.state == ParserState::Finished {
            return Err(FrontendError::validation(format!(
                "<{name}> after the root element was closed"
            )));
        }
        let tag = TagName::parse(name)
            .ok_or_else(|| FrontendError::validation(format!("unsupported tag <{name}>")))?;

        match self.state {
            ParserState::NotStarted if tag != TagName::Speak => {
                return Err(FrontendError::validation(format!(
                    "document must start with <speak>, found <{name}>"
                )));
            }
            ParserState::NotStarted => self.state = ParserState::InDocument,
            _ if tag == TagName::Speak => {
                return Err(FrontendError::validation("<speak> is only allowed as the root"));
            }
            _ => {}
        }
        if let Some(parent) = self.stack.last().filter(|open| open.name.is_annotation()) {
            return Err(FrontendError::validation(format!(
                "<{}> cannot contain <{name}>",
                parent.name.as_str()
            )));
        }

        let props = match tag {
            TagName::Speak => SsmlProps::Speak,
            TagName::Prosody => SsmlProps::Prosody(
                ProsodyProps {
                    rate: attr(attrs, "rate").map(str::to_string),
                    pitch: attr(attrs, "pitch").map(str::to_string),
                    volume: attr(attrs, "volume").map(str::to_string),
                }
                .inherit(self.active_prosody()),
            ),
            TagName::Phoneme => {
                if !attr(attrs, "alphabet").is_some_and(|a| a.eq_ignore_ascii_case("x-sampa")) {
                    return Err(FrontendError::validation(
                        "<phoneme> requires alphabet=\"x-sampa\"",
                    ));
                }
                let ph = attr(attrs, "ph")
                    .map(str::trim)
                    .filter(|ph| !ph.is_empty())
                    .ok_or_else(|| FrontendError::validation("<phoneme> requires a ph attribute"))?;
                let xsampa = self.phonemes.align(ph, Alphabet::XSampa)?;
                SsmlProps::Phoneme {
                    xsampa: ph.to_string(),
                    ipa: self.phonemes.convert_xsampa_to_ipa(&xsampa)?,
                }
            }
            TagName::Sub => SsmlProps::Sub {
                alias: attr(attrs, "alias")
                    .ok_or_else(|| FrontendError::validation("<sub> requires an alias attribute"))?
                    .to_string(),
            },
            TagName::SayAs => SsmlProps::SayAs {
                interpret_as: attr(attrs, "interpret-as")
                    .ok_or_else(|| {
                        FrontendError::validation("<say-as> requires an interpret-as attribute")
                    })?
                    .to_string(),
                format: attr(attrs, "format").map(str::to_string),
            },
        };

        tracing::trace!(tag = tag.as_str(), depth = self.stack.len(), "ssml: open");
        if tag.is_annotation() {
            self.span = SpanState::Idle;
        }
        self.stack.push(OpenTag { name: tag, props });
        Ok(())
    }

    pub fn handle_end_tag(&mut self, name: &str) -> Result<(), FrontendError> {
        let open = self
            .stack
            .pop()
            .ok_or_else(|| FrontendError::validation(format!("unexpected </{name}>")))?;
        if open.name.as_str() != name {
            return Err(FrontendError::validation(format!(
                "</{name}> does not close <{}>",
                open.name.as_str()
            )));
        }

        if open.name.is_annotation() {
            let prosody = self.active_prosody().cloned();
            match std::mem::take(&mut self.span) {
                SpanState::Accumulating { start, end, tokens } => self.words.push(SsmlWord {
                    text: tokens.join(" "),
                    start_byte_offset: start,
                    end_byte_offset: end,
                    props: open.props,
                    prosody,
                }),
                SpanState::Idle => {
                    tracing::debug!(tag = name, "ssml: empty annotation dropped");
                }
            }
        }
        if self.stack.is_empty() {
            self.state = ParserState::Finished;
        }
        Ok(())
    }

    /// Text found at byte `offset` of the markup; entities are resolved per token.
    pub fn handle_text(&mut self, raw: &str, offset: usize) -> Result<(), FrontendError> {
        self.push_text(raw, offset, true)
    }

    fn push_text(&mut self, raw: &str, offset: usize, unescape: bool) -> Result<(), FrontendError> {
        if self.state != ParserState::InDocument {
            if raw.trim().is_empty() {
                return Ok(());
            }
            return Err(FrontendError::validation(format!(
                "text outside <speak> at byte {offset}"
            )));
        }
        let Some(top) = self.stack.last() else {
            return Ok(());
        };
        let (annotation, props) = (top.name.is_annotation(), top.props.clone());
        let prosody = self.active_prosody().cloned();

        for (at, piece) in split_whitespace_indices(raw) {
            let text = if unescape {
                quick_xml::escape::unescape(piece)
                    .map_err(|e| FrontendError::validation(format!("bad entity in {piece:?}: {e}")))?
                    .into_owned()
            } else {
                piece.to_string()
            };
            let start = offset + at;
            let end = start + piece.len();

            if annotation {
                if let SpanState::Accumulating {
                    end: span_end,
                    tokens,
                    ..
                } = &mut self.span
                {
                    *span_end = end;
                    tokens.push(text);
                } else {
                    self.span = SpanState::Accumulating {
                        start,
                        end,
                        tokens: vec![text],
                    };
                }
            } else {
                self.words.push(SsmlWord {
                    text,
                    start_byte_offset: start,
                    end_byte_offset: end,
                    props: props.clone(),
                    prosody: prosody.clone(),
                });
            }
        }
        Ok(())
    }

    /// Space-joined text of every word collected so far.
    pub fn get_text(&self) -> Result<String, FrontendError> {
        if let Some(open) = self.stack.last() {
            return Err(FrontendError::validation(format!(
                "unclosed <{}>",
                open.name.as_str()
            )));
        }
        if self.state == ParserState::NotStarted {
            return Err(FrontendError::validation("document has no <speak> root"));
        }
        if self.words.is_empty() {
            return Err(FrontendError::validation("document contains no text"));
        }
        Ok(self
            .words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" "))
    }

    pub fn words(&self) -> &[SsmlWord] {
        &self.words
    }

    pub fn into_words(self) -> Vec<SsmlWord> {
        self.words
    }
}

fn attr<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn utf8(bytes: &[u8]) -> Result<&str, FrontendError> {
    std::str::from_utf8(bytes).map_err(|e| FrontendError::validation(format!("tag name is not UTF-8: {e}")))
}

fn tag_parts(tag: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>), FrontendError> {
    let name = utf8(tag.name().as_ref())?.to_string();
    let mut attrs = Vec::new();
    for attribute in tag.attributes() {
        let attribute = attribute
            .map_err(|e| FrontendError::validation(format!("bad attribute in <{name}>: {e}")))?;
        let key = utf8(attribute.key.as_ref())?.to_string();
        let value = attribute
            .unescape_value()
            .map_err(|e| FrontendError::validation(format!("bad value for {key} in <{name}>: {e}")))?
            .into_owned();
        attrs.push((key, value));
    }
    Ok((name, attrs))
}
