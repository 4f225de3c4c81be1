/// Incremental Markdown to HTML conversion.
///
/// A `MarkdownStream` accepts the document as a sequence of `write` calls
/// followed by one `end`, and pushes HTML to an [`HtmlSink`] as soon as
/// tokens resolve. Every data fragment is the new suffix of the document's
/// HTML: the root element stays open until `end`, and concatenating all
/// fragments gives exactly the one-shot rendering of the whole input.
use crate::codegen::HtmlGenerator;
use crate::config::EngineConfig;
use crate::dom::Transformer;
use crate::error::{MarkdownError, Result};
use crate::lexer::{Position, Token, Tokenizer};
use crate::parser::Parser;
use log::{debug, error, trace};
use std::io::{ErrorKind, Read};

/// Size of the blocks `consume_reader` reads at a time.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Receiver of a stream's output.
///
/// `on_data` fragments must be concatenated in order. `on_end` follows the
/// last fragment of a completed document; `on_error` is raised at most once
/// per document and no data follows it.
pub trait HtmlSink {
    fn on_data(&mut self, html: &str);

    fn on_end(&mut self) {}

    fn on_error(&mut self, _error: &MarkdownError) {}
}

/// One observation recorded by the `Vec<StreamEvent>` sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    Data(String),
    End,
    Error(String),
}

impl StreamEvent {
    /// Concatenates the data fragments of an event log.
    pub fn collect_html(events: &[StreamEvent]) -> String {
        events
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Data(html) => Some(html.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl HtmlSink for Vec<StreamEvent> {
    fn on_data(&mut self, html: &str) {
        self.push(StreamEvent::Data(html.to_string()));
    }

    fn on_end(&mut self) {
        self.push(StreamEvent::End);
    }

    fn on_error(&mut self, error: &MarkdownError) {
        self.push(StreamEvent::Error(error.to_string()));
    }
}

/// Collects data only.
impl HtmlSink for String {
    fn on_data(&mut self, html: &str) {
        self.push_str(html);
    }
}

impl<S: HtmlSink + ?Sized> HtmlSink for &mut S {
    fn on_data(&mut self, html: &str) {
        (**self).on_data(html);
    }

    fn on_end(&mut self) {
        (**self).on_end();
    }

    fn on_error(&mut self, error: &MarkdownError) {
        (**self).on_error(error);
    }
}

/// Streaming orchestrator owning one instance of every pipeline stage.
///
/// Each write that resolves new tokens re-parses the full token list,
/// transforms and renders it, and emits the part of the HTML not yet sent.
#[derive(Debug)]
pub struct MarkdownStream<S: HtmlSink = Vec<StreamEvent>> {
    config: EngineConfig,
    tokenizer: Tokenizer,
    parser: Parser,
    transformer: Transformer,
    generator: HtmlGenerator,
    /// Every token resolved so far, in document order.
    tokens: Vec<Token>,
    /// HTML already handed to the sink.
    emitted: String,
    bytes_processed: usize,
    /// Trailing bytes of an incomplete UTF-8 sequence from `write_bytes`.
    utf8_carry: Vec<u8>,
    finished: bool,
    halted: bool,
    sink: S,
}

impl MarkdownStream<Vec<StreamEvent>> {
    /// Creates a stream with default configuration recording events in a `Vec`.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default(), Vec::new())
    }
}

impl Default for MarkdownStream<Vec<StreamEvent>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: HtmlSink> MarkdownStream<S> {
    /// Creates a stream with default configuration delivering to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self::with_config(EngineConfig::default(), sink)
    }

    pub fn with_config(config: EngineConfig, sink: S) -> Self {
        Self {
            tokenizer: Tokenizer::with_config(config.tokenizer.clone()),
            parser: Parser::new(config.parser),
            transformer: Transformer::new(),
            generator: HtmlGenerator::new(config.output.clone()),
            tokens: Vec::new(),
            emitted: String::new(),
            bytes_processed: 0,
            utf8_carry: Vec::new(),
            finished: false,
            halted: false,
            config,
            sink,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Feeds the next chunk of the document.
    ///
    /// Emits HTML for every newly resolved construct. Fails with a stream
    /// error after `end()` or after an earlier failure.
    pub fn write(&mut self, chunk: &str) -> Result<()> {
        self.ensure_open()?;
        match self.process(chunk) {
            Ok(()) => Ok(()),
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Feeds raw bytes, holding back an incomplete trailing UTF-8 sequence
    /// until the bytes that complete it arrive.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;

        let mut pending = std::mem::take(&mut self.utf8_carry);
        pending.extend_from_slice(bytes);

        let valid_up_to = match std::str::from_utf8(&pending) {
            Ok(_) => pending.len(),
            Err(source) if source.error_len().is_some() => return Err(self.fail(source.into())),
            Err(source) => source.valid_up_to(),
        };

        let carry = pending.split_off(valid_up_to);
        let text = match std::str::from_utf8(&pending) {
            Ok(text) => text,
            Err(source) => return Err(self.fail(source.into())),
        };
        if !text.is_empty() {
            self.write(text)?;
        }
        self.utf8_carry = carry;
        Ok(())
    }

    /// Resolves everything still pending, emits the rest of the HTML and
    /// signals completion to the sink.
    pub fn end(&mut self) -> Result<()> {
        self.ensure_open()?;
        match self.finish() {
            Ok(()) => {
                self.finished = true;
                self.sink.on_end();
                Ok(())
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// Reads `reader` to exhaustion in `DEFAULT_CHUNK_SIZE` blocks, then ends the stream.
    pub fn consume_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        self.ensure_open()?;

        let mut buffer = vec![0u8; DEFAULT_CHUNK_SIZE];
        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(bytes_read) => bytes_read,
                Err(source) if source.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(self.fail(source.into())),
            };
            self.write_bytes(&buffer[..bytes_read])?;
        }

        self.end()
    }

    /// Discards the current document, keeping configuration and sink.
    pub fn reset(&mut self) {
        debug!(
            target: "mdflow::stream",
            "reset after {} bytes and {} tokens",
            self.bytes_processed,
            self.tokens.len()
        );
        self.tokenizer = Tokenizer::with_config(self.config.tokenizer.clone());
        self.parser = Parser::new(self.config.parser);
        self.tokens.clear();
        self.emitted.clear();
        self.bytes_processed = 0;
        self.utf8_carry.clear();
        self.finished = false;
        self.halted = false;
    }

    /// Tokens resolved so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Bytes of text accepted by `write` since construction or the last reset.
    pub fn bytes_processed(&self) -> usize {
        self.bytes_processed
    }

    /// Source position of the first character not yet resolved into a token.
    pub fn position(&self) -> Position {
        self.tokenizer.position()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a failure stopped this document.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    fn ensure_open(&self) -> Result<()> {
        if self.halted {
            Err(MarkdownError::stream_error(
                "stream halted by an earlier failure; reset() before reuse",
            ))
        } else if self.finished {
            Err(MarkdownError::stream_error("stream already ended"))
        } else {
            Ok(())
        }
    }

    fn process(&mut self, chunk: &str) -> Result<()> {
        let total = self.bytes_processed + chunk.len();
        self.config.check_input_size(total, self.tokenizer.position())?;
        self.bytes_processed = total;

        let resolved = self.tokenizer.tokenize(chunk, false);
        if resolved.is_empty() {
            trace!(
                target: "mdflow::stream",
                "{} bytes pending, nothing resolved",
                self.tokenizer.pending().len()
            );
            return Ok(());
        }

        self.tokens.extend(resolved);
        self.render(false)
    }

    fn finish(&mut self) -> Result<()> {
        // A carried sequence is always an incomplete character.
        if let Err(source) = std::str::from_utf8(&self.utf8_carry) {
            return Err(source.into());
        }

        let resolved = self.tokenizer.tokenize("", true);
        self.tokens.extend(resolved);
        if self.tokens.is_empty() {
            debug!(target: "mdflow::stream", "empty document, nothing to emit");
            return Ok(());
        }
        self.render(true)
    }

    /// Re-derives the document's HTML from all tokens and emits what is new.
    fn render(&mut self, complete: bool) -> Result<()> {
        let document = self.parser.parse(&self.tokens);
        let dom = self.transformer.transform(&document)?;
        let html = if complete {
            self.generator.render(&dom)
        } else {
            self.generator.render_open(&dom)
        };

        if !html.starts_with(&self.emitted) {
            return Err(MarkdownError::generation_error(
                "re-rendered HTML does not extend the output already emitted",
            ));
        }

        debug!(
            target: "mdflow::stream",
            "render pass over {} tokens, {} new bytes",
            self.tokens.len(),
            html.len() - self.emitted.len()
        );
        if html.len() > self.emitted.len() {
            self.sink.on_data(&html[self.emitted.len()..]);
        }
        self.emitted = html;
        Ok(())
    }

    fn fail(&mut self, error: MarkdownError) -> MarkdownError {
        error!(target: "mdflow::stream", "document failed: {error}");
        self.halted = true;
        self.sink.on_error(&error);
        error
    }
}
