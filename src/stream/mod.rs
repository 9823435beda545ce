//! Token stream producers
//!
//! A [`TokenStream`] pulls text fragments from a [`ChunkSource`] only when
//! it has no finished token left to hand out, reassembles them into lines
//! and scans each line. The first error ends the stream; afterwards it only
//! yields `None`. The source is dropped as soon as the stream completes or
//! fails, and with the stream itself if the consumer stops early.

mod async_stream;
mod utf8;

pub use async_stream::lex_async;
pub use utf8::Utf8Decoder;

use crate::config::LexerConfig;
use crate::error::{Error, Result};
use crate::lexer::{Line, LineAssembler, Scanner, Token};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// An ordered supply of source text fragments
pub trait ChunkSource {
    /// Returns the next fragment, or `None` once the input is exhausted
    fn next_chunk(&mut self) -> Result<Option<String>>;
}

/// A [`ChunkSource`] over in-memory fragments
#[derive(Debug, Clone)]
pub struct Fragments<I> {
    inner: I,
}

impl<I> Fragments<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    /// Wraps an iterator of fragments
    pub fn new<T: IntoIterator<IntoIter = I>>(fragments: T) -> Self {
        Fragments {
            inner: fragments.into_iter(),
        }
    }
}

impl<I> ChunkSource for Fragments<I>
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_chunk(&mut self) -> Result<Option<String>> {
        Ok(self.inner.next().map(Into::into))
    }
}

/// A [`ChunkSource`] reading fixed-size byte chunks from a reader
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    decoder: Utf8Decoder,
    buf: Vec<u8>,
}

impl<R: Read> ReaderSource<R> {
    /// Reads `reader` in chunks of `config.chunk_size` bytes
    pub fn new(reader: R, config: &LexerConfig) -> Self {
        ReaderSource {
            reader,
            decoder: Utf8Decoder::new(),
            buf: vec![0; config.effective_chunk_size()],
        }
    }
}

impl<R: Read> ChunkSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<String>> {
        loop {
            match self.reader.read(&mut self.buf) {
                Ok(0) => {
                    self.decoder.finish()?;
                    return Ok(None);
                }
                Ok(n) => return Ok(Some(self.decoder.decode(&self.buf[..n])?)),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Reassembly and scanning state shared by the sync and async producers
#[derive(Debug)]
pub(crate) struct Pipeline {
    assembler: LineAssembler,
    scanner: Scanner,
    lines: VecDeque<Line>,
    tokens: VecDeque<Token>,
    failure: Option<Error>,
    input_done: bool,
    done: bool,
}

/// What the producer has to do before the next token can be handed out
pub(crate) enum Demand {
    /// A token (or the terminal error) is ready
    Ready(Result<Token>),
    /// The stream has ended
    Finished,
    /// More input is required
    Chunk,
}

impl Pipeline {
    pub(crate) fn new(config: &LexerConfig) -> Self {
        Pipeline {
            assembler: LineAssembler::new(),
            scanner: Scanner::new(config),
            lines: VecDeque::new(),
            tokens: VecDeque::new(),
            failure: None,
            input_done: false,
            done: false,
        }
    }

    /// Scans buffered lines until a token is ready or input is needed
    pub(crate) fn poll(&mut self) -> Demand {
        loop {
            if let Some(token) = self.tokens.pop_front() {
                return Demand::Ready(Ok(token));
            }
            if let Some(err) = self.failure.take() {
                return Demand::Ready(Err(err));
            }
            if self.done {
                return Demand::Finished;
            }
            match self.lines.pop_front() {
                Some(line) => {
                    if let Err(err) = self.scanner.scan_line(&line, &mut self.tokens) {
                        self.fail(err.into());
                    }
                }
                None if self.input_done => self.finish(),
                None => return Demand::Chunk,
            }
        }
    }

    pub(crate) fn push_chunk(&mut self, chunk: &str) {
        self.assembler.push(chunk, &mut self.lines);
    }

    pub(crate) fn end_of_input(&mut self) {
        let last = self.assembler.finish();
        self.lines.push_back(last);
        self.input_done = true;
    }

    pub(crate) fn fail(&mut self, err: Error) {
        tracing::warn!(error = %err, "lexical pass failed");
        self.lines.clear();
        self.failure = Some(err);
        self.done = true;
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    fn finish(&mut self) {
        match self.scanner.finish() {
            Ok(()) => {
                tracing::debug!(lines = self.assembler.current_line() + 1, "lexical pass finished");
                self.done = true;
            }
            Err(err) => self.fail(err.into()),
        }
    }
}

/// A lazy, forward-only, non-restartable sequence of tokens
pub struct TokenStream<S> {
    source: Option<S>,
    pipeline: Pipeline,
}

impl<S: ChunkSource> TokenStream<S> {
    /// Creates a stream over `source` with the default configuration
    pub fn new(source: S) -> Self {
        Self::with_config(source, &LexerConfig::default())
    }

    /// Creates a stream over `source`
    pub fn with_config(source: S, config: &LexerConfig) -> Self {
        tracing::debug!(?config, "starting lexical pass");
        TokenStream {
            source: Some(source),
            pipeline: Pipeline::new(config),
        }
    }

    /// Whether the input source is still held open
    pub fn holds_source(&self) -> bool {
        self.source.is_some()
    }

    /// Pulls one fragment from the source into the pipeline
    fn pull(&mut self) {
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => {
                self.pipeline.end_of_input();
                return;
            }
        };
        match source.next_chunk() {
            Ok(Some(chunk)) => self.pipeline.push_chunk(&chunk),
            Ok(None) => {
                self.source = None;
                self.pipeline.end_of_input();
            }
            Err(err) => {
                self.source = None;
                self.pipeline.fail(err);
            }
        }
    }
}

impl<S: ChunkSource> Iterator for TokenStream<S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        loop {
            match self.pipeline.poll() {
                Demand::Ready(item) => {
                    if self.pipeline.is_done() {
                        self.source = None;
                    }
                    return Some(item);
                }
                Demand::Finished => {
                    self.source = None;
                    return None;
                }
                Demand::Chunk => self.pull(),
            }
        }
    }
}

impl<S: ChunkSource> std::iter::FusedIterator for TokenStream<S> {}

/// Lexes an in-memory string
pub fn lex_str(source: &str) -> TokenStream<Fragments<std::iter::Once<String>>> {
    TokenStream::new(Fragments::new(std::iter::once(source.to_string())))
}

/// Lexes a sequence of in-memory fragments
pub fn lex_fragments<I>(fragments: I) -> TokenStream<Fragments<I::IntoIter>>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    TokenStream::new(Fragments::new(fragments))
}

/// Lexes everything `reader` produces
pub fn lex_reader<R: Read>(reader: R, config: &LexerConfig) -> TokenStream<ReaderSource<R>> {
    TokenStream::with_config(ReaderSource::new(reader, config), config)
}

/// Lexes the file at `path`. The file is closed when the stream ends.
pub fn lex_file(
    path: impl AsRef<Path>,
    config: &LexerConfig,
) -> Result<TokenStream<ReaderSource<File>>> {
    let file = File::open(path)?;
    Ok(lex_reader(file, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Counts pulled chunks and records when it is dropped
    struct Probe {
        chunks: Vec<&'static str>,
        pulled: Rc<Cell<usize>>,
        dropped: Rc<Cell<bool>>,
    }

    impl ChunkSource for Probe {
        fn next_chunk(&mut self) -> Result<Option<String>> {
            if self.pulled.get() >= self.chunks.len() {
                return Ok(None);
            }
            let chunk = self.chunks[self.pulled.get()];
            self.pulled.set(self.pulled.get() + 1);
            Ok(Some(chunk.to_string()))
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.dropped.set(true);
        }
    }

    fn probe(chunks: Vec<&'static str>) -> (Probe, Rc<Cell<usize>>, Rc<Cell<bool>>) {
        let pulled = Rc::new(Cell::new(0));
        let dropped = Rc::new(Cell::new(false));
        let source = Probe {
            chunks,
            pulled: pulled.clone(),
            dropped: dropped.clone(),
        };
        (source, pulled, dropped)
    }

    #[test]
    fn test_pulls_lazily() {
        let (source, pulled, _) = probe(vec!["let\n", "in\n", "end\n"]);
        let mut stream = TokenStream::new(source);
        assert_eq!(stream.next().unwrap().unwrap().kind, TokenKind::Let);
        assert_eq!(pulled.get(), 1);
        assert_eq!(stream.next().unwrap().unwrap().kind, TokenKind::In);
        assert_eq!(pulled.get(), 2);
    }

    #[test]
    fn test_source_released_on_completion() {
        let (source, _, dropped) = probe(vec!["nil"]);
        let mut stream = TokenStream::new(source);
        assert_eq!(stream.next().unwrap().unwrap().kind, TokenKind::Nil);
        assert!(stream.next().is_none());
        assert!(dropped.get());
        assert!(!stream.holds_source());
    }

    #[test]
    fn test_source_released_on_error() {
        let (source, _, dropped) = probe(vec!["x := !\n", "y\n"]);
        let mut stream = TokenStream::new(source);
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_ok());
        assert!(stream.next().unwrap().is_err());
        assert!(dropped.get());
        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_source_released_on_abandon() {
        let (source, _, dropped) = probe(vec!["a b c\n", "d e f\n"]);
        let mut stream = TokenStream::new(source);
        assert!(stream.next().is_some());
        assert!(!dropped.get());
        drop(stream);
        assert!(dropped.get());
    }

    #[test]
    fn test_reader_source_tiny_chunks() {
        let text = "var s := \"héllo\"\n";
        let config = LexerConfig::default().with_chunk_size(1);
        let tokens: Vec<Token> = lex_reader(text.as_bytes(), &config)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[3].lexeme, "\"héllo\"");
    }

    #[test]
    fn test_reader_invalid_utf8_is_io_error() {
        let bytes: &[u8] = &[b'a', b' ', 0xC3, 0x28];
        let results: Vec<_> = lex_reader(bytes, &LexerConfig::default()).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(Error::Io(_))));
    }
}
