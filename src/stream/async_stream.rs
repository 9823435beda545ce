//! Token stream over an asynchronous reader.

use super::{Demand, Pipeline, Utf8Decoder};
use crate::config::LexerConfig;
use crate::error::Result;
use crate::lexer::Token;
use futures_util::stream::{self, Stream, StreamExt};
use tokio::io::{AsyncRead, AsyncReadExt};

/// State carried between polls of the async token stream
struct AsyncLexer<R> {
    reader: Option<R>,
    decoder: Utf8Decoder,
    buf: Vec<u8>,
    pipeline: Pipeline,
}

impl<R: AsyncRead + Unpin> AsyncLexer<R> {
    async fn next_token(&mut self) -> Option<Result<Token>> {
        loop {
            match self.pipeline.poll() {
                Demand::Ready(item) => {
                    if self.pipeline.is_done() {
                        self.reader = None;
                    }
                    return Some(item);
                }
                Demand::Finished => {
                    self.reader = None;
                    return None;
                }
                Demand::Chunk => self.pull().await,
            }
        }
    }

    async fn pull(&mut self) {
        let reader = match self.reader.as_mut() {
            Some(reader) => reader,
            None => {
                self.pipeline.end_of_input();
                return;
            }
        };
        let chunk = match reader.read(&mut self.buf).await {
            Ok(0) => match self.decoder.finish() {
                Ok(()) => None,
                Err(err) => Some(Err(err)),
            },
            Ok(n) => Some(self.decoder.decode(&self.buf[..n])),
            Err(err) => Some(Err(err)),
        };
        match chunk {
            Some(Ok(text)) => self.pipeline.push_chunk(&text),
            Some(Err(err)) => {
                self.reader = None;
                self.pipeline.fail(err.into());
            }
            None => {
                self.reader = None;
                self.pipeline.end_of_input();
            }
        }
    }
}

/// Lexes everything an async reader produces.
///
/// Reads happen only while the consumer polls for a token that is not yet
/// available. The reader is dropped once the stream ends or fails, or when
/// the stream itself is dropped. Polling after the end keeps yielding `None`.
pub fn lex_async<R>(reader: R, config: &LexerConfig) -> impl Stream<Item = Result<Token>>
where
    R: AsyncRead + Unpin,
{
    tracing::debug!(?config, "starting async lexical pass");
    let lexer = AsyncLexer {
        reader: Some(reader),
        decoder: Utf8Decoder::new(),
        buf: vec![0; config.effective_chunk_size()],
        pipeline: Pipeline::new(config),
    };
    stream::unfold(lexer, |mut lexer| async move {
        let item = lexer.next_token().await?;
        Some((item, lexer))
    })
    .fuse()
}
