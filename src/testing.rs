//! In-memory transport for driving sessions in tests.

use std::{
    collections::VecDeque,
    io,
    pin::Pin,
    task::{Context, Poll},
};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Hands out one scripted chunk per read and records everything written.
/// Reads past the end of the script return EOF.
#[derive(Default)]
pub struct ScriptedStream {
    reads: VecDeque<Vec<u8>>,
    pub written: Vec<u8>,
}

impl ScriptedStream {
    pub fn new(reads: Vec<Vec<u8>>) -> Self {
        ScriptedStream {
            reads: reads.into(),
            written: Vec::new(),
        }
    }
}

impl AsyncRead for ScriptedStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        if let Some(mut chunk) = self.reads.pop_front() {
            let count = chunk.len().min(buf.remaining());
            buf.put_slice(&chunk[..count]);
            if count < chunk.len() {
                let rest = chunk.split_off(count);
                self.reads.push_front(rest);
            }
        }
        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for ScriptedStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.written.extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
