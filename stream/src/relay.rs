//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Relay endpoints shared between the pump and the read indirection

use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, DuplexStream, ReadBuf};

/// Producer end of the relay, owned by the pump
pub(crate) type RelayProducer = DuplexStream;

/// Create a relay holding at most `capacity` undelivered bytes.
///
/// Writes to the producer wait while the relay is full; reads from the consumer
/// wait while it is empty. Shutting the producer down makes the consumer report
/// end-of-file once the buffered bytes are drained.
pub(crate) fn relay(capacity: usize) -> (RelayProducer, SharedReader) {
    let (producer, consumer) = tokio::io::duplex(capacity);
    (producer, SharedReader::new(consumer))
}

/// Lock a std mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;

/// A cloneable handle to a reader.
///
/// Every clone dispatches to the same underlying reader. The inner lock is only
/// held for the duration of a single poll, never across a pending read.
#[derive(Clone)]
pub(crate) struct SharedReader {
    inner: Arc<Mutex<BoxedReader>>,
}

impl SharedReader {
    pub(crate) fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(Box::new(reader))),
        }
    }
}

impl AsyncRead for SharedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let mut reader = lock(&self.inner);
        Pin::new(&mut **reader).poll_read(cx, buf)
    }
}
