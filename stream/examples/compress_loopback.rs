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

//! Compression Loopback Example
//!
//! Runs an IMAP-flavoured exchange over a loopback TCP socket. Both peers
//! agree on `COMPRESS DEFLATE` in plaintext, switch their streams to
//! compressed mode and carry on talking.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run -p laminar-stream --example compress_loopback
//! ```

use laminar_stream::{LayeredStream, StreamError};
use tokio::io::AsyncWrite;
use tokio::net::{TcpListener, TcpStream};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    println!("Server listening on {addr}");

    let server = tokio::spawn(async move {
        let (socket, peer) = listener.accept().await?;
        tracing::info!("Client {} connected", peer);
        let (source, sink) = socket.into_split();
        let stream = LayeredStream::new(source, sink);

        let command = read_line(&stream).await?;
        println!("S: received {command:?}");
        stream.write_all(b"1 OK DEFLATE active\r\n").await?;
        stream.enable_compression().await?;

        let command = read_line(&stream).await?;
        println!("S: received {command:?} (compressed)");
        stream.write_all(b"* 172 EXISTS\r\n").await?;
        stream.write_all(b"2 OK SELECT completed\r\n").await?;

        stream.close().await?;
        Ok::<_, StreamError>(())
    });

    let socket = TcpStream::connect(addr).await?;
    let (source, sink) = socket.into_split();
    let client = LayeredStream::new(source, sink);

    client.write_all(b"1 COMPRESS DEFLATE\r\n").await?;
    println!("C: received {:?}", read_line(&client).await?);
    client.enable_compression().await?;

    client.write_all(b"2 SELECT INBOX\r\n").await?;
    println!("C: received {:?}", read_line(&client).await?);
    println!("C: received {:?}", read_line(&client).await?);

    server.await??;
    client.close().await?;
    println!("Connection closed");

    Ok(())
}

/// Read one CRLF terminated line a byte at a time so nothing past the line
/// is consumed before the peer switches modes.
async fn read_line<W>(stream: &LayeredStream<W>) -> Result<String, StreamError>
where
    W: AsyncWrite + Unpin,
{
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    while !line.ends_with(b"\r\n") {
        let n = stream.read(&mut byte).await?;
        line.extend_from_slice(&byte[..n]);
    }
    line.truncate(line.len() - 2);
    Ok(String::from_utf8_lossy(&line).into_owned())
}
