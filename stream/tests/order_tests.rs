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

//! Property tests for byte ordering through the pump and relay

use laminar_compress::{CompressionLevel, Compressor};
use laminar_stream::{CompressionAlgorithm, PumpReader, StreamConfig, StreamError};
use proptest::collection::vec;
use proptest::prelude::*;
use std::io::Cursor;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Runtime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn read_to_end(reader: &PumpReader, read_size: usize) -> Vec<u8> {
    let mut received = Vec::new();
    let mut buf = vec![0u8; read_size];
    loop {
        match reader.read(&mut buf).await {
            Ok(n) => {
                assert!(n > 0);
                received.extend_from_slice(&buf[..n]);
            }
            Err(StreamError::EndOfStream) => return received,
            Err(err) => panic!("unexpected read error: {err}"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reads_preserve_source_order(
        data in vec(any::<u8>(), 0..16 * 1024),
        read_size in 1usize..1024,
        transfer_buffer_size in 1usize..8192,
    ) {
        let config = StreamConfig::default().with_transfer_buffer_size(transfer_buffer_size);
        let source = data.clone();
        let received = runtime().block_on(async move {
            let reader = PumpReader::with_config(Cursor::new(source), &config).unwrap();
            let received = read_to_end(&reader, read_size).await;
            reader.close().await.unwrap();
            received
        });
        prop_assert_eq!(received, data);
    }

    #[test]
    fn chunked_writes_preserve_order(
        chunks in vec(vec(any::<u8>(), 1..512), 0..32),
        read_size in 1usize..300,
    ) {
        let expected: Vec<u8> = chunks.concat();
        let received = runtime().block_on(async move {
            let (mut peer, source) = tokio::io::duplex(256);
            let reader = PumpReader::new(source);

            let writer = tokio::spawn(async move {
                for chunk in chunks {
                    peer.write_all(&chunk).await.unwrap();
                }
                peer.shutdown().await.unwrap();
            });

            let received = read_to_end(&reader, read_size).await;
            writer.await.unwrap();
            reader.close().await.unwrap();
            received
        });
        prop_assert_eq!(received, expected);
    }

    #[test]
    fn activation_at_any_boundary(
        prefix in vec(any::<u8>(), 0..2048),
        suffix in vec(any::<u8>(), 0..4096),
        read_size in 1usize..512,
    ) {
        let mut expected = prefix.clone();
        expected.extend_from_slice(&suffix);

        let received = runtime().block_on(async move {
            let mut compressor = Compressor::new(
                Vec::new(),
                CompressionAlgorithm::Deflate,
                CompressionLevel::Default,
            )
            .unwrap();
            compressor.write_all(&suffix).await.unwrap();
            compressor.shutdown().await.unwrap();

            let mut source = prefix.clone();
            source.extend(compressor.into_inner());
            let reader = PumpReader::new(Cursor::new(source));

            let mut received = Vec::new();
            while received.len() < prefix.len() {
                let want = read_size.min(prefix.len() - received.len());
                let mut buf = vec![0u8; want];
                let n = reader.read(&mut buf).await.unwrap();
                received.extend_from_slice(&buf[..n]);
            }

            reader
                .enable_decompression(CompressionAlgorithm::Deflate)
                .unwrap();
            received.extend(read_to_end(&reader, read_size).await);
            reader.close().await.unwrap();
            received
        });
        prop_assert_eq!(received, expected);
    }
}
