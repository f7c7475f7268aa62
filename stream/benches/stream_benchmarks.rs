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

//! Benchmarks for laminar-stream

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use laminar_stream::{LayeredStream, PumpReader, StreamConfig, StreamError};
use std::hint::black_box;
use std::io::Cursor;

// ============================================================================
// Helper Functions
// ============================================================================

fn create_text_data(size: usize) -> Vec<u8> {
    let text = "* 3 FETCH (UID 8812 RFC822.SIZE 4413 FLAGS (\\Seen))\r\n";
    text.as_bytes().iter().cycle().take(size).copied().collect()
}

// ============================================================================
// Pump Benchmarks
// ============================================================================

fn bench_pump_transfer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pump_transfer_sizes");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let data = create_text_data(256 * 1024);
    group.throughput(Throughput::Bytes(data.len() as u64));

    for transfer_buffer_size in [512, 4096, 32 * 1024] {
        let config = StreamConfig::default().with_transfer_buffer_size(transfer_buffer_size);
        group.bench_with_input(
            BenchmarkId::from_parameter(transfer_buffer_size),
            &data,
            |b, data| {
                b.to_async(&runtime).iter(|| async {
                    let reader =
                        PumpReader::with_config(Cursor::new(data.clone()), &config).unwrap();
                    let mut buf = vec![0u8; 8192];
                    let mut total = 0;
                    loop {
                        match reader.read(&mut buf).await {
                            Ok(n) => total += n,
                            Err(StreamError::EndOfStream) => break,
                            Err(err) => panic!("read failed: {err}"),
                        }
                    }
                    reader.close().await.unwrap();
                    black_box(total)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Layered Stream Benchmarks
// ============================================================================

fn bench_compressed_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("compressed_round_trip");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let line = b"* 3 FETCH (UID 8812 FLAGS (\\Seen))\r\n";
    let lines = 128;
    group.throughput(Throughput::Elements(lines));

    group.bench_function("deflate", |b| {
        b.to_async(&runtime).iter(|| async {
            let (client, server) = tokio::io::duplex(64 * 1024);
            let (client_source, client_sink) = tokio::io::split(client);
            let (server_source, server_sink) = tokio::io::split(server);
            let client = LayeredStream::new(client_source, client_sink);
            let server = LayeredStream::new(server_source, server_sink);
            client.enable_compression().await.unwrap();
            server.enable_compression().await.unwrap();

            let mut buf = vec![0u8; line.len()];
            for _ in 0..lines {
                client.write_all(black_box(line)).await.unwrap();
                let mut read = 0;
                while read < line.len() {
                    read += server.read(&mut buf[read..]).await.unwrap();
                }
            }

            client.close().await.unwrap();
            server.close().await.unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_pump_transfer_sizes,
    bench_compressed_round_trip
);
criterion_main!(benches);
