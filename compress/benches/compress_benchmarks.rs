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

//! Benchmarks for laminar-compress

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use laminar_compress::{CompressionAlgorithm, CompressionLevel, Compressor, Decompressor};
use std::hint::black_box;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};

// ============================================================================
// Helper Functions
// ============================================================================

fn create_text_data(size: usize) -> Vec<u8> {
    let text = "* 12 FETCH (FLAGS (\\Seen) UID 4827313)\r\n";
    text.as_bytes().iter().cycle().take(size).copied().collect()
}

// ============================================================================
// Compression Benchmarks
// ============================================================================

fn bench_compress_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress_algorithms");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    for size in [1024, 16 * 1024] {
        let data = create_text_data(size);
        group.throughput(Throughput::Bytes(size as u64));

        for algorithm in CompressionAlgorithm::ALL {
            group.bench_with_input(
                BenchmarkId::new(algorithm.name(), size),
                &data,
                |b, data| {
                    b.to_async(&runtime).iter(|| async {
                        let mut compressor = Compressor::new(
                            Vec::with_capacity(size),
                            black_box(algorithm),
                            CompressionLevel::Default,
                        )
                        .unwrap();
                        compressor.write_all(black_box(data)).await.unwrap();
                        compressor.shutdown().await.unwrap();
                        compressor.into_inner()
                    });
                },
            );
        }
    }

    group.finish();
}

// ============================================================================
// Interactive Benchmarks
// ============================================================================

fn bench_flush_per_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("flush_per_line");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let lines = 64;

    group.throughput(Throughput::Elements(lines));
    group.bench_function("deflate", |b| {
        b.to_async(&runtime).iter(|| async {
            let (client, server) = tokio::io::duplex(64 * 1024);
            let mut compressor = Compressor::new(
                client,
                CompressionAlgorithm::Deflate,
                CompressionLevel::Default,
            )
            .unwrap();
            let mut decompressor =
                Decompressor::new(BufReader::new(server), CompressionAlgorithm::Deflate);
            let line = b"* 12 FETCH (FLAGS (\\Seen))\r\n";
            let mut received = vec![0u8; line.len()];
            for _ in 0..lines {
                compressor.write_all(black_box(line)).await.unwrap();
                compressor.flush().await.unwrap();
                decompressor.read_exact(&mut received).await.unwrap();
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compress_algorithms, bench_flush_per_line);
criterion_main!(benches);
