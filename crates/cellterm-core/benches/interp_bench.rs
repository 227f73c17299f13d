use std::hint::black_box;

use cellterm_core::{Interpreter, RenderBackend, Screen};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

struct Corpus<'a> {
    id: &'a str,
    bytes: &'a [u8],
}

fn corpora() -> Vec<Corpus<'static>> {
    const PLAIN_TEXT: &[u8] = b"the quick brown fox jumps over the lazy dog 0123456789\n\
the quick brown fox jumps over the lazy dog 0123456789\n";

    const DENSE_SGR: &[u8] = b"\x1b[31mRED\x1b[0m \x1b[1;32mGREEN\x1b[0m \x1b[33;44mYELLOW\x1b[0m\n\
\x1b[38;5;196mIDX196\x1b[0m \x1b[48;5;21mBG21\x1b[0m \x1b[7mINV\x1b[0m\n";

    const CURSOR_STORM: &[u8] = b"\x1b[H\x1b[2J\x1b[5;10Hhello\x1b[s\x1b[10;1H\
\x1b[3A\x1b[2B\x1b[4C\x1b[1D\x1b[u\x1b[Kworld\x1b[12d\n";

    vec![
        Corpus {
            id: "plain_text",
            bytes: PLAIN_TEXT,
        },
        Corpus {
            id: "dense_sgr",
            bytes: DENSE_SGR,
        },
        Corpus {
            id: "cursor_storm",
            bytes: CURSOR_STORM,
        },
    ]
}

fn bench_feed(c: &mut Criterion) {
    let mut group = c.benchmark_group("interp_feed");
    for corpus in corpora() {
        group.throughput(Throughput::Bytes(corpus.bytes.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.id),
            corpus.bytes,
            |b, bytes| {
                b.iter(|| {
                    let mut interp = Interpreter::new(80, 24);
                    let mut screen = Screen::new(80, 24);
                    interp.feed(black_box(bytes), &mut screen);
                    black_box(screen.cursor_x())
                });
            },
        );
    }
    group.finish();
}

fn bench_scroll_pressure(c: &mut Criterion) {
    // One full screen of wrapped lines: every row write ends in a scroll.
    let mut line = vec![b'x'; 79];
    line.push(b'\n');
    let bytes: Vec<u8> = line.iter().copied().cycle().take(80 * 48).collect();

    let mut group = c.benchmark_group("scroll_pressure");
    group.throughput(Throughput::Bytes(bytes.len() as u64));
    group.bench_function("wrapped_lines", |b| {
        b.iter(|| {
            let mut interp = Interpreter::new(80, 24);
            let mut screen = Screen::new(80, 24);
            interp.feed(black_box(&bytes), &mut screen);
            black_box(screen.cursor_y())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_feed, bench_scroll_pressure);
criterion_main!(benches);
