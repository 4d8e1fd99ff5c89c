use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use vanta_agent::chat::ConversationLog;
use vanta_agent::protocol::Message;
use vanta_agent::stream::ContentDecoder;

fn build_stream(fragments: usize) -> Vec<u8> {
    let mut body = String::with_capacity(fragments * 64);
    for index in 0..fragments {
        body.push_str("data: ");
        body.push_str(
            &serde_json::json!({"type": "content", "content": format!("token-{index} é ")})
                .to_string(),
        );
        body.push('\n');
        if index % 16 == 0 {
            body.push_str("data: {\"type\":\"tool_call\",\"name\":\"noop\"}\n");
        }
    }
    body.push_str("data: [DONE]\n");
    body.into_bytes()
}

fn bench_decoder(c: &mut Criterion) {
    let body = build_stream(2_000);
    let mut group = c.benchmark_group("content_decoder");
    group.throughput(Throughput::Bytes(body.len() as u64));

    for read_size in [7usize, 256, 4096] {
        group.bench_function(format!("reads_of_{read_size}_bytes"), |b| {
            b.iter(|| {
                let mut decoder = ContentDecoder::new();
                let mut total = 0usize;
                let mut on_delta = |delta: &str| total += delta.len();
                for read in body.chunks(read_size) {
                    decoder.push(black_box(read), &mut on_delta);
                }
                black_box(decoder.finish());
                total
            });
        });
    }
    group.finish();
}

fn bench_log_fold(c: &mut Criterion) {
    c.bench_function("conversation_log_deltas", |b| {
        b.iter(|| {
            let mut log = ConversationLog::new();
            log.append(Message::user("hello"));
            let reply = log.append(Message::assistant(""));
            for _ in 0..1_000 {
                log.append_delta(reply, black_box("tok "));
            }
            black_box(log.content_of(reply).map(str::len))
        });
    });
}

criterion_group!(benches, bench_decoder, bench_log_fold);
criterion_main!(benches);
