use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use recmem_core::{Response, ResponseEntry, ResponseRecord};
use recmem_results::{TestTable, score};

/// A test table of `n` studied and `n` new images, each with one invalid
/// press before the valid answer.
fn session(n: usize) -> (TestTable, Vec<String>) {
    let study: Vec<String> = (0..n).map(|i| format!("study_{i}.jpg")).collect();
    let mut records = Vec::with_capacity(2 * n);
    for i in 0..n {
        for (image, answer) in [
            (format!("study_{i}.jpg"), Response::Old),
            (format!("new_{i}.jpg"), Response::New),
        ] {
            records.push(ResponseRecord::new(
                image,
                vec![
                    ResponseEntry::invalid("x", 0.2),
                    ResponseEntry::valid(answer, 0.4 + i as f64 * 1e-3),
                ],
            ));
        }
    }
    let table = TestTable {
        subject_id: 1,
        date: "bench".into(),
        records,
    };
    (table, study)
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    for n in [5usize, 50, 500] {
        let (table, study) = session(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| score(black_box(&table), black_box(&study), 1).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_score);
criterion_main!(benches);
