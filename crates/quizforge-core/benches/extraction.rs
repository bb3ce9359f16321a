use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizforge_core::extract::{extract_evaluation_result, extract_question_set};

fn bench_extract_question_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_question_set");

    let bare = r#"{"questions":[{"question":"Q1","type":"Multipla","options":["a","b"],"answer":"a"},{"question":"Q2","type":"Discursiva","options":[],"answer":"x"}]}"#;

    let fenced = format!("Here is your test:\n\n```json\n{bare}\n```\n\nGood luck!");

    let large = {
        let items: Vec<String> = (0..50)
            .map(|i| {
                format!(
                    r#"{{"question":"Question {i}","type":"Multipla","options":["a{i}","b{i}","c{i}","d{i}"],"answer":"a{i}"}}"#
                )
            })
            .collect();
        format!("Sure!\n{{\"questions\":[{}]}}", items.join(","))
    };

    group.bench_function("bare", |b| b.iter(|| extract_question_set(black_box(bare))));

    group.bench_function("fenced", |b| {
        b.iter(|| extract_question_set(black_box(&fenced)))
    });

    group.bench_function("large_50", |b| {
        b.iter(|| extract_question_set(black_box(&large)))
    });

    group.finish();
}

fn bench_extract_evaluation(c: &mut Criterion) {
    let raw = "Evaluation:\n{\"score\": 1.37, \"justification\": \"Fully correct and more.\"}";
    c.bench_function("extract_evaluation_result", |b| {
        b.iter(|| extract_evaluation_result(black_box(raw)))
    });
}

criterion_group!(benches, bench_extract_question_set, bench_extract_evaluation);
criterion_main!(benches);
