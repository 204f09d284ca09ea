use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgen_core::grade_submission;
use quizgen_core::model::{AnswerSubmission, Question, Quiz};
use quizgen_core::validate::parse_external_quiz;

fn make_quiz(n: usize) -> Quiz {
    Quiz {
        title: "Bench".into(),
        questions: (0..n)
            .map(|i| Question {
                stem: format!("Fill in the blank: statement {i} about ____."),
                options: [
                    format!("Alpha {i}"),
                    format!("Beta {i}"),
                    format!("Gamma {i}"),
                    format!("Delta {i}"),
                ],
                answer_index: i % 4,
            })
            .collect(),
    }
}

fn bench_grade(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade_submission");

    for n in [10, 100, 1000] {
        let quiz = make_quiz(n);
        let answers: AnswerSubmission = (0..n).map(|i| (i, (i % 3) as i64)).collect();
        group.bench_function(format!("questions={n}"), |b| {
            b.iter(|| grade_submission(black_box(&quiz), black_box(&answers)))
        });
    }

    group.finish();
}

fn bench_parse_external(c: &mut Criterion) {
    let json = serde_json::to_string(&make_quiz(50)).unwrap_or_default();
    c.bench_function("parse_external_quiz/50", |b| {
        b.iter(|| parse_external_quiz(black_box(&json)))
    });
}

criterion_group!(benches, bench_grade, bench_parse_external);
criterion_main!(benches);
