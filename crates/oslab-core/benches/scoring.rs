use criterion::{black_box, criterion_group, criterion_main, Criterion};

use oslab_core::inputs::{AnalysisInput, ComparisonInput, ConclusionsInput};
use oslab_core::model::{AdvantageGroup, ArchitectureClass, LabSpec};
use oslab_core::parser;
use oslab_core::placement::Board;
use oslab_core::scoring::{
    score_analysis, score_classification, score_comparison, score_conclusions,
};

fn lab() -> LabSpec {
    parser::builtin_lab().expect("built-in lab parses")
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_classification");
    let spec = lab();

    group.bench_function("empty_board", |b| {
        let board = Board::new(&spec.classification);
        b.iter(|| score_classification(black_box(&board)))
    });

    group.bench_function("full_board", |b| {
        let mut board = Board::new(&spec.classification);
        board.place("linux", "monolithic").unwrap();
        board.place("windows-nt", "hybrid").unwrap();
        board.place("qnx", "microkernel").unwrap();
        board.place("macos", "monolithic").unwrap();
        board.place("minix", "microkernel").unwrap();
        b.iter(|| score_classification(black_box(&board)))
    });

    group.finish();
}

fn bench_text_rubrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_rubrics");
    let spec = lab();

    group.bench_function("analysis_long_text", |b| {
        let input = AnalysisInput {
            architecture: Some(ArchitectureClass::Monolithic),
            justification: "kernel modules share one address space ".repeat(50),
        };
        b.iter(|| score_analysis(black_box(&spec.analysis), black_box(&input)))
    });

    group.bench_function("conclusions_four_essays", |b| {
        let mut input = ConclusionsInput::new(&spec.conclusions);
        for field in ["main-conclusions", "applicability", "trends", "tradeoffs"] {
            input
                .set(
                    &spec.conclusions,
                    field,
                    "isolation versus throughput, again ".repeat(20),
                )
                .unwrap();
        }
        b.iter(|| score_conclusions(black_box(&spec.conclusions), black_box(&input)))
    });

    group.finish();
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("score_comparison");
    let spec = lab();

    group.bench_function("everything_checked", |b| {
        let mut input = ComparisonInput::new(&spec.comparison);
        for option in &spec.comparison.monolithic_options {
            input
                .toggle(&spec.comparison, AdvantageGroup::Monolithic, &option.id)
                .unwrap();
        }
        for option in &spec.comparison.microkernel_options {
            input
                .toggle(&spec.comparison, AdvantageGroup::Microkernel, &option.id)
                .unwrap();
        }
        input.set_scenario(0, ArchitectureClass::Monolithic).unwrap();
        input.set_scenario(1, ArchitectureClass::Microkernel).unwrap();
        input.set_scenario(2, ArchitectureClass::Hybrid).unwrap();
        b.iter(|| score_comparison(black_box(&spec.comparison), black_box(&input)))
    });

    group.finish();
}

criterion_group!(benches, bench_classification, bench_text_rubrics, bench_comparison);
criterion_main!(benches);
