use criterion::{black_box, criterion_group, criterion_main, Criterion};

use oslab_core::parser::{builtin_lab, parse_lab_str, validate_lab, DEFAULT_LAB_TOML};

fn bench_lab_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("lab_parsing");

    group.bench_function("builtin", |b| {
        b.iter(|| parse_lab_str(black_box(DEFAULT_LAB_TOML)))
    });

    // Catalogs far larger than the built-in one
    let large_25 = generate_lab_toml(25);
    let large_200 = generate_lab_toml(200);

    group.bench_function("25_items", |b| {
        b.iter(|| parse_lab_str(black_box(&large_25)))
    });

    group.bench_function("200_items", |b| {
        b.iter(|| parse_lab_str(black_box(&large_200)))
    });

    group.finish();
}

fn bench_lab_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("lab_validation");

    let builtin = builtin_lab().expect("built-in lab parses");
    group.bench_function("builtin", |b| b.iter(|| validate_lab(black_box(&builtin))));

    let large = parse_lab_str(&generate_lab_toml(200)).expect("generated lab parses");
    group.bench_function("200_items", |b| b.iter(|| validate_lab(black_box(&large))));

    group.finish();
}

fn generate_lab_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[lab]
id = "bench"
title = "Benchmark lab"
global_budget_minutes = 60

[classification]
name = "Classification"
budget_minutes = 15

[[classification.zones]]
id = "monolithic"
title = "Monolithic"
expected = "monolithic"

[[classification.zones]]
id = "microkernel"
title = "Microkernel"
expected = "microkernel"

[[classification.zones]]
id = "hybrid"
title = "Hybrid"
expected = "hybrid"
"#,
    );
    let classes = ["monolithic", "microkernel", "hybrid"];
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[classification.items]]
id = "os-{i}"
name = "OS {i}"
class = "{}"
description = "Synthetic catalog entry {i}"
"#,
            classes[i % classes.len()]
        ));
    }
    s.push_str(
        r#"
[analysis]
name = "Analysis"
budget_minutes = 20
correct = "monolithic"

[[analysis.commands]]
cmd = "uname -a"
description = "Kernel information"
sample_output = "Linux bench 5.15.0"

[comparison]
name = "Comparison"
budget_minutes = 15
monolithic_correct = ["performance"]
microkernel_correct = ["reliability"]

[[comparison.monolithic_options]]
id = "performance"
label = "Performance"

[[comparison.microkernel_options]]
id = "reliability"
label = "Reliability"

[[comparison.scenarios]]
prompt = "Scenario one"
expected = "monolithic"

[[comparison.scenarios]]
prompt = "Scenario two"
expected = "microkernel"

[[comparison.scenarios]]
prompt = "Scenario three"
expected = "hybrid"

[conclusions]
name = "Conclusions"
budget_minutes = 10

[[conclusions.fields]]
id = "main"
label = "Main conclusions"
in_report = true

[[conclusions.fields]]
id = "extra-1"
label = "Extra one"

[[conclusions.fields]]
id = "extra-2"
label = "Extra two"

[[conclusions.fields]]
id = "extra-3"
label = "Extra three"
"#,
    );
    s
}

criterion_group!(benches, bench_lab_parsing, bench_lab_validation);
criterion_main!(benches);
