use criterion::{criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use udeval::{evaluate, evaluate_str, load_conllu, DeprelWeights, EvaluationConfig};

const DEPRELS: [&str; 6] = ["nsubj", "obj", "obl:tmod", "det", "case", "punct"];

fn record(id: &str, form: &str, head: usize, deprel: &str) -> String {
    format!(
        "{}\t{}\t{}\tX\t_\t_\t{}\t{}\t_\t_\n",
        id,
        form,
        form.to_lowercase(),
        head,
        deprel
    )
}

/// Builds a treebank of `sentences` sentences. Every third token of the gold treebank is the
/// multi-word token `del` (`de` + `el`). The system treebank does not split it, and attaches some
/// words to other heads.
fn build_treebanks(sentences: usize) -> (String, String) {
    let (mut gold, mut system) = (String::new(), String::new());
    for s in 0..sentences {
        gold.push_str(&format!("# sent_id = {}\n", s));
        let (mut gold_id, mut system_id) = (1, 1);
        for t in 0..15 {
            let deprel = DEPRELS[(s + t) % DEPRELS.len()];
            if t % 3 == 2 {
                gold.push_str(&record(&format!("{}-{}", gold_id, gold_id + 1), "del", 0, "_"));
                gold.push_str(&record(&gold_id.to_string(), "de", 1, "case"));
                gold.push_str(&record(&(gold_id + 1).to_string(), "el", 1, "det"));
                system.push_str(&record(&system_id.to_string(), "del", 1, "case"));
                gold_id += 2;
            } else {
                let form = format!("w{}", (s * 7 + t) % 50);
                let head = if t == 0 { 0 } else { 1 };
                let system_head = if (s + t) % 5 == 0 { 2 } else { head };
                gold.push_str(&record(&gold_id.to_string(), &form, head, deprel));
                system.push_str(&record(&system_id.to_string(), &form, system_head, deprel));
                gold_id += 1;
            }
            system_id += 1;
        }
        gold.push('\n');
        system.push('\n');
    }
    (gold, system)
}

fn benchmark_load_treebank(c: &mut Criterion) {
    let (gold, _) = build_treebanks(2000);
    c.bench_function("load_treebank", |b| b.iter(|| load_conllu(&gold).unwrap()));
}

fn benchmark_evaluate_loaded_treebank(c: &mut Criterion) {
    let (gold_text, system_text) = build_treebanks(2000);
    let gold = load_conllu(&gold_text).unwrap();
    let system = load_conllu(&system_text).unwrap();
    let weights = DeprelWeights::from_iter([("punct", 0.1), ("det", 0.1), ("case", 0.1)]);
    c.bench_function("evaluate_loaded_treebank", |b| {
        b.iter(|| evaluate(&gold, &system, Some(&weights)).unwrap())
    });
}

fn benchmark_evaluate_treebank_text(c: &mut Criterion) {
    let (gold, system) = build_treebanks(2000);
    c.bench_function("evaluate_treebank_text", |b| {
        b.iter(|| evaluate_str(&gold, &system, EvaluationConfig::default()).unwrap())
    });
}

criterion_group!(
    name=treebank_benches;
    config = Criterion::default().sample_size(100).with_profiler(PProfProfiler::new(3000, Output::Flamegraph(None)));
    targets = benchmark_load_treebank,
    benchmark_evaluate_loaded_treebank,
    benchmark_evaluate_treebank_text
);
criterion_main!(treebank_benches);
