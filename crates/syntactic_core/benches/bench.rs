use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use syntactic_core::{EcmaScript, Language, Policy, PolicySpec, Template, TokenIndex};

const TEMPLATE: &str = "
var countUp = function(n) {
  // Start with a for loop
  for (var i = 0; i < n + 1; i++) {
    // There should be an if statement in the for loop
    if (i === n) {
      console.log('Almost there ...');
    }
    console.log(i);
  }
};
countUp(5);
";

fn submission(copies: usize) -> String {
    (0..copies)
        .map(|i| TEMPLATE.replace("countUp", &format!("countUp{}", i)))
        .collect()
}

fn policy() -> Policy {
    let mut spec = PolicySpec::default();
    spec.whitelist = Some(
        vec![("Keyword".to_string(), vec!["for".to_string(), "var".to_string()])]
            .into_iter()
            .collect(),
    );
    spec.blacklist = Some(
        vec![("Keyword".to_string(), vec!["while".to_string()])]
            .into_iter()
            .collect(),
    );
    Policy::compile(spec).expect("invalid bench policy")
}

fn bench_source(c: &mut Criterion, name: &str, source: &str) {
    let language = EcmaScript::script();
    let template = Template::new(Box::new(language), TEMPLATE).expect("invalid bench template");
    let policy = policy();

    let mut group = c.benchmark_group(name);
    group.sample_size(20);
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tokenize", |b| {
        b.iter(|| TokenIndex::tokenize(&language, black_box(source)))
    });
    group.bench_function("parse", |b| b.iter(|| language.parse(black_box(source))));
    group.bench_function("template", |b| {
        b.iter(|| template.verify(black_box(source)))
    });
    group.bench_function("policy", |b| {
        b.iter(|| policy.verify(&language, black_box(source)))
    });
    group.finish();
}

fn count_up(c: &mut Criterion) {
    bench_source(c, "count_up_x1", &submission(1));
    bench_source(c, "count_up_x200", &submission(200));
}

criterion_group!(benches, count_up);
criterion_main!(benches);
