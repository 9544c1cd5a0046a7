use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use regchain::syntax::{DeclarationKind, DeclarationNode};
use regchain::{
    AttributeData, CancellationToken, CompilationSnapshot, DependencyInjectionGenerator,
    SemanticModel, Span, TypeSymbol, TypedConstant,
};

fn annotations() -> (Arc<TypeSymbol>, Arc<TypeSymbol>) {
    let marker = TypeSymbol::interface("IRegisterServiceAttribute")
        .namespace("Regchain.Registration.Annotations")
        .build();
    let base = TypeSymbol::class("RegisterServiceAttribute")
        .namespace("Regchain.Registration.Annotations")
        .implements(marker.clone())
        .build();
    let scope_enum = TypeSymbol::enumeration("RegistrationScope")
        .namespace("Regchain.Registration.Annotations")
        .build();
    let singleton = TypeSymbol::class("RegisterServiceSingletonAttribute")
        .namespace("Regchain.Registration.Annotations")
        .base(base.clone())
        .attribute(
            AttributeData::new(base).with_constructor_argument(TypedConstant::Enum {
                enum_type: scope_enum,
                member: "Singleton".to_string(),
                ordinal: 2,
            }),
        )
        .build();
    (marker, singleton)
}

fn snapshot_with_candidates(count: usize) -> CompilationSnapshot {
    let (marker, singleton) = annotations();
    let mut snapshot =
        CompilationSnapshot::new("Bench.App", SemanticModel::new()).with_marker(marker);

    for index in 0..count {
        let contract = TypeSymbol::interface(format!("IService{}", index))
            .namespace("Bench.App")
            .build();
        let service = TypeSymbol::class(format!("Service{}", index))
            .namespace("Bench.App")
            .implements(contract)
            .attribute(AttributeData::new(singleton.clone()))
            .build();
        let node = DeclarationNode::new(
            format!("Service{}", index),
            DeclarationKind::Class,
            Span::new(0, 8),
        )
        .with_attributes();
        snapshot = snapshot.with_candidate(node, service);
    }

    snapshot
}

fn bench_full_run(c: &mut Criterion) {
    let generator = DependencyInjectionGenerator::new();
    let token = CancellationToken::new();

    let mut group = c.benchmark_group("generator_run");
    for count in [1usize, 16, 128] {
        let snapshot = snapshot_with_candidates(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &snapshot, |b, snapshot| {
            b.iter(|| {
                let output = generator.run(snapshot, &token).unwrap();
                black_box(output.sources.len());
            })
        });
    }
    group.finish();
}

fn bench_stub_only(c: &mut Criterion) {
    let generator = DependencyInjectionGenerator::new();
    let token = CancellationToken::new();
    let snapshot = snapshot_with_candidates(0);

    c.bench_function("generator_run_empty", |b| {
        b.iter(|| {
            let output = generator.run(&snapshot, &token).unwrap();
            black_box(output.sources.len());
        })
    });
}

criterion_group!(benches, bench_full_run, bench_stub_only);
criterion_main!(benches);
