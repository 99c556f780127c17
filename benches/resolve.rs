use criterion::{black_box, criterion_group, criterion_main, Criterion};
use profile_widgets::profile::record::{ProfileRecord, Testimonial};
use profile_widgets::profile::{default_record, CarouselEffective, ServicesEffective};
use profile_widgets::sync::{parse_record, Sources};

fn bench_resolve(c: &mut Criterion) {
    let shared = ProfileRecord {
        conditions: Some((0..50).map(|i| format!("Condition {i}")).collect()),
        testimonials: Some(
            (0..200)
                .map(|i| Testimonial {
                    quote: format!("Quote {i}"),
                    author: format!("Patient {i}"),
                    age: 40,
                    condition: "Asthma".into(),
                    rating: 5,
                })
                .collect(),
        ),
        ..Default::default()
    };
    let explicit = ProfileRecord::default();
    let raw = serde_json::to_string(&shared).unwrap();

    c.bench_function("parse_shared_record", |b| {
        b.iter(|| parse_record("doctorData", black_box(&raw)))
    });
    c.bench_function("resolve_services", |b| {
        b.iter(|| {
            ServicesEffective::resolve(&Sources::new(
                black_box(Some(&shared)),
                &explicit,
                default_record(),
            ))
        })
    });
    c.bench_function("resolve_carousel_200", |b| {
        b.iter(|| {
            CarouselEffective::resolve(&Sources::new(
                black_box(Some(&shared)),
                &explicit,
                default_record(),
            ))
        })
    });
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
