#![allow(missing_docs)]
use criterion::{Criterion, criterion_group, criterion_main};
use fieldmap::{Mapper, Record};

#[derive(Clone, Default, Record)]
struct Row {
    #[map("path=user,id")]
    id: u64,
    #[map("path=user,name")]
    name: String,
    #[map("path=user,active;negate")]
    disabled: bool,
    #[map("path=stats,score")]
    score: Option<f64>,
}

#[derive(Clone, Default, Record)]
struct User {
    id: u64,
    name: String,
    active: bool,
}

#[derive(Clone, Default, Record)]
struct Stats {
    score: f64,
}

#[derive(Clone, Default, Record)]
struct Profile {
    user: User,
    stats: Option<Stats>,
}

fn bench_decode(c: &mut Criterion) {
    let mapper = Mapper::builder().transform("negate", |b: &bool| !b).build();
    let row = Row {
        id: 42,
        name: "ada".into(),
        disabled: false,
        score: Some(9.5),
    };

    let mut group = c.benchmark_group("Decode");

    group.bench_function("cached_decoder", |b| {
        let decoder = mapper
            .decoder::<Row, Profile>()
            .expect("Failed to build decoder");
        b.iter(|| {
            let mut dst = Profile::default();
            decoder.decode(&row, &mut dst).expect("Failed to decode");
            std::hint::black_box(dst);
        });
    });

    group.bench_function("lookup_and_decode", |b| {
        b.iter(|| {
            let dst: Profile = mapper.map(&row).expect("Failed to decode");
            std::hint::black_box(dst);
        });
    });

    group.bench_function("build_uncached", |b| {
        b.iter(|| {
            let fresh = Mapper::builder().transform("negate", |b: &bool| !b).build();
            std::hint::black_box(fresh.decoder::<Row, Profile>().expect("Failed to build decoder"));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
