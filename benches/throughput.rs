use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use filmbet::{
    core::ranking::rank_members,
    film::{Film, FilmSnapshot},
    member::Member,
};

fn snapshot(list: &str, range: std::ops::Range<u32>) -> FilmSnapshot {
    FilmSnapshot::from_films(
        list,
        range.map(|i| Film::new(format!("Film {i}"), format!("/film/{i}/")).with_runtime(90 + i % 60)),
    )
}

fn bench_difference(c: &mut Criterion) {
    let old = snapshot("/l/", 0..5_000);
    let new = snapshot("/l/", 50..5_050);
    c.bench_function("snapshot_difference_5k", |b| {
        b.iter(|| new.difference(&old).len());
    });
}

fn bench_reconcile(c: &mut Criterion) {
    let old = snapshot("/l/", 0..5_000);
    let new = snapshot("/l/", 10..5_010);
    c.bench_function("member_reconcile_5k", |b| {
        b.iter(|| {
            let mut m = Member::new("m", "/m/", "/l/").with_snapshot(old.clone());
            m.reconcile(new.clone())
        });
    });
}

fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_members");
    for n in [10usize, 100usize, 1000usize] {
        let members: Vec<Member> = (0..n)
            .map(|i| {
                let list = format!("/m{i}/list/");
                let count = (i * 7 % 40) as u32;
                Member::new(format!("m{i}"), format!("/m{i}/"), &list).with_snapshot(snapshot(&list, 0..count))
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &members, |b, members| {
            b.iter(|| {
                let mut ranked = members.clone();
                rank_members(&mut ranked);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_difference, bench_reconcile, bench_rank);
criterion_main!(benches);
