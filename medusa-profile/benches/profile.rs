use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use medusa_profile::engine::{ProfileEngine, ProfileOptions};
use medusa_profile::matching::{Correspondence, SourceRef};
use medusa_align::ScoringWeights;
use medusa_struct::types::{Atom, Chain, Model, Point3D, Residue};

fn synthetic_model(n: usize, jitter: f64) -> Model {
    let residues = (0..n)
        .map(|i| {
            let base = i as f64 * 6.0;
            let names = ["P", "C1'", "C4'", "N1", "C2", "C6"];
            Residue {
                name: if i % 2 == 0 { "G" } else { "C" }.into(),
                seq_num: i as i32 + 1,
                i_code: None,
                atoms: names
                    .iter()
                    .enumerate()
                    .map(|(k, name)| Atom {
                        serial: (i * names.len() + k) as u32 + 1,
                        name: (*name).into(),
                        coords: Point3D::new(
                            base + k as f64 * 0.8 + jitter * ((i + k) % 3) as f64,
                            (k % 2) as f64,
                            (k % 3) as f64,
                        ),
                        occupancy: 1.0,
                        temp_factor: 0.0,
                        element: None,
                        is_hetatm: false,
                    })
                    .collect(),
            }
        })
        .collect();
    Model {
        serial: 0,
        chains: vec![Chain::new('A', residues)],
    }
}

fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("profile_compute");
    for n in [16usize, 64, 128] {
        let reference = synthetic_model(n, 0.0);
        let comparison = synthetic_model(n, 0.3);
        let corr = Correspondence::inferred(
            &reference,
            &comparison,
            &ScoringWeights::default(),
            SourceRef::new("ref.pdb", 0),
            SourceRef::new("cmp.pdb", 0),
        );
        group.bench_with_input(BenchmarkId::from_parameter(n), &corr, |b, corr| {
            let engine = ProfileEngine::new(corr, Vec::new(), ProfileOptions::default());
            b.iter(|| black_box(engine.compute().unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute);
criterion_main!(benches);
