criterion::criterion_main!(benches);
criterion::criterion_group! {
    name = benches;
    config = criterion::Criterion::default()
        .without_plots()
        .noise_threshold(3.0)
        .significance_level(0.01)
        .sample_size(20)
        .measurement_time(std::time::Duration::from_secs(1));
    targets =
        learning_a_fuzzy_category,
        scoring_a_large_fuzzy_store,
        training_an_artmap_association,
        stepping_a_shunting_field,
        stepping_a_masking_field,
        offering_to_a_replay_buffer,
}

use art_engine::art::{scorer, ArtEngine, Params};
use art_engine::artmap::{ArtMapEngine, MapParams};
use art_engine::category::CategoryStore;
use art_engine::kernel::{self, KernelKind};
use art_engine::memory::{MaskingField, MaskingParams, WorkingMemory, WorkingMemoryParams};
use art_engine::pattern::Pattern;
use art_engine::replay::ReplayBuffer;
use art_engine::shunting::{NeuronArray, ShuntingParams};

fn fuzzy_params(vigilance: f32) -> Params {
    let mut params = Params::default();
    params.kernel = KernelKind::Fuzzy { alpha: 0.01 };
    params.vigilance = vigilance;
    params
}

fn learning_a_fuzzy_category(c: &mut criterion::Criterion) {
    c.bench_function("learn a fuzzy-ART category", |b| {
        b.iter(|| {
            let mut engine = ArtEngine::new(fuzzy_params(0.8)).unwrap();
            engine
                .learn(&Pattern::new(vec![0.8, 0.6, 0.4, 0.2, 0.4, 0.6]))
                .unwrap()
        })
    });
}

fn scoring_a_large_fuzzy_store(c: &mut criterion::Criterion) {
    let params = fuzzy_params(0.99);
    let mut store = CategoryStore::new(2048);
    for i in 0..2000 {
        let v = (i as f32 % 10.0) / 10.0;
        store
            .allocate(kernel::create_initial_weight(
                params.kernel,
                &Pattern::new(vec![v, 1.0 - v, v, 1.0 - v]),
            ))
            .unwrap();
    }
    let input = Pattern::new(vec![0.5, 0.5, 0.5, 0.5]);
    c.bench_function("rank 2000 fuzzy categories", |b| {
        b.iter(|| scorer::rank(params.kernel, &input, &store, true, 64))
    });
}

fn training_an_artmap_association(c: &mut criterion::Criterion) {
    c.bench_function("train one ARTMAP association", |b| {
        b.iter(|| {
            let mut engine =
                ArtMapEngine::new(fuzzy_params(0.7), fuzzy_params(0.7), MapParams::default())
                    .unwrap();
            engine
                .train(
                    &Pattern::new(vec![0.9, 0.8, 0.1, 0.2]),
                    &Pattern::new(vec![1.0, 0.0]),
                )
                .unwrap()
        })
    });
}

fn stepping_a_shunting_field(c: &mut criterion::Criterion) {
    let params = ShuntingParams {
        parallel_threshold: 32,
        ..ShuntingParams::default()
    };
    let exc = vec![0.3, 0.4, 1.0, 0.4, 0.3, 0.2, 0.2];
    let inh = vec![0.0; 7];
    c.bench_function("one Euler step over 7 neurons", |b| {
        let mut field = NeuronArray::new(params, 7).unwrap();
        b.iter(|| field.update(&exc, &inh).unwrap())
    });
}

fn stepping_a_masking_field(c: &mut criterion::Criterion) {
    c.bench_function("one masking-field integration step", |b| {
        let mut field = MaskingField::new(MaskingParams::default()).unwrap();
        let mut memory = WorkingMemory::new(WorkingMemoryParams::default()).unwrap();
        for i in 0..4 {
            memory.insert(Pattern::new(vec![i as f32]));
        }
        b.iter(|| field.step(memory.items()))
    });
}

fn offering_to_a_replay_buffer(c: &mut criterion::Criterion) {
    c.bench_function("offer into a 256-slot replay buffer", |b| {
        let mut buffer = ReplayBuffer::new(256).unwrap();
        let mut rng = rand::rngs::SmallRng::from_entropy();
        b.iter(|| buffer.offer(Pattern::new(vec![0.1, 0.2, 0.3]), 0, &mut rng))
    });
}

use rand::SeedableRng;
