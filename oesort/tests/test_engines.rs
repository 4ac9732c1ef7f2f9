use oesort::config::{BarrierKind, Schedule, SortConfig};
use oesort::engine::{PoolEngine, RayonEngine, RayonSchedule, SequentialEngine, SortEngine};
use oesort::error::SortError;
use oesort::is_sorted;
use std::cmp::Ordering;
use oesort::sync::SpinPolicy;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn all_engines(workers: usize, chunk: usize) -> Vec<Box<dyn SortEngine<u32>>> {
    vec![
        Box::new(SequentialEngine::default()),
        Box::new(PoolEngine::new(
            SortConfig::new(workers).with_schedule(Schedule::Static),
        )),
        Box::new(PoolEngine::new(
            SortConfig::new(workers).with_schedule(Schedule::Dynamic { chunk }),
        )),
        Box::new(PoolEngine::new(
            SortConfig::new(workers)
                .with_schedule(Schedule::Static)
                .with_barrier(BarrierKind::Blocking),
        )),
        Box::new(PoolEngine::new(
            SortConfig::new(workers)
                .with_schedule(Schedule::Dynamic { chunk })
                .with_barrier(BarrierKind::Spin(SpinPolicy::Yield)),
        )),
        Box::new(RayonEngine::new(workers, RayonSchedule::Block, false).unwrap()),
        Box::new(RayonEngine::new(workers, RayonSchedule::Cyclic(chunk), false).unwrap()),
        Box::new(RayonEngine::new(workers, RayonSchedule::Dynamic(chunk), false).unwrap()),
    ]
}

fn random_input(rng: &mut StdRng, n: usize) -> Vec<u32> {
    // small value range so duplicates are common
    (0..n).map(|_| rng.gen_range(0..(n as u32 / 2 + 1))).collect()
}

#[test]
fn test_sorted_permutation_of_input() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in [2, 3, 4, 5, 17, 64, 255, 1000] {
        for workers in [1, 2, 3, 8] {
            for chunk in [1, 4, 33] {
                let input = random_input(&mut rng, n);
                let mut expected = input.clone();
                expected.sort();
                let mut seq_iterations = None;
                for engine in all_engines(workers, chunk) {
                    let mut data = input.clone();
                    let report = engine.sort(&mut data).unwrap();
                    assert!(is_sorted(&data), "{} left n={} unsorted", engine.name(), n);
                    assert_eq!(data, expected, "{} lost elements", engine.name());
                    // the phases do not depend on how they are split
                    let iterations = *seq_iterations.get_or_insert(report.iterations);
                    assert_eq!(report.iterations, iterations, "engine {}", engine.name());
                }
            }
        }
    }
}

#[test]
fn test_reversed_five() {
    for engine in all_engines(4, 3) {
        let mut data = vec![4, 3, 2, 1, 0];
        let report = engine.sort(&mut data).unwrap();
        assert_eq!(data, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.iterations, 4, "engine {}", engine.name());
    }
}

#[test]
fn test_already_sorted_single_iteration() {
    for engine in all_engines(3, 2) {
        let mut data: Vec<u32> = (0..301).collect();
        let report = engine.sort(&mut data).unwrap();
        assert_eq!(report.iterations, 1, "engine {}", engine.name());
        assert_eq!(report.total_swaps(), 0);
        assert_eq!(data, (0..301).collect::<Vec<u32>>());
    }
}

#[test]
fn test_empty_and_single_untouched() {
    for engine in all_engines(4, 8) {
        let mut empty: Vec<u32> = Vec::new();
        let report = engine.sort(&mut empty).unwrap();
        assert_eq!(report.iterations, 0);
        assert!(empty.is_empty());

        let mut one = vec![42];
        let report = engine.sort(&mut one).unwrap();
        assert_eq!(report.iterations, 0);
        assert_eq!(one, vec![42]);
    }
}

#[test]
fn test_more_workers_than_couples() {
    for engine in all_engines(16, 1) {
        let mut data = vec![3, 2, 1, 0, 5];
        engine.sort(&mut data).unwrap();
        assert_eq!(data, vec![0, 1, 2, 3, 5]);
    }
}

#[test]
fn test_reversed_iteration_bound() {
    // a reversed input needs n phases plus one clean iteration
    for n in [2usize, 6, 7, 100, 101] {
        let mut data: Vec<u32> = (0..n as u32).rev().collect();
        let report = SequentialEngine::default().sort(&mut data).unwrap();
        assert!(is_sorted(&data));
        assert!(report.iterations as usize <= n);
        assert_eq!(report.iterations as usize, n.div_ceil(2) + 1);
    }
}

#[test]
fn test_static_wait_all_reuse_stress() {
    // thousands of iterations through the mid barrier's wait_all without an
    // intervening reset by the workers themselves
    let mut rng = StdRng::seed_from_u64(11);
    for policy in [SpinPolicy::Backoff, SpinPolicy::Yield] {
        for workers in [2, 5, 12] {
            let mut data: Vec<u32> = (0..2000).collect();
            data.shuffle(&mut rng);
            let config = SortConfig::new(workers)
                .with_schedule(Schedule::Static)
                .with_barrier(BarrierKind::Spin(policy));
            let report = PoolEngine::new(config).sort(&mut data).unwrap();
            assert!(is_sorted(&data));
            assert_eq!(data, (0..2000).collect::<Vec<u32>>());
            assert!(report.iterations > 1);
        }
    }
}

#[test]
fn test_pure_spin_policy() {
    let mut data: Vec<u32> = (0..500).rev().collect();
    let config = SortConfig::new(2)
        .with_schedule(Schedule::Dynamic { chunk: 16 })
        .with_barrier(BarrierKind::Spin(SpinPolicy::Spin));
    let report = PoolEngine::new(config).sort(&mut data).unwrap();
    assert_eq!(data, (0..500).collect::<Vec<u32>>());
    assert_eq!(report.iterations, 251);
}

#[test]
fn test_engine_reusable() {
    let engine = PoolEngine::new(SortConfig::new(3).with_schedule(Schedule::Dynamic { chunk: 7 }));
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let mut data = random_input(&mut rng, 200);
        engine.sort(&mut data).unwrap();
        assert!(is_sorted(&data));
    }
}

#[test]
fn test_generic_elements() {
    let engine = PoolEngine::new(SortConfig::new(2).with_schedule(Schedule::Static));
    let mut words = vec!["pear", "apple", "fig", "kiwi", "banana"];
    engine.sort(&mut words).unwrap();
    assert_eq!(words, vec!["apple", "banana", "fig", "kiwi", "pear"]);

    let mut pairs = vec![(2, 'b'), (1, 'z'), (2, 'a'), (0, 'q')];
    SequentialEngine::default().sort(&mut pairs).unwrap();
    assert_eq!(pairs, vec![(0, 'q'), (1, 'z'), (2, 'a'), (2, 'b')]);
}

// Comparing against the poisoned value panics, like a buggy user `Ord`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Fragile(u32);

const POISON: u32 = 7;

impl Ord for Fragile {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.0 == POISON || other.0 == POISON {
            panic!("cannot compare {}", POISON);
        }
        self.0.cmp(&other.0)
    }
}

impl PartialOrd for Fragile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[test]
fn test_panicking_compare_stops_the_pool() {
    let schedules = [Schedule::Static, Schedule::Dynamic { chunk: 2 }];
    let barriers = [BarrierKind::default(), BarrierKind::Blocking];
    for schedule in schedules {
        for barrier in barriers {
            let config = SortConfig::new(2)
                .with_schedule(schedule)
                .with_barrier(barrier);
            let engine = PoolEngine::new(config);
            let mut data: Vec<Fragile> = (0..40).rev().map(Fragile).collect();
            let result = engine.sort(&mut data);
            assert!(matches!(result, Err(SortError::WorkerPanicked(_))));

            // a panic never lands between a compare and its swap
            let mut values: Vec<u32> = data.iter().map(|f| f.0).collect();
            values.sort_unstable();
            assert_eq!(values, (0..40).collect::<Vec<u32>>());
        }
    }
}

#[test]
fn test_huge_dynamic_chunk() {
    let mut rng = StdRng::seed_from_u64(11);
    for chunk in [1usize << 62, usize::MAX / 2 + 1, usize::MAX] {
        let config = SortConfig::new(3).with_schedule(Schedule::Dynamic { chunk });
        let mut data = random_input(&mut rng, 301);
        let mut expected = data.clone();
        expected.sort();
        PoolEngine::new(config).sort(&mut data).unwrap();
        assert_eq!(data, expected);
    }
}
