use std::hint::black_box;
use std::time::{Duration, Instant};

use bench::{apply_medium_runtime_config, apply_small_runtime_config, default_rng, shuffled_keys};
use criterion::measurement::Measurement;
use criterion::{BenchmarkGroup, BenchmarkId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use search_tree::{Avl, Balance, RandomPriority, RedBlack, Splay, Tree, Unbalanced};

const SIZES: [usize; 4] = [1_000, 4_000, 16_000, 64_000];
const BUILD_SIZES: [u64; 3] = [1_000, 10_000, 100_000];
const OPS_PER_ITER: usize = 200;
const HIT_RATE_PERCENT: u64 = 80;
const MIXED_UPDATES_PER_ITER: usize = OPS_PER_ITER / 10; // 10% inserts, 10% removes, 80% reads.

#[derive(Clone)]
enum ReadOp {
    Contains { key: u64 },
    LowerBound { key: u64 },
}

#[derive(Clone)]
enum UpdateOp {
    Insert { key: u64 },
    Remove { key: u64 },
}

fn populated<B: Balance + Default>(size: usize, base_seed: u64) -> (Vec<u64>, Tree<u64, B>) {
    let keys: Vec<u64> = (0..size).map(|i| mix_seed(base_seed ^ (i as u64))).collect();
    let tree = keys.iter().copied().collect();
    (keys, tree)
}

pub fn bench_read<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    B: Balance + Default,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let base_seed = seed_base(1, size as u64);
        let (keys, mut tree) = populated::<B>(size, base_seed);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                    let ops: Vec<ReadOp> = (0..OPS_PER_ITER)
                        .map(|_| generate_read_op(&keys, &mut rng))
                        .collect();
                    let start = Instant::now();
                    run_read_ops(&mut tree, &ops);
                    black_box(tree.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_update<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    B: Balance + Default,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let base_seed = seed_base(2, size as u64);
        let (_, mut tree) = populated::<B>(size, base_seed);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                    let ops = generate_update_ops(size, base_seed, iter, &mut rng);
                    let start = Instant::now();
                    run_update_ops(&mut tree, &ops);
                    black_box(tree.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

pub fn bench_mixed<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str)
where
    T: Measurement<Value = Duration>,
    B: Balance + Default,
{
    for &size in &SIZES {
        apply_small_runtime_config(group);
        let base_seed = seed_base(3, size as u64);
        let (keys, mut tree) = populated::<B>(size, base_seed);

        group.bench_function(BenchmarkId::new(label, size), |bencher| {
            bencher.iter_custom(|iters| {
                let mut total = Duration::ZERO;
                for iter in 0..iters {
                    let mut rng = StdRng::seed_from_u64(seed_for_iter(base_seed, iter));
                    let updates = generate_update_ops(size, base_seed, iter, &mut rng);
                    let mut updates = updates.into_iter().take(2 * MIXED_UPDATES_PER_ITER);
                    let reads: Vec<ReadOp> = (0..OPS_PER_ITER - 2 * MIXED_UPDATES_PER_ITER)
                        .map(|_| generate_read_op(&keys, &mut rng))
                        .collect();
                    let start = Instant::now();
                    // One update (alternating insert and remove) after every eight reads.
                    for chunk in reads.chunks(8) {
                        run_read_ops(&mut tree, chunk);
                        if let Some(op) = updates.next() {
                            run_update_ops(&mut tree, &[op]);
                        }
                    }
                    run_update_ops(&mut tree, &updates.collect::<Vec<_>>());
                    black_box(tree.len());
                    total += start.elapsed();
                }
                total
            })
        });
    }
}

/// Builds a tree from scratch, from shuffled and from ascending keys.
pub fn bench_build<B, T>(group: &mut BenchmarkGroup<'_, T>, label: &str, sorted: bool)
where
    T: Measurement<Value = Duration>,
    B: Balance + Default,
{
    for &size in &BUILD_SIZES {
        apply_medium_runtime_config(group);
        let keys = if sorted {
            (0..size).collect()
        } else {
            shuffled_keys(&mut default_rng(), size)
        };
        let id = format!("{label}/{}", if sorted { "sorted" } else { "shuffled" });
        group.bench_function(BenchmarkId::new(id, size), |bencher| {
            bencher.iter(|| {
                let tree: Tree<u64, B> = keys.iter().copied().collect();
                black_box(tree.height())
            })
        });
    }
}

fn generate_read_op(keys: &[u64], rng: &mut StdRng) -> ReadOp {
    let hit = rng.random_range(0..100) < HIT_RATE_PERCENT;
    let key = if hit {
        keys[rng.random_range(0..keys.len())]
    } else {
        rng.random()
    };
    if rng.random::<u64>() & 1 == 0 {
        ReadOp::Contains { key }
    } else {
        ReadOp::LowerBound { key }
    }
}

/// Inserts fresh keys and removes each of them again within the same batch, so the tree size
/// is the same before and after.
fn generate_update_ops(size: usize, base_seed: u64, iter: u64, rng: &mut StdRng) -> Vec<UpdateOp> {
    let inserts = OPS_PER_ITER / 2;
    let mut inserted = Vec::with_capacity(inserts);
    let mut ops = Vec::with_capacity(OPS_PER_ITER);
    for i in 0..OPS_PER_ITER {
        if i % 2 == 0 {
            let id = (size as u64)
                .wrapping_add(iter.wrapping_mul(inserts as u64))
                .wrapping_add((i / 2) as u64);
            let key = mix_seed(base_seed ^ id);
            inserted.push(key);
            ops.push(UpdateOp::Insert { key });
        } else {
            let idx = rng.random_range(0..inserted.len());
            let key = inserted.swap_remove(idx);
            ops.push(UpdateOp::Remove { key });
        }
    }
    debug_assert!(inserted.is_empty());
    ops
}

fn run_read_ops<B: Balance>(tree: &mut Tree<u64, B>, ops: &[ReadOp]) {
    for op in ops {
        match *op {
            ReadOp::Contains { key } => {
                black_box(tree.contains(&key));
            }
            ReadOp::LowerBound { key } => {
                black_box(tree.lower_bound(&key).copied());
            }
        }
    }
}

fn run_update_ops<B: Balance>(tree: &mut Tree<u64, B>, ops: &[UpdateOp]) {
    for op in ops {
        match *op {
            UpdateOp::Insert { key } => {
                black_box(tree.insert(key));
            }
            UpdateOp::Remove { key } => {
                black_box(tree.discard(&key));
            }
        }
    }
}

fn seed_base(workload_id: u64, size: u64) -> u64 {
    mix_seed(0x0DDB_A11A_2026_0000_u64 ^ (workload_id << 48) ^ size)
}

fn seed_for_iter(base: u64, iter: u64) -> u64 {
    mix_seed(base ^ iter.wrapping_mul(SEED_MIX))
}

const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

fn mix_seed(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

pub fn bench_all_read<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_read::<Unbalanced, _>(group, "bst");
    bench_read::<Avl, _>(group, "avl");
    bench_read::<RedBlack, _>(group, "rb");
    bench_read::<Splay, _>(group, "splay");
    bench_read::<RandomPriority, _>(group, "treap");
}

pub fn bench_all_mixed<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_mixed::<Unbalanced, _>(group, "bst");
    bench_mixed::<Avl, _>(group, "avl");
    bench_mixed::<RedBlack, _>(group, "rb");
    bench_mixed::<Splay, _>(group, "splay");
    bench_mixed::<RandomPriority, _>(group, "treap");
}

pub fn bench_all_update<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_update::<Unbalanced, _>(group, "bst");
    bench_update::<Avl, _>(group, "avl");
    bench_update::<RedBlack, _>(group, "rb");
    bench_update::<Splay, _>(group, "splay");
    bench_update::<RandomPriority, _>(group, "treap");
}

pub fn bench_all_build<T>(group: &mut BenchmarkGroup<'_, T>)
where
    T: Measurement<Value = Duration>,
{
    bench_build::<Unbalanced, _>(group, "bst", false);
    // An unbalanced tree degenerates into a list on sorted input.
    for sorted in [false, true] {
        bench_build::<Avl, _>(group, "avl", sorted);
        bench_build::<RedBlack, _>(group, "rb", sorted);
        bench_build::<Splay, _>(group, "splay", sorted);
        bench_build::<RandomPriority, _>(group, "treap", sorted);
    }
}
