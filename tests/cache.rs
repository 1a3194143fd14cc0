use rand::prelude::*;
use rand_distr::Normal;

use boostcache::prelude::*;


const N_INSTANCES: usize = 200;


/// Two real inputs drawn from a standard normal distribution
/// and one ternary input.
fn random_population(seed: u64) -> Inputs {
    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0).unwrap();
    let x = (0..N_INSTANCES)
        .map(|_| rng.sample(normal))
        .collect::<Vec<f64>>();
    let y = (0..N_INSTANCES)
        .map(|i| if i % 17 == 0 { f64::NAN } else { rng.sample(normal) })
        .collect::<Vec<f64>>();
    let z = (0..N_INSTANCES)
        .map(|_| Ternary::from(rng.gen_bool(0.5)))
        .collect::<Vec<_>>();
    Inputs::from_columns(vec![
        ("x", Values::Real(x)),
        ("y", Values::Real(y)),
        ("z", Values::Ternary(z)),
    ])
}


/// A handful of composite nodes over the inputs.
fn candidates(pool: &mut ExprPool) -> Vec<NodeId> {
    let x = pool.input(0);
    let y = pool.input(1);
    let z = pool.input(2);
    let xy = pool.binary(BinaryOp::Mul, x, y);
    let sum = pool.binary(BinaryOp::Add, x, y);
    let sq = pool.unary(UnaryOp::Square, sum);
    let log = pool.unary(UnaryOp::Log, x);
    let ratio = pool.binary(BinaryOp::Div, y, x);
    let gt = pool.greater_than(xy, 0.0);
    let both = pool.and(gt, z);
    let either = pool.or(both, z);
    let not = pool.not(either);
    vec![x, y, z, xy, sum, sq, log, ratio, gt, both, either, not]
}


#[cfg(test)]
pub mod cache_tests {
    use super::*;

    #[test]
    fn transparency() {
        let inputs = random_population(1234);
        let mut pool = ExprPool::for_inputs(&inputs);
        let nodes = candidates(&mut pool);

        let mut reference = SampleCache::unlimited(inputs.clone());
        let mut cache = SampleCacheBuilder::new(inputs)
            .budget_bytes(6_000)
            .eviction_batch(2)
            .build();

        let mut rng = StdRng::seed_from_u64(99);
        let full = IndexSet::full(N_INSTANCES);
        for round in 0..30 {
            let indices = if round % 3 == 0 {
                full.clone()
            } else {
                full.subsample(N_INSTANCES / 3, &mut rng)
            };
            for &node in &nodes {
                let expect = reference.get_samples(&pool, node, &indices);
                let result = cache.get_samples(&pool, node, &indices);
                assert_eq!(
                    expect, result,
                    "node {node} differs in round {round}"
                );
            }
        }
        assert!(cache.stats().evictions > 0);
    }


    #[test]
    fn budget_enforcement() {
        let inputs = random_population(7);
        let input_bytes = inputs.byte_size();
        let mut pool = ExprPool::for_inputs(&inputs);
        let nodes = candidates(&mut pool);

        let budget = input_bytes + 3 * N_INSTANCES * 8;
        let mut cache = SampleCacheBuilder::new(inputs)
            .budget_bytes(budget)
            .build();

        let full = IndexSet::full(N_INSTANCES);
        for _ in 0..10 {
            for &node in &nodes {
                cache.get_samples(&pool, node, &full);
                // the sorted index of an input is pinned with it.
                let composite = pool.input_variable(node).is_none();
                if composite && pool.output_kind(node) == OutputKind::Real {
                    cache.get_sorted_values(&pool, node, &full);
                }
                assert!(
                    cache.used_bytes() <= budget,
                    "used {} bytes over a budget of {budget}",
                    cache.used_bytes(),
                );
            }
        }

        cache.clear();
        let result = cache.used_bytes();
        let expect = input_bytes;
        assert_eq!(expect, result, "expected {expect}, got {result}.");
        assert_eq!(cache.eviction_threshold(), 0);
    }


    #[test]
    fn byte_accounting() {
        let xs = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        let inputs = Inputs::from_columns(vec![("x", Values::Real(xs))]);
        let mut pool = ExprPool::for_inputs(&inputs);
        let mut cache = SampleCache::unlimited(inputs);
        let full = IndexSet::full(10);

        // inputs: 10 reals.
        assert_eq!(cache.used_bytes(), 80);

        let x = pool.input(0);
        let neg = pool.unary(UnaryOp::Neg, x);
        let gt = pool.greater_than(x, 4.5);

        // a real vector: 80 bytes.
        cache.cache_node(&pool, neg, true);
        assert_eq!(cache.used_bytes(), 160);

        // a ternary vector: 10 bytes.
        cache.cache_node(&pool, gt, true);
        assert_eq!(cache.used_bytes(), 170);

        // the sorted index of an input: 10 pairs.
        let pair = std::mem::size_of::<(usize, f64)>();
        cache.get_sorted_values(&pool, x, &full);
        assert_eq!(cache.used_bytes(), 170 + 10 * pair);

        cache.uncache_node(neg);
        assert_eq!(cache.used_bytes(), 90 + 10 * pair);

        cache.clear();
        assert_eq!(cache.used_bytes(), 80);
    }


    #[test]
    fn sentinel_immunity() {
        let xs = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        let inputs = Inputs::from_columns(vec![("x", Values::Real(xs))]);
        let mut pool = ExprPool::for_inputs(&inputs);
        let mut cache = SampleCache::unlimited(inputs);
        let full = IndexSet::full(10);

        let x = pool.input(0);
        let pinned = pool.unary(UnaryOp::Abs, x);
        let loose = pool.unary(UnaryOp::Square, x);
        cache.cache_node(&pool, pinned, false);
        cache.cache_node(&pool, loose, true);
        for _ in 0..50 {
            cache.get_samples(&pool, pinned, &full);
        }

        // pinned data alone exceeds the budget.
        cache.set_budget_bytes(1);
        assert!(cache.is_cached(pinned));
        assert!(cache.is_cached(x));
        assert!(!cache.is_cached(loose));
        assert_eq!(cache.demand(pinned), Some(-1));
        assert_eq!(cache.used_bytes(), 160);
    }


    #[test]
    fn eviction_order() {
        let xs = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        let inputs = Inputs::from_columns(vec![("x", Values::Real(xs))]);
        let mut pool = ExprPool::for_inputs(&inputs);
        let mut cache = SampleCache::unlimited(inputs);
        let full = IndexSet::full(10);

        let x = pool.input(0);
        let rare = pool.unary(UnaryOp::Abs, x);
        let frequent = pool.unary(UnaryOp::Square, x);
        let pinned = pool.unary(UnaryOp::Neg, x);
        cache.cache_node(&pool, rare, true);
        cache.cache_node(&pool, frequent, true);
        cache.cache_node(&pool, pinned, false);

        cache.get_samples(&pool, rare, &full);
        for _ in 0..10 {
            cache.get_samples(&pool, frequent, &full);
        }
        assert_eq!(cache.demand(rare), Some(10));
        assert_eq!(cache.demand(frequent), Some(100));

        // 4 real vectors of 80 bytes; one must go.
        cache.set_budget_bytes(250);
        assert!(!cache.is_cached(rare));
        assert!(cache.is_cached(frequent));
        assert!(cache.is_cached(pinned));
        assert_eq!(cache.used_bytes(), 240);
        assert_eq!(cache.eviction_threshold(), 20);

        let stats = cache.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.eviction_rounds, 1);
    }


    #[test]
    fn sorted_subset_stability() {
        let inputs = random_population(42);
        let mut pool = ExprPool::for_inputs(&inputs);
        let nodes = candidates(&mut pool);
        let mut cache = SampleCache::unlimited(inputs);
        let full = IndexSet::full(N_INSTANCES);

        let mut rng = StdRng::seed_from_u64(5);
        for &node in &nodes {
            if pool.output_kind(node) != OutputKind::Real { continue; }
            cache.cache_node(&pool, node, false);
            cache.get_sorted_values(&pool, node, &full);
            assert!(cache.has_sorted(node));

            for size in [0, 1, 10, N_INSTANCES / 2, N_INSTANCES - 1] {
                let subset = full.subsample(size, &mut rng);
                let samples = cache.get_samples(&pool, node, &subset);
                let expect = SortedValues::from_samples(&samples);
                let result = cache.get_sorted_values(&pool, node, &subset);
                assert_eq!(
                    expect.pairs(), result.pairs(),
                    "node {node}, subset of size {size}"
                );
            }
        }
    }


    #[test]
    fn stats_count_hits_and_misses() {
        let xs = (0..10).map(|i| i as f64).collect::<Vec<_>>();
        let inputs = Inputs::from_columns(vec![("x", Values::Real(xs))]);
        let mut pool = ExprPool::for_inputs(&inputs);
        let mut cache = SampleCache::unlimited(inputs);
        let full = IndexSet::full(10);

        let x = pool.input(0);
        let abs = pool.unary(UnaryOp::Abs, x);
        cache.get_samples(&pool, abs, &full);
        cache.get_samples(&pool, abs, &full);
        cache.get_samples(&pool, abs, &full);

        let stats = cache.stats();
        assert_eq!(stats.materialized, 1);
        assert!(stats.hits >= 1);
        assert!(stats.misses >= 2);
        assert!(stats.hit_rate() > 0.0);
    }
}
