//! Performance benchmark comparing the naive and HashLife evaluators

use std::time::Instant;

use life_engine::{
    GameOfLifeAlgorithm, HashLifeAlgorithm, NaiveAlgorithm, Pattern, presets,
    domain::random_soup,
};

fn time_ms(algorithm: &dyn GameOfLifeAlgorithm, pattern: &Pattern, generations: u64) -> (f64, usize) {
    let start = Instant::now();
    let result = algorithm.compute_generation_with_step(&pattern.cells, generations);
    (start.elapsed().as_secs_f64() * 1000.0, result.len())
}

fn main() {
    env_logger::init();

    println!("=== Game of Life Evaluator Benchmark ===\n");

    let soup = Pattern {
        name: "Soup 64x64",
        description: "Random 35% fill",
        cells: random_soup(64, 64, 0.35, 2024),
    };
    let patterns = [
        presets::glider_gun(),
        presets::r_pentomino(),
        presets::acorn(),
        soup,
    ];
    let generations = [100u64, 1_000, 5_000];

    println!(
        "{:>20} {:>8} {:>12} {:>12} {:>12} {:>10}",
        "Pattern", "Gens", "Population", "Naive ms", "HashLife ms", "Speedup"
    );
    println!("{:-<80}", "");

    for pattern in &patterns {
        for &gens in &generations {
            // Fresh evaluators so memoization from earlier rows does not count
            let naive = NaiveAlgorithm::default();
            let hashlife = HashLifeAlgorithm::default();

            let (naive_ms, naive_pop) = time_ms(&naive, pattern, gens);
            let (hash_ms, hash_pop) = time_ms(&hashlife, pattern, gens);
            assert_eq!(naive_pop, hash_pop, "evaluators disagree on {}", pattern.name);

            println!(
                "{:>20} {:>8} {:>12} {:>12.2} {:>12.2} {:>9.1}x",
                pattern.name,
                gens,
                naive_pop,
                naive_ms,
                hash_ms,
                naive_ms / hash_ms.max(f64::EPSILON)
            );
        }
    }

    println!("\n=== HashLife long jumps ===\n");

    let hashlife = HashLifeAlgorithm::default();
    for exponent in [10u32, 13, 16, 18] {
        let gens = 1u64 << exponent;
        let (ms, population) = time_ms(&hashlife, &presets::glider_gun(), gens);
        let (nodes, memoized) = hashlife.cache_stats();
        println!(
            "Gosper gun, 2^{:<2} generations: {:>10.2} ms, population {:>14}, {} nodes, {} memoized",
            exponent, ms, population, nodes, memoized
        );
    }
}
