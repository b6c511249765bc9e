//! Whole-run properties of the erosion engine
//!
//! Covers determinism, volume bookkeeping, grid bounds and the flat / ramp
//! reference scenarios.

use approx::assert_relative_eq;
use rainfall_core::{
    ErosionEngine, ErosionParams, Heightmap, NoiseConfig, Raindrop, StepOutcome, Termination,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn noise_terrain(width: usize, height: usize, seed: u32) -> Heightmap {
    let noise = NoiseConfig {
        scale: 16.0,
        seed,
        ..NoiseConfig::default()
    };
    Heightmap::from_noise(width, height, &noise).unwrap()
}

fn bits(map: &Heightmap) -> Vec<u64> {
    map.as_slice().iter().map(|h| h.to_bits()).collect()
}

#[test]
fn test_identical_engines_produce_identical_grids() {
    init_tracing();
    let terrain = noise_terrain(64, 48, 3);
    let params = ErosionParams::for_width(64).with_seed(666_555);

    let mut a = ErosionEngine::new(terrain.clone(), params).unwrap();
    let mut b = ErosionEngine::new(terrain, params).unwrap();
    for _ in 0..3 {
        let stats_a = a.simulate(200);
        let stats_b = b.simulate(200);
        assert_eq!(stats_a, stats_b);
    }

    assert_eq!(bits(a.heightmap()), bits(b.heightmap()));
}

#[test]
fn test_different_seeds_diverge() {
    let terrain = noise_terrain(64, 64, 3);
    let mut a = ErosionEngine::new(terrain.clone(), ErosionParams::for_width(64).with_seed(1))
        .unwrap();
    let mut b = ErosionEngine::new(terrain, ErosionParams::for_width(64).with_seed(2)).unwrap();
    a.simulate(100);
    b.simulate(100);
    assert_ne!(bits(a.heightmap()), bits(b.heightmap()));
}

#[test]
fn test_zero_raindrops_leave_grid_untouched() {
    let terrain = noise_terrain(32, 32, 9);
    let expected = bits(&terrain);
    let mut engine = ErosionEngine::new(terrain, ErosionParams::for_width(32)).unwrap();

    let batch = engine.simulate(0);
    assert_eq!(batch.raindrops, 0);
    assert_eq!(batch.steps, 0);
    assert_eq!(bits(engine.heightmap()), expected);
}

#[test]
fn test_volume_drops_by_evaporation_rate_each_step() {
    let mut map = noise_terrain(48, 48, 5);
    let evaporation = 1.0 / 64.0;
    let params = ErosionParams::default()
        .with_scale(1.0)
        .with_evaporation_rate(evaporation);

    for (x, y) in [(10, 10), (24, 30), (40, 5)] {
        let mut drop = Raindrop::at(x, y);
        let mut previous = drop.volume();
        loop {
            let outcome = drop.step(&mut map, &params);
            match outcome {
                StepOutcome::Moved => {
                    assert_eq!(previous - drop.volume(), evaporation);
                    assert!(drop.volume() > 0.0);
                    previous = drop.volume();
                }
                StepOutcome::Terminated(Termination::Evaporated) => {
                    assert_eq!(drop.volume(), 0.0);
                    assert_eq!(drop.steps(), params.max_steps());
                    break;
                }
                StepOutcome::Terminated(Termination::OutOfBounds) => {
                    // Volume is untouched on the exiting step
                    assert_eq!(drop.volume(), previous);
                    assert!(drop.steps() <= params.max_steps());
                    break;
                }
            }
        }
    }
}

#[test]
fn test_flat_grid_raindrop_never_moves() {
    init_tracing();
    let original = Heightmap::flat(5, 5, 0.0).unwrap();
    let params = ErosionParams::for_width(5).with_evaporation_rate(0.25);
    let mut engine = ErosionEngine::new(original.clone(), params).unwrap();

    for _ in 0..20 {
        let report = engine.raindrop();
        assert_eq!(report.termination, Termination::Evaporated);
        assert_eq!(report.steps, 4);
        assert_eq!(report.sediment, 0.0);
    }
    assert_eq!(engine.heightmap(), &original);

    // Default evaporation: 512 steps, still no movement
    let mut map = original.clone();
    let mut drop = Raindrop::at(2, 3);
    let params = ErosionParams::default();
    while drop.step(&mut map, &params) == StepOutcome::Moved {
        assert_eq!(drop.position().x, 2.0);
        assert_eq!(drop.position().y, 3.0);
    }
    assert_eq!(drop.steps(), 512);
    assert_eq!(drop.termination(), Some(Termination::Evaporated));
    assert_eq!(map, original);
}

#[test]
fn test_ramp_drop_drifts_downhill_and_erodes() {
    // Elevation rises with x, so the drop slides towards x = 0.
    // Start left of centre (x = 10 of 32) and right of centre (x = 20).
    for start_x in [10, 20] {
        let mut map = Heightmap::ramp_x(32, 9, -1.0, 1.0 / 16.0).unwrap();
        let before_total = map.total();
        let origin_before = map.get(start_x, 4);
        let params = ErosionParams::for_width(32).with_scale(10.0);

        let mut drop = Raindrop::at(start_x, 4);
        let mut last_x = drop.position().x;
        let outcome = loop {
            let outcome = drop.step(&mut map, &params);
            let x = drop.position().x;
            assert!(x <= last_x, "drop from x={start_x} moved uphill: {last_x} -> {x}");
            last_x = x;
            if let StepOutcome::Terminated(termination) = outcome {
                break termination;
            }
        };

        assert_eq!(outcome, Termination::OutOfBounds);
        assert!(drop.position().x < 1.0);
        assert!(
            map.get(start_x, 4) < origin_before,
            "origin cell x={start_x} should be eroded"
        );
        assert!(map.total() < before_total, "net material should be removed");
    }
}

#[test]
fn test_flat_grid_step_count_matches_max_steps() {
    // 1/3 and 1/10 leave a rounding sliver that costs one extra step
    for (width, expected) in [(3, 4), (10, 11), (100, 100)] {
        let mut map = Heightmap::flat(5, 5, 0.0).unwrap();
        let params = ErosionParams::for_width(width);
        let report = Raindrop::at(2, 2).run(&mut map, &params);
        assert_eq!(report.termination, Termination::Evaporated);
        assert_eq!(report.steps, expected, "evaporation 1/{width}");
        assert_eq!(params.max_steps(), report.steps);
    }
}

#[test]
fn test_grid_sum_is_not_conserved() {
    let terrain = noise_terrain(64, 64, 11);
    let before = terrain.total();
    let mut engine = ErosionEngine::new(terrain, ErosionParams::for_width(64)).unwrap();
    engine.simulate(300);
    let after = engine.heightmap().total();
    assert!(
        (after - before).abs() > 1e-9,
        "erosion writes only the origin cell, so mass is not conserved"
    );
}

#[test]
fn test_lookups_stay_inside_grid() {
    init_tracing();
    // Any out-of-range access panics, so finishing the run is the assertion.
    // The smallest grid has a single interior cell.
    let tiny = Heightmap::from_rows(vec![
        vec![0.9, -0.4, 0.7],
        vec![-0.2, 0.5, -0.8],
        vec![0.3, -0.6, 0.1],
    ])
    .unwrap();
    let mut engine = ErosionEngine::new(tiny, ErosionParams::for_width(3)).unwrap();
    let stats = engine.simulate(500);
    assert_eq!(stats.raindrops, 500);
    assert_eq!(stats.evaporated + stats.out_of_bounds, 500);

    for (width, height) in [(3, 40), (40, 3), (17, 23)] {
        let mut engine = ErosionEngine::new(
            noise_terrain(width, height, 21),
            ErosionParams::for_width(width).with_scale(250.0),
        )
        .unwrap();
        engine.simulate(300);
        assert_eq!(engine.heightmap().width(), width);
        assert_eq!(engine.heightmap().height(), height);
    }
}

#[test]
fn test_long_run_stays_finite() {
    let terrain = noise_terrain(64, 64, 4);
    let mut engine = ErosionEngine::new(
        terrain,
        ErosionParams::for_width(64).with_deposition_rate(1.0),
    )
    .unwrap();
    let batch = engine.simulate(2_000);
    let (lo, hi) = engine.heightmap().range();
    assert!(lo.is_finite() && hi.is_finite());
    assert_eq!(engine.stats(), &batch);
    assert_relative_eq!(
        batch.mean_steps() * batch.raindrops as f64,
        batch.steps as f64,
        max_relative = 1e-12
    );
}
