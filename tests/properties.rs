use mazegraph::{
    Direction, Grid,
    codec,
    generators::{GenContext, GenOptions, Generator, generate_maze},
    solvers::{Distances, shortest_path},
    validator::{check_grid, is_spanning_tree},
};
use proptest::prelude::*;

fn generated(generator: Generator, rows: usize, columns: usize, seed: u64, weave: f64) -> Grid {
    let mut grid = Grid::new(rows, columns, &[]).unwrap();
    let mut ctx = GenContext::new(Some(seed)).with_options(GenOptions {
        weave_probability: weave,
        ..GenOptions::default()
    });
    generate_maze(&mut grid, generator, &mut ctx).unwrap();
    grid
}

fn any_generator() -> impl Strategy<Value = Generator> {
    prop::sample::select(Generator::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn codec_round_trip_is_exact(
        generator in any_generator(),
        rows in 1usize..12,
        columns in 1usize..12,
        seed in any::<u64>(),
        weave in 0.0f64..=1.0,
    ) {
        let grid = generated(generator, rows, columns, seed, weave);
        let encoded = codec::encode(&grid);
        let decoded = codec::decode(&encoded, rows, columns, &[]).unwrap();
        prop_assert_eq!(codec::encode(&decoded), encoded);
        prop_assert_eq!(decoded.under_cells().len(), grid.under_cells().len());
        for &id in grid.cells() {
            prop_assert_eq!(decoded[id].link_bits(), grid[id].link_bits());
        }
    }

    #[test]
    fn perfect_mazes_are_valid_trees(
        generator in any_generator().prop_filter("perfect", |g| g.is_perfect()),
        rows in 2usize..14,
        columns in 2usize..14,
        seed in any::<u64>(),
    ) {
        let grid = generated(generator, rows, columns, seed, 0.0);
        prop_assert!(is_spanning_tree(&grid));
        prop_assert_eq!(check_grid(&grid), Ok(()));
    }

    #[test]
    fn linked_cells_differ_by_one_step(
        generator in any_generator(),
        rows in 1usize..10,
        columns in 1usize..10,
        seed in any::<u64>(),
        root_pick in any::<prop::sample::Index>(),
    ) {
        let grid = generated(generator, rows, columns, seed, 0.5);
        let root = grid.cells()[root_pick.index(grid.cells().len())];
        let distances = Distances::new(&grid, root);
        prop_assert_eq!(distances.get(root), Some(0));

        for &id in grid.cells().iter().chain(grid.under_cells()) {
            for dir in Direction::ALL.into_iter().filter(|&dir| grid[id].is_linked(dir)) {
                let Some(other) = grid.passage(id, dir) else {
                    continue;
                };
                if let (Some(a), Some(b)) = (distances.get(id), distances.get(other)) {
                    prop_assert_eq!(a.abs_diff(b), 1);
                }
            }
        }

        let (furthest, distance) = distances.furthest_cell();
        prop_assert!(distances.reachable().all(|(_, d)| d <= distance));
        let path = shortest_path(&grid, root, furthest).unwrap();
        prop_assert_eq!(path.distance(), distance);
        prop_assert!(path.cells().zip(path.cells().skip(1)).all(|(a, b)| grid.is_linked(a, b)));
    }
}
