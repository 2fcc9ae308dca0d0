mod common;

use common::{scratch_path, ModelBuilder};
use plastica_io::{snapshot_path, Genealogy, PopulationSnapshot};
use plastica_lib::app::{self, RunSettings};

#[test]
fn test_genealogy_from_test_mode_snapshots() {
    let base = scratch_path("lineage").to_string_lossy().into_owned();
    let config = ModelBuilder::new()
        .with_seed(9)
        .with_config(|c| {
            c.run.epochs = 2;
            c.run.generations_per_epoch = 3;
            c.run.test_mode = true;
        })
        .config();
    let target = config.evolution.population_size;

    let summary = app::run(RunSettings {
        config,
        trajectory: None,
        snapshot_base: Some(base.clone()),
        resume: None,
    })
    .unwrap();
    assert_eq!(summary.generations, 6);

    let mut paths = Vec::new();
    for epoch in 0..2 {
        for generation in (epoch * 3 + 1)..=(epoch * 3 + 3) {
            let path = snapshot_path(&base, epoch, generation);
            assert!(path.exists(), "missing snapshot {:?}", path);
            paths.push(path);
        }
    }
    let sizes: Vec<usize> = paths
        .iter()
        .map(|p| PopulationSnapshot::read(p).unwrap().population.len())
        .collect();
    assert_eq!(sizes[0], target);
    let size = sizes[5];

    // order must not matter
    paths.reverse();

    let genealogy = Genealogy::from_snapshots(&paths).unwrap();
    assert_eq!(genealogy.final_generation(), Some(6));
    assert_eq!(genealogy.graph.node_count(), sizes.iter().sum::<usize>());

    let counts = genealogy.ancestor_counts();
    assert_eq!(counts.len(), 6);
    assert_eq!(counts.last(), Some(&(6, size)));
    for &(generation, ancestors) in &counts {
        assert!(ancestors > 0, "generation {} has no ancestors", generation);
        assert!(ancestors <= target);
    }

    let dot = genealogy.to_dot(true);
    assert!(dot.starts_with("digraph"));
    let tsv = genealogy.counts_tsv();
    assert_eq!(tsv.lines().count(), 1 + 6);

    let recorded = std::fs::read_to_string(plastica_io::genealogy_path(&base)).unwrap();
    assert!(recorded.trim_end().ends_with('}'));
    // generation 1 founders have no parents to record
    assert_eq!(recorded.matches("->").count(), sizes[1..].iter().sum::<usize>());

    for path in paths {
        std::fs::remove_file(path).ok();
    }
    for path in [plastica_io::genealogy_path(&base), plastica_io::checkpoint_path(&base)] {
        std::fs::remove_file(path).ok();
    }
}
