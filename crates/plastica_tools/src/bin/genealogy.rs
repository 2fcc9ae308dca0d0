use clap::Parser;
use plastica_io::Genealogy;
use std::path::PathBuf;

/// Rebuilds the genealogy of a run from its per-generation snapshots.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Snapshot files; order does not matter.
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,

    /// Where to write the dot graph.
    #[arg(short, long, default_value = "genealogy.dot")]
    dot: PathBuf,

    /// Where to write the per-generation ancestor counts.
    #[arg(short, long, default_value = "ancestors.tsv")]
    counts: PathBuf,

    /// Keep every individual instead of only the final generation's ancestry.
    #[arg(long)]
    full: bool,
}

fn main() -> anyhow::Result<()> {
    plastica_core::init_logging();
    let args = Args::parse();

    let genealogy = Genealogy::from_snapshots(&args.snapshots)?;
    let Some(last) = genealogy.final_generation() else {
        println!("No individuals found in {} snapshot(s).", args.snapshots.len());
        return Ok(());
    };

    std::fs::write(&args.dot, genealogy.to_dot(!args.full))?;
    std::fs::write(&args.counts, genealogy.counts_tsv())?;

    println!(
        "Genealogy up to generation {}: {} individuals, {} parent links.",
        last,
        genealogy.graph.node_count(),
        genealogy.graph.edge_count()
    );
    println!("Graph written to {}", args.dot.display());
    println!("Ancestor counts written to {}", args.counts.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::parse_from(["plastica-genealogy", "run_00_001.json", "run_00_002.json"]);
        assert_eq!(args.snapshots.len(), 2);
        assert_eq!(args.dot, PathBuf::from("genealogy.dot"));
        assert_eq!(args.counts, PathBuf::from("ancestors.tsv"));
        assert!(!args.full);
    }

    #[test]
    fn test_snapshots_are_required() {
        assert!(Args::try_parse_from(["plastica-genealogy"]).is_err());
    }
}
