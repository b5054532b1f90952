//! Taxmark: CLI for marking phylogenetic trees with predicted taxonomic
//! ranks.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use taxmark::marker::{self, RankMarker};
use taxmark::newick;
use taxmark::taxonomy::Rank;

/// Marks internal nodes of a phylogenetic tree with predicted taxonomic
/// ranks, based on average branch-length distances to leaves.
#[derive(Parser, Debug)]
#[command(name = "taxmark")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Newick file containing the tree to label
    input: PathBuf,

    /// Taxon of an anchor node with known rank (repeatable)
    #[arg(long = "anchor", required = true)]
    anchors: Vec<String>,

    /// Rank of the anchor nodes (name like "domain" or prefix like "D__")
    #[arg(long, default_value = "domain")]
    start_rank: Rank,

    /// Minimum bootstrap support required to mark a node
    #[arg(long, default_value_t = 0.0)]
    min_support: f64,

    /// Output file for the labeled tree (default: stdout)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write the support-vs-predicted-ranks table to this file
    #[arg(long)]
    consistency_table: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let tree = newick::parse_file(&args.input)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;

    let anchors: Vec<&str> = args.anchors.iter().map(String::as_str).collect();
    let (tree, report) = RankMarker::new()
        .with_min_support(args.min_support)
        .mark(tree, &anchors, args.start_rank)
        .context("Failed to mark ranks")?;

    eprintln!("{report}");

    if let Some(path) = &args.consistency_table {
        let mut file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        marker::write_consistency(&tree, &mut file)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            newick::write_newick_file(file, &tree)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", tree.to_newick()),
    }

    Ok(())
}
