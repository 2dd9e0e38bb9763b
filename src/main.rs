use std::{error::Error, path::PathBuf};

use clap::Parser;
use env_logger::Env;
use log::info;

use partition_tree::{
    config::{BuilderOptions, DEFAULT_LOG_FILTER},
    topo::{load_msc, Builder},
};

#[derive(Parser, Debug)]
#[command(name = "partition-tree")]
#[command(about = "Build a persistence-simplified partition tree from a JSON complex")]
struct Args {
    /// Path to the complex (values, partitions and merge hierarchy)
    path: PathBuf,

    /// Skip the point accounting check before merging
    #[arg(long, default_value_t = false)]
    no_check: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();
    let args = Args::parse();

    let msc = load_msc(&args.path)?;
    info!(
        "Loaded {:?}: {} points, {} partitions, {} merges",
        args.path,
        msc.values.len(),
        msc.partitions.len(),
        msc.hierarchy.len()
    );

    let mut builder = Builder::from_msc(&msc, BuilderOptions { check_points: !args.no_check });
    let tree = builder.build()?;
    let stats = builder.stats();

    // --- Report ---
    println!("--- Build ---");
    println!("base partitions: {}", stats.base_partitions);
    println!("merges: {} ({} skipped)", stats.merges, stats.skipped_merges);
    println!("nodes created: {}", stats.nodes_created);
    println!("partitions: {} -> {}", stats.partitions_before, stats.partitions_after);
    println!("depth: {} -> {}", stats.depth_before, stats.depth_after);
    println!("single-child partitions: {}", stats.single_child);
    println!(
        "time: prepare {:?}, merge {:?}, simplify {:?}, index {:?}, total {:?}",
        stats.prepare_duration,
        stats.merge_duration,
        stats.simplify_duration,
        stats.index_duration,
        stats.total_duration()
    );

    println!("--- Levels ---");
    for (level, count) in tree.level_histogram() {
        println!("{:.4}: {}", level, count);
    }

    println!("--- Tree ---");
    print!("{}", tree.describe());
    Ok(())
}
