//! BasketForge: Market basket analysis CLI using the Apriori algorithm
//!
//! This is the main entrypoint that orchestrates transaction loading, itemset
//! mining, rule generation, export and visualization.

use anyhow::Result;
use basketforge::report::{self, print_frequent_itemsets, print_rules};
use basketforge::{load_store, run, viz, Args};
use clap::Parser;
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if args.verbose {
        println!("BasketForge - Market Basket Analysis using Apriori");
        println!("==================================================\n");
    }

    run_full_pipeline(&args)
}

/// Run the full analysis pipeline
fn run_full_pipeline(args: &Args) -> Result<()> {
    println!("=== Market Basket Analysis ===\n");

    // Reject bad thresholds before touching the input file
    let thresholds = args.thresholds()?;
    let start_time = Instant::now();

    // Step 1: Load transactions
    if args.verbose {
        println!("Step 1: Loading transactions");
        println!("  Input file: {}", args.input.display());
    }

    let data_start = Instant::now();
    let store = load_store(&args.input)?;
    let data_time = data_start.elapsed();

    let summary = store.summary();
    println!("✓ Data loaded: {} transactions", summary.transactions);
    println!("  Unique items: {}", summary.unique_items);
    println!(
        "  Average items per transaction: {:.1}",
        summary.avg_items_per_transaction
    );
    if args.verbose {
        println!("  Loading time: {:.2}s", data_time.as_secs_f64());
    }

    // Step 2: Mine itemsets and rules
    if args.verbose {
        println!("\nStep 2: Running Apriori");
        println!("  Minimum support: {:.0}%", thresholds.min_support() * 100.0);
        println!("  Minimum confidence: {:.0}%", thresholds.min_confidence() * 100.0);
    }

    let mining_start = Instant::now();
    let analysis = run(&store, thresholds);
    let mining_time = mining_start.elapsed();

    println!(
        "✓ Analysis complete: {} frequent itemsets, {} rules",
        analysis.frequent_itemsets.len(),
        analysis.rules.len()
    );
    if args.verbose {
        println!("  Mining time: {:.2}s", mining_time.as_secs_f64());
    }

    // Step 3: Print result tables
    let itemset_rows = report::frequent_itemsets_table(&analysis.frequent_itemsets);
    let rule_rows = report::rules_table(&analysis.rules);
    print_frequent_itemsets(&itemset_rows);
    print_rules(&rule_rows);

    if let Some(strongest) = analysis.rules.iter().max_by(|a, b| a.lift.total_cmp(&b.lift)) {
        println!(
            "\nStrongest association: {} (lift {:.2})",
            strongest,
            strongest.lift
        );
    }

    // Step 4: Export tables
    let (itemsets_path, rules_path) = report::export_analysis(&analysis, &args.output_dir)?;
    println!("\n✓ Results exported");
    println!("  Frequent itemsets saved to: {}", itemsets_path.display());
    println!("  Association rules saved to: {}", rules_path.display());

    // Step 5: Generate visualizations
    if !args.no_charts {
        if args.verbose {
            println!("\nStep 5: Generating visualizations");
            println!("  Output directory: {}", args.output_dir.display());
        }

        let viz_start = Instant::now();
        let charts =
            viz::generate_visualization_report(&analysis, &args.output_dir, args.top_items)?;
        let viz_time = viz_start.elapsed();

        println!("\n✓ Visualizations generated");
        for chart in &charts {
            println!("  Chart saved to: {}", chart.display());
        }
        if args.verbose {
            println!("  Visualization time: {:.2}s", viz_time.as_secs_f64());
        }
    }

    let total_time = start_time.elapsed();
    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", total_time.as_secs_f64());

    Ok(())
}
