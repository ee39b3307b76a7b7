//! Visualization functions using Plotters for basket analysis results

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::debug;

use crate::apriori::{Analysis, FrequentItemsets};
use crate::data::top_items;
use crate::rules::AssociationRule;

/// Color palette for bars, cycled by position
const BAR_COLORS: [RGBColor; 5] = [RED, BLUE, GREEN, CYAN, MAGENTA];

pub const ITEM_FREQUENCY_CHART: &str = "item_frequency.png";
pub const RULE_SCATTER_CHART: &str = "rules_support_confidence.png";
pub const ITEMSET_SIZE_CHART: &str = "itemsets_by_size.png";

/// (support %, confidence %) per rule, in rule order
pub fn rule_scatter_points(rules: &[AssociationRule]) -> Vec<(f64, f64)> {
    rules
        .iter()
        .map(|rule| (rule.support * 100.0, rule.confidence * 100.0))
        .collect()
}

/// (size, number of frequent itemsets of that size), ascending by size
pub fn itemset_size_distribution(frequent: &FrequentItemsets) -> Vec<(usize, usize)> {
    frequent.count_by_size().into_iter().collect()
}

/// Draw a vertical bar chart of labelled counts
fn draw_bar_chart(
    bars: &[(String, usize)],
    output_path: &Path,
    title: &str,
    x_desc: &str,
    y_desc: &str,
) -> crate::Result<()> {
    let max_count = bars.iter().map(|(_, count)| *count).max().unwrap_or(1);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(
            (0usize..bars.len()).into_segmented(),
            0usize..max_count + max_count / 10 + 1,
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) => bars
                .get(*idx)
                .map(|(label, _)| label.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    for (idx, (_, count)) in bars.iter().enumerate() {
        let color = BAR_COLORS[idx % BAR_COLORS.len()];
        chart.draw_series(
            Histogram::vertical(&chart)
                .style(color.filled())
                .margin(10)
                .data(std::iter::once((idx, *count))),
        )?;
    }

    root.present()?;
    debug!(path = %output_path.display(), "chart saved");

    Ok(())
}

/// Create a bar chart of the most frequent items
pub fn create_item_frequency_chart(
    item_counts: &BTreeMap<String, usize>,
    top_n: usize,
    output_path: &Path,
) -> crate::Result<()> {
    let bars = top_items(item_counts, top_n);
    draw_bar_chart(
        &bars,
        output_path,
        &format!("Top {} Items by Transaction Count", bars.len()),
        "Item",
        "Transactions",
    )
}

/// Create a bar chart of how many frequent itemsets exist per size
pub fn create_itemset_size_chart(
    frequent: &FrequentItemsets,
    output_path: &Path,
) -> crate::Result<()> {
    let bars: Vec<(String, usize)> = itemset_size_distribution(frequent)
        .into_iter()
        .map(|(size, count)| (format!("{} item", size), count))
        .collect();
    draw_bar_chart(
        &bars,
        output_path,
        "Frequent Itemsets by Size",
        "Itemset size",
        "Itemsets",
    )
}

/// Create a scatter plot of rule support against confidence
pub fn create_rule_scatter_chart(
    rules: &[AssociationRule],
    output_path: &Path,
) -> crate::Result<()> {
    let points = rule_scatter_points(rules);
    let max_support = points.iter().map(|(x, _)| *x).fold(0.0, f64::max);

    let root = BitMapBackend::new(output_path, (800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Association Rules: Support vs Confidence", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(max_support * 1.1).max(1.0), 0f64..105f64)?;

    chart
        .configure_mesh()
        .x_desc("Support (%)")
        .y_desc("Confidence (%)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|&(support, confidence)| Circle::new((support, confidence), 5, BLUE.filled())),
    )?;

    root.present()?;
    debug!(path = %output_path.display(), "chart saved");

    Ok(())
}

/// Render every chart that has data into `output_dir`
///
/// # Returns
/// * Paths of the charts that were written
pub fn generate_visualization_report(
    analysis: &Analysis,
    output_dir: &Path,
    top_n: usize,
) -> crate::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;
    let mut written = Vec::new();

    if !analysis.item_counts.is_empty() && top_n > 0 {
        let path = output_dir.join(ITEM_FREQUENCY_CHART);
        create_item_frequency_chart(&analysis.item_counts, top_n, &path)?;
        written.push(path);
    }

    if analysis.has_rules() {
        let path = output_dir.join(RULE_SCATTER_CHART);
        create_rule_scatter_chart(&analysis.rules, &path)?;
        written.push(path);
    }

    if analysis.has_frequent_itemsets() {
        let path = output_dir.join(ITEMSET_SIZE_CHART);
        create_itemset_size_chart(&analysis.frequent_itemsets, &path)?;
        written.push(path);
    }

    Ok(written)
}
