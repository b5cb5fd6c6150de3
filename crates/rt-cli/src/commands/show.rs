use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rt_core::FACES;
use rt_tracker::UserId;

use super::Context;
use crate::Identity;

const BAR_WIDTH: u64 = 30;

pub async fn run(ctx: &Context, identity: &Identity, user: &str, json: bool) -> Result<(), String> {
    let viewer = super::acting_user(identity, user);
    let tracker = ctx.tracker(viewer.clone());
    let stats = tracker
        .stats(&viewer, &UserId::new(user))
        .await
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&stats.to_snapshot())
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    println!("  {} {}", "Roll stats for".bold(), user.bold());
    if stats.is_empty() {
        println!("  No d20 rolls recorded.");
        return Ok(());
    }

    let mode = stats.mode();
    let modes: Vec<String> = mode.modes.iter().map(u32::to_string).collect();
    println!("  {stats}");
    println!(
        "  Mode: {} {}   Streak: {}",
        modes.join(", "),
        format!("({} each)", mode.count).dimmed(),
        stats.streak()
    );
    println!();

    let percents = stats.percents();
    let max = stats.histogram().iter().copied().max().unwrap_or(0).max(1);

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Face", "Count", "%", ""]);
    for (face, (&count, percent)) in (1..=FACES).zip(stats.histogram().iter().zip(percents)) {
        let width = bar_width(count, max);
        table.add_row(vec![
            face.to_string(),
            count.to_string(),
            percent.to_string(),
            "█".repeat(width),
        ]);
    }
    println!("{table}");

    Ok(())
}

/// Bar length for `count`, scaled so the largest counter fills the bar.
fn bar_width(count: u32, max: u32) -> usize {
    (u64::from(count) * BAR_WIDTH).div_ceil(u64::from(max.max(1))) as usize
}
