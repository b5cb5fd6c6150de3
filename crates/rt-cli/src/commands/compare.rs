use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rt_tracker::{Leader, User, UserId};

use super::Context;
use crate::Identity;

pub async fn run(ctx: &Context, identity: &Identity, users: &[String]) -> Result<(), String> {
    let viewer = match identity.acting.as_deref() {
        Some(id) => super::user_with_role(id, identity.gm),
        None => User::gm("gm"),
    };
    let tracker = ctx.tracker(viewer.clone());

    let targets: Vec<UserId> = if users.is_empty() {
        tracker
            .store()
            .users()
            .await
            .map_err(|e| e.to_string())?
    } else {
        users.iter().map(|u| UserId::new(u.as_str())).collect()
    };

    if targets.is_empty() {
        println!("  No users with recorded rolls.");
        return Ok(());
    }

    let cmp = tracker
        .compare(&viewer, &targets)
        .await
        .map_err(|e| e.to_string())?;

    println!(
        "  {} {}",
        "Comparison".bold(),
        format!("({} users)", targets.len()).dimmed()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Statistic", "Leader", "Value"]);
    table.add_row(row(
        "Highest mean",
        cmp.highest_mean.as_ref(),
        |v| format!("{v:.2}"),
    ));
    table.add_row(row("Highest median", cmp.highest_median.as_ref(), u32::to_string));
    table.add_row(row("Most nat 20s", cmp.most_nat20s.as_ref(), u32::to_string));
    table.add_row(row("Most nat 1s", cmp.most_nat1s.as_ref(), u32::to_string));
    println!("{table}");

    Ok(())
}

fn row<T>(label: &str, leader: Option<&Leader<T>>, fmt: impl Fn(&T) -> String) -> Vec<String> {
    match leader {
        Some(leader) => {
            let names: Vec<String> = leader.users.iter().map(UserId::to_string).collect();
            let names = if leader.is_tie() {
                format!("{} (tie)", names.join(", "))
            } else {
                names.join(", ")
            };
            vec![label.to_string(), names, fmt(&leader.value)]
        }
        None => vec![label.to_string(), "—".to_string(), "—".to_string()],
    }
}
