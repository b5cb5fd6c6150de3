use rt_tracker::UserId;

use super::Context;
use crate::Identity;

pub async fn run(ctx: &Context, identity: &Identity, user: &str, json: bool) -> Result<(), String> {
    let viewer = super::acting_user(identity, user);
    let tracker = ctx.tracker(viewer.clone());
    let summary = tracker
        .summary(&viewer, &UserId::new(user))
        .await
        .map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
    } else {
        println!("{summary}");
    }
    Ok(())
}
