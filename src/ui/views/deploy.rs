use crate::application::DeploySummary;

/// Stdout lines for a finished deploy. Kept plain so scripts can grep them.
pub fn render_deploy_summary(summary: &DeploySummary) -> String {
    format!(
        "production: {}\npreview: {}\n",
        summary.production_url, summary.preview_url
    )
}

/// Stack outputs, one `key = value` per line, for `-v` runs
pub fn render_stack_outputs(summary: &DeploySummary) -> String {
    summary
        .outputs
        .iter()
        .map(|(k, v)| format!("{k} = {v}\n"))
        .collect()
}
