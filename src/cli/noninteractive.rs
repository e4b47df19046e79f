use anyhow::Result;

use super::output;
use crate::core::notifier::NoticeLevel;

pub async fn run(
    mut app: super::App,
    prompt: String,
    output_format: super::OutputFormat,
    quiet: bool,
) -> Result<()> {
    let progress = (!quiet && output_format == super::OutputFormat::Text).then(|| {
        output::spawn_progress_printer(
            app.orchestrator.subscribe_progress(),
            app.orchestrator.step_labels().to_vec(),
        )
    });

    let outcome = app.orchestrator.submit_query(&prompt).await;
    if let Some(handle) = progress {
        handle.abort();
    }
    let notices = output::drain_notices(&mut app.notices);

    match output_format {
        super::OutputFormat::Text => {
            for notice in &notices {
                output::render_notice(notice);
            }
            match outcome {
                Some(outcome) => output::render_outcome(&outcome),
                None => anyhow::bail!("Query did not run"),
            }
        }
        super::OutputFormat::Json => {
            let errors: Vec<&str> = notices
                .iter()
                .filter(|n| n.level == NoticeLevel::Error)
                .map(|n| n.message.as_str())
                .collect();

            let output = match outcome {
                Some(outcome) => serde_json::json!({
                    "sessionId": outcome.session_id,
                    "analysis": outcome.analysis.as_ref().map(|a| a.to_value()),
                    "errors": errors,
                }),
                None => serde_json::json!({
                    "error": errors.first().copied().unwrap_or("Query did not run"),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
