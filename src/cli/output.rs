use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::core::notifier::{Notice, NoticeLevel};
use crate::core::session::Session;
use crate::orchestrator::{ProgressStatus, QueryOutcome};

pub fn render_notice(notice: &Notice) {
    match notice.level {
        NoticeLevel::Error => eprintln!("\x1b[31;1m[error]\x1b[0m {}", notice.message),
        NoticeLevel::Success => eprintln!("\x1b[32m{}\x1b[0m", notice.message),
        NoticeLevel::Info => eprintln!("\x1b[90m{}\x1b[0m", notice.message),
    }
}

/// Print notices as they arrive until the sending side goes away.
pub fn spawn_notice_printer(mut rx: mpsc::UnboundedReceiver<Notice>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(notice) = rx.recv().await {
            render_notice(&notice);
        }
    })
}

pub fn drain_notices(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

pub fn spawn_progress_printer(
    mut rx: watch::Receiver<ProgressStatus>,
    labels: Vec<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = *rx.borrow_and_update();
            if let Some(line) = progress_line(&status, &labels) {
                eprintln!("\x1b[90m{line}\x1b[0m");
            }
        }
    })
}

pub fn progress_line(status: &ProgressStatus, labels: &[String]) -> Option<String> {
    if !status.analyzing || status.step == 0 {
        return None;
    }
    let label = labels.get(status.step - 1).map(String::as_str).unwrap_or("Working");
    Some(format!("[{}/{}] {label}", status.step, status.total))
}

pub fn render_outcome(outcome: &QueryOutcome) {
    let Some(analysis) = &outcome.analysis else {
        eprintln!("\x1b[31mNo analysis for this query.\x1b[0m");
        return;
    };

    let sentiment = analysis.overall_sentiment().unwrap_or("unknown");
    println!("Overall sentiment: \x1b[1m{sentiment}\x1b[0m");
    if let Some(total) = analysis.total_analyzed() {
        println!("Posts analyzed:    {total}");
    }
    if let Some(id) = &analysis.analysis_id {
        println!("\x1b[90mAnalysis {id} in session {}\x1b[0m", short_id(&outcome.session_id));
    }
}

pub fn render_sessions(sessions: &[Session], current: Option<&str>) {
    if sessions.is_empty() {
        println!("No sessions.");
        return;
    }
    for s in sessions {
        let marker = if Some(s.id.as_str()) == current { " *" } else { "" };
        let pin = if s.pinned { "^ " } else { "" };
        println!(
            "  \x1b[90m{}\x1b[0m  {pin}{}{marker}  ({}, {} msgs, {} analyses)",
            short_id(&s.id),
            s.title,
            s.platform,
            s.message_count,
            s.analysis_count,
        );
    }
}

pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
