//! Interactive page: lines typed (or pasted) accumulate into the input,
//! commands starting with `:` drive the controller.

use std::process::ExitCode;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use crate::auth::kv::FileStore;
use crate::auth::store::LocalAuthStore;
use crate::cli::http_api;
use crate::config::Config;
use crate::flow::controller::{PredictionFlowController, UiState};
use crate::flow::health::spawn_health_probe;
use crate::flow::notifications::NotificationCenter;

const HELP: &str = "Paste a job description, then :predict (:p). \
    :back returns from a result, :clear empties the input, \
    :status shows the current notice, :quit exits.";

#[derive(Debug, PartialEq)]
enum Action<'a> {
    Predict,
    Back,
    Clear,
    Status,
    Quit,
    Help,
    Text(&'a str),
}

fn parse_line(line: &str) -> Action<'_> {
    match line.trim() {
        ":predict" | ":p" => Action::Predict,
        ":back" | ":b" => Action::Back,
        ":clear" => Action::Clear,
        ":status" | ":s" => Action::Status,
        ":quit" | ":q" => Action::Quit,
        ":help" | ":h" => Action::Help,
        _ => Action::Text(line),
    }
}

pub async fn run(config: &Config) -> Result<ExitCode> {
    let api = http_api(config)?;
    let notifications = NotificationCenter::new();

    let mut feed = notifications.subscribe();
    let printer = tokio::spawn(async move {
        loop {
            match feed.recv().await {
                Ok(notification) => eprintln!("{notification}"),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    });

    let auth = LocalAuthStore::new(FileStore::new(config.data_dir.clone()));
    match auth.current_session() {
        Ok(Some(session)) => println!("👤 {}", session.full_name),
        Ok(None) => println!("Not signed in."),
        Err(error) => tracing::warn!("cannot read session: {error}"),
    }
    println!("{HELP}");

    let _probe = spawn_health_probe(api.clone(), notifications.clone(), config.health_timeout);
    let controller =
        PredictionFlowController::new(api, notifications.clone(), config.predict_timeout);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Action::Quit => break,
            Action::Help => println!("{HELP}"),
            Action::Predict => {
                let input = controller.view().input;
                if let Ok(render) = controller.submit(&input).await {
                    println!("{render}");
                    println!("(:back to analyze another posting)");
                }
            }
            Action::Back => controller.reset(),
            Action::Clear => {
                controller.set_input("");
                notifications.dismiss();
            }
            Action::Status => println!("{}", status_line(&notifications)),
            Action::Text(text) => {
                if controller.ui_state() == UiState::ResultShown {
                    println!("Use :back to analyze another posting.");
                    continue;
                }
                let mut input = controller.view().input;
                if !input.is_empty() {
                    input.push('\n');
                }
                input.push_str(text);
                controller.set_input(input);
            }
        }
    }

    printer.abort();
    Ok(ExitCode::SUCCESS)
}

/// The notification still on screen, or a placeholder once it has expired.
fn status_line(notifications: &NotificationCenter) -> String {
    notifications
        .current()
        .map_or_else(|| "No active notifications.".to_string(), |n| n.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_line(":predict"), Action::Predict);
        assert_eq!(parse_line("  :p  "), Action::Predict);
        assert_eq!(parse_line(":back"), Action::Back);
        assert_eq!(parse_line(":clear"), Action::Clear);
        assert_eq!(parse_line(":q"), Action::Quit);
        assert_eq!(parse_line(":status"), Action::Status);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_line_clears_after_notification_expires() {
        let notifications = NotificationCenter::new();
        notifications.error("Server error. Please try again.");
        assert_eq!(
            status_line(&notifications),
            "❌ Server error. Please try again."
        );

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(status_line(&notifications), "No active notifications.");
    }

    #[test]
    fn test_other_lines_are_input_text() {
        assert_eq!(
            parse_line("  Senior engineer wanted"),
            Action::Text("  Senior engineer wanted")
        );
        assert_eq!(parse_line(":unknown"), Action::Text(":unknown"));
    }
}
