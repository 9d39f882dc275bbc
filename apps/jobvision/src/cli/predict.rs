use std::process::ExitCode;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::cli::{drain_notifications, http_api, PredictArgs};
use crate::config::Config;
use crate::flow::controller::PredictionFlowController;
use crate::flow::health::spawn_health_probe;
use crate::flow::notifications::NotificationCenter;

/// One-shot prediction: probe health in the background, submit, print.
pub async fn run(args: PredictArgs, config: &Config) -> Result<ExitCode> {
    let text = match (args.text, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("failed to read job description from stdin")?;
            text
        }
    };

    let api = http_api(config)?;
    let notifications = NotificationCenter::new();
    let mut feed = notifications.subscribe();

    let probe = spawn_health_probe(api.clone(), notifications.clone(), config.health_timeout);
    let controller = PredictionFlowController::new(api, notifications, config.predict_timeout);
    let outcome = controller.submit(&text).await;
    // Advisory only: whatever it has not reported by now is dropped.
    probe.abort();

    drain_notifications(&mut feed);
    match outcome {
        Ok(render) => {
            println!("{render}");
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}
