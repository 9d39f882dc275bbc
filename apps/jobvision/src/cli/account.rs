//! Sign-in form commands over the local auth store.

use std::process::ExitCode;

use anyhow::Result;

use crate::auth::kv::FileStore;
use crate::auth::store::LocalAuthStore;
use crate::auth::AuthError;
use crate::cli::{drain_notifications, LoginArgs, RegisterArgs};
use crate::config::Config;
use crate::flow::notifications::{Level, NotificationCenter};
use crate::models::user::Session;

fn open_store(config: &Config) -> LocalAuthStore<FileStore> {
    LocalAuthStore::new(FileStore::new(config.data_dir.clone()))
}

pub fn register(args: RegisterArgs, config: &Config) -> Result<ExitCode> {
    let outcome = open_store(config).register(&args.email, &args.name, &args.password);
    report(outcome.map(|session| registered(&session)), Level::Success)
}

pub fn login(args: LoginArgs, config: &Config) -> Result<ExitCode> {
    let outcome = open_store(config).login(&args.email, &args.password);
    report(
        outcome.map(|session| vec![welcome_back(&session)]),
        Level::Success,
    )
}

pub fn logout(config: &Config) -> Result<ExitCode> {
    let outcome = open_store(config).logout();
    report(
        outcome.map(|_| vec!["You have been logged out".to_string()]),
        Level::Info,
    )
}

pub fn whoami(config: &Config) -> Result<ExitCode> {
    match open_store(config).current_session()? {
        Some(session) => println!("👤 {} <{}>", session.full_name, session.email),
        None => println!("Not signed in."),
    }
    Ok(ExitCode::SUCCESS)
}

/// Registration signs the new user in, so both greetings are shown.
fn registered(session: &Session) -> Vec<String> {
    vec![
        format!("Account created successfully! Welcome {}", session.full_name),
        welcome_back(session),
    ]
}

fn welcome_back(session: &Session) -> String {
    format!("Welcome back, {}!", session.full_name)
}

/// Shows the outcome as notifications, in order. Storage failures propagate;
/// form errors only change the exit code.
fn report(outcome: Result<Vec<String>, AuthError>, level: Level) -> Result<ExitCode> {
    let notifications = NotificationCenter::new();
    let mut feed = notifications.subscribe();

    let code = match outcome {
        Ok(messages) => {
            for message in messages {
                notifications.notify(level, message);
            }
            ExitCode::SUCCESS
        }
        Err(error @ (AuthError::Storage(_) | AuthError::Corrupt { .. })) => {
            return Err(error.into());
        }
        Err(error) => {
            notifications.error(error.user_message());
            ExitCode::FAILURE
        }
    };

    drain_notifications(&mut feed);
    Ok(code)
}
