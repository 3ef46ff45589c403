use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, RoutingPolicy};
use crate::models::{BackendState, InputSource};
use crate::queue::{FlushArbiter, PassReason, Route};

#[derive(ClapArgs)]
pub struct Args {
    /// Submission text to classify
    pub text: String,

    /// Classify as if the backend were mid-task
    #[arg(long)]
    pub busy: bool,

    /// Treat the text as a programmatic (non-interactive) submission
    #[arg(long)]
    pub programmatic: bool,

    /// Print a JSON object instead of a sentence
    #[arg(long)]
    pub json: bool,

    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Classification {
    pub text: String,
    pub backend: BackendState,
    pub route: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

pub async fn execute(args: Args) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.clone())?;
    let policy = RoutingPolicy::from_env(&config.routing, |key| std::env::var(key).ok());
    let source = if args.programmatic {
        InputSource::Programmatic
    } else {
        InputSource::Interactive
    };

    let result = classify(&args.text, args.busy, source, policy);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize classification")?;
        println!("{}", json);
    } else {
        println!("{}", describe(&result));
    }

    Ok(())
}

pub fn classify(
    text: &str,
    busy: bool,
    source: InputSource,
    policy: RoutingPolicy,
) -> Classification {
    let mut arbiter = FlushArbiter::new();
    if busy {
        arbiter.on_agent_start();
    }

    let (route, reason) = match arbiter.route(text, source, policy) {
        Route::PassThrough(reason) => (
            "pass_through",
            Some(match reason {
                PassReason::Programmatic => "programmatic",
                PassReason::Command => "command",
                PassReason::Restricted => "restricted",
            }),
        ),
        Route::Deliver => ("deliver", None),
        Route::PickMode => ("pick_mode", None),
    };

    Classification {
        text: text.to_string(),
        backend: arbiter.backend(),
        route,
        reason,
    }
}

fn describe(result: &Classification) -> String {
    match (result.route, result.reason) {
        ("deliver", _) => "backend idle: delivered immediately".to_string(),
        ("pick_mode", _) => "backend busy: asks steer or follow-up".to_string(),
        (_, Some("command")) => "slash command: handled as typed".to_string(),
        (_, Some("programmatic")) => "programmatic input: handled as typed".to_string(),
        (_, Some("restricted")) => "picker disabled here: handled as typed".to_string(),
        _ => result.route.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_text_is_delivered() {
        let result = classify("hello", false, InputSource::Interactive, RoutingPolicy::default());
        assert_eq!(result.route, "deliver");
        assert_eq!(result.backend, BackendState::Idle);
    }

    #[test]
    fn busy_text_needs_a_mode() {
        let result = classify("hello", true, InputSource::Interactive, RoutingPolicy::default());
        assert_eq!(result.route, "pick_mode");
        assert_eq!(result.reason, None);
    }

    #[test]
    fn commands_pass_through_even_when_busy() {
        let result = classify("/model x", true, InputSource::Interactive, RoutingPolicy::default());
        assert_eq!(result.route, "pass_through");
        assert_eq!(result.reason, Some("command"));
    }

    #[test]
    fn restricted_terminal_passes_through() {
        let policy = RoutingPolicy {
            disabled: false,
            limited_terminal: true,
        };
        let result = classify("hello", true, InputSource::Interactive, policy);
        assert_eq!(result.reason, Some("restricted"));
    }

    #[test]
    fn json_shape() {
        let result = classify("hi", true, InputSource::Programmatic, RoutingPolicy::default());
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["route"], "pass_through");
        assert_eq!(value["reason"], "programmatic");
        assert_eq!(value["backend"], "busy");
    }

    #[test]
    fn describe_reads_naturally() {
        let result = classify("x", false, InputSource::Interactive, RoutingPolicy::default());
        assert_eq!(describe(&result), "backend idle: delivered immediately");
    }
}
