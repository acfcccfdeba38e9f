use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use journey_planner::agents::backend::{check_backend, create_backend, AiBackend};
use journey_planner::api::{build_router, state::AppState};
use journey_planner::config::AppConfig;
use journey_planner::models::{compute_duration, ItineraryPlan, Mood, Priority, SuggestionStyle};
use journey_planner::planner::client::PlannerClient;
use journey_planner::planner::form::{reduce, FormEvent, FormField, FormState};
use journey_planner::planner::{FallbackReason, Planner};
use journey_planner::tasks::templates::{match_templates, TemplateDebouncer};
use journey_planner::tasks::{TaskEvent, TaskList};

#[derive(Parser)]
#[command(name = "journey-planner")]
#[command(about = "Mood-driven itinerary suggestions with an offline catalog fallback")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config and HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config and PORT)
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Plan a trip from the command line
    Plan {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Departure time, HH:MM
        #[arg(long)]
        depart: String,

        /// Arrival time, HH:MM
        #[arg(long)]
        arrive: String,

        /// Moods, comma-separated (e.g. "foodie,photo")
        #[arg(long, value_delimiter = ',', required = true)]
        mood: Vec<String>,

        /// safe, balanced or creative
        #[arg(long)]
        style: Option<String>,

        /// Ask a running server instead of planning locally
        #[arg(long)]
        server: Option<String>,

        /// Skip the AI backend and use the catalog only
        #[arg(long)]
        offline: bool,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the time available between two HH:MM times
    Duration { departure: String, arrival: String },

    /// Show task templates for a piece of text
    Templates {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Interactive to-do list on stdin
    Todo,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    // Initialize tracing
    let level = cli.log_level.clone().unwrap_or_else(|| config.log_level.clone());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::debug!("Starting journey-planner v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let backend = ai_backend(&config);
            if let Some(backend) = &backend {
                check_backend(backend.as_ref()).await;
            }

            let planner = Planner::new(backend);
            let state = AppState::new(planner, &config);
            tracing::info!(
                "Environment: {}, AI backend: {}",
                state.server.environment.as_str(),
                state.ai_backend_name()
            );

            let mut app = build_router(state);
            if access_log {
                app = app.layer(TraceLayer::new_for_http());
            }

            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            tracing::info!("Health check: http://{}/health", addr);

            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await?;

            tracing::info!("Server stopped");
        }
        Commands::Plan {
            from,
            to,
            depart,
            arrive,
            mood,
            style,
            server,
            offline,
            json,
        } => {
            let mut form = fill_form(from, to, depart, arrive, &mood, style.as_deref())?;
            if !form.can_submit() {
                bail!("departure, destination, both times and at least one mood are required");
            }

            let request = form.to_request();
            form = reduce(form, FormEvent::SubmitStarted);

            let result = match server {
                Some(url) => {
                    let client = PlannerClient::new(url, config.ai.timeout_seconds)?;
                    client.generate(&request).await
                }
                None => match request.validate() {
                    Ok(trip) => {
                        let backend = if offline { None } else { ai_backend(&config) };
                        Ok(Planner::new(backend).plan(&trip).await)
                    }
                    Err(e) => Err(e),
                },
            };

            form = reduce(
                form,
                match result {
                    Ok(outcome) => FormEvent::SubmitSucceeded(outcome),
                    Err(e) => FormEvent::SubmitFailed {
                        message: e.to_string(),
                        fallback: None,
                    },
                },
            );

            if let Some(message) = &form.error {
                bail!("{}", message);
            }
            let Some(plan) = &form.plan else {
                bail!("no plan was produced");
            };

            if json {
                println!("{}", serde_json::to_string_pretty(plan)?);
            } else {
                print_plan(plan, form.fallback_reason);
            }
        }
        Commands::Duration { departure, arrival } => {
            match compute_duration(Some(departure.as_str()), Some(arrival.as_str()))? {
                Some(tt) => println!("{} ({} minutes)", tt, tt.total_minutes),
                None => bail!("both times are required"),
            }
        }
        Commands::Templates { text } => {
            let text = text.join(" ");
            let templates = match_templates(&text);
            if templates.is_empty() {
                println!("(no suggestions)");
            }
            for t in templates {
                println!("- {}", t);
            }
        }
        Commands::Todo => run_todo().await?,
    }

    Ok(())
}

/// Build the configured AI backend, or `None` when it cannot be used.
fn ai_backend(config: &AppConfig) -> Option<Arc<dyn AiBackend>> {
    match create_backend(&config.ai, |key| std::env::var(key).ok()) {
        Ok(backend) => Some(backend),
        Err(e) => {
            tracing::warn!("{}; suggestions will come from the catalog", e);
            None
        }
    }
}

/// Fill a blank planner form from command-line input.
fn fill_form(
    departure: String,
    destination: String,
    departure_time: String,
    arrival_time: String,
    moods: &[String],
    style: Option<&str>,
) -> Result<FormState> {
    let mut picked: Vec<Mood> = Vec::new();
    for raw in moods {
        let mood: Mood = raw.trim().parse()?;
        if !picked.contains(&mood) {
            picked.push(mood);
        }
    }

    let mut events = vec![
        FormEvent::FieldChanged(FormField::Departure, departure),
        FormEvent::FieldChanged(FormField::Destination, destination),
        FormEvent::FieldChanged(FormField::DepartureTime, departure_time),
        FormEvent::FieldChanged(FormField::ArrivalTime, arrival_time),
    ];
    events.extend(picked.into_iter().map(FormEvent::MoodToggled));
    if let Some(raw) = style {
        if SuggestionStyle::parse(raw).is_none() {
            tracing::warn!("Unrecognized suggestion style '{}', using balanced", raw);
        }
        events.push(FormEvent::StyleSelected(SuggestionStyle::parse_lenient(Some(raw))));
    }

    Ok(events.into_iter().fold(FormState::new(), reduce))
}

fn print_plan(plan: &ItineraryPlan, fallback_reason: Option<FallbackReason>) {
    println!("\n=== {} ===", plan.route);
    println!("Available:  {}", plan.travel_time);
    println!("Style:      {}", plan.style.label());
    match fallback_reason {
        Some(reason) => println!("Source:     catalog ({})", reason),
        None => println!("Source:     AI"),
    }

    for (i, s) in plan.suggestions.iter().enumerate() {
        println!("\n{}. {} [{}] ({})", i + 1, s.name, s.kind, s.duration);
        println!("   {}", s.description);
        if let Some(address) = &s.address {
            println!("   Address: {}", address);
        }
        if let Some(tips) = &s.tips {
            println!("   Tip: {}", tips);
        }
    }
}

const TODO_HELP: &str = "\
Commands:
  add [!low|!high] <text>   add a task
  done <n>                  toggle task n
  rm <n>                    delete task n
  clear                     remove completed tasks
  ? <text>                  suggest templates
  list | help | quit";

async fn run_todo() -> Result<()> {
    let mut list = TaskList::new();
    let debouncer = TemplateDebouncer::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", TODO_HELP);
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        list = match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => {
                println!("{}", TODO_HELP);
                continue;
            }
            "list" => {
                print_tasks(&list);
                continue;
            }
            "?" => {
                match debouncer.settle(rest).await {
                    Some(templates) if !templates.is_empty() => {
                        for t in templates {
                            println!("  - {}", t);
                        }
                    }
                    _ => println!("  (no suggestions)"),
                }
                continue;
            }
            "add" => {
                let (priority, text) = split_priority(rest);
                list.apply(TaskEvent::Add {
                    text: text.to_string(),
                    priority,
                })
            }
            "done" | "rm" => {
                let Some(id) = task_at(&list, rest) else {
                    println!("No task {}", rest.trim());
                    continue;
                };
                if command == "done" {
                    list.apply(TaskEvent::Toggle(id))
                } else {
                    list.apply(TaskEvent::Delete(id))
                }
            }
            "clear" => list.apply(TaskEvent::ClearCompleted),
            other => {
                println!("Unknown command '{}'; try help", other);
                continue;
            }
        };
        print_tasks(&list);
    }

    Ok(())
}

fn split_priority(text: &str) -> (Priority, &str) {
    let text = text.trim();
    match text.split_once(' ') {
        Some((flag, rest)) if flag.starts_with('!') => match Priority::parse(&flag[1..]) {
            Some(p) => (p, rest),
            None => (Priority::default(), text),
        },
        _ => (Priority::default(), text),
    }
}

fn task_at(list: &TaskList, index: &str) -> Option<uuid::Uuid> {
    let n: usize = index.trim().parse().ok()?;
    list.tasks().get(n.checked_sub(1)?).map(|t| t.id)
}

fn print_tasks(list: &TaskList) {
    if list.is_empty() {
        println!("(no tasks)");
        return;
    }
    for (i, task) in list.tasks().iter().enumerate() {
        let mark = if task.completed { "x" } else { " " };
        println!("{:>3}. [{}] {} ({})", i + 1, mark, task.text, task.priority);
    }
    println!("{} remaining", list.remaining());
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(moods: &[&str], style: Option<&str>) -> Result<FormState> {
        let moods: Vec<String> = moods.iter().map(|m| m.to_string()).collect();
        fill_form(
            "Kyoto".into(),
            "Osaka".into(),
            "10:00".into(),
            "12:00".into(),
            &moods,
            style,
        )
    }

    #[test]
    fn test_fill_form_builds_request() {
        let form = fill(&["photo", "Foodie", "photo"], Some("creative")).unwrap();

        assert!(form.can_submit());
        assert_eq!(form.moods, vec![Mood::Photo, Mood::Foodie]);

        let request = form.to_request();
        assert_eq!(request.departure.as_deref(), Some("Kyoto"));
        assert_eq!(request.suggestion_style.as_deref(), Some("creative"));
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_fill_form_lenient_style_strict_mood() {
        let form = fill(&["relaxed"], Some("chaotic")).unwrap();
        assert_eq!(form.style, SuggestionStyle::Balanced);

        assert!(fill(&["sleepy"], None).is_err());
    }
}
