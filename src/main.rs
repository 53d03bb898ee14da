//! StudyJournal - study tracking CLI and LLM proxy server

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::future::Future;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use studyjournal::{
    calculators::{advanced_stats, exam_planner, gamification, insights},
    config::StudyJournalConfig,
    managers::{Journal, Manager, NewDiaryEntry, NewGrade, PomodoroTimer},
    proxy::{proxy_router, GeminiClient, ProxyClient, ProxyState},
    storage::{spawn_autosave, AutoConfirm, Confirm, StorageGateway},
};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Flashcards requested per generation, at most
const MAX_GENERATED_CARDS: u32 = 10;

#[derive(Parser)]
#[command(name = "studyjournal")]
#[command(version)]
#[command(about = "Study tracking with an LLM flashcard and tutor proxy")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "STUDYJOURNAL_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the LLM proxy server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print dashboard metrics
    Summary,

    /// Log a study session in the diary
    Log {
        #[arg(short, long)]
        subject: String,

        #[arg(long)]
        hours: f64,

        /// Comprehension, 1-10
        #[arg(long)]
        comprehension: u8,

        /// Stress, 1-10
        #[arg(long)]
        stress: u8,

        #[arg(long, default_value = "")]
        notes: String,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Record a grade
    Grade {
        #[arg(short, long)]
        subject: String,

        #[arg(long)]
        value: f64,

        #[arg(long, default_value_t = 1)]
        weight: u32,

        /// Grade date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Split the days before an exam across its topics
    Plan {
        #[arg(long)]
        exam: String,

        #[arg(long)]
        days: u32,

        /// Comma separated topics
        #[arg(long)]
        topics: String,
    },

    /// Generate flashcards from a stored note through the proxy
    Generate {
        /// Position of the note in the notes list
        #[arg(long)]
        note_index: usize,

        /// Number of cards, 1-10
        #[arg(long, default_value_t = 5)]
        cards: u32,
    },

    /// Run the pomodoro timer until Ctrl+C
    Pomodoro,

    /// Strictly parse the data file and report what it holds
    Check,

    /// Delete all study data
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("studyjournal={},tower_http={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => StudyJournalConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StudyJournalConfig::default(),
    };
    let gateway = StorageGateway::new(config.storage.data_file.clone());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            run_server(&config, &host, port).await?;
        }
        Commands::Summary => {
            let journal = Journal::from_document(gateway.load());
            print_summary(&journal, today);
        }
        Commands::Log {
            subject,
            hours,
            comprehension,
            stress,
            notes,
            date,
        } => {
            let mut journal = Journal::from_document(gateway.load());
            let entry = journal.diary.add_entry(NewDiaryEntry {
                date: date.unwrap_or(today),
                subject,
                hours,
                comprehension,
                stress,
                notes,
            })?;
            gateway.save(&journal.to_document());
            println!(
                "Logged {:.1}h of {} on {}",
                entry.hours, entry.subject, entry.date
            );
        }
        Commands::Grade {
            subject,
            value,
            weight,
            date,
        } => {
            let mut journal = Journal::from_document(gateway.load());
            let grade = journal.grades.add_grade(NewGrade {
                subject,
                value,
                weight,
                date: date.unwrap_or(today),
            })?;
            gateway.save(&journal.to_document());
            println!(
                "Recorded {} in {} (weighted average now {:.2})",
                grade.value,
                grade.subject,
                journal.grades.weighted_average()
            );
        }
        Commands::Plan { exam, days, topics } => {
            let plan = exam_planner::generate_plan(&exam, days, &topics, today);
            print_plan(&plan);
        }
        Commands::Generate { note_index, cards } => {
            generate_cards(&config, &gateway, note_index, cards).await?;
        }
        Commands::Pomodoro => {
            run_pomodoro(&config, gateway).await?;
        }
        Commands::Check => match gateway.try_load() {
            Ok(document) => {
                let journal = Journal::from_document(document);
                println!("✓ {} is valid", gateway.path().display());
                println!("  diary entries:  {}", journal.diary.len());
                println!("  tasks:          {}", journal.tasks.len());
                println!("  grades:         {}", journal.grades.len());
                println!("  pomodoros:      {}", journal.pomodoro.len());
                println!("  notes:          {}", journal.notes.len());
                println!("  flashcards:     {}", journal.flashcards.len());
                println!("  goals:          {}", journal.goals.len());
                println!("  resources:      {}", journal.resources.len());
                println!("  check-ins:      {}", journal.wellness.len());
            }
            Err(e) => bail!("{} is not usable: {}", gateway.path().display(), e),
        },
        Commands::Reset { yes } => {
            let confirm: Box<dyn Confirm> = if yes {
                Box::new(AutoConfirm(true))
            } else {
                Box::new(StdinConfirm)
            };
            match gateway.reset(confirm.as_ref()) {
                Some(_) => println!("All study data deleted."),
                None => println!("Reset cancelled."),
            }
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_server(config: &StudyJournalConfig, host: &str, port: u16) -> Result<()> {
    let generator = Arc::new(GeminiClient::new(&config.llm)?);
    let state = ProxyState::new(generator, config);
    let app = proxy_router(state, &config.server.cors_origins);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!("StudyJournal proxy listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await?;

    Ok(())
}

fn print_summary(journal: &Journal, today: NaiveDate) {
    let level = gamification::progress(&journal.diary, &journal.pomodoro);

    println!("📚 StudyJournal");
    println!();
    println!("Total hours:       {:.1}", level.total_hours);
    println!("This week:         {:.1}h", journal.diary.this_week_hours(today));
    println!(
        "Level:             {} ({}), {:.0}% to {}h",
        level.level, level.level_name, level.progress_percent, level.next_threshold
    );
    println!("Weighted average:  {:.2}", journal.grades.weighted_average());
    println!("Grade trend:       {:+.2}", journal.grades.trend());
    println!("Streak:            {} day(s)", advanced_stats::streak(&journal.diary, today));
    println!("Daily average:     {:.1}h", advanced_stats::daily_average(&journal.diary));
    println!("Record day:        {:.1}h", advanced_stats::record_day(&journal.diary));
    println!("Weeks studied:     {}", advanced_stats::distinct_week_buckets(&journal.diary));
    println!("Urgent tasks:      {}", journal.tasks.urgent_tasks(today).len());
    println!("Goals due today:   {}", journal.goals.goals_due_on(today).len());
    println!("Flashcards:        {}", journal.flashcards.len());

    let days = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
    let heatmap = advanced_stats::weekly_heatmap(&journal.diary);
    let row: Vec<String> = days
        .iter()
        .zip(heatmap)
        .map(|(day, hours)| format!("{} {:.1}", day, hours))
        .collect();
    println!("By weekday:        {}", row.join("  "));

    let insights = insights::generate(&journal.diary, &journal.grades, today);
    println!();
    if insights.is_empty() {
        println!("Add diary entries to get insights!");
    }
    for insight in insights {
        println!("{} {}", insight.emoji, insight.text);
    }
}

fn print_plan(plan: &exam_planner::ExamPlan) {
    println!("📅 {} ({} days)", plan.exam_name, plan.total_days);
    for topic in &plan.plan {
        println!("  {}", topic.description);
    }
    if plan.unallocated_days > 0 {
        println!("  {} day(s) left for review", plan.unallocated_days);
    }
}

async fn generate_cards(
    config: &StudyJournalConfig,
    gateway: &StorageGateway,
    note_index: usize,
    cards: u32,
) -> Result<()> {
    let mut journal = Journal::from_document(gateway.load());
    let Some(note) = journal.notes.records().get(note_index).cloned() else {
        bail!(
            "no note at index {} ({} notes stored)",
            note_index,
            journal.notes.len()
        );
    };

    let client = ProxyClient::new(&config.client)?;
    let count = cards.clamp(1, MAX_GENERATED_CARDS);
    let subject = Some(note.subject.as_str()).filter(|s| !s.is_empty());
    let pairs = client
        .generate_flashcards(&note.content, subject, count)
        .await?;

    let imported = journal.flashcards.import_generated(pairs, &note.subject);
    gateway.save(&journal.to_document());
    println!("Imported {} flashcard(s) from \"{}\"", imported, note.title);
    Ok(())
}

async fn run_pomodoro(config: &StudyJournalConfig, gateway: StorageGateway) -> Result<()> {
    let journal = Journal::from_document(gateway.load());
    let mut timer = PomodoroTimer::new(
        journal.preferences.pomodoro,
        journal.pomodoro.session_count() as u32,
    );
    let journal = Arc::new(RwLock::new(journal));
    let gateway = Arc::new(gateway);
    let autosave = spawn_autosave(
        journal.clone(),
        gateway.clone(),
        Duration::from_secs(config.storage.autosave_interval_secs.max(1)),
    );

    println!("🍅 Pomodoro started. Press Ctrl+C to stop.");
    drive_timer(&journal, &mut timer, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await;

    autosave.abort();
    let document = journal.read().await.to_document();
    gateway.save_async(&document).await;
    println!("Sessions completed: {}", timer.sessions_completed());
    Ok(())
}

/// Tick `timer` once per second until `shutdown` resolves
async fn drive_timer<F>(journal: &RwLock<Journal>, timer: &mut PomodoroTimer, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    timer.start();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let completed = {
                    let mut guard = journal.write().await;
                    timer.tick(&mut guard.pomodoro, Utc::now())
                };
                if let Some(done) = completed {
                    println!("{} finished, {} next", done.finished, done.next);
                    timer.start();
                }
            }
        }
    }
}

/// Yes/no prompt on stdin
struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        print!("{} [y/N] ", prompt);
        if std::io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

fn show_config(config: Option<&StudyJournalConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}
