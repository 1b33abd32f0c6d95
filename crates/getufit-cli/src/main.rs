use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use getufit_api::{ApiError, CoachClient, RetrievalClient};
use getufit_config::{Config, ConfigManager};
use getufit_core::chat::{self, CONNECTION_FALLBACK, MISSING_REPLY};
use getufit_core::{fence, Experience, FitnessPlan, Goal, SessionRecord, UserProfile};
use getufit_session::{FileSessionStore, SessionStore};

#[derive(Parser)]
#[command(name = "getufit")]
#[command(about = "CLI client for the GetUFit coaching services")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,

    /// Config file path
    #[arg(long, env = "GETUFIT_CONFIG", default_value = "~/.getufit/config.json")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the onboarding profile and persist the session record
    Onboard(OnboardArgs),
    /// Fetch and print the weekly fitness plan
    Plan,
    /// Interactive chat with the coach bot
    Chat {
        /// Talk to the personal (own data) bot instead
        #[arg(long)]
        personal: bool,
    },
    /// Send a single message and print the reply
    Send {
        /// Message content
        message: String,
        /// Talk to the personal (own data) bot instead
        #[arg(long)]
        personal: bool,
    },
    /// Request the chat-history PDF export
    Export,
    /// Session record management
    Session(SessionArgs),
    /// Config management
    Config(ConfigArgs),
}

#[derive(Args, Clone)]
struct OnboardArgs {
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: u32,
    /// Height in feet, e.g. 5.9
    #[arg(long)]
    height: String,
    /// Weight in lbs
    #[arg(long)]
    weight: u32,
    /// One of: weight loss, muscle gain, endurance, general fitness
    #[arg(long)]
    goal: Goal,
    #[arg(long, default_value = "none")]
    health_issues: String,
    /// One of: newbie, intermediate, advanced
    #[arg(long)]
    experience: Experience,
}

#[derive(Args, Clone)]
struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommands,
}

#[derive(Subcommand, Clone)]
enum SessionCommands {
    /// Print the persisted session record
    Show,
    /// Remove the persisted session record
    Clear,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommands,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Get a config value (e.g. services.coach_url)
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// Initialize the default config
    Init {
        /// Overwrite an existing config
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Show the current config
    Show,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        eprintln!("{}", "[DEBUG] Debug mode enabled".dimmed());
        eprintln!("{}", format!("[DEBUG] Config path: {}", cli.config).dimmed());
    }

    match cli.command {
        Commands::Onboard(args) => onboard(args, &cli.config, cli.debug).await,
        Commands::Plan => show_plan(&cli.config, cli.debug).await,
        Commands::Chat { personal } => interactive_chat(&cli.config, personal, cli.debug).await,
        Commands::Send { message, personal } => {
            send_once(&cli.config, &message, personal, cli.debug).await
        }
        Commands::Export => export_pdf(&cli.config, cli.debug).await,
        Commands::Session(args) => handle_session(args, &cli.config).await,
        Commands::Config(args) => handle_config(args, &cli.config).await,
    }
}

// ---- environment plumbing ----

fn config_path(path: &str) -> PathBuf {
    getufit_config::expand_tilde(path).unwrap_or_else(|| PathBuf::from(path))
}

async fn load_config(path: &str) -> anyhow::Result<Config> {
    let manager = ConfigManager::load(&config_path(path)).await?;
    let config = manager.get().read().await.clone();
    Ok(config)
}

fn session_store(config: &Config) -> FileSessionStore {
    let data_dir = config
        .storage
        .path
        .as_deref()
        .and_then(getufit_config::expand_tilde)
        .unwrap_or_else(getufit_session::default_data_dir);
    FileSessionStore::new(data_dir)
}

fn coach_client(config: &Config) -> anyhow::Result<CoachClient> {
    let timeout = Duration::from_secs(config.services.timeout_seconds);
    Ok(CoachClient::with_timeout(&config.services.coach_url, timeout)?)
}

fn retrieval_client(config: &Config) -> anyhow::Result<RetrievalClient> {
    let timeout = Duration::from_secs(config.services.timeout_seconds);
    Ok(RetrievalClient::with_timeout(
        &config.services.retrieval_url,
        timeout,
    )?)
}

/// The session record is a precondition for every data-dependent command.
async fn require_session(store: &FileSessionStore) -> anyhow::Result<SessionRecord> {
    match store.read().await? {
        Some(record) => Ok(record),
        None => {
            println!(
                "{}",
                "❌ No session found. Run `getufit onboard` first.".red()
            );
            std::process::exit(1);
        }
    }
}

// ---- commands ----

async fn onboard(args: OnboardArgs, config: &str, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let coach = coach_client(&config)?;
    let store = session_store(&config);

    let profile = UserProfile {
        user_id: args.user_id,
        name: args.name,
        age: args.age,
        height: args.height,
        weight: args.weight,
        goal: args.goal,
        health_issues: args.health_issues,
        experience: args.experience,
    };

    if let Err(e) = profile.validate() {
        println!("{}", format!("❌ {}", e).red());
        std::process::exit(1);
    }

    println!("{}", format!("🚀 Onboarding {}...", profile.user_id).cyan());
    let start = Instant::now();

    match coach.onboard(&profile).await {
        Ok(record) => {
            if debug {
                eprintln!(
                    "{}",
                    format!("[DEBUG] Onboarded in {:?}", start.elapsed()).dimmed()
                );
            }
            store.write(&record).await?;
            println!("{}", "✅ User onboarded successfully!".green());
            println!(
                "{}",
                format!("Session saved for user {}", record.user_id()).dimmed()
            );
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn show_plan(config: &str, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let coach = coach_client(&config)?;
    let retrieval = retrieval_client(&config)?;
    let store = session_store(&config);
    let record = require_session(&store).await?;

    println!("{}", "📋 Your Weekly Fitness Plan".cyan().bold());
    let response = match coach.generate_plan(record.user_id()).await {
        Ok(response) => response,
        Err(e) => fail(&e),
    };

    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Raw response: {}", response.raw_ai_response).dimmed()
        );
    }

    let raw = match fence::parse_fenced_value(&response.raw_ai_response) {
        Ok(raw) => raw,
        Err(e) => {
            if debug {
                eprintln!("{}", format!("[DEBUG] Parse error: {}", e).dimmed());
            }
            println!("{}", "❌ Failed to load activities".red());
            std::process::exit(1);
        }
    };
    let plan: FitnessPlan = match serde_json::from_value(raw.clone()) {
        Ok(plan) => plan,
        Err(_) => {
            println!("{}", "❌ Failed to load activities".red());
            std::process::exit(1);
        }
    };

    print_plan(&plan);

    // Best-effort forward into the personal bot's corpus; its outcome is
    // reported independently and never fails the command.
    match retrieval.ingest(record.user_id(), raw).await {
        Ok(()) => println!("{}", "✅ Data added successfully!".green()),
        Err(e) => {
            if debug {
                eprintln!("{}", format!("[DEBUG] Ingest error: {}", e).dimmed());
            }
            println!("{}", "❌ Error adding data".red());
        }
    }

    Ok(())
}

fn print_plan(plan: &FitnessPlan) {
    println!();
    if plan.activities.is_empty() {
        println!(
            "{}",
            "No activities available. Please try again later.".dimmed()
        );
        return;
    }

    for activity in &plan.activities {
        println!("{}", activity.day.cyan().bold());
        println!("  Focus: {}", activity.focus);
        if activity.exercises.is_empty() {
            println!("  {}", "No exercises for this day.".dimmed());
        } else {
            for exercise in &activity.exercises {
                println!("  • {}", exercise.summary());
                if let Some(ref notes) = exercise.notes {
                    println!("    {}", format!("Notes: {}", notes).dimmed());
                }
            }
        }
        println!();
    }

    if plan.has_recommendations() {
        println!("{}", "Additional Recommendations".cyan().bold());
        if let Some(ref goal) = plan.fitness_goal {
            println!("  Fitness Goal: {}", goal);
        }
        if let Some(ref nutrition) = plan.nutrition {
            println!("  Nutrition: {}", nutrition);
        }
        println!();
    }
}

async fn interactive_chat(config: &str, personal: bool, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let coach = coach_client(&config)?;
    let retrieval = retrieval_client(&config)?;
    let store = session_store(&config);
    let record = require_session(&store).await?;

    let title = if personal {
        "Personal Chatbot"
    } else {
        "Chat with Your Fitness Bot"
    };
    println!("{}", format!("💬 {}", title).cyan().bold());
    println!("{}", "Type a message, or 'exit' to quit".dimmed());
    println!();

    loop {
        print!("{}", "You: ".cyan());
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }
        if message.is_empty() {
            println!("{}", "⚠️  Please type a message!".yellow());
            continue;
        }

        let reply = round_trip(&coach, &retrieval, &record, message, personal, debug).await;
        println!("{} {}", "Bot:".green(), reply);
        println!();
    }

    Ok(())
}

async fn send_once(config: &str, message: &str, personal: bool, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let coach = coach_client(&config)?;
    let retrieval = retrieval_client(&config)?;
    let store = session_store(&config);
    let record = require_session(&store).await?;

    if message.trim().is_empty() {
        println!("{}", "⚠️  Please type a message!".yellow());
        std::process::exit(1);
    }

    let reply = round_trip(&coach, &retrieval, &record, message.trim(), personal, debug).await;
    println!("{}", reply);
    Ok(())
}

/// One chat round trip against the selected bot, already rendered for
/// display. Failures come back as the same fallback text the TUI appends.
async fn round_trip(
    coach: &CoachClient,
    retrieval: &RetrievalClient,
    record: &SessionRecord,
    message: &str,
    personal: bool,
    debug: bool,
) -> String {
    let start = Instant::now();
    let result = if personal {
        retrieval.chat(record.user_id(), message).await
    } else {
        let query = chat::coach_query(message);
        coach.chat(record.user_id(), &query).await
    };

    if debug {
        eprintln!(
            "{}",
            format!("[DEBUG] Round trip took {:?}", start.elapsed()).dimmed()
        );
    }

    match result {
        Ok(reply) => match reply.response {
            Some(text) if personal => chat::render_personal_reply(&text),
            Some(text) => text,
            None if personal => MISSING_REPLY.to_string(),
            None => CONNECTION_FALLBACK.to_string(),
        },
        Err(e) => {
            if debug {
                eprintln!("{}", format!("[DEBUG] Request error: {}", e).dimmed());
            }
            CONNECTION_FALLBACK.to_string()
        }
    }
}

async fn export_pdf(config: &str, debug: bool) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let coach = coach_client(&config)?;
    let store = session_store(&config);
    let record = require_session(&store).await?;

    println!("{}", "🚀 Requesting chat-history export...".cyan());
    let start = Instant::now();

    match coach.generate_pdf(record.user_id()).await {
        Ok(pdf) => {
            if debug {
                eprintln!(
                    "{}",
                    format!("[DEBUG] Export ready in {:?}", start.elapsed()).dimmed()
                );
            }
            println!("{}", "✅ File fetched successfully!".green());
            println!("{}", pdf.pdf_url.blue().underline());
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

async fn handle_session(args: SessionArgs, config: &str) -> anyhow::Result<()> {
    let config = load_config(config).await?;
    let store = session_store(&config);

    match args.command {
        SessionCommands::Show => match store.read().await? {
            Some(record) => {
                println!("{}", "📋 Session record:".cyan().bold());
                println!("{}", serde_json::to_string_pretty(&record)?);
            }
            None => {
                println!("{}", "No session found.".dimmed());
            }
        },
        SessionCommands::Clear => {
            store.clear().await?;
            println!("{}", "✅ Session cleared".green());
        }
    }

    Ok(())
}

async fn handle_config(args: ConfigArgs, config: &str) -> anyhow::Result<()> {
    let config_path = config_path(config);

    match args.command {
        ConfigCommands::Get { key } => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.get().read().await.clone();

            match config.get_value(&key) {
                Some(value) => {
                    println!("{}", format!("{} = {}", key, value).green());
                }
                None => {
                    println!("{}", format!("❌ Key not found: {}", key).red());
                    std::process::exit(1);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let manager = ConfigManager::load(&config_path).await?;

            manager
                .update(|config| {
                    if let Err(e) = config.set_value(&key, &value) {
                        eprintln!("{}", format!("❌ Failed to set value: {}", e).red());
                        std::process::exit(1);
                    }
                })
                .await?;

            println!("{}", format!("✅ Set {} = {}", key, value).green());
        }
        ConfigCommands::Init { force } => {
            if config_path.exists() && !force {
                println!(
                    "{}",
                    format!("⚠️  Config already exists at {:?}", config_path).yellow()
                );
                println!("{}", "Use --force to overwrite".dimmed());
                return Ok(());
            }

            getufit_config::init_getufit_dirs().await?;

            let default_config = Config::default();
            let manager = ConfigManager::new(default_config, config_path.clone());
            manager.save().await?;

            println!(
                "{}",
                format!("✅ Config initialized at {:?}", config_path).green()
            );
            println!(
                "{}",
                "You can edit this file to customize your settings".dimmed()
            );
        }
        ConfigCommands::Show => {
            let manager = ConfigManager::load(&config_path).await?;
            let config = manager.get().read().await.clone();

            println!("{}", "📋 Current Configuration:".cyan().bold());
            println!();

            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn fail(e: &ApiError) -> ! {
    println!("{}", format!("❌ {}", e.user_message()).red());
    std::process::exit(1);
}
