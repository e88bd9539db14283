use anyhow::{bail, Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use nexgen_core::assistant::Assistant;
use nexgen_core::config::NexgenConfig;
use nexgen_core::llm::LlmService;
use nexgen_core::model::{ProjectDraft, ProjectStatus, ProjectUpdate, ServiceType};
use nexgen_core::pricing::{self, Quote};
use nexgen_core::stats::{Analytics, DashboardStats};
use nexgen_core::storage::{create_backend, Storage, StorageBackend};

#[derive(Parser)]
#[command(name = "nexgen", about = "NexGen Agency: dashboard from the terminal", version)]
enum Cli {
    /// Price an order with the calculator
    Quote {
        /// Service category (web, ai, ads, or the full display name)
        service: String,
        /// Add-on feature id (repeatable); see `nexgen features`
        #[arg(short, long)]
        feature: Vec<String>,
        /// Double the total for a rush order
        #[arg(long)]
        rush: bool,
        /// Manual price adjustment, positive or negative
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        adjustment: i64,
        /// Output raw JSON instead of the breakdown
        #[arg(long)]
        json: bool,
    },
    /// List pricing add-ons, optionally for one service
    Features {
        service: Option<String>,
    },
    /// List projects
    Projects {
        /// Filter by status (lead, active, completed, cancelled)
        #[arg(short, long)]
        status: Option<String>,
        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Quick-add a project
    Add {
        /// Client name
        client: String,
        /// Project value in whole dollars
        #[arg(long)]
        value: i64,
        /// Service category
        #[arg(long, default_value = "web")]
        service: String,
        /// Output the created project as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update a project's fields
    Set {
        /// Project id
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        value: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        client: Option<String>,
    },
    /// List reservations
    Reservations {
        /// Output raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Dashboard stats and per-service analytics
    Stats {
        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate the pre-shift briefing from today's reservations
    Briefing,
    /// Ask the manager assistant a question
    Chat {
        message: String,
    },
    /// Verify credentials against the backend
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Show configuration and backend connectivity
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let config = NexgenConfig::load(Some(&std::env::current_dir()?))
        .unwrap_or_else(|_| NexgenConfig::default_config());

    run(cli, &config).await
}

async fn run(cli: Cli, config: &NexgenConfig) -> Result<()> {
    match cli {
        Cli::Quote {
            service,
            feature,
            rush,
            adjustment,
            json,
        } => cmd_quote(&service, &feature, rush, adjustment, json),
        Cli::Features { service } => cmd_features(service.as_deref()),
        Cli::Projects { status, json } => {
            cmd_projects(&storage(config)?, status.as_deref(), json).await
        }
        Cli::Add {
            client,
            value,
            service,
            json,
        } => cmd_add(&storage(config)?, &client, value, &service, json).await,
        Cli::Set {
            id,
            status,
            value,
            notes,
            client,
        } => cmd_set(&storage(config)?, &id, status, value, notes, client).await,
        Cli::Reservations { json } => cmd_reservations(&storage(config)?, json).await,
        Cli::Stats { json } => cmd_stats(&storage(config)?, json).await,
        Cli::Briefing => cmd_briefing(config).await,
        Cli::Chat { message } => cmd_chat(config, &message).await,
        Cli::Login { email, password } => cmd_login(&storage(config)?, &email, &password).await,
        Cli::Status => cmd_status(config).await,
    }
}

fn storage(config: &NexgenConfig) -> Result<Storage> {
    create_backend(&config.backend).context("failed to create storage backend")
}

fn parse_service(raw: &str) -> Result<ServiceType> {
    raw.parse::<ServiceType>().map_err(|e| anyhow::anyhow!(e))
}

fn cmd_quote(service: &str, features: &[String], rush: bool, adjustment: i64, json: bool) -> Result<()> {
    let service = parse_service(service)?;

    for id in features {
        if pricing::feature_by_id(id).is_none() {
            bail!(
                "unknown feature id '{id}'; run `nexgen features` to list the catalog"
            );
        }
    }

    let quote = Quote::compute(service, features, rush, adjustment);
    let description = pricing::describe_order(service, features, rush, adjustment);

    if json {
        let mut value = serde_json::to_value(&quote)?;
        value["description"] = description.clone().into();
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", service.to_string().bold());
    println!("  base           ${}", quote.base);
    for f in &quote.features {
        println!("  {:<14} ${}", f.id, f.cost);
    }
    if quote.adjustment != 0 {
        println!("  adjustment     {}{}", if quote.adjustment > 0 { "+" } else { "" }, quote.adjustment);
    }
    if quote.rush {
        println!("  {}", "rush order: total doubled".yellow());
    }
    println!("  {} ${}", "total".green().bold(), quote.total);
    println!("\n{}", description.dimmed());
    Ok(())
}

fn cmd_features(service: Option<&str>) -> Result<()> {
    let features: Vec<_> = match service {
        Some(raw) => pricing::features_for(parse_service(raw)?).collect(),
        None => pricing::FEATURE_CATALOG.iter().collect(),
    };

    for f in features {
        let category = f
            .category
            .map(|c| c.to_string())
            .unwrap_or_else(|| "any".to_string());
        println!(
            "{:<16} ${:<6} {:<16} {}",
            f.id.cyan(),
            f.cost,
            category.dimmed(),
            f.label
        );
    }
    Ok(())
}

async fn cmd_projects(storage: &Storage, status: Option<&str>, json: bool) -> Result<()> {
    let mut projects = storage.fetch_projects().await?;

    if let Some(raw) = status {
        let wanted: ProjectStatus = raw.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        projects.retain(|p| p.status == wanted);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("{}", "no projects".dimmed());
        return Ok(());
    }

    for p in &projects {
        let status = match p.status {
            ProjectStatus::Lead => p.status.to_string().yellow().to_string(),
            ProjectStatus::Active => p.status.to_string().green().to_string(),
            ProjectStatus::Completed => p.status.to_string().blue().to_string(),
            ProjectStatus::Cancelled => p.status.to_string().red().to_string(),
        };
        println!(
            "{:<10} {:<24} {:<16} {:<10} ${}",
            p.id.dimmed(),
            p.client_name,
            p.service_type,
            status,
            p.value
        );
    }
    Ok(())
}

async fn cmd_add(
    storage: &Storage,
    client: &str,
    value: i64,
    service: &str,
    json: bool,
) -> Result<()> {
    let draft = ProjectDraft::quick(client, value, parse_service(service)?);
    let project = storage.add_project(&draft).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        println!(
            "{} {} ({}, ${})",
            "added".green().bold(),
            project.client_name,
            project.id,
            project.value
        );
    }
    Ok(())
}

async fn cmd_set(
    storage: &Storage,
    id: &str,
    status: Option<String>,
    value: Option<i64>,
    notes: Option<String>,
    client: Option<String>,
) -> Result<()> {
    let status = match status {
        Some(raw) => Some(raw.parse::<ProjectStatus>().map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };

    let update = ProjectUpdate {
        client_name: client,
        status,
        value,
        notes,
    };
    if update.is_empty() {
        bail!("nothing to update; pass at least one of --status, --value, --notes, --client");
    }

    let project = storage.set_project(id, &update).await?;
    println!(
        "{} {} is now {} (${})",
        "updated".green().bold(),
        project.client_name,
        project.status,
        project.value
    );
    Ok(())
}

async fn cmd_reservations(storage: &Storage, json: bool) -> Result<()> {
    let reservations = storage.fetch_reservations().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reservations)?);
        return Ok(());
    }

    if reservations.is_empty() {
        println!("{}", "no reservations".dimmed());
        return Ok(());
    }

    for r in &reservations {
        println!(
            "{:<12} {:<8} {:<20} {:>2} guests  {}",
            r.date,
            r.time,
            r.customer_name,
            r.guests,
            r.status.dimmed()
        );
    }
    Ok(())
}

async fn cmd_stats(storage: &Storage, json: bool) -> Result<()> {
    let projects = storage.fetch_projects().await?;
    let stats = DashboardStats::from_projects(&projects);
    let analytics = Analytics::from_projects(&projects);

    if json {
        let value = serde_json::json!({ "stats": stats, "analytics": analytics });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Dashboard".bold());
    println!("  projects   {}", stats.total_projects);
    println!("  active     {}", stats.active_projects);
    println!("  leads      {}", stats.new_leads);
    println!("  pipeline   ${}", stats.pipeline_value);

    println!("\n{}", "By service".bold());
    for s in &analytics.services {
        println!(
            "  {:<16} {:>3} projects  ${}",
            s.service.to_string(),
            s.count,
            s.revenue
        );
    }
    println!("\n  conversion {}%", analytics.conversion_rate);
    if let Some(rating) = analytics.average_rating {
        println!("  avg rating {rating:.1}");
    }
    Ok(())
}

fn llm_service(config: &NexgenConfig) -> Option<LlmService> {
    if !config.llm.enabled {
        return None;
    }
    match LlmService::from_config(&config.llm) {
        Ok(service) => Some(service),
        Err(e) => {
            eprintln!("{} {}", "warning:".yellow(), e);
            None
        }
    }
}

async fn cmd_briefing(config: &NexgenConfig) -> Result<()> {
    let storage = storage(config)?;
    let reservations = storage.fetch_reservations().await?;

    let llm = llm_service(config);
    let assistant = Assistant::new(llm.as_ref());
    println!("{}", assistant.shift_briefing(&reservations).await);
    Ok(())
}

async fn cmd_chat(config: &NexgenConfig, message: &str) -> Result<()> {
    let storage = storage(config)?;
    let reservations = storage.fetch_reservations().await.unwrap_or_default();

    let llm = llm_service(config);
    let assistant = Assistant::new(llm.as_ref());
    println!("{}", assistant.chat(message, &reservations).await);
    Ok(())
}

async fn cmd_login(storage: &Storage, email: &str, password: &str) -> Result<()> {
    let session = storage.sign_in(email, password).await?;
    println!("{} {}", "signed in as".green(), session.email().bold());
    storage.sign_out(&session.access_token).await?;
    Ok(())
}

async fn cmd_status(config: &NexgenConfig) -> Result<()> {
    println!("{}", "NexGen status".bold());
    println!("  backend    {} ({})", config.backend.kind, config.backend.url);
    println!(
        "  anon key   {}",
        if config.backend.key.is_some() {
            "set".green().to_string()
        } else {
            "missing".red().to_string()
        }
    );
    println!(
        "  assistant  {}",
        if config.llm.enabled {
            format!("{} ({})", config.llm.provider, config.llm.model)
        } else {
            "disabled".dimmed().to_string()
        }
    );

    let storage = storage(config)?;
    match storage.fetch_projects().await {
        Ok(projects) if projects.is_empty() => {
            println!("  connection {}", "ok (no projects yet)".yellow())
        }
        Ok(projects) => println!(
            "  connection {} ({} projects)",
            "ok".green(),
            projects.len()
        ),
        Err(e) => println!("  connection {} ({})", "failed".red(), e),
    }
    Ok(())
}
