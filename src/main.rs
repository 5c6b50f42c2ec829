// Main entry point
use clap::Parser;
use colored::Colorize;
use krishi_ai::application::guide::{format_crop, format_pest, format_weather_tip};
use krishi_ai::application::sms::SmsHandler;
use krishi_ai::application::weather::{aggregate_forecast, recommendation_text};
use krishi_ai::domain::model::{
    AnswerSource, CropFilter, Language, PestFilter, Question, ResolvedAnswer,
};
use krishi_ai::domain::traits::{ConversationStore, FarmGuideStore};
use krishi_ai::infrastructure::config::{self, load_config, Logging};
use krishi_ai::infrastructure::storage::db::{init_database, DEFAULT_HISTORY_LIMIT};
use krishi_ai::interfaces::cli::Cli;
use krishi_ai::presentation::theme::Theme;
use krishi_ai::state::AppState;
use std::fmt::Write;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Setup graceful shutdown handler
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for shutdown signal: {}", e);
        } else {
            let _ = shutdown_tx.send(());
        }
    });

    let cli = Cli::parse();
    let config = load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        config::generate_config_sample()?;
        return Ok(());
    }
    if cli.languages {
        print_languages(cli.json)?;
        return Ok(());
    }

    let language = match cli.language.as_deref() {
        Some(tag) => match tag.parse::<Language>() {
            Ok(lang) => lang,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                std::process::exit(2);
            }
        },
        None => config.language,
    };
    let user_id = cli.user.clone().unwrap_or_else(|| config.user_id.clone());
    let theme_name = cli.theme.clone().unwrap_or_else(|| config.theme.clone());
    let theme = Theme::from_name(&theme_name);

    // Setup database path (from config or default)
    let db_path = config::get_database_path(&config);
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_conn = init_database(&db_path).await?;
    let state = AppState::new(db_conn, config)?;

    if cli.status {
        print_status(&state).await?;
        return Ok(());
    }
    if cli.history {
        print_history(&state, &user_id, &theme, cli.json).await?;
        return Ok(());
    }
    if cli.crop.is_some() || cli.pest.is_some() || cli.tips.is_some() {
        print_guides(&state, &cli, &theme).await?;
        return Ok(());
    }
    if let Some(coords) = cli.weather.as_deref() {
        let (lat, lon) = (coords[0], coords[1]);
        print_weather(&state, lat, lon, cli.forecast, &theme, cli.json).await?;
        return Ok(());
    }

    if cli.query.is_empty() {
        eprintln!("{}", "Please provide a question".red());
        std::process::exit(1);
    }
    let text = cli.query.join(" ");

    if cli.sms {
        let handler = SmsHandler::new(&state.resolver, user_id.as_str())
            .with_store(&state.store)
            .with_guides(&state.guides);
        let reply = tokio::select! {
            reply = handler.reply(&text) => reply,
            _ = shutdown_rx => {
                eprintln!("Interrupted");
                return Ok(());
            }
        };
        if let Some(reply) = reply {
            println!("{}", reply);
        }
        return Ok(());
    }

    let question = match Question::new(text, language) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            std::process::exit(1);
        }
    };

    let answer = if cli.offline {
        state.resolver.answer_offline(&question)
    } else {
        // Dropping the future on Ctrl-C cancels the in-flight request
        tokio::select! {
            answer = state.resolver.resolve_answer(&question) => answer,
            _ = shutdown_rx => {
                eprintln!("Interrupted");
                return Ok(());
            }
        }
    };

    if answer.used_fallback() {
        tracing::info!("Answered from offline knowledge");
    }

    if let Err(e) = state
        .store
        .save_conversation(
            &user_id,
            question.text(),
            &answer.text,
            question.language(),
            answer.used_fallback(),
        )
        .await
    {
        tracing::warn!("Failed to save conversation: {}", e);
    }

    if cli.json {
        let out = serde_json::json!({
            "question": question.text(),
            "language": question.language(),
            "answer": answer.text,
            "source": answer.source,
            "used_fallback": answer.used_fallback(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_answer(&question, &answer, &theme));
    }

    Ok(())
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.to_uppercase().as_str() {
        "TRACE" => "trace",
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "warn",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn source_label(source: &AnswerSource, theme: &Theme) -> String {
    match source {
        AnswerSource::Provider(kind) => (theme.online)(&format!("🌐 [{}]", kind)),
        AnswerSource::Fallback(topic) => (theme.offline)(&format!("📚 [offline · {}]", topic)),
    }
}

fn format_answer(question: &Question, answer: &ResolvedAnswer, theme: &Theme) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "{} {}",
        (theme.title)(question.text().trim()),
        source_label(&answer.source, theme)
    )
    .ok();
    writeln!(output, "  {}", (theme.line)(&"⸺".repeat(40))).ok();
    for line in answer.text.lines() {
        writeln!(output, "  {}", (theme.answer)(line)).ok();
    }
    writeln!(output).ok();
    output
}

fn print_languages(json: bool) -> anyhow::Result<()> {
    if json {
        let tags: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "languages": tags }))?);
        return Ok(());
    }
    for lang in Language::ALL {
        println!("{:<8} {:<3} {}", lang.as_str(), lang.code(), lang.native_name());
    }
    Ok(())
}

async fn print_history(
    state: &AppState,
    user_id: &str,
    theme: &Theme,
    json: bool,
) -> anyhow::Result<()> {
    let conversations = state
        .store
        .recent_conversations(user_id, DEFAULT_HISTORY_LIMIT)
        .await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "conversations": conversations }))?
        );
        return Ok(());
    }

    if conversations.is_empty() {
        println!("No conversations yet");
        return Ok(());
    }

    for conv in &conversations {
        let stamp = conv.created_at.format("%Y-%m-%d %H:%M").to_string();
        let marker = if conv.used_fallback { "offline" } else { "online" };
        println!(
            "{} {}",
            (theme.meta)(&format!("{} [{}] [{}]", stamp, conv.language, marker)),
            (theme.title)(&conv.question)
        );
        println!("  {}", (theme.answer)(&conv.answer));
        println!();
    }
    Ok(())
}

async fn print_guides(state: &AppState, cli: &Cli, theme: &Theme) -> anyhow::Result<()> {
    let mut blocks = Vec::new();
    let mut out = serde_json::Map::new();

    if let Some(name) = &cli.crop {
        let filter = CropFilter {
            crop_name: name.clone(),
            season: cli.season.clone(),
            location: cli.location.clone(),
        };
        let guides = state.guides.crop_guidance(&filter).await?;
        blocks.extend(guides.iter().map(format_crop));
        out.insert("crops".to_string(), serde_json::to_value(&guides)?);
    }
    if let Some(name) = &cli.pest {
        let filter = PestFilter {
            pest_name: name.clone(),
            crop_name: cli.affecting.clone(),
            severity: cli.severity.clone(),
        };
        let pests = state.guides.pest_info(&filter).await?;
        blocks.extend(pests.iter().map(format_pest));
        out.insert("pests".to_string(), serde_json::to_value(&pests)?);
    }
    if let Some(condition) = &cli.tips {
        let tips = state.guides.weather_tips(condition.as_deref()).await?;
        blocks.extend(tips.iter().map(format_weather_tip));
        out.insert("weather_tips".to_string(), serde_json::to_value(&tips)?);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if blocks.is_empty() {
        println!("No matching guides");
        return Ok(());
    }
    for block in &blocks {
        let mut lines = block.lines();
        if let Some(head) = lines.next() {
            println!("{}", (theme.title)(head));
        }
        for line in lines {
            println!("  {}", (theme.answer)(line));
        }
        println!();
    }
    Ok(())
}

async fn print_weather(
    state: &AppState,
    lat: f64,
    lon: f64,
    forecast: bool,
    theme: &Theme,
    json: bool,
) -> anyhow::Result<()> {
    if forecast {
        let entries = state.weather.forecast(lat, lon).await?;
        let days = aggregate_forecast(&entries);
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({ "forecast": days }))?
            );
            return Ok(());
        }
        for day in &days {
            let conditions = day
                .conditions
                .iter()
                .map(|(c, n)| format!("{}×{}", c, n))
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{}  {:.1}–{:.1}°C  humidity {}%  rain {}mm  {}",
                (theme.title)(&day.date),
                day.temp_min,
                day.temp_max,
                day.humidity,
                day.rain,
                (theme.meta)(&conditions)
            );
        }
        return Ok(());
    }

    let snapshot = state.weather.current(lat, lon).await?;
    let advice = recommendation_text(&snapshot);
    if json {
        let out = serde_json::json!({
            "temperature": snapshot.temperature,
            "humidity": snapshot.humidity,
            "condition": snapshot.condition,
            "description": snapshot.description,
            "wind_speed": snapshot.wind_speed,
            "recommendations": advice,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {}",
        (theme.title)(&format!("{:.1}°C {}", snapshot.temperature, snapshot.condition)),
        (theme.meta)(&format!(
            "humidity {}%, wind {} m/s, {}",
            snapshot.humidity, snapshot.wind_speed, snapshot.description
        ))
    );
    for line in advice.lines() {
        println!("  {}", (theme.answer)(line));
    }
    Ok(())
}

async fn print_status(state: &AppState) -> anyhow::Result<()> {
    println!("{}", "krishi Status".green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let db_path = config::get_database_path(&state.config);
    let count = state.store.count().await?;
    println!("Database: {} ({} conversations)", db_path.display(), count);

    println!(
        "Config: {}",
        config::get_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    let settings = state.resolver.selector().settings();
    println!("Preferred provider: {}", settings.active);
    for backend in state.resolver.selector().backends() {
        let status = if settings.is_available(backend.kind()) {
            "Configured".green()
        } else {
            "Not configured".yellow()
        };
        println!("  {}: {}", backend.kind(), status);
    }
    match state.resolver.selector().select() {
        Some(backend) => println!("Answering with: {}", backend.kind()),
        None => println!("Answering with: {}", "offline knowledge only".yellow()),
    }

    if state.weather.is_configured() {
        println!("Weather API: Configured");
    } else {
        println!("Weather API: Not configured");
    }

    Ok(())
}
