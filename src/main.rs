use clap::{Parser, Subcommand};
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use plugbot::application::errors::BotError;
use plugbot::application::messaging::MessageDispatcher;
use plugbot::application::services::{plugin_list, CorePlugin, CoreSettings, MessageService};
use plugbot::domain::entities::PluginState;
use plugbot::domain::traits::Bot;
use plugbot::infrastructure::adapters::console::ConsoleAdapter;
use plugbot::infrastructure::adapters::telegram::TelegramAdapter;
use plugbot::infrastructure::config::Config;
use plugbot::infrastructure::plugins::{HandlerCatalog, PluginLoader, PluginRegistry};

#[derive(Parser)]
#[command(name = "plugbot")]
#[command(about = "A chat bot whose commands come from hot-reloadable plugins", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Bot token (overrides config)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Load the plugin directory once and show the plugin list
    Plugins,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run => {
            let config = load_config(&cli.config, cli.token).unwrap_or_else(|e| exit_with(e));
            run_bot(config);
        }
        Commands::Version => {
            println!("plugbot v{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::InitConfig => {
            init_config();
        }
        Commands::Plugins => {
            let config = load_config(&cli.config, cli.token).unwrap_or_else(|e| exit_with(e));
            list_plugins(&config);
        }
    }
}

fn load_config(path: &str, token_override: Option<String>) -> Result<Config, BotError> {
    let mut config = if Path::new(path).exists() {
        let mut config = Config::load(path)?;
        config.apply_env();
        config
    } else {
        tracing::info!("No config at {}, using defaults", path);
        Config::load_env()
    };

    if let Some(token) = token_override {
        config.set_token(token);
    }
    Ok(config)
}

fn exit_with(e: BotError) -> ! {
    tracing::error!("{}", e);
    std::process::exit(1);
}

fn build_registry(config: &Config) -> PluginRegistry {
    let core = CorePlugin::new(CoreSettings {
        admin_id: config.admin.id,
        bot_name: config.bot.name.clone(),
        platform: config.bot.platform.clone(),
    });
    let loader = PluginLoader::new(&config.plugins.directory, HandlerCatalog::with_defaults());

    let mut registry = PluginRegistry::new(loader).with_core(Arc::new(core));
    registry.load_all();
    registry
}

fn run_bot(config: Config) {
    tracing::info!("Starting plugbot: {}", config.bot.name);

    let dispatcher = MessageDispatcher::new(build_registry(&config));

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(token) = config.telegram_token() {
        let token = token.to_string();
        rt.block_on(async {
            let mut bot = TelegramAdapter::new(token);
            if let Err(e) = bot.fetch_bot_info().await {
                tracing::error!("Failed to fetch bot info: {}", e);
                return;
            }
            run_telegram_bot(MessageService::new(bot, dispatcher)).await;
        });
    } else {
        // Run console bot (dev mode)
        rt.block_on(async {
            let bot = ConsoleAdapter::new(&config.bot.name, config.console_user_id());
            run_console_bot(MessageService::new(bot, dispatcher)).await;
        });
    }
}

async fn run_telegram_bot(mut service: MessageService<TelegramAdapter>) {
    if let Err(e) = service.bot().start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = service.bot().bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let mut offset: i64 = 0;
    let timeout_seconds = 30;

    tracing::info!("Starting message loop...");

    loop {
        match service.bot().get_updates(offset, timeout_seconds).await {
            Ok(updates) => {
                if !updates.is_empty() {
                    tracing::info!("Received {} updates", updates.len());
                    offset = TelegramAdapter::get_next_offset(&updates);
                }

                for update in updates.into_iter().filter_map(|u| u.into_domain()) {
                    if let Err(e) = service.process(update).await {
                        tracing::error!("Failed to deliver reply: {}", e);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Failed to get updates: {}", e);
                tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
            }
        }
    }
}

async fn run_console_bot(mut service: MessageService<ConsoleAdapter>) {
    if let Err(e) = service.bot().start().await {
        tracing::error!("Failed to start bot: {}", e);
        return;
    }

    let info = service.bot().bot_info();
    tracing::info!("Bot started: @{}", info.username);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let Some(update) = service.bot().to_update(&line) else {
                    continue;
                };
                if let Err(e) = service.process(update).await {
                    tracing::error!("Failed to deliver reply: {}", e);
                }
            }
            Ok(None) => {
                tracing::info!("Input closed, stopping console bot");
                break;
            }
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        }
    }
}

fn list_plugins(config: &Config) {
    let registry = build_registry(config);
    println!("{}", plugin_list(&registry).text);

    for plugin in registry.iter() {
        if let PluginState::Error { reason } = plugin.state() {
            println!("\n{}: {}", plugin.name(), reason);
        }
    }
}

fn init_config() {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
        }
        Err(e) => tracing::error!("{}", e),
    }
}
