//! Core command set - the built-in plugin appended after every reload

use std::sync::Arc;

use crate::application::errors::CommandError;
use crate::application::messaging::Context;
use crate::domain::entities::{CommandBinding, HandlerResult, Reply, UserId};
use crate::domain::traits::KeyboardButton;
use crate::infrastructure::plugins::PluginRegistry;
use crate::plugins::Plugin;
use super::help::{command_info, gen_help};

pub const CORE_PLUGIN_NAME: &str = "Core Plugin";

/// Identity the core commands need
#[derive(Debug, Clone)]
pub struct CoreSettings {
    pub admin_id: UserId,
    pub bot_name: String,
    pub platform: String,
}

impl CoreSettings {
    fn authorize(&self, ctx: &Context<'_>) -> Result<(), CommandError> {
        if ctx.user_id() == Some(self.admin_id) {
            Ok(())
        } else {
            Err(CommandError::AccessDenied)
        }
    }
}

/// start, plugin list, help, reload and single-plugin load
pub struct CorePlugin {
    settings: Arc<CoreSettings>,
}

impl CorePlugin {
    pub fn new(settings: CoreSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        CORE_PLUGIN_NAME
    }

    fn commands(&self) -> Vec<CommandBinding> {
        let start_settings = Arc::clone(&self.settings);
        let reload_settings = Arc::clone(&self.settings);
        let load_settings = Arc::clone(&self.settings);

        vec![
            CommandBinding::new("/start", move |ctx| start(&start_settings, ctx))
                .with_docs("Greets you. /start help in a private chat lists every command."),
            CommandBinding::new("//plugins", |ctx| Ok(Some(plugin_list(ctx.registry))))
                .with_docs("Lists loaded plugins with their health."),
            CommandBinding::new("/help", help)
                .with_docs("/help lists commands.\n/help <command> explains one of them."),
            CommandBinding::new("//reload", move |ctx| reload(&reload_settings, ctx))
                .with_docs("Admin only. Reloads every plugin from the plugin directory."),
            CommandBinding::new("//pluginload", move |ctx| load(&load_settings, ctx))
                .with_docs("Admin only. Loads one plugin manifest: //pluginload plugins/cash.yaml"),
        ]
    }
}

/// Plugin list view: one `<glyph><name>` line per plugin, reverse-sorted
pub fn plugin_list(registry: &PluginRegistry) -> Reply {
    Reply::text(registry.status_lines().join("\n"))
}

fn start(settings: &CoreSettings, ctx: &mut Context<'_>) -> HandlerResult {
    if ctx.args.first().is_some_and(|a| a == "help") && ctx.is_private() {
        return Ok(Some(Reply::html(gen_help(ctx.registry))));
    }
    Ok(Some(Reply::text(format!(
        "Hi! I am {}, {} bot with random stuff!\nTo see my commands, type: /help",
        settings.bot_name, settings.platform
    ))))
}

fn help(ctx: &mut Context<'_>) -> HandlerResult {
    if let Some(query) = ctx.args.first() {
        let reply = match command_info(ctx.registry, query) {
            Some(info) => Reply::html(info),
            None => Reply::text("I dont know this command"),
        };
        return Ok(Some(reply));
    }

    if ctx.is_private() {
        return Ok(Some(Reply::html(gen_help(ctx.registry))));
    }

    let button = KeyboardButton::new("List commands in PM")
        .with_url(format!("http://t.me/{}?start=help", ctx.bot.username));
    Ok(Some(
        Reply::text("To prevent flood, use this command in PM").with_keyboard(vec![vec![button]]),
    ))
}

fn reload(settings: &CoreSettings, ctx: &mut Context<'_>) -> HandlerResult {
    settings.authorize(ctx)?;
    tracing::info!("Reload requested.");
    ctx.notify(Reply::text("Reloading modules. "));
    ctx.registry.load_all();
    Ok(Some(plugin_list(ctx.registry)))
}

fn load(settings: &CoreSettings, ctx: &mut Context<'_>) -> HandlerResult {
    settings.authorize(ctx)?;
    let path = ctx.args.join(" ");
    tracing::info!("Load requested: {}", path);
    ctx.notify(Reply::text(format!("Loading {}", path)));
    ctx.registry.load_one(&path);
    Ok(Some(plugin_list(ctx.registry)))
}
