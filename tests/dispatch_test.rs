//! End-to-end dispatch against a plugin directory on disk
//! Run with: cargo test --test dispatch_test

use std::fs;
use std::sync::{Arc, Once};

use plugbot::application::messaging::{MessageDispatcher, Outgoing};
use plugbot::application::services::{CorePlugin, CoreSettings};
use plugbot::domain::entities::{Chat, InlineQuery, Message, Update, User};
use plugbot::domain::traits::BotInfo;
use plugbot::infrastructure::plugins::{HandlerCatalog, PluginLoader, PluginRegistry};
use tempfile::TempDir;

static INIT: Once = Once::new();

const ADMIN: i64 = 1;

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn bot() -> BotInfo {
    BotInfo {
        id: "100".to_string(),
        name: "Plugbot".to_string(),
        username: "plug_bot".to_string(),
    }
}

fn dispatcher(dir: &TempDir) -> MessageDispatcher {
    let core = CorePlugin::new(CoreSettings {
        admin_id: ADMIN,
        bot_name: "Plugbot".to_string(),
        platform: "telegram".to_string(),
    });
    let loader = PluginLoader::new(dir.path(), HandlerCatalog::with_defaults());
    let mut registry = PluginRegistry::new(loader).with_core(Arc::new(core));
    registry.load_all();
    MessageDispatcher::new(registry)
}

fn say(dispatcher: &mut MessageDispatcher, chat: Chat, user: i64, text: &str) -> Vec<String> {
    let update = Update::Message(Message::new(chat, text).with_sender(User::new(user)));
    dispatcher
        .dispatch(&update, &bot())
        .into_iter()
        .map(|out| match out {
            Outgoing::Message { reply, .. } => reply.text,
            Outgoing::Inline { answers, .. } => answers[0].reply.text.clone(),
        })
        .collect()
}

const GREETER: &str = r#"
schema-version: 1
commands:
  - command: /greet
    description: says hello
    reply: Hello there
  - command: /echo
    description: repeats you
    handler: echo
handlers:
  - regex: (?i)good morning
    reply: Morning!
  - regex: (?i)good
    handler: echo
"#;

const WEATHER: &str = r#"
schema-version: 0
commands:
  - command: /weather
    description: forecast
    docs: |
        Shows the forecast.
          /weather
    reply: Sunny
"#;

#[test]
fn test_commands_and_freeform_from_manifests() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("greeter.yaml"), GREETER).unwrap();
    fs::write(dir.path().join("weather.yml"), WEATHER).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a plugin").unwrap();
    let mut dispatcher = dispatcher(&dir);

    let names: Vec<&str> = dispatcher.registry().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["greeter", "weather", "Core Plugin"]);

    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/greet"), vec!["Hello there"]);
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/greet@plug_bot"), vec!["Hello there"]);
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/echo a  b"), vec!["a b"]);
    assert!(say(&mut dispatcher, Chat::group(-5), 9, "/greeting").is_empty());

    assert_eq!(
        say(&mut dispatcher, Chat::group(-5), 9, "Good morning all"),
        vec!["Morning!", "Good morning all"]
    );
    assert!(say(&mut dispatcher, Chat::group(-5), 9, "very good").is_empty());
}

#[test]
fn test_help_lists_manifest_commands() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("greeter.yaml"), GREETER).unwrap();
    fs::write(dir.path().join("weather.yaml"), WEATHER).unwrap();
    let mut dispatcher = dispatcher(&dir);

    let help = say(&mut dispatcher, Chat::private(9), 9, "/help");
    assert!(help[0].starts_with(
        "/greet - <i>says hello</i>\n/echo - <i>repeats you</i>\n/weather - <i>forecast</i>\n"
    ));

    let info = say(&mut dispatcher, Chat::group(-5), 9, "/help /WEATHER");
    assert_eq!(
        info,
        vec!["\n/WEATHER\nDescription: <i>forecast</i>\nAdditional info and examples:\n<i>Shows the forecast.\n  /weather\n</i>\n"]
    );
}

#[test]
fn test_reload_picks_up_changes_and_reports_failures() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("weather.yaml"), WEATHER).unwrap();
    let mut dispatcher = dispatcher(&dir);

    fs::remove_file(dir.path().join("weather.yaml")).unwrap();
    fs::write(dir.path().join("greeter.yaml"), GREETER).unwrap();
    fs::write(
        dir.path().join("broken.yaml"),
        "schema-version: 0\ncommands: []\nhandlers:\n  - regex: x\n    reply: y\n",
    )
    .unwrap();

    let denied = say(&mut dispatcher, Chat::private(9), 9, "//reload");
    assert_eq!(denied, vec!["Access Denied."]);
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/weather"), vec!["Sunny"]);

    let reloaded = say(&mut dispatcher, Chat::private(ADMIN), ADMIN, "//reload");
    assert_eq!(
        reloaded,
        vec!["Reloading modules. ", "✅greeter\n✅Core Plugin\n⛔broken"]
    );
    assert!(say(&mut dispatcher, Chat::group(-5), 9, "/weather").is_empty());
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/greet"), vec!["Hello there"]);
}

#[test]
fn test_pluginload_appends_single_manifest() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    let outside = TempDir::new().unwrap();
    let path = outside.path().join("weather.yaml");
    fs::write(&path, WEATHER).unwrap();
    let mut dispatcher = dispatcher(&dir);

    let out = say(
        &mut dispatcher,
        Chat::private(ADMIN),
        ADMIN,
        &format!("//pluginload {}", path.display()),
    );
    assert_eq!(out, vec![format!("Loading {}", path.display()), "✅weather\n✅Core Plugin".to_string()]);
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "/weather"), vec!["Sunny"]);
}

#[test]
fn test_disabled_plugin_is_silent_in_that_chat_only() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("greeter.yaml"), GREETER).unwrap();
    let mut dispatcher = dispatcher(&dir);

    dispatcher.registry_mut().disable_in("greeter", -5).unwrap();
    assert!(say(&mut dispatcher, Chat::group(-5), 9, "/greet").is_empty());
    assert_eq!(say(&mut dispatcher, Chat::group(-6), 9, "/greet"), vec!["Hello there"]);
    assert_eq!(say(&mut dispatcher, Chat::group(-5), 9, "good morning"), vec!["Morning!", "good morning"]);
}

#[test]
fn test_inline_query_uses_remaining_words() {
    ensure_init();
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("greeter.yaml"), GREETER).unwrap();
    let mut dispatcher = dispatcher(&dir);

    let update = Update::InlineQuery(InlineQuery {
        id: "inline-1".to_string(),
        from: User::new(9),
        query: "/echo inline words".to_string(),
    });
    let out = dispatcher.dispatch(&update, &bot());
    assert_eq!(out.len(), 1);
    let Outgoing::Inline { query_id, answers } = &out[0] else {
        panic!("expected an inline answer");
    };
    assert_eq!(query_id, "inline-1");
    assert_eq!(answers[0].title, "/echo");
    assert_eq!(answers[0].reply.text, "inline words");

    let miss = Update::InlineQuery(InlineQuery {
        id: "inline-2".to_string(),
        from: User::new(9),
        query: "nothing".to_string(),
    });
    assert!(dispatcher.dispatch(&miss, &bot()).is_empty());
}
