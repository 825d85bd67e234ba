//! Help text generation

use crate::infrastructure::plugins::PluginRegistry;

const HELP_FOOTER: &str =
    "\nYou can find more info about command by typing after /help, like this: <pre>/help /cash</pre>";

const NOT_AVAILABLE: &str = "Not available";

/// One line per visible, described command across the registry, then a usage hint
pub fn gen_help(registry: &PluginRegistry) -> String {
    let mut docs = String::new();
    for plugin in registry.iter() {
        for command in plugin.commands() {
            if command.hidden {
                continue;
            }
            if let Some(description) = &command.description {
                docs.push_str(&format!("{} - <i>{}</i>\n", command.command, description));
            }
        }
    }
    docs.push_str(HELP_FOOTER);
    docs
}

/// Detailed info block for a command, looked up case-insensitively.
///
/// The header echoes `query` as typed.
pub fn command_info(registry: &PluginRegistry, query: &str) -> Option<String> {
    let wanted = query.to_lowercase();
    let command = registry
        .iter()
        .flat_map(|plugin| plugin.commands())
        .find(|c| c.command.to_lowercase() == wanted)?;

    let description = command.description.as_deref().unwrap_or(NOT_AVAILABLE);
    let docs = command
        .docs
        .as_deref()
        .map(|d| html_escape(&dedent(d)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    Some(format!(
        "\n{}\nDescription: <i>{}</i>\nAdditional info and examples:\n<i>{}</i>\n",
        query, description, docs
    ))
}

/// Escape HTML special characters
pub fn html_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Remove the leading whitespace shared by every non-blank line.
///
/// Blank lines are emptied and do not count towards the shared margin.
/// Tabs and spaces are distinct, so `"\t a"` and `"  b"` share nothing.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| &l[..l.len() - l.trim_start_matches([' ', '\t']).len()])
        .reduce(|common, indent| {
            let shared = common
                .bytes()
                .zip(indent.bytes())
                .take_while(|(a, b)| a == b)
                .count();
            &common[..shared]
        })
        .unwrap_or("");

    let mut out = text
        .lines()
        .map(|l| if l.trim().is_empty() { "" } else { &l[margin.len()..] })
        .collect::<Vec<_>>()
        .join("\n");
    if text.ends_with('\n') {
        out.push('\n');
    }
    out
}
