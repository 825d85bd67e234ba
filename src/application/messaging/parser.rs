//! Argument parsing for routed commands and inline queries

/// Arguments of a command message: every whitespace-separated word after the first
pub fn command_args(text: &str) -> Vec<String> {
    text.split_whitespace().skip(1).map(str::to_string).collect()
}

/// Arguments of an inline query: the words following the matched command token
pub fn inline_args(query: &str, command: &str) -> Vec<String> {
    query
        .strip_prefix(command)
        .unwrap_or(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Arguments handed to freeform handlers: every word of the message
pub fn message_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args() {
        assert_eq!(command_args("/help /cash"), vec!["/cash"]);
        assert_eq!(command_args("/start@plug_bot   help  now"), vec!["help", "now"]);
        assert!(command_args("/plugins").is_empty());
    }

    #[test]
    fn test_inline_args() {
        assert_eq!(inline_args("/cash 10 usd", "/cash"), vec!["10", "usd"]);
        assert_eq!(inline_args("/cashflow", "/cash"), vec!["flow"]);
        assert!(inline_args("/cash", "/cash").is_empty());
    }

    #[test]
    fn test_message_words() {
        assert_eq!(message_words(" hi  there "), vec!["hi", "there"]);
        assert!(message_words("").is_empty());
    }
}
