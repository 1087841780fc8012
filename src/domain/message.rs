use std::io::BufRead;
use tracing::warn;

/// Build the message text.
///
/// Positional arguments are joined with single spaces. Without arguments,
/// exactly one line is read from `input` and trailing CR/LF characters are
/// stripped. Closed or empty input yields an empty message.
pub fn compose_message<R: BufRead>(args: &[String], mut input: R) -> String {
    if !args.is_empty() {
        return args.join(" ");
    }

    let mut line = String::new();
    if let Err(e) = input.read_line(&mut line) {
        warn!("Failed to read message from stdin, sending empty message: {e}");
        return String::new();
    }

    line.trim_end_matches(['\r', '\n']).to_string()
}
