//! Command-line argument parsing for the marketlens CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

/// Options for a research run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchArgs {
    /// Topic words joined with single spaces
    pub topic: String,
    /// Raw depth; range checked when the session starts
    pub depth: u8,
    /// Backend URL override
    pub base_url: Option<String>,
    /// Lower the default log filter to debug
    pub verbose: bool,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Query the backend health endpoint
    Health { base_url: Option<String>, verbose: bool },
    /// Run one research session (default)
    Research(ResearchArgs),
    /// Arguments could not be parsed
    Invalid(String),
}

/// Usage text printed by `--help` and after argument errors.
pub const USAGE: &str = "\
Usage: marketlens [OPTIONS] <TOPIC>...
       marketlens --health [--base-url URL]

Options:
  -d, --depth <N>       Research depth: 1 standard, 2 deep, 3 extensive [default: 1]
      --base-url <URL>  Research backend URL [env: MARKETLENS_BACKEND_URL]
      --health          Check the backend and exit
  -v, --verbose         Debug logging on stderr
  -h, --help            Print help
  -V, --version         Print version";

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win wherever they appear. Remaining positional
/// words form the topic; `--` ends option parsing.
///
/// # Examples
///
/// ```
/// use marketlens::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["marketlens".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut args = args.skip(1);
    let mut words: Vec<String> = Vec::new();
    let mut depth: u8 = 1;
    let mut base_url = None;
    let mut health = false;
    let mut verbose = false;
    let mut options_done = false;

    while let Some(arg) = args.next() {
        if options_done {
            words.push(arg);
            continue;
        }

        let (flag, inline_value) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };

        match flag.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--health" => health = true,
            "--verbose" | "-v" => verbose = true,
            "--" => options_done = true,
            "--depth" | "-d" => {
                let Some(value) = inline_value.or_else(|| args.next()) else {
                    return CliCommand::Invalid("--depth requires a value".to_string());
                };
                match value.parse::<u8>() {
                    Ok(parsed) => depth = parsed,
                    Err(_) => {
                        return CliCommand::Invalid(format!("invalid depth '{}'", value));
                    }
                }
            }
            "--base-url" => {
                let Some(value) = inline_value.or_else(|| args.next()) else {
                    return CliCommand::Invalid("--base-url requires a value".to_string());
                };
                base_url = Some(value);
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return CliCommand::Invalid(format!("unknown option '{}'", other));
            }
            _ => words.push(arg),
        }
    }

    if health {
        return CliCommand::Health { base_url, verbose };
    }

    let topic = words.join(" ");
    if topic.trim().is_empty() {
        return CliCommand::Invalid("missing research topic".to_string());
    }

    CliCommand::Research(ResearchArgs {
        topic,
        depth,
        base_url,
        verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("marketlens")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["-V"]), CliCommand::Version);
        assert_eq!(parse(&["coffee", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["--help"]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
    }

    #[test]
    fn test_parse_topic_words() {
        assert_eq!(
            parse(&["electric", "cargo", "bikes"]),
            CliCommand::Research(ResearchArgs {
                topic: "electric cargo bikes".to_string(),
                depth: 1,
                base_url: None,
                verbose: false,
            })
        );
    }

    #[test]
    fn test_parse_depth_and_base_url() {
        let command = parse(&["--depth", "3", "--base-url=http://10.0.0.5:8000", "oat", "milk"]);
        let CliCommand::Research(args) = command else {
            panic!("expected research command");
        };
        assert_eq!(args.depth, 3);
        assert_eq!(args.base_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(args.topic, "oat milk");

        let CliCommand::Research(args) = parse(&["-d", "2", "--depth=3", "x"]) else {
            panic!("expected research command");
        };
        assert_eq!(args.depth, 3);
    }

    #[test]
    fn test_out_of_range_depth_is_passed_through() {
        let CliCommand::Research(args) = parse(&["--depth", "7", "x"]) else {
            panic!("expected research command");
        };
        assert_eq!(args.depth, 7);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(parse(&[]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--depth"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--depth", "deep", "x"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--base-url"]), CliCommand::Invalid(_)));
        assert!(matches!(parse(&["--frobnicate", "x"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_parse_health() {
        assert_eq!(
            parse(&["--health", "--base-url", "https://api.example.com"]),
            CliCommand::Health {
                base_url: Some("https://api.example.com".to_string()),
                verbose: false,
            }
        );
    }

    #[test]
    fn test_double_dash_ends_options() {
        let CliCommand::Research(args) = parse(&["-v", "--", "-5%", "growth"]) else {
            panic!("expected research command");
        };
        assert_eq!(args.topic, "-5% growth");
        assert!(args.verbose);
    }
}
