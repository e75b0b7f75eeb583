//! shsplit: split a shell-style command line into tokens.
//!
//! The command is taken from the arguments (joined by spaces) or, when none
//! are given, streamed from stdin. Output goes to stdout; diagnostics and
//! logs go to stderr.
//!
//! Exit codes: 0 on success, 1 when the input cannot be tokenized,
//! 2 on usage or config errors.

use std::io::BufRead;
use std::process::ExitCode;

use shsplit::config::Config;
use shsplit::lex::{Classifier, Lexer, Token, TokenKind, Tokenizer, UnknownPolicy};
use shsplit::logging;

const USAGE: &str = "\
usage: shsplit [OPTIONS] [--] [COMMAND...]

Splits COMMAND (or stdin when no COMMAND is given) into shell-style tokens.

output:
      --words          JSON array of words, comments dropped (default)
      --tokens         JSON array of {kind, value} tokens, comments kept
      --quote          words re-quoted as a single shell line
      --dump-config    print the effective configuration as TOML

options:
      --config PATH    merge PATH over the built-in config instead of
                       ~/.config/shsplit/config.toml
      --no-comments    treat '#' as an ordinary character
      --permissive     accept characters outside every class as ordinary
  -v, --verbose        log to stderr (repeat for more detail)
  -h, --help           show this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Words,
    Tokens,
    Quote,
    DumpConfig,
}

#[derive(Debug)]
struct Options {
    output: Output,
    config_path: Option<String>,
    no_comments: bool,
    permissive: bool,
    verbosity: u8,
    help: bool,
    command: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options {
        output: Output::Words,
        config_path: None,
        no_comments: false,
        permissive: false,
        verbosity: 0,
        help: false,
        command: Vec::new(),
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--words" => opts.output = Output::Words,
            "--tokens" => opts.output = Output::Tokens,
            "--quote" => opts.output = Output::Quote,
            "--dump-config" => opts.output = Output::DumpConfig,
            "--config" => match args.next() {
                Some(path) => opts.config_path = Some(path),
                None => return Err("--config requires a path".into()),
            },
            "--no-comments" => opts.no_comments = true,
            "--permissive" => opts.permissive = true,
            "-v" | "--verbose" => opts.verbosity = opts.verbosity.saturating_add(1),
            s if s.len() > 2 && s.starts_with('-') && s[1..].bytes().all(|b| b == b'v') => {
                let count = u8::try_from(s.len() - 1).unwrap_or(u8::MAX);
                opts.verbosity = opts.verbosity.saturating_add(count);
            }
            "-h" | "--help" => opts.help = true,
            "--" => {
                opts.command.extend(args.by_ref());
                break;
            }
            s if s.starts_with('-') => return Err(format!("unknown option: {s}")),
            s => {
                opts.command.push(s.to_string());
                opts.command.extend(args.by_ref());
                break;
            }
        }
    }
    Ok(opts)
}

/// Tokenize `reader` and render it in the requested format.
fn render<R: BufRead>(
    output: Output,
    reader: R,
    classifier: &Classifier,
) -> Result<String, Box<dyn std::error::Error>> {
    match output {
        Output::Words => {
            let words: Vec<String> =
                Lexer::with_classifier(reader, classifier).collect::<Result<_, _>>()?;
            Ok(serde_json::to_string(&words)?)
        }
        Output::Tokens => {
            let tokens: Vec<Token> =
                Tokenizer::with_classifier(reader, classifier).collect::<Result<_, _>>()?;
            Ok(serde_json::to_string(&tokens)?)
        }
        Output::Quote => {
            let mut parts = Vec::new();
            for token in Tokenizer::with_classifier(reader, classifier) {
                let token = token?;
                match token.kind {
                    TokenKind::Word => parts.push(shlex::try_quote(&token.value)?.into_owned()),
                    TokenKind::Pipe | TokenKind::Redirect => parts.push(token.value),
                    TokenKind::Comment => {}
                }
            }
            Ok(parts.join(" "))
        }
        Output::DumpConfig => unreachable!("handled before tokenizing"),
    }
}

fn main() -> ExitCode {
    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("shsplit: {msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if opts.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    logging::init(opts.verbosity);

    let mut config = match opts.config_path.as_deref() {
        Some(path) => match Config::load_from(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("shsplit: {e}");
                return ExitCode::from(2);
            }
        },
        None => Config::load(),
    };
    if opts.no_comments {
        config.settings.comments = false;
    }
    if opts.permissive {
        config.settings.unknown = UnknownPolicy::Ordinary;
    }

    if opts.output == Output::DumpConfig {
        return match config.to_toml() {
            Ok(text) => {
                print!("{text}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("shsplit: {e}");
                ExitCode::from(2)
            }
        };
    }

    let classifier = Classifier::from_config(&config);
    let result = if opts.command.is_empty() {
        log::debug!("reading command from stdin");
        render(opts.output, std::io::stdin().lock(), &classifier)
    } else {
        let line = opts.command.join(" ");
        render(opts.output, line.as_bytes(), &classifier)
    };

    match result {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("shsplit: {e}");
            ExitCode::FAILURE
        }
    }
}
