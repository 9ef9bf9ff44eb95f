mod dot;
mod grammars;

use std::{env::args, path::PathBuf, str::FromStr};

use anyhow::{anyhow, bail, Context};
use dot::DotWriter;
use grammars::DemoGrammar;
use lingo::{GrammarBuilder, ParseConfig, PrettyPrinter, StrSource};

struct StdoutSink;

impl std::fmt::Write for StdoutSink {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        use std::io::Write as _;
        std::io::stdout()
            .write_all(s.as_bytes())
            .map_err(|_| std::fmt::Error)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
enum Input {
    Arg(String),
    File(PathBuf),
}

#[derive(Debug)]
struct Options {
    grammar: DemoGrammar,
    do_print: bool,
    do_dot: bool,
    config: ParseConfig,
    inputs: Vec<Input>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options {
        grammar: DemoGrammar::Calculator,
        do_print: false,
        do_dot: false,
        config: ParseConfig::default(),
        inputs: Vec::new(),
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--print" => options.do_print = true,
            "--dot" => options.do_dot = true,
            "--grammar" => {
                let next = iter.next().context("Expected argument to --grammar")?;
                options.grammar = next.parse().map_err(|e: String| anyhow!(e))?;
            }
            "--file" => {
                let next = iter.next().context("Expected argument to --file")?;
                options.inputs.push(Input::File(next.into()));
            }
            "--max-depth" => {
                let depth = iter
                    .next()
                    .context("Expected argument to --max-depth")?
                    .parse::<u32>()
                    .context("Expected number")?;
                options.config = options.config.with_max_depth(depth);
            }
            flag if flag.starts_with("--") => bail!("Unknown flag `{flag}`"),
            _ => options.inputs.push(Input::Arg(arg.clone())),
        }
    }

    if options.inputs.is_empty() && !(options.do_print || options.do_dot) {
        bail!("Nothing to do, provide an input or one of --print, --dot");
    }

    Ok(options)
}

fn init_logger() -> anyhow::Result<()> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| "WARN".to_owned());
    let level =
        log::LevelFilter::from_str(&level).map_err(|_| anyhow!("Invalid log level `{level}`"))?;

    simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    )?;

    Ok(())
}

fn main() {
    if let Err(e) = init_logger().and_then(|_| run()) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let options = parse_args(args().skip(1))?;

    let g = GrammarBuilder::new();
    let rule = options
        .grammar
        .build(&g)
        .with_context(|| format!("Failed to build grammar `{}`", options.grammar.name()))?;

    if options.do_print {
        let mut printer = PrettyPrinter::new(StdoutSink);
        rule.accept(&mut printer);
        printer.finish()?;
    }

    if options.do_dot {
        let mut dot = DotWriter::begin(StdoutSink, options.grammar.name());
        rule.accept(&mut dot);
        dot.finish()?;
    }

    let root = rule.id();
    let grammar = g.finish()?;
    log::debug!(
        "Grammar `{}` has {} nodes",
        options.grammar.name(),
        grammar.len()
    );

    for (i, input) in options.inputs.iter().enumerate() {
        let (name, text) = match input {
            Input::Arg(text) => (format!("<arg {}>", i + 1), text.clone()),
            Input::File(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read `{}`", path.display()))?;
                (path.display().to_string(), text)
            }
        };

        let mut src = StrSource::new(&text).with_name(&name);
        let matched = grammar
            .parse_with(root, &mut src, &options.config)
            .with_context(|| format!("Failed to parse {name}"))?;

        match matched {
            true => println!("{name}: match ({}/{})", src.offset(), src.len()),
            false => println!("{name}: no match"),
        }
    }

    Ok(())
}
