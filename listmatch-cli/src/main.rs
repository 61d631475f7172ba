use std::fs;

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use listmatch_core::{Bound, Edges, Matcher, Options, SpecialKey};
use log::debug;

#[derive(Parser)]
#[command(name = "listmatch")]
#[command(about = "Listmatch - compile word lists into compact regular expressions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the pattern matching a list of words
    Pattern {
        /// The words to match
        words: Vec<String>,
        /// Read the words from a file, one per line
        #[arg(short, long)]
        file: Option<String>,
        /// Show the normalized list and tree
        #[arg(short, long)]
        debug: bool,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Test the pattern for a list of words against input
    Test {
        /// The input string to test
        input: String,
        /// The words to match
        words: Vec<String>,
        /// Read the words from a file, one per line
        #[arg(short, long)]
        file: Option<String>,
        #[command(flatten)]
        options: OptionArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BoundArg {
    Word,
    String,
    Line,
}

#[derive(Clone, Copy, ValueEnum)]
enum EdgeArg {
    Both,
    Left,
    Right,
}

#[derive(Args)]
struct OptionArgs {
    /// Do not wrap the pattern in a group
    #[arg(long)]
    no_atomic: bool,
    /// Use atomic groups and possessive quantifiers
    #[arg(long)]
    possessive: bool,
    /// Match case-insensitively
    #[arg(short = 'i', long)]
    case_insensitive: bool,
    /// Make ^ and $ match at line breaks
    #[arg(short, long)]
    multiline: bool,
    /// Strip whitespace from the ends of each word
    #[arg(long)]
    trim: bool,
    /// Let any run of whitespace stand for any other
    #[arg(short = 'w', long)]
    normalize_whitespace: bool,
    /// Emit spaces and # literally for use outside extended mode
    #[arg(long)]
    not_extended: bool,
    /// Boundary condition around each word
    #[arg(short, long, value_enum)]
    bound: Option<BoundArg>,
    /// Which edges of each word the boundary applies to
    #[arg(long, value_enum, default_value = "both")]
    edge: EdgeArg,
    /// Wrap the pattern in a named group
    #[arg(short, long)]
    name: Option<String>,
    /// Replace KEY with PATTERN; a KEY written /like this/ is a regex
    #[arg(short, long, value_name = "KEY=PATTERN")]
    special: Vec<String>,
    /// Check that every special pattern compiles
    #[arg(long)]
    vet: bool,
}

impl OptionArgs {
    fn to_options(&self) -> Result<Options, String> {
        let edges = match self.edge {
            EdgeArg::Both => Edges::Both,
            EdgeArg::Left => Edges::Left,
            EdgeArg::Right => Edges::Right,
        };
        let mut options = Options::new()
            .atomic(!self.no_atomic)
            .backtracking(!self.possessive)
            .case_insensitive(self.case_insensitive)
            .multiline(self.multiline)
            .trim(self.trim)
            .normalize_whitespace(self.normalize_whitespace)
            .not_extended(self.not_extended)
            .vet(self.vet);
        if let Some(bound) = self.bound {
            options = options.bound(match bound {
                BoundArg::Word => Bound::Word(edges),
                BoundArg::String => Bound::String(edges),
                BoundArg::Line => Bound::Line(edges),
            });
        }
        if let Some(name) = &self.name {
            options = options.name(name.clone());
        }
        for spec in &self.special {
            let (key, pattern) = spec
                .split_once('=')
                .ok_or_else(|| format!("special {} is not of the form KEY=PATTERN", spec))?;
            options = options.special(parse_key(key), pattern);
        }
        Ok(options)
    }
}

fn parse_key(key: &str) -> SpecialKey {
    match key.strip_prefix('/').and_then(|k| k.strip_suffix('/')) {
        Some(pattern) if !pattern.is_empty() => SpecialKey::pattern(pattern),
        _ => SpecialKey::literal(key),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Pattern {
            words,
            file,
            debug,
            options,
        } => cmd_pattern(words, file, debug, &options),
        Commands::Test {
            input,
            words,
            file,
            options,
        } => cmd_test(&input, words, file, &options),
    }
}

fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}

fn load(words: Vec<String>, file: Option<String>) -> Vec<String> {
    let Some(path) = file else { return words };
    debug!("reading words from {}", path);
    match fs::read_to_string(&path) {
        Ok(text) => words
            .into_iter()
            .chain(text.lines().map(str::to_string))
            .collect(),
        Err(e) => fail(format!("cannot read {}: {}", path, e)),
    }
}

fn matcher(options: &OptionArgs) -> Matcher {
    let options = options.to_options().unwrap_or_else(|e| fail(e));
    Matcher::new(options).unwrap_or_else(|e| fail(e))
}

fn cmd_pattern(words: Vec<String>, file: Option<String>, debug: bool, options: &OptionArgs) {
    let words = load(words, file);
    let matcher = matcher(options);

    if debug {
        match matcher.report(&words) {
            Ok(report) => report.report(),
            Err(e) => fail(e),
        }
        return;
    }
    match matcher.pattern(&words) {
        Ok(Some(pattern)) => println!("{}", pattern.green()),
        Ok(None) => println!("{}", "(nothing to match)".yellow()),
        Err(e) => fail(e),
    }
}

fn cmd_test(input: &str, words: Vec<String>, file: Option<String>, options: &OptionArgs) {
    let words = load(words, file);
    let matcher = matcher(options);
    let pattern = match matcher.pattern(&words) {
        Ok(p) => p,
        Err(e) => fail(e),
    };
    let regex = match matcher.rx(&words) {
        Ok(r) => r,
        Err(e) => fail(e),
    };

    println!("{}", "Testing pattern...".bold());
    println!("  Pattern: {}", pattern.as_deref().unwrap_or("(?!)").cyan());
    println!("  Input:   {}", input.yellow());
    println!();

    let mut found = 0;
    for m in regex.find_iter(input) {
        let m = m.unwrap_or_else(|e| fail(e));
        found += 1;
        println!(
            "  [{}] {}..{} = {}",
            found,
            m.start(),
            m.end(),
            m.as_str().green()
        );
    }
    if found == 0 {
        println!("{}", "✗ No match".red());
        std::process::exit(1);
    }
}
