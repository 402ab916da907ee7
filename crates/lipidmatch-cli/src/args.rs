use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

// -----------------------------------------------------------------------------
// command-line args
// -----------------------------------------------------------------------------
#[derive(Parser, Debug)]
#[command(
    name("lipidmatch"),
    bin_name("lipidmatch"),

    author,   // retrieved from Cargo.toml `authors`
    version,  // retrieved from Cargo.toml `version`
    about,    // retrieved from Cargo.toml `description`
)]
/// Match experimentally observed lipid names against a reference structural database
pub struct CommandLineArgs {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global_args: GlobalArgs,
}

impl CommandLineArgs {
    pub fn parse_args() -> Self {
        let mut args = Self::parse();

        // If `NO_COLOR` is set in the environment, disable colored output
        //
        // https://no-color.org/
        if std::env::var("NO_COLOR").is_ok() {
            args.global_args.color = Mode::Never
        }

        args
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Match a parsed lipid dataset against a parsed reference database
    ///
    /// Both inputs are CSV tables as produced by the shorthand-notation parsing step,
    /// one row per name, keyed by the INDEX column. Candidate matches are found by
    /// canonical-name equality at each entry's own classification level, by class-name
    /// synonym substitution, and by raw original-name equality; candidates whose
    /// reference-side composition falls outside the supplied constraint lists are
    /// rejected.
    ///
    /// The resulting report contains the matching summary, the accepted matches, the
    /// unmatched entries, the constraint-filtered entries, and the constraint lists
    /// that were applied.
    #[command(display_order = 1, name = "match")]
    Match(MatchArgs),

    /// Print the JSON schema of the match report document
    #[command(display_order = 30)]
    Schema(SchemaArgs),
}

// -----------------------------------------------------------------------------
// global options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Global Options")]
pub struct GlobalArgs {
    /// Enable verbose output
    ///
    /// This can be repeated up to 3 times to enable successively more output.
    #[arg(global=true, long, short, action=ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error feedback messages
    #[arg(global = true, long, short)]
    pub quiet: bool,

    /// Enable or disable colored output
    ///
    /// When this is "auto", colors are enabled when stdout is a tty.
    ///
    /// If the `NO_COLOR` environment variable is set, it takes precedence and is equivalent to `--color=never`.
    #[arg(global=true, long, default_value_t=Mode::Auto, value_name="MODE")]
    pub color: Mode,
}

impl GlobalArgs {
    pub fn use_color<T: IsTerminal>(&self, stream: T) -> bool {
        match self.color {
            Mode::Never => false,
            Mode::Always => true,
            Mode::Auto => stream.is_terminal(),
        }
    }
}

/// A generic auto/never/always mode value
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Mode {
    Auto,
    Never,
    Always,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Mode::Auto => "auto",
            Mode::Never => "never",
            Mode::Always => "always",
        };
        write!(f, "{s}")
    }
}

// -----------------------------------------------------------------------------
// `match` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Match the parsed dataset read from the specified CSV file
    #[arg(long, short, value_name = "PATH")]
    pub dataset: PathBuf,

    /// Match against the parsed reference database read from the specified CSV file
    #[arg(long, short = 'b', value_name = "PATH")]
    pub database: PathBuf,

    /// Allow only the fatty-acyl descriptors listed in the specified file
    ///
    /// One descriptor per line, no header.
    #[arg(long, value_name = "PATH")]
    pub fa_constraints: PathBuf,

    /// Allow only the long-chain-base descriptors listed in the specified file
    ///
    /// One descriptor per line, no header.
    #[arg(long, value_name = "PATH")]
    pub lcb_constraints: PathBuf,

    /// Use additional class-name synonym rules from the specified JSON file
    ///
    /// The file holds an object mapping a class name to an array of synonym class
    /// names. Entries are merged over the builtin rules; a repeated class name
    /// replaces the builtin entry.
    #[arg(long, value_name = "PATH")]
    pub synonyms: Option<PathBuf>,

    /// Report the dataset under the specified name
    ///
    /// Defaults to the dataset file name without its extension.
    #[arg(long, value_name = "NAME")]
    pub dataset_name: Option<String>,

    /// Report the reference database under the specified name
    ///
    /// Defaults to the database file name without its extension.
    #[arg(long, value_name = "NAME")]
    pub database_name: Option<String>,

    #[command(flatten)]
    pub output_args: OutputArgs<MatchOutputFormat>,
}

// -----------------------------------------------------------------------------
// `schema` command
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Write the schema to the specified path
    ///
    /// If this argument is not provided, stdout will be used.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

// -----------------------------------------------------------------------------
// output options
// -----------------------------------------------------------------------------
#[derive(Args, Debug)]
#[command(next_help_heading = "Output Options")]
pub struct OutputArgs<Format: ValueEnum + Send + Sync + 'static> {
    /// Write output to the specified path
    ///
    /// If this argument is not provided, stdout will be used.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write output in the specified format
    #[arg(long, short, value_name="FORMAT", default_value="human")]
    pub format: Format,
}

impl<Format: ValueEnum + Send + Sync> OutputArgs<Format> {
    /// Get a writer for the specified output destination.
    pub fn get_writer(&self) -> std::io::Result<Box<dyn std::io::Write>> {
        use std::fs::File;
        use std::io::BufWriter;

        match &self.output {
            None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
            Some(p) => {
                let f = File::create(p)?;
                Ok(Box::new(BufWriter::new(f)))
            }
        }
    }
}

// -----------------------------------------------------------------------------
// match output format
// -----------------------------------------------------------------------------
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum MatchOutputFormat {
    /// A text-based format designed for humans
    Human,

    /// Pretty-printed JSON format
    Json,

    /// JSON Lines format
    ///
    /// This is a sequence of JSON objects, one per line, each tagged with the report
    /// section it belongs to.
    Jsonl,
}

impl std::fmt::Display for MatchOutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchOutputFormat::Human => "human",
            MatchOutputFormat::Json => "json",
            MatchOutputFormat::Jsonl => "jsonl",
        };
        write!(f, "{s}")
    }
}
