use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use regen_core::{DEFAULT_MAX_REPEAT, Generator, RegenError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "regen")]
#[command(about = "Regen - generate strings that match, or break, a regex")]
#[command(version)]
struct Cli {
    /// Log generator decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print strings that match the pattern
    Valid {
        #[command(flatten)]
        sample: SampleArgs,
    },
    /// Print strings that fail the pattern
    Invalid {
        #[command(flatten)]
        sample: SampleArgs,
        /// Root slot to corrupt; repeat for several, omit to pick at random
        #[arg(short, long = "group")]
        groups: Vec<usize>,
    },
    /// Show how the pattern is seen by the generator
    Inspect {
        /// The regex pattern
        pattern: String,
        /// Flag characters, e.g. "i"
        #[arg(short, long, default_value = "")]
        flags: String,
    },
}

#[derive(Args)]
struct SampleArgs {
    /// The regex pattern
    pattern: String,
    /// Flag characters, e.g. "i"
    #[arg(short, long, default_value = "")]
    flags: String,
    /// Number of samples to print
    #[arg(short = 'n', long, default_value_t = 1)]
    count: usize,
    /// Seed for reproducible output
    #[arg(long, env = "REGEN_SEED")]
    seed: Option<u64>,
    /// Extra repetitions allowed for `*`, `+` and `{n,}`
    #[arg(long, env = "REGEN_MAX_REPEAT", default_value_t = DEFAULT_MAX_REPEAT)]
    max_repeat: u32,
}

impl SampleArgs {
    fn generator(&self) -> Result<Generator, RegenError> {
        let generator = Generator::with_flags(&self.pattern, &self.flags)?.max_repeat(self.max_repeat);
        Ok(match self.seed {
            Some(seed) => generator.seed(seed),
            None => generator,
        })
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Valid { sample } => cmd_valid(&sample),
        Commands::Invalid { sample, groups } => cmd_invalid(&sample, &groups),
        Commands::Inspect { pattern, flags } => cmd_inspect(&pattern, &flags),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_valid(args: &SampleArgs) -> Result<(), RegenError> {
    let mut generator = args.generator()?;
    for _ in 0..args.count {
        println!("{}", generator.generate_valid()?.green());
    }
    Ok(())
}

fn cmd_invalid(args: &SampleArgs, groups: &[usize]) -> Result<(), RegenError> {
    let mut generator = args.generator()?;
    for _ in 0..args.count {
        let sample = if groups.is_empty() {
            generator.generate_invalid()?
        } else {
            generator.generate_invalid_groups(groups.iter().copied())?
        };
        println!("{}", sample.red());
    }
    Ok(())
}

fn cmd_inspect(pattern: &str, flags: &str) -> Result<(), RegenError> {
    let generator = Generator::with_flags(pattern, flags)?;

    println!("{}", "Inspecting pattern...".bold());
    println!("  Pattern:     {}", pattern.cyan());
    println!("  Parsed as:   {}", generator.tree().to_string().green());
    println!("  Group size:  {}", generator.group_size());
    println!("  Captures:    {}", generator.capture_count());
    println!("  Corruptible: {:?}", generator.corruptible_slots());
    println!();
    println!("{}", "Token tree:".bold());
    println!("{:#?}", generator.tree());
    Ok(())
}
