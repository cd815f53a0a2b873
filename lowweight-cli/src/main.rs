use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::info;
use lowweight::expansion::{expand_codeword, sha1_expansion_code};
use lowweight::{CodeMatrix, CodeWord, Error, LowWeightSearch, Parameters, Result};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Searches a code for a low-weight codeword
    Search(SearchArgs),
    /// Writes the generator matrix of the SHA-1 message expansion code
    GenerateSha1 {
        /// Number of 32-bit words per codeword
        #[arg(short, long, default_value_t = 60)]
        words: usize,

        /// Output matrix file
        #[arg(short, long, required = true)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Generator matrix file; overrides `code_matrix_file` of the config
    #[arg(short, long)]
    matrix: Option<PathBuf>,

    /// TOML parameter file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Iteration budget
    #[arg(short, long)]
    iterations: Option<u64>,

    /// Largest number of rows combined per candidate
    #[arg(short = 'p', long)]
    enumeration_weight: Option<usize>,

    /// Number of redundancy columns in the filtering window
    #[arg(short = 'w', long)]
    window_size: Option<usize>,

    /// Largest window weight a combination may have
    #[arg(long)]
    threshold: Option<usize>,

    /// Stop once a codeword of at most this weight is found
    #[arg(long)]
    target: Option<usize>,

    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Comma separated columns to force to zero
    #[arg(long, value_delimiter = ',')]
    force_zero: Vec<usize>,

    /// Number of trailing columns to force to zero
    #[arg(long)]
    force_zero_last: Option<usize>,

    /// Expand the result as a SHA-1 message to this many words and print the last one
    #[arg(long)]
    sha1_words: Option<usize>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let result = match cli.command {
        Commands::Search(args) => run_search(args),
        Commands::GenerateSha1 { words, output } => generate_sha1(words, &output),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger(verbose: bool) {
    let env = Env::default().default_filter_or(if verbose { "debug" } else { "info" });
    // Ignore errors if the logger was already initialized
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}

fn load_parameters(args: &SearchArgs) -> Result<Parameters> {
    let mut parameters = match &args.config {
        Some(path) => Parameters::from_file(path)?,
        None => Parameters::default(),
    };
    if let Some(matrix) = &args.matrix {
        parameters.code_matrix_file = Some(matrix.clone());
    }
    parameters.force_zero.extend_from_slice(&args.force_zero);
    if let Some(count) = args.force_zero_last {
        parameters.force_zero_last = count;
    }

    let search = &mut parameters.search;
    if let Some(iterations) = args.iterations {
        search.iterations = iterations;
    }
    if let Some(enumeration_weight) = args.enumeration_weight {
        search.enumeration_weight = enumeration_weight;
    }
    if let Some(window_size) = args.window_size {
        search.window_size = window_size;
    }
    if let Some(threshold) = args.threshold {
        search.window_threshold = threshold;
    }
    if args.target.is_some() {
        search.target_weight = args.target;
    }
    if let Some(threads) = args.threads {
        search.threads = threads;
    }
    if args.seed.is_some() {
        search.seed = args.seed;
    }
    search.validate()?;
    Ok(parameters)
}

fn run_search(args: SearchArgs) -> Result<()> {
    let parameters = load_parameters(&args)?;
    let path = parameters
        .code_matrix_file
        .as_ref()
        .ok_or_else(|| Error::Config("no code matrix file given (use --matrix or code_matrix_file)".to_string()))?;
    let code = CodeMatrix::read_from_file(path)?;
    let forced = parameters.forced_columns(code.length())?;
    let shortened = if forced.is_empty() {
        code.clone()
    } else {
        code.code_shortening(&forced)?
    };

    let outcome = LowWeightSearch::new(parameters.search.clone()).canteaut_chabaud(&shortened)?;
    print!("{}", outcome.codeword.hex_dump());
    println!("weight: {}", outcome.codeword.hamming_weight());
    println!("status: {:?} after {} iterations", outcome.status, outcome.iterations);

    if let Some(words) = args.sha1_words {
        let lengthened = outcome.codeword.lengthened(&forced, code.length());
        let codeword = CodeWord::from_bits(&code, lengthened)?;
        let expanded = expand_codeword(&codeword, words)?;
        if let Some(last) = expanded.last() {
            println!("m[{}] = {last:08x}", expanded.len() - 1);
        }
    }
    Ok(())
}

fn generate_sha1(words: usize, output: &Path) -> Result<()> {
    let code = sha1_expansion_code(words)?;
    code.write_to_file(output)?;
    info!(
        "wrote {}x{} SHA-1 expansion code to {}",
        code.dimension(),
        code.length(),
        output.display()
    );
    Ok(())
}
