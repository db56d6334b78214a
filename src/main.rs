use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use listera::dataset::{append_record, Dataset};
use listera::get_version;
use listera::grouping::{categorize_groups, split_into_groups};
use listera::trainer::Trainer;

#[derive(Debug, Args)]
#[clap(
    author,
    about = "Run the interactive labeling session",
    version = get_version(),
)]
struct RunArgs {
    #[arg(short, long, default_value = "0.3")]
    test_size: f64,

    #[arg(short, long, default_value = "42")]
    seed: u64,

    #[arg(short, long, default_value = "1.0")]
    alpha: f64,

    #[arg(default_value = "listerai.txt")]
    dataset_file: PathBuf,
}

#[derive(Debug, Args)]
#[clap(author,
    about = "Train a labeling model and save it",
    version = get_version(),
)]
struct TrainArgs {
    #[arg(short, long, default_value = "0.3")]
    test_size: f64,

    #[arg(short, long, default_value = "42")]
    seed: u64,

    #[arg(short, long, default_value = "1.0")]
    alpha: f64,

    dataset_file: PathBuf,
    model_file: PathBuf,
}

#[derive(Debug, Args)]
#[clap(author,
    about = "Predict labels for items read from stdin",
    version = get_version(),
)]
struct PredictArgs {
    dataset_file: PathBuf,
    model_file: PathBuf,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Run(RunArgs),
    Train(TrainArgs),
    Predict(PredictArgs),
}

#[derive(Debug, Parser)]
#[clap(
    name = "listera",
    author,
    about = "An interactive text labeling command line interface",
    version = get_version(),
)]
struct CommandArgs {
    #[clap(subcommand)]
    command: Commands,
}

/// Prints a prompt and reads one line from stdin.
/// Returns None on end of input. The trailing newline is removed; no
/// other trimming happens here.
fn prompt(text: &str) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        println!();
        return Ok(None);
    }
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}

fn run_session(args: RunArgs) -> Result<(), Box<dyn Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        if r.load(Ordering::SeqCst) {
            r.store(false, Ordering::SeqCst);
        } else {
            std::process::exit(0);
        }
    })
    .expect("Error setting Ctrl-C handler");

    println!("Interactive labeling session. Enter 'quit' at the words prompt to exit.");

    while running.load(Ordering::SeqCst) {
        // Reload and retrain at every iteration boundary so the model
        // reflects the latest persisted feedback.
        let mut dataset = Dataset::load(args.dataset_file.as_path())?;
        eprintln!(
            "loaded {} records from {}",
            dataset.len(),
            args.dataset_file.display()
        );

        let mut trainer = Trainer::new(args.test_size, args.seed, args.alpha);
        let metrics = trainer.fit(&dataset.items, &dataset.labels)?;
        println!("Accuracy: {}", metrics.accuracy);

        let words = match prompt("\nEnter words separated by '-': ")? {
            Some(line) => line,
            None => break,
        };
        if words.trim().eq_ignore_ascii_case("quit") {
            break;
        }

        let num_groups: usize = match prompt("How many groups: ")? {
            Some(line) => line.trim().parse()?,
            None => break,
        };

        println!("\n>words: {}", words);
        println!(">how many groups: {}", num_groups);

        let groups = split_into_groups(&words, num_groups)?;
        let categorized = categorize_groups(&groups, &dataset.categories)?;

        println!("\nResult:");
        for line in &categorized {
            println!("{}", line);
        }

        let new_item = match prompt("\nEnter an item to predict its labels: ")? {
            Some(line) => line,
            None => break,
        };
        let predicted = trainer.predict_labels(&new_item, &dataset.items, &dataset.labels)?;
        println!("The predicted labels for '{}' are: {}", new_item, predicted);

        let feedback = match prompt("\nWas the prediction correct? (yes/no): ")? {
            Some(line) => line,
            None => break,
        };
        if feedback.trim().eq_ignore_ascii_case("no") {
            let corrected = match prompt("Enter the correct labels, separated by commas: ")? {
                Some(line) => line,
                None => break,
            };
            // The line is trimmed as a whole; the elements are not, so
            // a label entered with a leading space keeps it.
            let new_labels: Vec<String> =
                corrected.trim().split(',').map(|l| l.to_string()).collect();

            dataset.push(new_item.clone(), new_labels.clone());
            trainer.refit(&dataset.items, &dataset.labels)?;
            println!("Model updated!");

            append_record(args.dataset_file.as_path(), &new_item, &new_labels)?;
            println!("New data saved to {}!", args.dataset_file.display());
        }
    }

    Ok(())
}

fn train(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    let dataset = Dataset::load(args.dataset_file.as_path())?;
    eprintln!(
        "loaded {} records from {}",
        dataset.len(),
        args.dataset_file.display()
    );

    let mut trainer = Trainer::new(args.test_size, args.seed, args.alpha);
    let metrics = trainer.fit(&dataset.items, &dataset.labels)?;
    println!("Accuracy: {}", metrics.accuracy);

    trainer.save_model(args.model_file.as_path())?;

    println!("Training completed successfully.");
    Ok(())
}

fn predict(args: PredictArgs) -> Result<(), Box<dyn Error>> {
    let dataset = Dataset::load(args.dataset_file.as_path())?;

    let mut trainer = Trainer::new(0.3, 42, 1.0);
    trainer.load_model(args.model_file.as_path())?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut writer = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let labels = trainer.predict_labels(line, &dataset.items, &dataset.labels)?;
        writeln!(writer, "{}\t{}", line, labels)?;
    }

    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = CommandArgs::parse();

    match args.command {
        Commands::Run(args) => run_session(args),
        Commands::Train(args) => train(args),
        Commands::Predict(args) => predict(args),
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
