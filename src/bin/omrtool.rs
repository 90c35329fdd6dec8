use clap::{Parser, Subcommand};
use log::info;
use omr_scorer::detector::BlockLocator;
use omr_scorer::pipeline::load_image;
use omr_scorer::tools::{SheetBuilder, grayscale_stats, load_rgb};
use omr_scorer::{AnswerKey, Scorer, ScorerConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "omrtool", version, about = "Answer-sheet scoring tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a sheet and print the result document
    Score {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Answer-key JSON file
        #[arg(long)]
        key: Option<PathBuf>,
        /// Outline located blocks on the annotated image
        #[arg(long)]
        draw_blocks: bool,
        /// Mark every read cell on the annotated image
        #[arg(long)]
        draw_cells: bool,
    },
    /// Print the located block boxes of a sheet
    Blocks {
        #[arg(long)]
        image: PathBuf,
    },
    /// Score a sheet and grade it against an answer key
    Grade {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        key: PathBuf,
    },
    /// Render a synthetic sheet with a few marks
    Sample {
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Score {
            image,
            output,
            key,
            draw_blocks,
            draw_cells,
        } => score_cmd(&image, &output, key.as_deref(), draw_blocks, draw_cells),
        Command::Blocks { image } => blocks_cmd(&image),
        Command::Grade { image, key } => grade_cmd(&image, &key),
        Command::Sample { output } => sample_cmd(&output),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn read_key(path: Option<&Path>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display())),
        None => Ok(String::new()),
    }
}

fn score_cmd(
    image: &Path,
    output: &Path,
    key: Option<&Path>,
    draw_blocks: bool,
    draw_cells: bool,
) -> Result<(), String> {
    let key = read_key(key)?;
    let mut config = ScorerConfig::from_env();
    config.draw_blocks |= draw_blocks;
    config.draw_cells |= draw_cells;

    let start = Instant::now();
    let report = Scorer::new(config).score(image, output, &key);
    info!("scored in {:.2?}", start.elapsed());
    println!("{}", report.to_json());
    Ok(())
}

fn blocks_cmd(image: &Path) -> Result<(), String> {
    let rgb = load_rgb(image).map_err(|e| format!("{}: {e}", image.display()))?;
    let stats = grayscale_stats(&rgb);
    println!(
        "Image: {} ({}x{}), gray min={} max={} avg={}",
        image.display(),
        rgb.width(),
        rgb.height(),
        stats.min,
        stats.max,
        stats.avg
    );

    let scorer = Scorer::from_env();
    let rectified = scorer.rectify(rgb);
    let boxes = BlockLocator::find_boxes(&rectified);
    println!("Found {} blocks", boxes.len());
    for (i, b) in boxes.iter().enumerate() {
        println!("  {:2}: x={} y={} w={} h={}", i, b.x, b.y, b.width, b.height);
    }
    Ok(())
}

fn grade_cmd(image: &Path, key: &Path) -> Result<(), String> {
    let json = read_key(Some(key))?;
    let answer_key = AnswerKey::parse(&json).map_err(|e| e.to_string())?;
    let rgb = load_image(image).map_err(|e| e.to_string())?;

    let evaluation = Scorer::from_env().evaluate(rgb);
    let answers = evaluation.outcome.map_err(|e| e.to_string())?;
    let grade = answer_key.grade(&answers);

    for (name, tally) in [("part 1", grade.part1), ("part 2", grade.part2), ("part 3", grade.part3)] {
        println!("{name}: {}/{}", tally.correct, tally.total);
    }
    let overall = grade.overall();
    println!("total: {}/{}", overall.correct, overall.total);
    Ok(())
}

fn sample_cmd(output: &Path) -> Result<(), String> {
    let sheet = SheetBuilder::new()
        .fill_part1(1, 'A')
        .fill_part1(12, 'C')
        .fill_part2(1, 'a', true)
        .fill_part2(4, 'd', false)
        .fill_part3(1, "12,5")
        .build();
    sheet
        .save(output)
        .map_err(|e| format!("{}: {e}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
