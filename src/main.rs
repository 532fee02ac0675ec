// main.rs - CLI entry point

use andi_anchor::cli::{Args, Config};
use andi_anchor::driver::{self, SchedulingPolicy};
use andi_anchor::error::{CrateError, Diagnostics};
use andi_anchor::fasta;
use andi_anchor::model::Model;
use andi_anchor::output;
use std::time::Instant;

fn main() {
    match run_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("❌ ERROR: {e}");
            std::process::exit(1);
        }
    }
}

fn run_main() -> Result<i32, CrateError> {
    let mut args: Args = argh::from_env();

    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(0);
    }

    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let model = Model::parse(&args.model).ok_or_else(|| {
        CrateError::InputInvalid(format!(
            "unknown evolutionary model '{}' (expected raw, jc, kimura, or logdet)",
            args.model
        ))
    })?;

    println!("🚀 andi-anchor v{}", andi_anchor::VERSION);

    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .expect("failed to configure thread pool");
        println!("🧵 threads: {n}");
    } else {
        println!("🧵 threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let policy = SchedulingPolicy::from_low_memory_flag(args.low_memory);
    println!(
        "🧬 model: {}  pvalue: {}  scheduling: {}",
        args.model,
        args.pvalue,
        if args.low_memory { "low-memory" } else { "fast" }
    );

    let mut diagnostics = Diagnostics::new();

    println!("📖 loading subjects...");
    let subjects = fasta::load_subjects(&args, &mut diagnostics)?;
    println!("✅ loaded {} subjects", subjects.len());

    if subjects.len() < 2 {
        return Err(CrateError::InputInvalid(
            "at least two subjects are required to build a distance matrix".to_string(),
        ));
    }

    println!("🔨 building suffix-array indices...");
    let build_start = Instant::now();
    let indices = driver::build_indices(&subjects, args.cache_len, &mut diagnostics);
    println!("✅ indices built in {:.2}s", build_start.elapsed().as_secs_f64());

    println!("🔄 computing distance matrix ({} x {})...", subjects.len(), subjects.len());
    let matrix_start = Instant::now();
    let bootstrap_seed = 0x414e4449; // "ANDI" -- fixed so repeated runs without --config are reproducible
    let result = driver::run(
        &subjects,
        &indices,
        model,
        args.pvalue,
        policy,
        args.bootstrap,
        bootstrap_seed,
    );
    println!("✅ matrix computed in {:.2}s", matrix_start.elapsed().as_secs_f64());
    diagnostics.merge(result.diagnostics);

    let names: Vec<String> = subjects.iter().map(|s| s.name().to_string()).collect();
    let name_width = args.truncate_names.max(names.iter().map(|n| n.len()).max().unwrap_or(0));

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    if args.bootstrap > 0 {
        output::write_bootstrap_replicates(&mut handle, &names, &result.bootstrap_distances, name_width)
            .map_err(|e| CrateError::InputInvalid(format!("writing output: {e}")))?;
    } else {
        output::write_matrix(&mut handle, &names, &result.distances, name_width)
            .map_err(|e| CrateError::InputInvalid(format!("writing output: {e}")))?;
    }

    if args.verbose {
        eprintln!(
            "🔍 diagnostics: non_acgt_seen={} short_sequences={} truncated_names={} low_coverage_pairs={}",
            diagnostics.non_acgt_seen,
            diagnostics.short_sequences.len(),
            diagnostics.truncated_names.len(),
            diagnostics.low_coverage_pairs
        );
    }

    if diagnostics.soft_error {
        eprintln!("⚠️  completed with warnings");
    } else {
        println!("🎉 done");
    }

    Ok(diagnostics.exit_code())
}
