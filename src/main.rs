mod args;

use args::Args;
use clap::Parser;
use servant_class_match::servant::{annotate_scene, save_annotated};
use servant_class_match::{ClassifyResult, ServantClassifier};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {e}");
            if e.is_input_error() {
                log::error!(
                    "   check --scene ({}) and --templates ({})",
                    args.scene.display(),
                    args.templates.display()
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> ClassifyResult<()> {
    let paths = args.paths();
    let classifier = ServantClassifier::load(args.match_config(), &paths)?;
    let scene = classifier.load_scene(&paths.scene)?;

    if let Some(trials) = args.trials {
        let report = classifier.run_trials(&scene, trials)?;
        for (i, duration) in report.durations.iter().enumerate() {
            println!("Trial {}: {:.3}ms", i + 1, duration.as_secs_f64() * 1000.0);
        }
        println!(
            "Average: {:.3}ms over {} trials",
            report.average().as_secs_f64() * 1000.0,
            report.durations.len()
        );
    }

    let servants = classifier.classify_scene(&scene)?;
    let reports: Vec<_> = servants.iter().map(|s| s.report()).collect();

    if args.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("❌ Failed to serialize results: {e}"),
        }
    } else {
        for report in &reports {
            println!("{report}");
        }
    }

    if let Some(path) = &args.annotate {
        save_annotated(&annotate_scene(&scene, &servants), path)?;
    }

    Ok(())
}
