use std::env;
use std::fs;
use std::process;

use serde::Serialize;

use etude::{
    detect_tie_groups, generate_steps_with_ties, reconstruct_score, validate, EtudeError,
    ParsedScore, PracticeStep, ScoreDocument, TieGroup,
};

/// Everything the practice frontend needs for one piece
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PracticePlan {
    score: ParsedScore,
    tie_groups: Vec<TieGroup>,
    steps: Vec<PracticeStep>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: etude <events.yaml> [output.yaml]");
        process::exit(1);
    }

    let input_path = &args[1];
    let output_path = args.get(2);

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let document: ScoreDocument = match serde_yaml::from_str(&source)
        .map_err(|e| EtudeError::DocumentError(e.to_string()))
    {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let score = reconstruct_score(&document);

    // Structural problems are worth a warning, but never block the plan
    if let Err(e) = validate(&score) {
        eprintln!("Warning: {}", e);
    }

    let tie_groups = detect_tie_groups(&score.measures);
    let steps = generate_steps_with_ties(score.measures.len(), &tie_groups);
    let plan = PracticePlan {
        score,
        tie_groups,
        steps,
    };

    let yaml = match serde_yaml::to_string(&plan) {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error serializing practice plan: {}", e);
            process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &yaml) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote practice plan to {}", path);
        }
        None => {
            println!("{}", yaml);
        }
    }
}
