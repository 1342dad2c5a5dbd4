use std::env;
use std::path::PathBuf;
use std::process;

use fresa::{Artifacts, Error, Frame, Pipeline, Prediction, Task, UserInputs, Verdict};

const ARTIFACTS_ENV: &str = "FRESA_ARTIFACTS";
const DEFAULT_ARTIFACTS_DIR: &str = "artifacts";

struct Args {
    csv: PathBuf,
    feed_rate: f32,
    clamp_pressure: f32,
    artifacts: PathBuf,
    task: Task,
}

fn usage() {
    eprintln!("Usage: fresa <sensor_csv> --feed-rate=F --clamp-pressure=P [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --feed-rate=F        Feed rate in mm/min (required, >= 0)");
    eprintln!("  --clamp-pressure=P   Clamp pressure in psi (required, >= 0)");
    eprintln!("  --artifacts=DIR      Artifact directory (default: ${} or ./{})",
        ARTIFACTS_ENV, DEFAULT_ARTIFACTS_DIR);
    eprintln!("  --task=TASK          tool | completion | inspection | all (default: all)");
    eprintln!();
    eprintln!("The artifact directory must contain encoder.json, scaler.json and the");
    eprintln!("three classifier models (tool_condition.onnx, machining_finalized.onnx,");
    eprintln!("passed_visual_inspection.onnx).");
}

fn parse_args(argv: &[String]) -> Result<Args, String> {
    let mut csv: Option<PathBuf> = None;
    let mut feed_rate: Option<f32> = None;
    let mut clamp_pressure: Option<f32> = None;
    let mut artifacts: Option<PathBuf> = None;
    let mut task = Task::All;

    for arg in argv {
        if let Some(value) = arg.strip_prefix("--feed-rate=") {
            let parsed: f32 = value
                .parse()
                .map_err(|_| format!("invalid feed rate: {}", value))?;
            feed_rate = Some(parsed);
        } else if let Some(value) = arg.strip_prefix("--clamp-pressure=") {
            let parsed: f32 = value
                .parse()
                .map_err(|_| format!("invalid clamp pressure: {}", value))?;
            clamp_pressure = Some(parsed);
        } else if let Some(value) = arg.strip_prefix("--artifacts=") {
            artifacts = Some(PathBuf::from(value));
        } else if let Some(value) = arg.strip_prefix("--task=") {
            task = Task::from_str(value).ok_or_else(|| format!("unknown task: {}", value))?;
        } else if arg.starts_with("--") {
            return Err(format!("unknown option: {}", arg));
        } else if csv.is_none() {
            csv = Some(PathBuf::from(arg));
        } else {
            return Err(format!("unexpected argument: {}", arg));
        }
    }

    let csv = csv.ok_or("missing sensor CSV path")?;
    let feed_rate = feed_rate.ok_or("missing --feed-rate")?;
    let clamp_pressure = clamp_pressure.ok_or("missing --clamp-pressure")?;
    if feed_rate < 0.0 {
        return Err("feed rate must be >= 0".to_string());
    }
    if clamp_pressure < 0.0 {
        return Err("clamp pressure must be >= 0".to_string());
    }

    let artifacts = artifacts
        .or_else(|| env::var_os(ARTIFACTS_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACTS_DIR));

    Ok(Args {
        csv,
        feed_rate,
        clamp_pressure,
        artifacts,
        task,
    })
}

fn render(prediction: &Prediction, verdict: &Verdict) -> String {
    let mut doc = serde_json::Map::new();
    let mut probabilities = serde_json::Map::new();

    if let Some(label) = verdict.tool_condition {
        doc.insert("tool_condition".to_string(), label.as_str().into());
        probabilities.insert("tool_condition".to_string(), prediction.tool_condition.into());
    }
    if let Some(label) = verdict.completion {
        doc.insert("machining_finalized".to_string(), label.as_str().into());
        probabilities.insert(
            "machining_finalized".to_string(),
            prediction.machining_finalized.into(),
        );
    }
    if let Some(label) = verdict.inspection {
        doc.insert("passed_visual_inspection".to_string(), label.as_str().into());
        probabilities.insert(
            "passed_visual_inspection".to_string(),
            prediction.visual_inspection.into(),
        );
    }
    doc.insert(
        "probabilities".to_string(),
        serde_json::Value::Object(probabilities),
    );

    serde_json::Value::Object(doc).to_string()
}

fn run(pipeline: &Pipeline, args: &Args) -> Result<String, Error> {
    let frame = Frame::from_csv_path(&args.csv)?;
    let inputs = UserInputs {
        feed_rate: args.feed_rate,
        clamp_pressure: args.clamp_pressure,
    };

    let prediction = pipeline.predict(&frame, &inputs)?;
    let verdict = Verdict::from_prediction(&prediction, args.task);
    Ok(render(&prediction, &verdict))
}

fn main() {
    env_logger::init();

    let argv: Vec<String> = env::args().collect();
    if argv.len() < 2 {
        usage();
        process::exit(2);
    }

    let args = match parse_args(&argv[1..]) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!();
            usage();
            process::exit(2);
        }
    };

    // Artifact loading is fatal; there is no partial mode where some of the
    // five artifacts serve predictions.
    let artifacts = match Artifacts::load(&args.artifacts) {
        Ok(artifacts) => artifacts,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };
    let pipeline = Pipeline::new(artifacts);

    // Request errors are reported without taking the process down.
    match run(&pipeline, &args) {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
