//! Predict a stress level from the command line without opening the GUI.

use std::path::PathBuf;

use stress_detector::advice::{self, ENCOURAGEMENT};
use stress_detector::config::{self, AppConfig};
use stress_detector::logging;
use stress_detector::predictor::Predictor;
use stress_detector::schema::{self, HabitInput};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    if let Err(err) = logging::init_console() {
        eprintln!("Logging disabled: {err}");
    }
    let app_config = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!("Using default settings: {err}");
        AppConfig::default()
    });
    let options = parse_args(std::env::args().skip(1).collect(), &app_config)?;
    let predictor = Predictor::load(&options.model).map_err(|err| err.to_string())?;
    let input = app_config.form.clamp_input(options.input);
    let label = predictor.predict(&input);
    println!("Predicted Stress Level (1–5): {label}");
    println!("{}", advice::advise(label).message());
    println!("{ENCOURAGEMENT}");
    Ok(())
}

#[derive(Debug, Clone)]
struct CliOptions {
    model: PathBuf,
    input: HabitInput,
}

fn parse_args(args: Vec<String>, app_config: &AppConfig) -> Result<CliOptions, String> {
    let mut model = app_config.model_path.clone();
    let mut input = app_config.form.default_input();

    let mut idx = 0usize;
    while idx < args.len() {
        let flag = args[idx].as_str();
        if matches!(flag, "-h" | "--help") {
            return Err(help_text());
        }
        idx += 1;
        let value = args
            .get(idx)
            .ok_or_else(|| format!("{flag} requires a value"))?;
        match flag {
            "--model" => model = PathBuf::from(value),
            "--sleep" => input.sleep_hours = parse_number(flag, value)?,
            "--screen" => input.screen_hours = parse_number(flag, value)?,
            "--water" => input.water_litres = parse_number(flag, value)?,
            "--meals" => {
                input.meals_per_day = value
                    .parse::<u32>()
                    .map_err(|_| format!("Invalid {flag} value: {value}"))?;
            }
            "--exercise" => {
                input.exercises_daily = schema::parse_binary(value)
                    .ok_or_else(|| format!("Invalid {flag} value: {value} (expected yes/no)"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    Ok(CliOptions { model, input })
}

fn parse_number(flag: &str, value: &str) -> Result<f32, String> {
    value
        .parse::<f32>()
        .ok()
        .filter(|number| number.is_finite())
        .ok_or_else(|| format!("Invalid {flag} value: {value}"))
}

fn help_text() -> String {
    "stress-detector-predict\n\n\
Predict a stress level (1–5) from daily habits.\n\n\
Usage:\n  stress-detector-predict [--model <model.json>] [habits]\n\n\
Habits (omitted values use the form defaults):\n\
  --sleep <hours>       Sleep duration.\n\
  --screen <hours>      Screen time per day.\n\
  --exercise <yes|no>   Daily exercise.\n\
  --meals <n>           Meals per day.\n\
  --water <litres>      Water intake.\n"
        .to_string()
}
