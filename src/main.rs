mod analysis;
mod conditions;
mod report;

use analysis::run_analysis;
use conditions::build_demo_bay;
use pondx::PondingConfig;
use report::render_summary;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    // Iteration settings come from an optional JSON file; missing fields fall
    // back to the defaults.
    let config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PondingConfig::default(),
    };

    // Build the bay. Dead loads on every member follow from the tributary
    // widths of the secondary framing.
    let bay = build_demo_bay()?;

    // Iterate water depth and deflection until they agree, then collect a
    // lightweight summary of the member responses.
    let summary = run_analysis(bay, config)?;

    // Render a human-friendly report and print it to standard output.
    let report = render_summary(&summary);
    println!("{report}");

    Ok(())
}
