//! Replays a JSON pointer script against an in-memory drawing session and
//! prints the resulting history.
//!
//! Usage: `inkpin-replay [script.json]` (reads stdin when no path is given).

mod script;

use script::Script;
use std::error::Error;
use std::io::Read;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    log::info!("Starting inkpin-replay");

    let json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let script = Script::from_json(&json)?;
    let report = script.run();
    log::info!(
        "Replayed {} steps, {} failed",
        report.steps,
        report.failures.len()
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
