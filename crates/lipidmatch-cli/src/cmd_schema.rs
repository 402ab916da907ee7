use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::args::{GlobalArgs, SchemaArgs};
use crate::report::MatchReport;

pub fn run(_global_args: &GlobalArgs, args: &SchemaArgs) -> Result<()> {
    let schema = schemars::schema_for!(MatchReport);

    let mut writer: Box<dyn Write> = match &args.output {
        None => Box::new(std::io::BufWriter::new(std::io::stdout())),
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(std::io::BufWriter::new(file))
        }
    };
    writeln!(writer, "{}", serde_json::to_string_pretty(&schema)?)?;
    if let Some(output) = &args.output {
        info!("Wrote JSON schema to {}", output.display());
    }
    Ok(())
}
