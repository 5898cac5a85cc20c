use std::error::Error;

use flvkit::{inspect, textify, InspectOptions};

fn main() -> Result<(), Box<dyn Error>> {
    // FLVKIT_* variables may come from a .env file
    dotenv::dotenv().ok();

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: inspect <file.flv> [--full]")?;
    let full = std::env::args().any(|arg| arg == "--full");

    let options = if full {
        InspectOptions::full()
    } else {
        InspectOptions::load()?
    };

    let bytes = std::fs::read(&path)?;
    eprintln!("Inspecting {} ({} bytes) with {:?}", path, bytes.len(), options);

    let tags = inspect(&bytes, &options)?;

    let findings: Vec<_> = tags
        .iter()
        .flat_map(|tag| tag.validations.iter().map(move |f| (tag.byte_offset, f)))
        .collect();
    for (offset, finding) in &findings {
        eprintln!("[{}] {} @ {}: {}", finding.level.name(), finding.rule, offset, finding.message);
    }
    eprintln!("{} tags, {} findings", tags.len(), findings.len());

    println!("{}", textify(&tags)?);
    Ok(())
}
