//! Splits a monolithic cassette into per-port cassette files.
//!
//! Usage: `cassette_split <input.yaml> <output_dir>`
//!
//! The output directory has the layout of a recording session
//! (`git.cassette.yaml`, `id_gen.cassette.yaml`), so `GITREE_REPLAY` can
//! point at it directly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use gitree::cassette::format::{Cassette, Interaction};
use serde::Serialize;

/// A per-port cassette that links back to the cassette it was split from.
#[derive(Serialize)]
struct PerPortCassette {
    name: String,
    recorded_at: DateTime<Utc>,
    commit: String,
    source_session: String,
    interactions: Vec<Interaction>,
}

fn split_cassette(input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, String> {
    let cassette = Cassette::load(input)?;

    let mut by_port: BTreeMap<&str, Vec<&Interaction>> = BTreeMap::new();
    for interaction in &cassette.interactions {
        by_port.entry(interaction.port.as_str()).or_default().push(interaction);
    }

    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create {}: {e}", output_dir.display()))?;

    let mut written = Vec::new();
    for (port, interactions) in by_port {
        let per_port = PerPortCassette {
            name: format!("{}-{port}", cassette.name),
            recorded_at: cassette.recorded_at,
            commit: cassette.commit.clone(),
            source_session: cassette.name.clone(),
            interactions: interactions
                .into_iter()
                .zip(0u64..)
                .map(|(interaction, seq)| Interaction { seq, ..interaction.clone() })
                .collect(),
        };

        let path = output_dir.join(format!("{port}.cassette.yaml"));
        let yaml = serde_yaml::to_string(&per_port)
            .map_err(|e| format!("Failed to serialize cassette for port {port}: {e}"))?;
        std::fs::write(&path, yaml)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        written.push(path);
    }

    Ok(written)
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let [_, input, output_dir] = args.as_slice() else {
        eprintln!("Usage: cassette_split <input.yaml> <output_dir>");
        return ExitCode::FAILURE;
    };

    match split_cassette(Path::new(input), Path::new(output_dir)) {
        Ok(written) => {
            for path in written {
                println!("Wrote {}", path.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
