//! # UE Config Renderer
//!
//! Pure renderer from a validated configuration snapshot (plus optional
//! relation-provided RF-simulation parameters) to the workload's config-file
//! bytes. No I/O. Field order is fixed, so identical logical inputs always
//! produce identical bytes; the BLAKE3 hash over those bytes is what the
//! reconciler compares against the on-disk file to decide whether a write
//! and a restart are needed.

use std::fmt::Write;

use blake3::Hasher;

use uevakt_config::UeConfig;
use uevakt_relation::RfsimData;

/// Rendered config-file content plus its content hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfig {
    pub bytes: Vec<u8>,
    pub hash: String,
}

impl RenderedConfig {
    pub fn as_str(&self) -> &str {
        // Rendered exclusively from `write!` on a String below.
        std::str::from_utf8(&self.bytes).expect("rendered config is UTF-8")
    }
}

/// BLAKE3 content hash, hex encoded.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize().as_bytes())
}

fn directive(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

/// Render the workload configuration file.
///
/// Precondition: `config` has passed validation and `rfsim`, when present,
/// came out of the relation codec. Relation-provided slice identifiers take
/// precedence over the legacy `sst`/`sd` options; with neither source the
/// slice block is omitted and the workload falls back to its own default.
pub fn render(config: &UeConfig, rfsim: Option<&RfsimData>) -> RenderedConfig {
    let mut out = String::new();

    let _ = writeln!(out, "# Configuration generated by the UE operator. Do not edit.");
    let _ = writeln!(out);
    let _ = writeln!(out, "supi: imsi-{}", config.imsi);
    let _ = writeln!(out, "usim-key: {}", config.usim_key);
    let _ = writeln!(out, "usim-opc: {}", config.operator_key);
    let _ = writeln!(out);
    let _ = writeln!(out, "session-dnn: {}", config.dnn);

    match rfsim {
        Some(data) => {
            let _ = writeln!(out, "session-sst: {}", data.sst);
            let _ = writeln!(out, "session-sd: {}", data.sd.canonical());
        }
        None => {
            if let Some(sst) = config.sst {
                let _ = writeln!(out, "session-sst: {}", sst);
            }
            if let Some(sd) = &config.sd {
                let value = sd.as_u32().expect("validated config");
                let _ = writeln!(out, "session-sd: 0x{:06x}", value);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "rf-simulation: {}", directive(config.simulation_mode));
    if let Some(data) = rfsim {
        let _ = writeln!(out, "rfsim-server-addr: {}", data.address);
        let _ = writeln!(out, "rfsim-server-port: {}", data.port);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "three-quarter-sampling: {}",
        directive(config.use_three_quarter_sampling)
    );
    let _ = writeln!(out, "mimo: {}", directive(config.use_mimo));

    let bytes = out.into_bytes();
    let hash = content_hash(&bytes);
    RenderedConfig { bytes, hash }
}
