//! Sample societies shared by the workspace's tests and benches.
//!
//! Each society is a JSON [`SocietySpec`] under `test-fixtures/societies/`
//! at the workspace root.

use std::path::PathBuf;

use concord_core::models::SocietySpec;

/// Five agents deciding whether mushroom `m1` has a collar.
pub const MUSHROOM_HUNTERS: &str = "mushroom_hunters.json";
/// Two agents whose rules depend on each other.
pub const MUTUAL_CYCLE: &str = "mutual_cycle.json";
/// One agent weighing conflicting evidence from a trusted and a distrusted peer.
pub const TRUST_CONFLICT: &str = "trust_conflict.json";

pub const ALL_SOCIETIES: [&str; 3] = [MUSHROOM_HUNTERS, MUTUAL_CYCLE, TRUST_CONFLICT];

fn societies_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/societies")
}

/// Parse the named society.
///
/// # Panics
/// When the file is missing or is not a valid society.
pub fn load_society(name: &str) -> SocietySpec {
    let path = societies_dir().join(name);
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("reading {}: {e}", path.display()));
    SocietySpec::from_json(&json).unwrap_or_else(|e| panic!("parsing {}: {e}", path.display()))
}
