use std::fs;
use std::path::{Path, PathBuf};

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";

/// A `[[traders]]` block.
pub fn trader_block(address: &str, name: &str) -> String {
    format!("[[traders]]\naddress = \"{address}\"\nname = \"{name}\"\n")
}

/// Smallest config that validates without any sink configured.
pub fn dry_run_toml() -> String {
    format!("dry_run = true\n\n{}", trader_block(ALICE, "alice"))
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}
