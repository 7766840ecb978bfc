//! `lecfg versions` command

use anyhow::Result;

use lecfg::core::schema::OptionSchema;
use lecfg::SchemaVersion;

pub fn execute() -> Result<()> {
    for version in SchemaVersion::ALL {
        let marker = if version == SchemaVersion::default() {
            " (default)"
        } else {
            ""
        };
        println!(
            "{:<16} {:>2} options  {}{}",
            version.as_str(),
            OptionSchema::for_version(version).len(),
            version.description(),
            marker
        );
    }

    Ok(())
}
