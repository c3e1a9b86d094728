//! Zabbix Low-Level Discovery
//!
//! Emits the `{#RUBRIKSITE}` discovery document used by the Zabbix template
//! to create one set of items per configured region:
//!
//! ```text
//! [{"{#RUBRIKSITE}": "cbv"}, {"{#RUBRIKSITE}": "vdr"}]
//! ```

use crate::config::FileConfig;
use crate::error::{BridgeError, Result};
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;
use std::path::Path;

#[derive(Debug, Serialize)]
struct DiscoveryEntry<'a> {
    #[serde(rename = "{#RUBRIKSITE}")]
    site: &'a str,
}

/// Read `path` and render its discovery document
pub fn discover(path: &Path) -> anyhow::Result<String> {
    let file = FileConfig::load(path)?;
    Ok(discovery_document(&file, path)?)
}

/// Render the discovery document for an already loaded configuration.
/// `path` is only used in the error message.
pub fn discovery_document(file: &FileConfig, path: &Path) -> Result<String> {
    let regions = file.region_names().ok_or_else(|| {
        BridgeError::Config(format!(
            "'rubrik' is not found in the configuration file ({})",
            path.display()
        ))
    })?;

    let entries: Vec<_> = regions
        .iter()
        .map(|site| DiscoveryEntry { site })
        .collect();
    to_spaced_json(&entries)
}

/// Serialize with `", "` and `": "` separators, the layout Zabbix templates
/// and agents have always received from this check.
pub fn to_spaced_json<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, SpacedFormatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(|e| BridgeError::Config(e.to_string()))
}

/// Compact JSON with a space after every separator
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
