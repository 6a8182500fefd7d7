//! CPU topology records and the `lscpu -p` parser

use crate::error::{CpupinError, CpupinResult, FieldError, InvalidField, MIN_TOPOLOGY_FIELDS};
use serde::Serialize;
use tracing::debug;

/// Bits the weight accumulator is rotated by between folded fields
const WEIGHT_ROTATION: u32 = 8;

/// Topology coordinates of one physical CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CpuRecord {
    /// Physical CPU id, unique across the topology
    pub cpu: u32,
    /// Core id (may repeat across sockets and nodes)
    pub core: u32,
    /// Socket id
    pub socket: u32,
    /// NUMA node id
    pub node: u32,
}

impl CpuRecord {
    pub fn new(cpu: u32, core: u32, socket: u32, node: u32) -> Self {
        Self {
            cpu,
            core,
            socket,
            node,
        }
    }

    /// Ordering key that clusters CPUs by node, then socket, then core, then cpu id
    ///
    /// Every field is offset by one so a zero id still moves the accumulator.
    pub fn weight(&self) -> u64 {
        let mut acc: u64 = 0;

        for field in [self.node, self.socket, self.core] {
            acc = acc.wrapping_add(u64::from(field) + 1);
            acc = acc.rotate_left(WEIGHT_ROTATION);
        }

        acc.wrapping_add(u64::from(self.cpu) + 1)
    }
}

impl std::fmt::Display for CpuRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "cpu={} core={} socket={} node={}",
            self.cpu, self.core, self.socket, self.node
        )
    }
}

/// Outcome of parsing one integer field
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Valid(u32),
    Invalid(String),
}

impl FieldValue {
    fn parse(raw: &str) -> Self {
        match raw.parse::<u32>() {
            Ok(value) => FieldValue::Valid(value),
            Err(_) => FieldValue::Invalid(raw.to_string()),
        }
    }
}

const FIELD_NAMES: [&str; 4] = ["cpu", "core", "socket", "node"];

/// Parse the fields of a single non-comment line into a record
pub fn parse_fields(fields: &[&str]) -> Result<CpuRecord, FieldError> {
    if fields.len() < MIN_TOPOLOGY_FIELDS {
        return Err(FieldError::TooFewFields {
            found: fields.len(),
        });
    }

    let values: Vec<FieldValue> = fields[..FIELD_NAMES.len()]
        .iter()
        .map(|raw| FieldValue::parse(raw))
        .collect();

    match values.as_slice() {
        [
            FieldValue::Valid(cpu),
            FieldValue::Valid(core),
            FieldValue::Valid(socket),
            FieldValue::Valid(node),
        ] => Ok(CpuRecord::new(*cpu, *core, *socket, *node)),
        _ => {
            let invalid = FIELD_NAMES
                .iter()
                .copied()
                .zip(&values)
                .filter_map(|(name, value)| match value {
                    FieldValue::Invalid(raw) => Some(InvalidField {
                        name,
                        raw: raw.clone(),
                    }),
                    FieldValue::Valid(_) => None,
                })
                .collect();
            Err(FieldError::InvalidFields(invalid))
        }
    }
}

/// Parse `lscpu -p=cpu,core,socket,node,...` style text into topology records
///
/// Blank lines and lines starting with `#` are skipped. The first malformed
/// line aborts the parse; its 1-based number in the raw input is reported.
pub fn parse_topology(text: &str) -> CpupinResult<Vec<CpuRecord>> {
    let mut records = Vec::new();

    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(',').collect();
        let record = parse_fields(&fields).map_err(|source| CpupinError::Parse {
            line_number: index + 1,
            line: line.to_string(),
            source,
        })?;

        debug!(
            line = %line,
            record = %record,
            weight = record.weight(),
            "Parsed topology line"
        );
        records.push(record);
    }

    Ok(records)
}
