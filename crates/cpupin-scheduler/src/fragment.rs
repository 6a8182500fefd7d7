//! libvirt pinning fragment rendering

use cpupin_core::{CpuRecord, CpupinError, CpupinResult};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

const PADDING: &str = "  ";

/// Binding of one virtual CPU to one physical CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VcpuPin {
    /// Virtual CPU index
    pub vcpu: usize,
    /// Physical CPU id
    pub cpuset: u32,
}

/// Guest CPU topology derived from the placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CpuTopologySummary {
    pub sockets: usize,
    pub cores: usize,
    /// Largest number of selected CPUs sharing one core id
    pub threads: usize,
}

/// Rendered pinning suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinningFragment {
    pub pins: Vec<VcpuPin>,
    pub topology: CpuTopologySummary,
}

/// Build the pinning fragment for a placement
///
/// Sockets and cores are tallied by their raw ids. A core id that repeats
/// under different sockets or nodes is counted once, so `cores` and
/// `threads` describe the flat tally rather than distinct physical cores.
pub fn format_placement(placement: &[CpuRecord]) -> CpupinResult<PinningFragment> {
    if placement.is_empty() {
        return Err(CpupinError::EmptySelection);
    }

    let mut sockets: HashMap<u32, usize> = HashMap::new();
    let mut cores: HashMap<u32, usize> = HashMap::new();
    let mut pins = Vec::with_capacity(placement.len());

    for (vcpu, record) in placement.iter().enumerate() {
        pins.push(VcpuPin {
            vcpu,
            cpuset: record.cpu,
        });
        *sockets.entry(record.socket).or_insert(0) += 1;
        *cores.entry(record.core).or_insert(0) += 1;
    }

    let threads = cores.values().copied().max().unwrap_or(0);

    Ok(PinningFragment {
        pins,
        topology: CpuTopologySummary {
            sockets: sockets.len(),
            cores: cores.len(),
            threads,
        },
    })
}

impl fmt::Display for PinningFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = PADDING;

        writeln!(f, "{p}<vcpu placement='static'>{}</vcpu>", self.pins.len())?;
        writeln!(f, "{p}<cputune>")?;
        for pin in &self.pins {
            writeln!(
                f,
                "{p}{p}<vcpupin vcpu='{}' cpuset='{}'/>",
                pin.vcpu, pin.cpuset
            )?;
        }
        writeln!(f, "{p}</cputune>")?;
        writeln!(f, "{p}<cpu mode='host-passthrough' check='none'>")?;
        writeln!(
            f,
            "{p}{p}<topology sockets='{}' cores='{}' threads='{}'/>",
            self.topology.sockets, self.topology.cores, self.topology.threads
        )?;
        writeln!(f, "{p}{p}<cache mode='passthrough'/>")?;
        writeln!(f, "{p}</cpu>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_empty_placement() {
        let err = format_placement(&[]).unwrap_err();
        assert!(matches!(err, CpupinError::EmptySelection));
    }

    #[test]
    fn test_render_fragment() {
        let placement = vec![CpuRecord::new(2, 0, 1, 0), CpuRecord::new(3, 1, 1, 0)];
        let fragment = format_placement(&placement).unwrap();

        let expected = "  <vcpu placement='static'>2</vcpu>
  <cputune>
    <vcpupin vcpu='0' cpuset='2'/>
    <vcpupin vcpu='1' cpuset='3'/>
  </cputune>
  <cpu mode='host-passthrough' check='none'>
    <topology sockets='1' cores='2' threads='1'/>
    <cache mode='passthrough'/>
  </cpu>
";
        assert_eq!(fragment.to_string(), expected);
    }

    #[test]
    fn test_hyperthreads_counted_per_core() {
        let placement = vec![
            CpuRecord::new(0, 0, 0, 0),
            CpuRecord::new(4, 0, 0, 0),
            CpuRecord::new(1, 1, 0, 0),
            CpuRecord::new(5, 1, 0, 0),
        ];
        let fragment = format_placement(&placement).unwrap();
        assert_eq!(
            fragment.topology,
            CpuTopologySummary {
                sockets: 1,
                cores: 2,
                threads: 2
            }
        );
    }

    #[test]
    fn test_core_ids_tallied_flat_across_sockets() {
        let placement = vec![CpuRecord::new(0, 0, 0, 0), CpuRecord::new(1, 0, 1, 1)];
        let fragment = format_placement(&placement).unwrap();
        assert_eq!(fragment.topology.sockets, 2);
        assert_eq!(fragment.topology.cores, 1);
        assert_eq!(fragment.topology.threads, 2);
    }

    #[test]
    fn test_pins_follow_placement_order() {
        let placement = vec![
            CpuRecord::new(7, 3, 0, 0),
            CpuRecord::new(1, 0, 0, 0),
            CpuRecord::new(4, 2, 0, 0),
        ];
        let fragment = format_placement(&placement).unwrap();
        let cpusets: Vec<u32> = fragment.pins.iter().map(|p| p.cpuset).collect();
        let vcpus: Vec<usize> = fragment.pins.iter().map(|p| p.vcpu).collect();
        assert_eq!(cpusets, vec![7, 1, 4]);
        assert_eq!(vcpus, vec![0, 1, 2]);
    }

    #[test]
    fn test_fragment_serializes() {
        let fragment = format_placement(&[CpuRecord::new(5, 2, 0, 0)]).unwrap();
        let json = serde_json::to_value(&fragment).unwrap();
        assert_eq!(json["pins"][0]["cpuset"], 5);
        assert_eq!(json["topology"]["threads"], 1);
    }
}
