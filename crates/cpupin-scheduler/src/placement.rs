//! vCPU placement decisions

use cpupin_core::{CpuRecord, CpupinError, CpupinResult};
use tracing::{debug, trace};

/// Ordering key used to rank CPUs for selection
pub fn weight(record: &CpuRecord) -> u64 {
    record.weight()
}

/// Strategy for choosing which physical CPUs back the requested vCPUs
pub trait PlacementStrategy: Send + Sync {
    /// Choose exactly `vcpu` records from the topology, in vCPU index order
    fn place(&self, topology: &[CpuRecord], vcpu: usize) -> CpupinResult<Vec<CpuRecord>>;
}

/// Default placement strategy: sort by weight and take the heaviest records
pub struct WeightedPlacement;

impl PlacementStrategy for WeightedPlacement {
    fn place(&self, topology: &[CpuRecord], vcpu: usize) -> CpupinResult<Vec<CpuRecord>> {
        if vcpu > topology.len() {
            return Err(CpupinError::Capacity {
                requested: vcpu,
                available: topology.len(),
            });
        }

        if vcpu == 0 {
            return Err(CpupinError::EmptySelection);
        }

        let mut sorted = topology.to_vec();
        sorted.sort_by_key(weight);

        for record in &sorted {
            trace!(record = %record, weight = weight(record), "Ranked CPU");
        }

        let selected = sorted.split_off(sorted.len() - vcpu);

        debug!(
            vcpu = vcpu,
            available = topology.len(),
            cpus = ?selected.iter().map(|r| r.cpu).collect::<Vec<_>>(),
            "Selected CPUs"
        );

        Ok(selected)
    }
}

/// Select `vcpu` records with the default strategy
pub fn select(topology: &[CpuRecord], vcpu: usize) -> CpupinResult<Vec<CpuRecord>> {
    WeightedPlacement.place(topology, vcpu)
}
