//! Suggestion pipeline: parse, place, format

use crate::fragment::{format_placement, PinningFragment};
use crate::placement::{PlacementStrategy, WeightedPlacement};
use cpupin_core::{parse_topology, CpupinResult};
use tracing::{debug, info};

/// Stateless pinning scheduler
///
/// Every call builds its own topology, so a single instance can be shared
/// across concurrent requests.
pub struct Scheduler {
    strategy: Box<dyn PlacementStrategy>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    /// Create a scheduler using weighted placement
    pub fn new() -> Self {
        Self::with_strategy(Box::new(WeightedPlacement))
    }

    /// Create a scheduler with a custom placement strategy
    pub fn with_strategy(strategy: Box<dyn PlacementStrategy>) -> Self {
        Self { strategy }
    }

    /// Suggest a pinning for `vcpu` vCPUs on the topology described by `lscpu`
    pub fn suggest(&self, lscpu: &str, vcpu: usize) -> CpupinResult<PinningFragment> {
        let topology = parse_topology(lscpu)?;
        debug!(cpus = topology.len(), "Parsed topology");

        let placement = self.strategy.place(&topology, vcpu)?;
        let fragment = format_placement(&placement)?;

        info!(
            vcpu = vcpu,
            available = topology.len(),
            sockets = fragment.topology.sockets,
            cores = fragment.topology.cores,
            threads = fragment.topology.threads,
            "Suggested pinning"
        );

        Ok(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpupin_core::{CpuRecord, CpupinError};

    const TOPOLOGY: &str = "0,0,0,0,x\n1,1,0,0,x\n2,0,1,0,x\n3,1,1,0,x\n";

    #[test]
    fn test_suggest_end_to_end() {
        let scheduler = Scheduler::new();
        let fragment = scheduler.suggest(TOPOLOGY, 2).unwrap();

        assert_eq!(fragment.pins.len(), 2);
        assert_eq!(fragment.pins[0].vcpu, 0);
        assert_eq!(fragment.pins[1].vcpu, 1);
        assert_ne!(fragment.pins[0].cpuset, fragment.pins[1].cpuset);
        assert!(fragment.pins.iter().all(|p| p.cpuset <= 3));
        assert!(fragment.topology.sockets <= 2);
        assert!(fragment.topology.cores <= 2);
        assert!(fragment.topology.threads >= 1);

        let rendered = fragment.to_string();
        assert!(rendered.contains("<vcpupin vcpu='0' cpuset='2'/>"));
        assert!(rendered.contains("<vcpupin vcpu='1' cpuset='3'/>"));
        assert!(rendered.contains("<topology sockets='1' cores='2' threads='1'/>"));
    }

    #[test]
    fn test_suggest_over_capacity() {
        let err = Scheduler::new().suggest(TOPOLOGY, 5).unwrap_err();
        assert!(matches!(
            err,
            CpupinError::Capacity {
                requested: 5,
                available: 4
            }
        ));
        assert!(err.to_string().contains("requested=5, available=4"));
    }

    #[test]
    fn test_suggest_parse_failure() {
        let err = Scheduler::new().suggest("0,0,0,0,x\n1,1,0\n", 1).unwrap_err();
        assert!(matches!(err, CpupinError::Parse { line_number: 2, .. }));
    }

    #[test]
    fn test_suggest_empty_topology() {
        let err = Scheduler::new().suggest("# nothing here\n", 1).unwrap_err();
        assert!(matches!(err, CpupinError::Capacity { available: 0, .. }));
    }

    struct FirstFit;

    impl PlacementStrategy for FirstFit {
        fn place(&self, topology: &[CpuRecord], vcpu: usize) -> CpupinResult<Vec<CpuRecord>> {
            Ok(topology.iter().take(vcpu).copied().collect())
        }
    }

    #[test]
    fn test_custom_strategy() {
        let scheduler = Scheduler::with_strategy(Box::new(FirstFit));
        let fragment = scheduler.suggest(TOPOLOGY, 2).unwrap();
        let cpusets: Vec<u32> = fragment.pins.iter().map(|p| p.cpuset).collect();
        assert_eq!(cpusets, vec![0, 1]);
    }
}
