use ndaccum_runtime::{MergeStrategy, PartitionPlan, Scheduler};

use crate::ReduceStrategy;

#[derive(Debug, Clone)]
pub(crate) struct ReduceConfig {
    pub(crate) plan: PartitionPlan,
    pub(crate) merge: MergeStrategy,
    pub(crate) parallel: bool,
}

impl ReduceConfig {
    /// Configuration to fold `len` items, each item costing about `item_len` element reads.
    pub(crate) fn generate(
        len: usize,
        item_len: usize,
        strategy: &ReduceStrategy,
        scheduler: &Scheduler,
    ) -> ReduceConfig {
        ReduceConfig::new(len)
            .generate_plan(len, item_len, strategy, scheduler)
            .generate_execution(strategy, scheduler)
    }

    fn new(len: usize) -> Self {
        // This is only a dummy configuration to use as a starting point.
        Self {
            plan: PartitionPlan::new(len, 1),
            merge: MergeStrategy::default(),
            parallel: false,
        }
    }

    fn generate_plan(
        mut self,
        len: usize,
        item_len: usize,
        strategy: &ReduceStrategy,
        scheduler: &Scheduler,
    ) -> Self {
        self.plan = match strategy.partitions {
            Some(count) => PartitionPlan::new(len, count),
            None => {
                let min_len = scheduler.min_partition_len().div_ceil(item_len.max(1));
                PartitionPlan::with_min_len(len, min_len, scheduler.workers())
            }
        };
        self
    }

    fn generate_execution(mut self, strategy: &ReduceStrategy, scheduler: &Scheduler) -> Self {
        self.merge = strategy.merge;
        self.parallel = strategy.parallel && scheduler.workers() > 1 && self.plan.count() > 1;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_partition_count() {
        let scheduler = Scheduler::new(2);
        let strategy = ReduceStrategy::new(Some(16), MergeStrategy::Sequential, true);
        let config = ReduceConfig::generate(100, 1, &strategy, &scheduler);

        assert_eq!(config.plan.count(), 16);
        assert_eq!(config.merge, MergeStrategy::Sequential);
        assert!(config.parallel);
    }

    #[test]
    fn automatic_partition_count_respects_min_len() {
        let scheduler = Scheduler::new(8);
        let strategy = ReduceStrategy::new(None, MergeStrategy::Tree, true);

        let small = ReduceConfig::generate(100, 1, &strategy, &scheduler);
        assert_eq!(small.plan.count(), 1);
        assert!(!small.parallel);

        let large = ReduceConfig::generate(1 << 20, 1, &strategy, &scheduler);
        assert_eq!(large.plan.count(), 8);
    }

    #[test]
    fn sequential_strategy_runs_inline() {
        let scheduler = Scheduler::new(4);
        let strategy = ReduceStrategy::new(Some(4), MergeStrategy::Tree, false);
        assert!(!ReduceConfig::generate(64, 1, &strategy, &scheduler).parallel);
    }
}
