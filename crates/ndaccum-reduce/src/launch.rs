use std::sync::OnceLock;

use ndaccum_runtime::Scheduler;

use crate::{
    Accumulation, ReduceError, ReduceInstruction, ReducePrecision, ReduceStrategy,
    config::ReduceConfig,
};

static SCHEDULER: OnceLock<Scheduler> = OnceLock::new();

/// Scheduler used by reductions that don't provide their own, built from the global
/// configuration on first use.
pub fn default_scheduler() -> &'static Scheduler {
    SCHEDULER.get_or_init(Scheduler::default)
}

/// Fold every partition of the op and merge the partials.
///
/// Partials are only merged once every partition is folded: if a worker fails, nothing is
/// merged.
pub(crate) fn launch_reduce<P: ReducePrecision, I: ReduceInstruction>(
    op: &Accumulation<P, I>,
    strategy: &ReduceStrategy,
    scheduler: &Scheduler,
) -> Result<I::Accumulator<P>, ReduceError> {
    let config = ReduceConfig::generate(op.n(), 1, strategy, scheduler);

    log::debug!(
        "Reduce {:?} over {} elements: {} partitions, {} merge, parallel={}",
        op.instruction(),
        op.n(),
        config.plan.count(),
        config.merge,
        config.parallel,
    );
    scheduler.log_reduce(&format_args!(
        "Launch {:?} n={} partitions={} merge={}",
        op.instruction(),
        op.n(),
        config.plan.count(),
        config.merge,
    ));

    let partials = if config.parallel {
        scheduler.execute(config.plan.ranges(), |range| op.reduce_partition(range))?
    } else {
        config
            .plan
            .ranges()
            .iter()
            .cloned()
            .map(|range| op.reduce_partition(range))
            .collect()
    };

    Ok(config
        .merge
        .merge(partials, |lhs, rhs| op.combine_partial(lhs, rhs))
        .unwrap_or_else(|| op.null_accumulator()))
}
