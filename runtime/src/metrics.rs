//! Metrics for lifecycle sources and bindings.
//!
//! Metrics are recorded through the [`metrics`] facade. Nothing is exported unless
//! the application installs a recorder; call [`register_metrics`] once after
//! installing one to attach descriptions.
//!
//! | Metric                                | Type    | Labels   |
//! |---------------------------------------|---------|----------|
//! | `lifebind_phases_delivered_total`     | counter | `phase`  |
//! | `lifebind_bindings_active`            | gauge   |          |
//! | `lifebind_bindings_completed_total`   | counter | `reason` |
//! | `lifebind_bindings_rejected_total`    | counter |          |
//!
//! `reason` is one of `target`, `destroyed`, `upstream` or `cancelled`.

use metrics::{counter, describe_counter, describe_gauge, gauge};

const PHASES_DELIVERED: &str = "lifebind_phases_delivered_total";
const BINDINGS_ACTIVE: &str = "lifebind_bindings_active";
const BINDINGS_COMPLETED: &str = "lifebind_bindings_completed_total";
const BINDINGS_REJECTED: &str = "lifebind_bindings_rejected_total";

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        PHASES_DELIVERED,
        "Total number of lifecycle phases delivered by host adapters"
    );
    describe_gauge!(
        BINDINGS_ACTIVE,
        "Number of bound streams currently attached to a lifecycle"
    );
    describe_counter!(
        BINDINGS_COMPLETED,
        "Total number of bindings ended, by reason (target, destroyed, upstream, cancelled)"
    );
    describe_counter!(
        BINDINGS_REJECTED,
        "Total number of lifecycle-derived bindings refused at subscription"
    );
}

pub(crate) fn record_phase_delivered(phase: &'static str) {
    counter!(PHASES_DELIVERED, "phase" => phase).increment(1);
}

pub(crate) fn record_binding_opened() {
    gauge!(BINDINGS_ACTIVE).increment(1.0);
}

pub(crate) fn record_binding_closed(reason: &'static str) {
    gauge!(BINDINGS_ACTIVE).decrement(1.0);
    counter!(BINDINGS_COMPLETED, "reason" => reason).increment(1);
}

pub(crate) fn record_binding_rejected() {
    counter!(BINDINGS_REJECTED).increment(1);
}
