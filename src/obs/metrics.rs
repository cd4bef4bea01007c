// self
use crate::obs::{LifecycleKind, LifecycleOutcome};

/// Records a lifecycle outcome via the global metrics recorder (when enabled).
pub fn record_lifecycle_outcome(kind: LifecycleKind, outcome: LifecycleOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth_pacer_lifecycle_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}
