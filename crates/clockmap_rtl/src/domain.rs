//! Clock domains and the asynchronous crossings between them.

use crate::classify::{ClassifiedPort, Classification};
use clockmap_common::Nanoseconds;
use serde::Serialize;
use std::collections::BTreeMap;

/// The set of signals synchronous to one clock port.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClockDomain {
    /// The driving clock port's name.
    pub id: String,
    /// Period override; `None` means the global period applies.
    pub period: Option<Nanoseconds>,
    /// Non-clock ports bound to this domain, in declaration order.
    pub ports: Vec<String>,
}

impl ClockDomain {
    /// Returns the override period, or `default` when there is none.
    pub fn effective_period(&self, default: Nanoseconds) -> Nanoseconds {
        self.period.unwrap_or(default)
    }
}

/// An ordered pair of distinct domains needing a false path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CrossingPair {
    /// Launching domain.
    pub from: String,
    /// Capturing domain.
    pub to: String,
}

/// Domains in first-seen order plus every ordered crossing between them.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DomainGraph {
    /// Distinct domains ordered by their clock's declaration.
    pub domains: Vec<ClockDomain>,
    /// `N * (N - 1)` crossings, outer loop `from`, inner loop `to`.
    pub crossings: Vec<CrossingPair>,
}

impl DomainGraph {
    /// Builds the graph; `periods` maps clock names to override periods.
    ///
    /// Overrides naming a port that is not a clock are ignored.
    pub fn build(classification: &Classification, periods: &BTreeMap<String, Nanoseconds>) -> Self {
        let mut domains: Vec<ClockDomain> = Vec::new();
        for clock in classification.clocks() {
            if domains.iter().any(|d| d.id == clock.port.name) {
                continue;
            }
            domains.push(ClockDomain {
                id: clock.port.name.clone(),
                period: periods.get(&clock.port.name).copied(),
                ports: Vec::new(),
            });
        }

        for signal in classification.signals() {
            let Some(id) = signal.domain.as_deref() else {
                continue;
            };
            if let Some(domain) = domains.iter_mut().find(|d| d.id == id) {
                domain.ports.push(signal.port.name.clone());
            }
        }

        let crossings = domains
            .iter()
            .flat_map(|from| {
                domains
                    .iter()
                    .filter(move |to| to.id != from.id)
                    .map(move |to| CrossingPair {
                        from: from.id.clone(),
                        to: to.id.clone(),
                    })
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            domains = domains.len(),
            crossings = crossings.len(),
            "built domain graph"
        );
        Self { domains, crossings }
    }

    /// Returns the domain driven by `clock`.
    pub fn domain(&self, clock: &str) -> Option<&ClockDomain> {
        self.domains.iter().find(|d| d.id == clock)
    }

    /// Effective period of the domain a port belongs to, or `default`.
    pub fn period_of(&self, port: &ClassifiedPort, default: Nanoseconds) -> Nanoseconds {
        port.domain
            .as_deref()
            .and_then(|id| self.domain(id))
            .map_or(default, |d| d.effective_period(default))
    }
}
