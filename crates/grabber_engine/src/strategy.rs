use async_trait::async_trait;
use grabber_core::{Attempt, Degradation};
use grabber_logging::{grab_debug, grab_info};

/// One tier of a fallback chain.
///
/// `C` is whatever state the tiers share (for posts: the reference, the HTTP
/// client and the lazily fetched page), so that later tiers can reuse work
/// done by earlier ones.
#[async_trait]
pub trait Strategy<C: Send, T>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, ctx: &mut C) -> Attempt<T>;
}

/// What a chain produced, and why every tier before the winner gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome<T> {
    pub value: Option<T>,
    pub resolved_by: Option<&'static str>,
    pub degradations: Vec<(&'static str, Degradation)>,
}

impl<T> ChainOutcome<T> {
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

/// Ordered strategies tried in sequence until one resolves.
pub struct FallbackChain<C, T> {
    label: &'static str,
    strategies: Vec<Box<dyn Strategy<C, T>>>,
}

impl<C: Send, T: Send> FallbackChain<C, T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            strategies: Vec::new(),
        }
    }

    pub fn then(mut self, strategy: impl Strategy<C, T> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Runs the tiers in order; later tiers are not touched once one resolves.
    pub async fn resolve(&self, ctx: &mut C) -> ChainOutcome<T> {
        let mut degradations = Vec::new();
        for strategy in &self.strategies {
            match strategy.attempt(ctx).await {
                Attempt::Resolved(value) => {
                    grab_debug!("{} resolved by {}", self.label, strategy.name());
                    return ChainOutcome {
                        value: Some(value),
                        resolved_by: Some(strategy.name()),
                        degradations,
                    };
                }
                Attempt::Degraded(reason) => {
                    grab_info!(
                        "{} via {} unavailable ({}), falling back",
                        self.label,
                        strategy.name(),
                        reason
                    );
                    if let Degradation::NotJson { preview } = &reason {
                        grab_debug!(
                            "Non-JSON response from {} (first {} chars): {}",
                            strategy.name(),
                            preview.chars().count(),
                            preview
                        );
                        grab_debug!(
                            "This usually means a login or captcha page was served; check that the PHPSESSID is set and current."
                        );
                    }
                    degradations.push((strategy.name(), reason));
                }
            }
        }
        ChainOutcome {
            value: None,
            resolved_by: None,
            degradations,
        }
    }
}
