//! Annotation display configuration

use serde::Deserialize;

use crate::domain::comment::ExcerptPolicy;

use super::error::ValidationError;

/// Excerpt shortening for comment displays
#[derive(Debug, Clone, Deserialize)]
pub struct AnnotationConfig {
    /// Excerpts longer than this many chars are pruned
    #[serde(default = "default_prune_threshold")]
    pub excerpt_prune_threshold: usize,

    /// Chars kept at each end of a pruned excerpt
    #[serde(default = "default_excerpt_keep")]
    pub excerpt_keep: usize,
}

impl AnnotationConfig {
    pub fn excerpt_policy(&self) -> ExcerptPolicy {
        ExcerptPolicy {
            threshold: self.excerpt_prune_threshold,
            keep: self.excerpt_keep,
        }
    }

    /// Validate annotation configuration
    ///
    /// The kept head and tail together may not exceed the threshold.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.excerpt_keep * 2 > self.excerpt_prune_threshold {
            return Err(ValidationError::ExcerptBudgetTooLarge {
                kept: self.excerpt_keep * 2,
                threshold: self.excerpt_prune_threshold,
            });
        }
        Ok(())
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            excerpt_prune_threshold: default_prune_threshold(),
            excerpt_keep: default_excerpt_keep(),
        }
    }
}

fn default_prune_threshold() -> usize {
    140
}

fn default_excerpt_keep() -> usize {
    65
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_domain_policy() {
        assert_eq!(AnnotationConfig::default().excerpt_policy(), ExcerptPolicy::default());
        assert!(AnnotationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_oversized_budget() {
        let config = AnnotationConfig {
            excerpt_prune_threshold: 100,
            excerpt_keep: 60,
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::ExcerptBudgetTooLarge { kept: 120, threshold: 100 })
        ));
    }
}
