use std::fmt;
use std::sync::Arc;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info};

use crate::rating;
use crate::sentiment::{ScorerError, SentimentScorer};

#[derive(Debug, Clone, Default)]
pub struct FeedbackRequest {
    pub feedback: String,
}

/// Only a JSON object is a request. A missing or null `feedback` reads as
/// empty and fails validation later; other keys are ignored.
impl<'de> Deserialize<'de> for FeedbackRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = FeedbackRequest;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut feedback: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    if key == "feedback" {
                        if feedback.is_some() {
                            return Err(de::Error::duplicate_field("feedback"));
                        }
                        feedback = Some(map.next_value::<Option<String>>()?.unwrap_or_default());
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(FeedbackRequest {
                    feedback: feedback.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingResponse {
    pub feedback: String,
    pub predicted_rating: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("Feedback is required")]
    FeedbackRequired,
    #[error(transparent)]
    Scorer(#[from] ScorerError),
}

/// Feedback -> polarity -> rating
pub struct RatingPredictor {
    scorer: Arc<dyn SentimentScorer>,
}

impl RatingPredictor {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    pub fn predict(&self, request: FeedbackRequest) -> Result<RatingResponse, PredictError> {
        if request.feedback.trim().is_empty() {
            return Err(PredictError::FeedbackRequired);
        }

        let polarity = self.scorer.polarity(&request.feedback)?;
        if polarity.is_nan() {
            return Err(ScorerError::Unavailable("scorer returned NaN polarity".to_string()).into());
        }
        debug!("polarity {:.4} for {} chars", polarity, request.feedback.chars().count());

        let predicted_rating = rating::map_polarity(polarity);
        info!("⭐ predicted rating {:.1}", predicted_rating);

        Ok(RatingResponse {
            feedback: request.feedback,
            predicted_rating,
        })
    }
}
