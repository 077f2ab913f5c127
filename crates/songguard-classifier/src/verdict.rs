//! Structured sentiment verdict shared by the backend and the orchestrator

use serde::{Deserialize, Serialize};

/// Broadcast decision label. Serialized as its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SentimentLabel {
    /// Can be played
    Positive,
    /// Requires manual review
    Neutral,
    /// Rejected
    Negative,
}

impl SentimentLabel {
    pub fn code(self) -> u8 {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }
}

impl From<SentimentLabel> for u8 {
    fn from(label: SentimentLabel) -> Self {
        label.code()
    }
}

impl TryFrom<u8> for SentimentLabel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(SentimentLabel::Positive),
            1 => Ok(SentimentLabel::Neutral),
            2 => Ok(SentimentLabel::Negative),
            other => Err(format!("sentiment label out of range: {}", other)),
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "positive"),
            SentimentLabel::Neutral => write!(f, "neutral"),
            SentimentLabel::Negative => write!(f, "negative"),
        }
    }
}

/// Classifier output for one song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub sentiment: SentimentLabel,
    /// -1 (negative) to 1 (positive), 0 for neutral
    pub sentiment_score: f64,
    /// 0 to 1
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
}

impl SentimentVerdict {
    /// Clamp score and confidence into their documented ranges.
    pub fn clamped(mut self) -> Self {
        self.sentiment_score = self.sentiment_score.clamp(-1.0, 1.0);
        self.confidence = self.confidence.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_serializes_as_integer() {
        let verdict = SentimentVerdict {
            sentiment: SentimentLabel::Negative,
            sentiment_score: -0.8,
            confidence: 0.9,
            explanation: "promotes violence".to_string(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["sentiment"], 2);
        assert_eq!(json["explanation"], "promotes violence");
    }

    #[test]
    fn test_out_of_range_label_rejected() {
        let raw = r#"{"sentiment":3,"sentiment_score":0.0,"confidence":0.5,"explanation":""}"#;
        assert!(serde_json::from_str::<SentimentVerdict>(raw).is_err());
    }

    #[test]
    fn test_clamped() {
        let verdict = SentimentVerdict {
            sentiment: SentimentLabel::Positive,
            sentiment_score: 1.7,
            confidence: -0.2,
            explanation: String::new(),
        }
        .clamped();
        assert_eq!(verdict.sentiment_score, 1.0);
        assert_eq!(verdict.confidence, 0.0);
    }
}
