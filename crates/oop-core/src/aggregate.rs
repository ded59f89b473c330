//! Aggregator: document-level measures derived from what the annotators
//! already recorded.
//!
//! Measures see the three annotator namespaces and the metadata, never the
//! raw text. A measure that cannot be computed yields `null` and an entry in
//! `Unavailable` instead of failing the aggregate.

use crate::data_model::AggregateResult;
use crate::document::Namespace;
use crate::error::{AggregationError, ConfigurationError};
use crate::metadata::Metadata;
use crate::params::{get_parsed, ParameterStore};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Field listing every measure that came out null, with the reason.
pub const UNAVAILABLE_KEY: &str = "Unavailable";

/// Parameter controlling how many tokens `TokenFrequencies` keeps.
pub const TOP_TOKENS_PARAM: &str = "aggregates.topTokens";
pub const DEFAULT_TOP_TOKENS: usize = 10;

/// Read-only view over the namespaces a measure works from.
pub struct AggregateInputs<'a> {
    pub stanford: &'a Map<String, Value>,
    pub oop: &'a Map<String, Value>,
    pub pipeline: &'a Map<String, Value>,
    pub metadata: &'a Metadata,
}

impl<'a> AggregateInputs<'a> {
    pub fn namespace(&self, namespace: Namespace) -> &'a Map<String, Value> {
        match namespace {
            Namespace::Stanford => self.stanford,
            Namespace::Oop => self.oop,
            Namespace::Pipeline => self.pipeline,
        }
    }

    pub fn value(&self, namespace: Namespace, key: &str) -> Result<&'a Value, AggregationError> {
        self.namespace(namespace)
            .get(key)
            .ok_or_else(|| AggregationError::MissingContribution {
                namespace,
                key: key.to_string(),
            })
    }

    pub fn number(&self, namespace: Namespace, key: &str) -> Result<f64, AggregationError> {
        self.value(namespace, key)?
            .as_f64()
            .ok_or_else(|| AggregationError::UnexpectedType {
                namespace,
                key: key.to_string(),
                expected: "a number",
            })
    }

    pub fn array(&self, namespace: Namespace, key: &str) -> Result<&'a Vec<Value>, AggregationError> {
        self.value(namespace, key)?
            .as_array()
            .ok_or_else(|| AggregationError::UnexpectedType {
                namespace,
                key: key.to_string(),
                expected: "an array",
            })
    }
}

/// One derived field of `AGGREGATES`.
pub trait Measure: Send + Sync {
    fn name(&self) -> &str;

    fn compute(&self, inputs: &AggregateInputs<'_>) -> Result<Value, AggregationError>;
}

/// `numerator / denominator` over two recorded numbers.
pub struct Ratio {
    name: String,
    numerator: (Namespace, String),
    denominator: (Namespace, String),
}

impl Ratio {
    pub fn new(
        name: impl Into<String>,
        numerator: (Namespace, &str),
        denominator: (Namespace, &str),
    ) -> Self {
        Self {
            name: name.into(),
            numerator: (numerator.0, numerator.1.to_string()),
            denominator: (denominator.0, denominator.1.to_string()),
        }
    }
}

impl Measure for Ratio {
    fn name(&self) -> &str {
        &self.name
    }

    fn compute(&self, inputs: &AggregateInputs<'_>) -> Result<Value, AggregationError> {
        let numerator = inputs.number(self.numerator.0, &self.numerator.1)?;
        let denominator = inputs.number(self.denominator.0, &self.denominator.1)?;
        if denominator == 0.0 {
            return Err(AggregationError::ZeroDenominator(format!(
                "{}.{}",
                self.denominator.0, self.denominator.1
            )));
        }
        Ok(json!(numerator / denominator))
    }
}

/// Most frequent lowercase tokens from `STANFORD.Tokens`.
pub struct TokenFrequencies {
    top: usize,
}

impl TokenFrequencies {
    pub fn new(top: usize) -> Self {
        Self { top }
    }
}

impl Measure for TokenFrequencies {
    fn name(&self) -> &str {
        "TokenFrequencies"
    }

    fn compute(&self, inputs: &AggregateInputs<'_>) -> Result<Value, AggregationError> {
        let tokens = inputs.array(Namespace::Stanford, "Tokens")?;

        let mut counts: HashMap<String, u64> = HashMap::new();
        for token in tokens {
            let token = token.as_str().ok_or_else(|| AggregationError::UnexpectedType {
                namespace: Namespace::Stanford,
                key: "Tokens".to_string(),
                expected: "an array of strings",
            })?;
            *counts.entry(token.to_lowercase()).or_default() += 1;
        }

        let mut ranked: Vec<(String, u64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(self.top);

        Ok(Value::Array(
            ranked
                .into_iter()
                .map(|(token, count)| json!({ "token": token, "count": count }))
                .collect(),
        ))
    }
}

/// Number of keys recorded in each annotator namespace.
pub struct ContributionCounts;

impl Measure for ContributionCounts {
    fn name(&self) -> &str {
        "ContributionCounts"
    }

    fn compute(&self, inputs: &AggregateInputs<'_>) -> Result<Value, AggregationError> {
        let counts: BTreeMap<&str, usize> = Namespace::ALL
            .iter()
            .map(|ns| (ns.as_str(), inputs.namespace(*ns).len()))
            .collect();
        Ok(json!(counts))
    }
}

/// Copies a bookkeeping number out of `PIPELINE`.
pub struct PipelineCounter {
    key: &'static str,
}

impl PipelineCounter {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Measure for PipelineCounter {
    fn name(&self) -> &str {
        self.key
    }

    fn compute(&self, inputs: &AggregateInputs<'_>) -> Result<Value, AggregationError> {
        let value = inputs.value(Namespace::Pipeline, self.key)?;
        value
            .as_u64()
            .map(Value::from)
            .ok_or_else(|| AggregationError::UnexpectedType {
                namespace: Namespace::Pipeline,
                key: self.key.to_string(),
                expected: "a count",
            })
    }
}

/// Runs an ordered set of measures. Measures sharing a name overwrite each
/// other; the last one wins.
pub struct Aggregator {
    measures: Vec<Box<dyn Measure>>,
}

impl Aggregator {
    pub fn new(measures: Vec<Box<dyn Measure>>) -> Self {
        Self { measures }
    }

    /// An aggregator with no measures; its result only carries `Unavailable`.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// The standard measure set.
    pub fn standard(top_tokens: usize) -> Self {
        Self::new(vec![
            Box::new(Ratio::new(
                "AverageWordLength",
                (Namespace::Oop, "Length"),
                (Namespace::Oop, "WordCount"),
            )),
            Box::new(Ratio::new(
                "WordsPerSentence",
                (Namespace::Oop, "WordCount"),
                (Namespace::Oop, "SentenceCount"),
            )),
            Box::new(TokenFrequencies::new(top_tokens)),
            Box::new(ContributionCounts),
            Box::new(PipelineCounter::new(crate::runner::ANNOTATORS_EXECUTED_KEY)),
            Box::new(PipelineCounter::new(crate::runner::ANNOTATORS_FAILED_KEY)),
        ])
    }

    /// The standard measure set, configured from `aggregates.*` parameters.
    pub fn from_params(params: &dyn ParameterStore) -> Result<Self, ConfigurationError> {
        let top = get_parsed(params, TOP_TOKENS_PARAM, DEFAULT_TOP_TOKENS)?;
        Ok(Self::standard(top))
    }

    pub fn with_measure(mut self, measure: Box<dyn Measure>) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn len(&self) -> usize {
        self.measures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measures.is_empty()
    }

    /// Pure function of its inputs: no I/O, no mutation, same output for
    /// the same namespaces.
    pub fn aggregate(
        &self,
        stanford: &Map<String, Value>,
        oop: &Map<String, Value>,
        pipeline: &Map<String, Value>,
        metadata: &Metadata,
    ) -> AggregateResult {
        let inputs = AggregateInputs {
            stanford,
            oop,
            pipeline,
            metadata,
        };

        let mut fields = Map::new();
        let mut unavailable = Map::new();

        for measure in &self.measures {
            match measure.compute(&inputs) {
                Ok(value) => {
                    unavailable.remove(measure.name());
                    fields.insert(measure.name().to_string(), value);
                }
                Err(err) => {
                    tracing::warn!(measure = measure.name(), error = %err, "aggregate unavailable");
                    unavailable.insert(measure.name().to_string(), Value::String(err.to_string()));
                    fields.insert(measure.name().to_string(), Value::Null);
                }
            }
        }

        fields.insert(UNAVAILABLE_KEY.to_string(), Value::Object(unavailable));
        AggregateResult { fields }
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::standard(DEFAULT_TOP_TOKENS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_average_word_length() {
        let oop = map(json!({ "Length": 11, "WordCount": 2 }));
        let result = Aggregator::default().aggregate(&Map::new(), &oop, &Map::new(), &Metadata::new());

        assert_eq!(result.get("AverageWordLength"), Some(&json!(5.5)));
        assert_eq!(result.get("WordsPerSentence"), Some(&Value::Null));
        let unavailable = result.get(UNAVAILABLE_KEY).unwrap().as_object().unwrap();
        assert!(unavailable.contains_key("WordsPerSentence"));
        assert!(!unavailable.contains_key("AverageWordLength"));
    }

    #[test]
    fn test_empty_input_is_well_formed() {
        let pipeline = map(json!({ "AnnotatorsExecuted": 0, "AnnotatorsFailed": 0 }));
        let result = Aggregator::default().aggregate(&Map::new(), &Map::new(), &pipeline, &Metadata::new());

        assert_eq!(result.get("AnnotatorsExecuted"), Some(&json!(0)));
        assert_eq!(result.get("AnnotatorsFailed"), Some(&json!(0)));
        assert_eq!(
            result.get("ContributionCounts"),
            Some(&json!({ "OOP": 0, "PIPELINE": 2, "STANFORD": 0 }))
        );
        assert_eq!(result.get("AverageWordLength"), Some(&Value::Null));
        assert_eq!(result.get("TokenFrequencies"), Some(&Value::Null));
    }

    #[test]
    fn test_zero_denominator_is_null() {
        let oop = map(json!({ "Length": 0, "WordCount": 0 }));
        let result = Aggregator::default().aggregate(&Map::new(), &oop, &Map::new(), &Metadata::new());
        assert_eq!(result.get("AverageWordLength"), Some(&Value::Null));
    }

    #[test]
    fn test_wrong_type_is_null() {
        let oop = map(json!({ "Length": "eleven", "WordCount": 2 }));
        let result = Aggregator::default().aggregate(&Map::new(), &oop, &Map::new(), &Metadata::new());
        assert_eq!(result.get("AverageWordLength"), Some(&Value::Null));
    }

    #[test]
    fn test_token_frequencies_ranked() {
        let stanford = map(json!({ "Tokens": ["The", "cat", "the", "dog", "a", "cat", "the"] }));
        let result = Aggregator::standard(2).aggregate(&stanford, &Map::new(), &Map::new(), &Metadata::new());
        assert_eq!(
            result.get("TokenFrequencies"),
            Some(&json!([
                { "token": "the", "count": 3 },
                { "token": "cat", "count": 2 }
            ]))
        );
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let stanford = map(json!({ "Tokens": ["b", "a", "b", "c", "a"] }));
        let oop = map(json!({ "Length": 9, "WordCount": 5, "SentenceCount": 1 }));
        let aggregator = Aggregator::default();

        let first = aggregator.aggregate(&stanford, &oop, &Map::new(), &Metadata::new());
        let second = aggregator.aggregate(&stanford, &oop, &Map::new(), &Metadata::new());
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_from_params_rejects_bad_top() {
        let params = crate::params::MapParameterStore::new().with(TOP_TOKENS_PARAM, "lots");
        assert!(Aggregator::from_params(&params).is_err());
    }
}
