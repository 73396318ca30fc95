//! Post-merge enhancement pipeline (§4.6): optional, best-effort passes that
//! fill in fields the sources themselves didn't supply.
use crate::ids::ResourceKind;
use crate::model::Model;
use crate::provenance::{ProvenanceKey, ProvenanceRecord, ProvenanceTracker};
use crate::source::FetchContext;

/// A single enhancement pass over one model.
///
/// `enhance` receives the model by value and returns the (possibly
/// unchanged) result; a failing enhancer leaves the pre-call model intact
/// rather than aborting the pipeline (§4.6: "per-item errors logged and
/// swallowed").
pub trait Enhancer: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this enhancer has anything to contribute for `model`.
    fn can_enhance(&self, model: &Model) -> bool;

    fn enhance(&self, model: Model) -> Result<Model, EnhanceError>;

    /// Batch form; the default implementation just calls `enhance` for each
    /// item and stops at the first failure. Enhancers whose underlying
    /// service supports a real batch call should override this.
    fn enhance_batch(&self, models: Vec<Model>) -> Result<Vec<Model>, EnhanceError> {
        models.into_iter().map(|m| self.enhance(m)).collect()
    }

    /// Pipeline order: higher runs first (§4.6: "priority-descending order").
    fn priority(&self) -> i32 {
        0
    }
}

/// An enhancer failed to produce a result for one model.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhanceError {
    pub enhancer: String,
    pub model_id: String,
    pub message: String,
}

impl std::fmt::Display for EnhanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "enhancer {:?} failed for model {:?}: {}",
            self.enhancer, self.model_id, self.message
        )
    }
}

impl std::error::Error for EnhanceError {}

/// Runs a set of enhancers, priority-descending, over every model in a
/// provider's list (§4.6).
///
/// A batch failure for one enhancer degrades to running that enhancer
/// per-item, so one bad model doesn't block the rest of the batch (§4.6:
/// "batch degrades to per-item enhance on batch error"). Per-item failures
/// are logged and the pre-call model is kept. When `tracker` is supplied,
/// a `None` -> `Some` transition on a field records provenance (§4.6:
/// "optional provenance side-effect").
///
/// `ctx`, when supplied, is polled between enhancer invocations; once
/// cancelled, the pipeline stops running further enhancers and returns
/// whatever has been produced so far (§5: "checks the flag between
/// enhancer invocations").
pub fn run_pipeline(
    enhancers: &[Box<dyn Enhancer>],
    models: Vec<Model>,
    now: chrono::DateTime<chrono::Utc>,
    tracker: Option<&mut ProvenanceTracker>,
    ctx: Option<&FetchContext>,
) -> Vec<Model> {
    let mut ordered: Vec<&Box<dyn Enhancer>> = enhancers.iter().collect();
    ordered.sort_by(|a, b| b.priority().cmp(&a.priority()));

    let mut current = models;
    let mut tracker = tracker;
    for enhancer in ordered {
        if ctx.is_some_and(FetchContext::is_cancelled) {
            break;
        }
        let before = current.clone();
        current = run_one(enhancer.as_ref(), current);
        if let Some(tracker) = tracker.as_deref_mut() {
            record_transitions(enhancer.as_ref(), &before, &current, now, tracker);
        }
    }
    current
}

fn run_one(enhancer: &dyn Enhancer, models: Vec<Model>) -> Vec<Model> {
    let candidates: Vec<bool> = models.iter().map(|m| enhancer.can_enhance(m)).collect();
    if !candidates.iter().any(|&c| c) {
        return models;
    }

    match enhancer.enhance_batch(models.clone()) {
        Ok(enhanced) if enhanced.len() == models.len() => enhanced,
        Ok(_) | Err(_) => models
            .into_iter()
            .zip(candidates)
            .map(|(model, eligible)| {
                if !eligible {
                    return model;
                }
                let id = model.id.clone();
                match enhancer.enhance(model.clone()) {
                    Ok(enhanced) => enhanced,
                    Err(err) => {
                        tracing::warn!(enhancer = enhancer.name(), model = %id, error = %err, "enhancement failed, keeping prior value");
                        model
                    }
                }
            })
            .collect(),
    }
}

fn record_transitions(
    enhancer: &dyn Enhancer,
    before: &[Model],
    after: &[Model],
    now: chrono::DateTime<chrono::Utc>,
    tracker: &mut ProvenanceTracker,
) {
    use crate::access::FieldAccess;
    use crate::paths::model as p;

    let fields = [
        p::PRICING_INPUT_PER_1M,
        p::PRICING_OUTPUT_PER_1M,
        p::PRICING_CACHE_READ_PER_1M,
        p::PRICING_CACHE_WRITE_PER_1M,
        p::LIMITS_CONTEXT_WINDOW,
        p::LIMITS_MAX_OUTPUT_TOKENS,
        p::METADATA_RELEASE_DATE,
        p::METADATA_LAST_UPDATED,
        p::METADATA_KNOWLEDGE_CUTOFF,
        p::METADATA_OPEN_WEIGHTS,
    ];

    for (before_model, after_model) in before.iter().zip(after) {
        for &path in &fields {
            let was = before_model.get_field(path);
            let now_value = after_model.get_field(path);
            if was.is_none() && now_value.is_some() {
                let Some(value) = now_value else { continue };
                tracker.track(
                    ProvenanceKey::new(ResourceKind::Model, after_model.id.clone(), path),
                    ProvenanceRecord {
                        source: crate::ids::SourceId::Other(enhancer.name().to_owned()),
                        field: path.to_owned(),
                        value: field_value_to_json(&value),
                        timestamp: now,
                        authority: 0.0,
                        confidence: 1.0,
                        reason: format!("enhanced by {}", enhancer.name()),
                        previous_value: None,
                    },
                );
            }
        }
    }
}

fn field_value_to_json(value: &crate::access::FieldValue) -> serde_json::Value {
    use crate::access::FieldValue;
    match value {
        FieldValue::Str(s) => serde_json::Value::String(s.clone()),
        FieldValue::F64(v) => serde_json::json!(v),
        FieldValue::U64(v) => serde_json::json!(v),
        FieldValue::Bool(v) => serde_json::json!(v),
        FieldValue::Date(v) => serde_json::Value::String(v.to_string()),
        FieldValue::StrSeq(v) => serde_json::json!(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FillsContextWindow;

    impl Enhancer for FillsContextWindow {
        fn name(&self) -> &str {
            "fills_context_window"
        }

        fn can_enhance(&self, model: &Model) -> bool {
            model.limits.context_window.is_none()
        }

        fn enhance(&self, mut model: Model) -> Result<Model, EnhanceError> {
            model.limits.context_window = Some(8192);
            Ok(model)
        }

        fn priority(&self) -> i32 {
            10
        }
    }

    struct AlwaysFails;

    impl Enhancer for AlwaysFails {
        fn name(&self) -> &str {
            "always_fails"
        }

        fn can_enhance(&self, _model: &Model) -> bool {
            true
        }

        fn enhance(&self, _model: Model) -> Result<Model, EnhanceError> {
            Err(EnhanceError {
                enhancer: self.name().to_owned(),
                model_id: "unknown".to_owned(),
                message: "simulated failure".to_owned(),
            })
        }

        fn priority(&self) -> i32 {
            20
        }
    }

    fn now() -> chrono::DateTime<chrono::Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap_or_default()
    }

    #[test]
    fn fills_in_missing_field_and_records_provenance() {
        let model = Model::new("gpt-4", now());
        let enhancers: Vec<Box<dyn Enhancer>> = vec![Box::new(FillsContextWindow)];
        let mut tracker = ProvenanceTracker::enabled();
        let result = run_pipeline(&enhancers, vec![model], now(), Some(&mut tracker), None);

        assert_eq!(result[0].limits.context_window, Some(8192));
        assert!(tracker
            .find_by_field(ResourceKind::Model, "gpt-4", "limits.context_window")
            .is_some());
    }

    #[test]
    fn failing_enhancer_leaves_model_unchanged_and_does_not_abort_pipeline() {
        let model = Model::new("gpt-4", now());
        let enhancers: Vec<Box<dyn Enhancer>> = vec![Box::new(AlwaysFails), Box::new(FillsContextWindow)];
        let result = run_pipeline(&enhancers, vec![model], now(), None, None);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].limits.context_window, Some(8192));
    }

    #[test]
    fn higher_priority_enhancer_runs_first() {
        struct RecordsOrder(std::sync::Arc<std::sync::Mutex<Vec<&'static str>>>, &'static str, i32);

        impl Enhancer for RecordsOrder {
            fn name(&self) -> &str {
                self.1
            }
            fn can_enhance(&self, _model: &Model) -> bool {
                true
            }
            fn enhance(&self, model: Model) -> Result<Model, EnhanceError> {
                if let Ok(mut log) = self.0.lock() {
                    log.push(self.1);
                }
                Ok(model)
            }
            fn priority(&self) -> i32 {
                self.2
            }
        }

        let log = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let enhancers: Vec<Box<dyn Enhancer>> = vec![
            Box::new(RecordsOrder(log.clone(), "low", 1)),
            Box::new(RecordsOrder(log.clone(), "high", 100)),
        ];
        run_pipeline(&enhancers, vec![Model::new("gpt-4", now())], now(), None, None);

        assert_eq!(log.lock().map(|l| l.clone()).unwrap_or_default(), vec!["high", "low"]);
    }

    #[test]
    fn cancelled_context_stops_before_the_next_enhancer_runs() {
        let ctx = FetchContext::new();
        ctx.cancel();
        let model = Model::new("gpt-4", now());
        let enhancers: Vec<Box<dyn Enhancer>> = vec![Box::new(FillsContextWindow)];
        let result = run_pipeline(&enhancers, vec![model], now(), None, Some(&ctx));

        assert_eq!(result[0].limits.context_window, None);
    }
}
