//! Purpose: Define the diagnostic sink and the structured notices the read pipeline emits.
//! Exports: `Severity`, `Notice`, `notice_json`, `DiagnosticSink`, `TracingSink`, `NoticeLog`.
//! Role: Write-only channel for warnings (overflow recovery) and informational events.
//! Invariants: Notices are non-fatal and never alter a read's typed result.
//! Invariants: JSON schema is additive-only; sinks never read notices back into the core.
use serde_json::{Map, Value, json};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub kind: String,
    pub message: String,
    pub time: Option<String>,
    pub details: Map<String, Value>,
}

impl Notice {
    pub fn new(severity: Severity, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind: kind.into(),
            message: message.into(),
            time: None,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("severity".to_string(), json!(notice.severity.as_str()));
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("message".to_string(), json!(notice.message));
    if let Some(time) = &notice.time {
        inner.insert("time".to_string(), json!(time));
    }
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Receives notices from the read pipeline. No return value, no delivery guarantee.
pub trait DiagnosticSink {
    fn emit(&mut self, notice: Notice);

    fn info(&mut self, kind: &str, message: &str) {
        self.emit(Notice::new(Severity::Info, kind, message));
    }

    fn warning(&mut self, kind: &str, message: &str) {
        self.emit(Notice::new(Severity::Warning, kind, message));
    }

    fn error(&mut self, kind: &str, message: &str) {
        self.emit(Notice::new(Severity::Error, kind, message));
    }
}

impl<D: DiagnosticSink + ?Sized> DiagnosticSink for &mut D {
    fn emit(&mut self, notice: Notice) {
        (**self).emit(notice);
    }
}

/// Forwards notices to `tracing` events at the matching level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, notice: Notice) {
        let details = Value::Object(notice.details);
        match notice.severity {
            Severity::Info => {
                tracing::info!(kind = %notice.kind, %details, "{}", notice.message);
            }
            Severity::Warning => {
                tracing::warn!(kind = %notice.kind, %details, "{}", notice.message);
            }
            Severity::Error => {
                tracing::error!(kind = %notice.kind, %details, "{}", notice.message);
            }
        }
    }
}

/// Collects notices in memory, in emission order.
#[derive(Clone, Debug, Default)]
pub struct NoticeLog {
    notices: Vec<Notice>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Notice> + 'a {
        self.notices.iter().filter(move |notice| notice.kind == kind)
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl DiagnosticSink for NoticeLog {
    fn emit(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagnosticSink, Notice, NoticeLog, Severity, notice_json};

    #[test]
    fn notice_json_has_required_fields() {
        let notice = Notice::new(Severity::Warning, "overflow", "input trimmed")
            .with_detail("requested", 3)
            .with_detail("discarded", 2)
            .with_time("2026-02-01T00:00:00Z");

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(obj.get("severity").and_then(|v| v.as_str()), Some("warning"));
        assert_eq!(obj.get("kind").and_then(|v| v.as_str()), Some("overflow"));
        assert_eq!(
            obj.get("message").and_then(|v| v.as_str()),
            Some("input trimmed")
        );
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-02-01T00:00:00Z")
        );
        let details = obj.get("details").and_then(|v| v.as_object()).expect("details");
        assert_eq!(details.get("requested").and_then(|v| v.as_u64()), Some(3));
    }

    #[test]
    fn time_is_omitted_when_unset() {
        let value = notice_json(&Notice::new(Severity::Info, "accepted", "ok"));
        assert!(value["notice"].get("time").is_none());
    }

    #[test]
    fn log_keeps_emission_order() {
        let mut log = NoticeLog::new();
        log.info("a", "first");
        log.warning("b", "second");
        log.error("a", "third");

        let kinds: Vec<_> = log.notices().iter().map(|n| n.kind.as_str()).collect();
        assert_eq!(kinds, ["a", "b", "a"]);
        assert_eq!(log.of_kind("a").count(), 2);
        assert_eq!(log.notices()[1].severity, Severity::Warning);

        assert_eq!(log.drain().len(), 3);
        assert!(log.notices().is_empty());
    }

    #[test]
    fn mutable_reference_is_a_sink() {
        fn warn_through<D: DiagnosticSink>(mut sink: D) {
            sink.warning("overflow", "trimmed");
        }

        let mut log = NoticeLog::new();
        warn_through(&mut log);
        assert_eq!(log.notices().len(), 1);
    }
}
