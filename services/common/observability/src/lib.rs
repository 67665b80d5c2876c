use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

/// Per-service HTTP counters held in a private registry.
#[derive(Clone)]
pub struct HttpMetrics {
    service: &'static str,
    pub registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_errors_total: IntCounterVec,
}

impl HttpMetrics {
    pub fn new(service: &'static str) -> prometheus::Result<Self> {
        let registry = Registry::new();
        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Count of HTTP requests handled"),
            &["service", "route", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;
        let http_errors_total = IntCounterVec::new(
            Opts::new(
                "http_errors_total",
                "Count of HTTP error responses emitted (status >= 400)",
            ),
            &["service", "code", "status"],
        )?;
        registry.register(Box::new(http_errors_total.clone()))?;
        Ok(Self { service, registry, http_requests_total, http_errors_total })
    }

    pub fn observe_request(&self, route: &str, status: u16) {
        let status = status.to_string();
        self.http_requests_total
            .with_label_values(&[self.service, route, status.as_str()])
            .inc();
    }

    pub fn observe_error(&self, code: &str, status: u16) {
        let status = status.to_string();
        self.http_errors_total
            .with_label_values(&[self.service, code, status.as_str()])
            .inc();
    }

    /// Prometheus text exposition of everything in this registry.
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_render() {
        let metrics = HttpMetrics::new("test-svc").unwrap();
        metrics.observe_request("/api/refdata/customers", 200);
        metrics.observe_request("/api/refdata/customers", 200);
        metrics.observe_error("customer_not_found", 404);
        let text = metrics.render().unwrap();
        let sample = |name: &str, needle: &str| {
            text.lines()
                .find(|l| l.starts_with(name) && l.contains(needle))
                .map(|l| l.rsplit(' ').next().unwrap_or_default().to_string())
        };
        let requests = sample("http_requests_total{", "route=\"/api/refdata/customers\"");
        assert_eq!(requests.as_deref(), Some("2"), "{text}");
        let errors = sample("http_errors_total{", "code=\"customer_not_found\"");
        assert_eq!(errors.as_deref(), Some("1"), "{text}");
    }

    #[test]
    fn separate_instances_do_not_share_state() {
        let a = HttpMetrics::new("a").unwrap();
        let b = HttpMetrics::new("b").unwrap();
        a.observe_error("internal_error", 500);
        assert!(!b.render().unwrap().contains("internal_error"));
    }
}
