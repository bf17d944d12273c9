use opentelemetry::{
    global,
    trace::{SamplingDecision, SamplingResult, TraceContextExt, TraceState, TracerProvider as _},
    KeyValue,
};
use opentelemetry_otlp::{Protocol, WithExportConfig};
use opentelemetry_sdk::{
    metrics::{MeterProviderBuilder, PeriodicReader, SdkMeterProvider},
    trace::{RandomIdGenerator, SdkTracerProvider, ShouldSample},
    Resource,
};
use tracing::Level;
use tracing_opentelemetry::{MetricsLayer, OpenTelemetryLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::constants::SERVICE_NAME;

const METRIC_EXPORT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(15);

/// Span names that are never exported: liveness probes hit these constantly.
const UNSAMPLED_SPANS: &[&str] = &["health", "test_db"];

#[derive(Debug, Clone)]
struct FilterSampler;

impl ShouldSample for FilterSampler {
    fn should_sample(
        &self,
        parent_context: Option<&opentelemetry::Context>,
        _trace_id: opentelemetry::TraceId,
        name: &str,
        _span_kind: &opentelemetry::trace::SpanKind,
        _attributes: &[KeyValue],
        _links: &[opentelemetry::trace::Link],
    ) -> opentelemetry::trace::SamplingResult {
        SamplingResult {
            decision: sampling_decision(name),
            attributes: vec![],
            trace_state: match parent_context {
                Some(ctx) => ctx.span().span_context().trace_state().clone(),
                None => TraceState::default(),
            },
        }
    }
}

fn sampling_decision(name: &str) -> SamplingDecision {
    if UNSAMPLED_SPANS.contains(&name) {
        SamplingDecision::Drop
    } else {
        SamplingDecision::RecordAndSample
    }
}

fn resource() -> Resource {
    Resource::builder().with_service_name(SERVICE_NAME).build()
}

fn init_meter_provider(url: &str) -> anyhow::Result<SdkMeterProvider> {
    let exporter = opentelemetry_otlp::MetricExporter::builder()
        .with_http()
        .with_endpoint(url)
        .with_protocol(Protocol::HttpBinary)
        .with_temporality(opentelemetry_sdk::metrics::Temporality::default())
        .build()?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(METRIC_EXPORT_INTERVAL)
        .build();

    let meter_provider = MeterProviderBuilder::default()
        .with_resource(resource())
        .with_reader(reader)
        .build();

    global::set_meter_provider(meter_provider.clone());

    Ok(meter_provider)
}

fn init_tracer_provider(url: &str) -> anyhow::Result<SdkTracerProvider> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_endpoint(url)
        .with_protocol(Protocol::HttpBinary)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(FilterSampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// Install the global subscriber. OTLP export is only wired when a collector
/// URL is configured; otherwise logs go to stdout only.
pub fn init_tracing_subscriber(otel_http_url: &Option<String>) -> anyhow::Result<OtelGuard> {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            Level::INFO,
        ))
        .with(tracing_subscriber::fmt::layer());

    if let Some(url) = otel_http_url {
        let tracer_provider = init_tracer_provider(url)?;
        let meter_provider = init_meter_provider(url)?;

        let tracer = tracer_provider.tracer(SERVICE_NAME);

        registry
            .with(MetricsLayer::new(meter_provider.clone()))
            .with(OpenTelemetryLayer::new(tracer))
            .init();

        Ok(OtelGuard {
            tracer_provider: Some(tracer_provider),
            meter_provider: Some(meter_provider),
        })
    } else {
        registry.init();

        Ok(OtelGuard {
            tracer_provider: None,
            meter_provider: None,
        })
    }
}

/// Keeps the providers alive and flushes them when the server exits.
pub struct OtelGuard {
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
}

impl Drop for OtelGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {err:?}");
            }
        }
        if let Some(provider) = self.meter_provider.take() {
            if let Err(err) = provider.shutdown() {
                eprintln!("Failed to shut down meter provider: {err:?}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_spans_are_dropped() {
        assert!(matches!(sampling_decision("health"), SamplingDecision::Drop));
        assert!(matches!(sampling_decision("test_db"), SamplingDecision::Drop));
        assert!(matches!(
            sampling_decision("generate"),
            SamplingDecision::RecordAndSample
        ));
    }
}
