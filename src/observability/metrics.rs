use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub orders_created_total: IntCounter,
    pub transitions_total: IntCounterVec,
    pub active_orders: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let orders_created_total =
            IntCounter::new("orders_created_total", "Total orders created")
                .expect("valid orders_created_total metric");

        let transitions_total = IntCounterVec::new(
            Opts::new(
                "order_transitions_total",
                "Status transitions by target status and outcome",
            ),
            &["target", "outcome"],
        )
        .expect("valid order_transitions_total metric");

        let active_orders = IntGauge::new(
            "active_orders",
            "Orders currently in a non-terminal status",
        )
        .expect("valid active_orders metric");

        registry
            .register(Box::new(orders_created_total.clone()))
            .expect("register orders_created_total");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register order_transitions_total");
        registry
            .register(Box::new(active_orders.clone()))
            .expect("register active_orders");

        Self {
            registry,
            orders_created_total,
            transitions_total,
            active_orders,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
