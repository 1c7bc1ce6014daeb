//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 合约快照测试
//! - 配置 -> dispatcher -> worker 的 e2e 测试
//! - ack 场景的日志量与指标断言

#[cfg(test)]
mod contract_tests {
    use contracts::{EventKind, Message, MessageType, QosLevel, QosValue};

    #[test]
    fn test_wrp_json_field_names() {
        let message = Message {
            partner_ids: vec!["foo".to_string()],
            quality_of_service: QosValue::MEDIUM,
            destination: "event:device-status".to_string(),
            ..Message::new(MessageType::SimpleEvent)
        };
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["msg_type"], 4);
        assert_eq!(json["qos"], 25);
        assert_eq!(json["dest"], "event:device-status");
    }

    #[test]
    fn test_canonical_level_values() {
        for (value, level) in [
            (QosValue::LOW, QosLevel::Low),
            (QosValue::MEDIUM, QosLevel::Medium),
            (QosValue::HIGH, QosLevel::High),
            (QosValue::CRITICAL, QosLevel::Critical),
        ] {
            assert_eq!(value.level(), level);
        }
        assert_eq!(
            serde_json::to_string(&EventKind::TransactionComplete).unwrap(),
            "\"transaction_complete\""
        );
    }
}

#[cfg(test)]
mod scenario_tests {
    use std::sync::Arc;

    use ack_dispatcher::log_capture::capture_logs;
    use ack_dispatcher::mock::{MockConnection, RecordingMeasures};
    use ack_dispatcher::{AckDispatcher, AckOutcome};
    use contracts::{Connection, DeviceEvent, EventKind, Message, MessageType, QosValue};

    fn simple_event(qos: QosValue, partner_ids: &[&str]) -> Message {
        Message {
            partner_ids: partner_ids.iter().map(|p| p.to_string()).collect(),
            quality_of_service: qos,
            ..Message::new(MessageType::SimpleEvent)
        }
    }

    struct Scenario {
        recorders: RecordingMeasures,
        dispatcher: AckDispatcher,
        connection: Arc<MockConnection>,
    }

    impl Scenario {
        fn new(connection: MockConnection) -> Self {
            let recorders = RecordingMeasures::new();
            let dispatcher = AckDispatcher::new(recorders.measures());
            Self {
                recorders,
                dispatcher,
                connection: Arc::new(connection),
            }
        }

        fn event(&self, kind: EventKind, message: Message) -> DeviceEvent {
            DeviceEvent::new(Connection::Live(self.connection.clone()), message, kind)
        }

        fn run(&self, event: Option<&DeviceEvent>) -> (AckOutcome, Vec<String>) {
            capture_logs(|| self.dispatcher.handle_event(event))
        }
    }

    #[test]
    fn test_ack_success_is_silent() {
        let scenario = Scenario::new(MockConnection::succeeding("mac:112233445566"));
        let event = scenario.event(
            EventKind::MessageReceived,
            simple_event(QosValue::MEDIUM, &["foo"]),
        );

        let (outcome, logs) = scenario.run(Some(&event));

        assert_eq!(outcome, AckOutcome::Acknowledged);
        assert!(logs.is_empty(), "{logs:?}");
        assert_eq!(scenario.recorders.ack_success.total(), 1);
        assert_eq!(scenario.recorders.ack_success_latency.observations().len(), 1);
        assert!(scenario.recorders.ack_failure.is_untouched());
        assert!(scenario.recorders.ack_failure_latency.is_untouched());
        assert_eq!(scenario.connection.send_count(), 1);
    }

    #[test]
    fn test_ack_failure_logs_once() {
        let scenario = Scenario::new(MockConnection::failing("mac:112233445566"));
        let event = scenario.event(
            EventKind::MessageReceived,
            simple_event(QosValue::MEDIUM, &["foo"]),
        );

        let (outcome, logs) = scenario.run(Some(&event));

        assert_eq!(outcome, AckOutcome::SendFailed);
        assert_eq!(logs.len(), 1, "{logs:?}");
        assert!(logs[0].contains("mac:112233445566"));
        assert_eq!(scenario.recorders.ack_failure.total(), 1);
        assert_eq!(scenario.recorders.ack_failure_latency.observations().len(), 1);
        assert!(scenario.recorders.ack_success.is_untouched());
        assert!(scenario.recorders.ack_success_latency.is_untouched());
    }

    #[test]
    fn test_low_qos_and_transaction_complete_are_silent() {
        let scenario = Scenario::new(MockConnection::succeeding("mac:112233445566"));
        let low = scenario.event(
            EventKind::MessageReceived,
            simple_event(QosValue::LOW, &["foo"]),
        );
        let complete = scenario.event(
            EventKind::TransactionComplete,
            simple_event(QosValue::CRITICAL, &["foo"]),
        );

        for event in [&low, &complete] {
            let (outcome, logs) = scenario.run(Some(event));
            assert!(matches!(outcome, AckOutcome::Ignored(_)));
            assert!(logs.is_empty(), "{logs:?}");
        }
        assert_eq!(scenario.connection.send_count(), 0);
        assert!(scenario.recorders.is_untouched());
    }

    #[test]
    fn test_missing_partner_ids_logs_once() {
        let scenario = Scenario::new(MockConnection::succeeding("mac:112233445566"));
        let event = scenario.event(
            EventKind::MessageReceived,
            simple_event(QosValue::HIGH, &[]),
        );

        let (outcome, logs) = scenario.run(Some(&event));

        assert!(matches!(outcome, AckOutcome::Rejected(_)));
        assert_eq!(logs.len(), 1, "{logs:?}");
        assert_eq!(scenario.connection.send_count(), 0);
        assert!(scenario.recorders.is_untouched());
    }

    #[test]
    fn test_nil_event_logs_once() {
        let scenario = Scenario::new(MockConnection::succeeding("mac:112233445566"));

        let (outcome, logs) = scenario.run(None);

        assert!(matches!(outcome, AckOutcome::Rejected(_)));
        assert_eq!(logs.len(), 1, "{logs:?}");
        assert!(logs[0].contains("nil event received"));
        assert!(scenario.recorders.is_untouched());
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ack_dispatcher::mock::{MockConnection, RecordingMeasures, SendBehavior};
    use ack_dispatcher::{AckDispatcher, AckWorkerHandle, OutboundMeasures};
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{Connection, DeviceEvent, EventKind, Message, MessageType, QosValue};
    use metrics_exporter_prometheus::PrometheusBuilder;

    const GATEWAY_TOML: &str = r#"
[observability]
metrics_port = 0

[ack]
queue_capacity = 8

[simulation]
fail_every = 4
send_delay_ms = 1
"#;

    fn ackable(connection: &Arc<MockConnection>, partner: &str) -> DeviceEvent {
        let message = Message {
            partner_ids: vec![partner.to_string()],
            quality_of_service: QosValue::CRITICAL,
            source: "mac:112233445566/config".to_string(),
            destination: "event:config-changed".to_string(),
            ..Message::new(MessageType::SimpleEvent)
        };
        DeviceEvent::new(
            Connection::Live(connection.clone()),
            message,
            EventKind::MessageReceived,
        )
    }

    /// End-to-end: config -> AckWorkerHandle -> AckDispatcher -> device
    #[tokio::test]
    async fn test_e2e_config_to_worker() {
        let blueprint = ConfigLoader::load_from_str(GATEWAY_TOML, ConfigFormat::Toml).unwrap();
        assert_eq!(observability::exporter_port(&blueprint.observability), None);

        let connection = Arc::new(
            MockConnection::new(
                "mac:112233445566",
                SendBehavior::FailEvery(blueprint.simulation.fail_every),
            )
            .with_delay(Duration::from_millis(blueprint.simulation.send_delay_ms)),
        );
        let recorders = RecordingMeasures::new();
        let dispatcher = Arc::new(AckDispatcher::new(recorders.measures()));
        let handle = AckWorkerHandle::spawn(dispatcher, blueprint.ack.queue_capacity).unwrap();

        for _ in 0..12 {
            handle.submit(ackable(&connection, "comcast")).await.unwrap();
        }
        handle
            .submit(DeviceEvent::empty(EventKind::Disconnect))
            .await
            .unwrap();

        let metrics = Arc::clone(handle.metrics());
        handle.shutdown().await;
        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.handled_count, 13);
        assert_eq!(snapshot.acked_count, 9);
        assert_eq!(snapshot.send_failure_count, 3);
        assert_eq!(snapshot.rejected_count, 1);
        assert_eq!(snapshot.dropped_count, 0);
        assert_eq!(recorders.ack_success.total(), 9);
        assert_eq!(recorders.ack_failure.total(), 3);

        // Every ack goes back to the device that sent the event
        for request in connection.requests() {
            assert_eq!(request.message.destination, "mac:112233445566/config");
            assert_eq!(request.message.source, "event:config-changed");
        }
    }

    /// Registry-backed measures render labelled Prometheus series
    #[test]
    fn test_e2e_prometheus_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let ok = Arc::new(MockConnection::succeeding("mac:112233445566"));
        let failing = Arc::new(MockConnection::failing("mac:aabbccddeeff"));

        metrics::with_local_recorder(&recorder, || {
            observability::describe_outbound_metrics();
            let dispatcher = AckDispatcher::new(OutboundMeasures::from_registry());
            dispatcher.handle_event(&ackable(&ok, "comcast"));
            dispatcher.handle_event(&ackable(&ok, "comcast"));
            dispatcher.handle_event(&ackable(&failing, "sky"));
        });

        let rendered = handle.render();
        let success = rendered
            .lines()
            .find(|line| line.starts_with("ack_success{"))
            .unwrap_or_default();
        assert!(success.contains(r#"qos_level="critical""#), "{rendered}");
        assert!(success.contains(r#"partner_id="comcast""#), "{rendered}");
        assert!(success.contains(r#"message_type="SimpleEvent""#), "{rendered}");
        assert!(success.ends_with(" 2"), "{rendered}");
        assert!(
            rendered.contains(r#"partner_id="sky""#),
            "{rendered}"
        );
        assert!(rendered.contains("ack_success_latency_seconds"), "{rendered}");
        assert!(rendered.contains("ack_failure_latency_seconds"), "{rendered}");
        assert!(rendered.contains("# HELP ack_success"), "{rendered}");
    }
}
