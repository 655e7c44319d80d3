pub mod fixtures {
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TestEvent(pub usize);

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct TestFailure(pub &'static str);
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use pbill_event_bus::*;
    use std::time::Duration;
    use tokio_stream::StreamExt;

    fn broadcaster(mode: FailureMode) -> Broadcaster<TestEvent, TestFailure> {
        Broadcaster::new(DEFAULT_CAPACITY, mode).unwrap()
    }

    #[tokio::test]
    async fn test_event_flow() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut rx = bus.subscribe();

        assert_eq!(bus.publish(TestEvent(42)), 1);

        assert_eq!(rx.recv().await, Some(Ok(TestEvent(42))));
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_each_item_once() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut subscribers: Vec<_> = (0..5).map(|_| bus.subscribe()).collect();
        assert_eq!(bus.subscriber_count(), 5);

        assert_eq!(bus.publish(TestEvent(100)), 5);
        bus.fail(TestFailure("done"));

        for rx in &mut subscribers {
            let received: Vec<_> = rx.collect().await;
            assert_eq!(received, vec![Ok(TestEvent(100)), Err(TestFailure("done"))]);
        }
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_replay() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut early = bus.subscribe();
        bus.publish(TestEvent(1));

        let mut late = bus.subscribe();
        bus.publish(TestEvent(2));

        assert_eq!(early.recv().await, Some(Ok(TestEvent(1))));
        assert_eq!(early.recv().await, Some(Ok(TestEvent(2))));
        assert_eq!(late.recv().await, Some(Ok(TestEvent(2))));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let bus = broadcaster(FailureMode::Terminal);
        assert_eq!(bus.publish(TestEvent(1)), 0);

        let mut rx = bus.subscribe();
        bus.publish(TestEvent(2));
        assert_eq!(rx.recv().await, Some(Ok(TestEvent(2))));
    }

    #[tokio::test]
    async fn test_terminal_failure_exhausts_the_broadcast() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut current = bus.subscribe();

        assert_eq!(bus.fail(TestFailure("boom")), 1);
        assert!(bus.is_terminated());

        assert_eq!(current.recv().await, Some(Err(TestFailure("boom"))));
        assert_eq!(current.recv().await, None);
        assert!(current.is_finished());

        // Items after the failure go nowhere.
        assert_eq!(bus.publish(TestEvent(3)), 0);
        assert_eq!(bus.fail(TestFailure("again")), 0);

        // Later subscribers see the same failure once, then nothing.
        let late: Vec<_> = bus.subscribe().collect().await;
        assert_eq!(late, vec![Err(TestFailure("boom"))]);
    }

    #[tokio::test]
    async fn test_restart_mode_opens_a_fresh_channel() {
        let bus = broadcaster(FailureMode::Restart);
        let mut before = bus.subscribe();

        bus.fail(TestFailure("transient"));
        assert!(!bus.is_terminated());

        let mut after = bus.subscribe();
        bus.publish(TestEvent(9));

        assert_eq!(before.recv().await, Some(Err(TestFailure("transient"))));
        assert_eq!(before.recv().await, None);
        assert_eq!(after.recv().await, Some(Ok(TestEvent(9))));
    }

    #[tokio::test]
    async fn test_clones_share_the_channel() {
        let bus = broadcaster(FailureMode::Terminal);
        let producer = bus.clone();
        let mut rx = bus.subscribe();

        producer.publish(TestEvent(5));
        assert_eq!(rx.recv().await, Some(Ok(TestEvent(5))));
    }

    #[tokio::test]
    async fn test_slow_subscriber_receives_every_item() {
        let capacity = 2;
        let bus = Broadcaster::<TestEvent, TestFailure>::new(capacity, FailureMode::Terminal)
            .unwrap();
        let mut slow = bus.subscribe();

        let total = 100;
        for i in 0..total {
            assert_eq!(bus.publish(TestEvent(i)), 1);
        }

        for i in 0..total {
            assert_eq!(slow.recv().await, Some(Ok(TestEvent(i))), "no item may be skipped");
        }
    }

    #[tokio::test]
    async fn test_dropped_subscriber_is_pruned() {
        let bus = broadcaster(FailureMode::Terminal);
        let kept = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(TestEvent(1)), 1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
        assert_eq!(bus.publish(TestEvent(2)), 0);
    }

    #[tokio::test]
    async fn test_ordering_is_preserved() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut rx = bus.subscribe();

        for i in 0..100 {
            bus.publish(TestEvent(i));
        }

        for i in 0..100 {
            assert_eq!(rx.recv().await, Some(Ok(TestEvent(i))), "Events should arrive in order");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_publishing_from_foreign_threads() {
        let bus = broadcaster(FailureMode::Terminal);
        let mut rx = bus.subscribe();

        let producer = bus.clone();
        std::thread::spawn(move || {
            for i in 0..50 {
                producer.publish(TestEvent(i));
            }
        })
        .join()
        .unwrap();

        let mut received = 0;
        while tokio::time::timeout(Duration::from_millis(100), rx.recv()).await.is_ok() {
            received += 1;
            if received == 50 {
                break;
            }
        }
        assert_eq!(received, 50, "Should receive all events");
    }

    #[tokio::test]
    async fn test_invalid_capacity_rejected() {
        let result = Broadcaster::<TestEvent, TestFailure>::new(0, FailureMode::Terminal)
            .context("purchase updates");
        assert!(matches!(
            result,
            Err(EventBusError::InvalidCapacity { context: Some(ref c), .. }) if c == "purchase updates"
        ));
    }

    #[tokio::test]
    async fn test_state_cell_yields_current_then_changes() {
        #[derive(Clone, Debug, PartialEq, Eq)]
        enum Phase {
            Idle,
            Busy,
        }

        let cell = StateCell::new(Phase::Idle);
        let mut states = cell.subscribe();
        assert_eq!(states.next().await, Some(Phase::Idle));

        assert_eq!(cell.set(Phase::Busy), Phase::Idle);
        assert_eq!(states.next().await, Some(Phase::Busy));
        assert_eq!(cell.get(), Phase::Busy);

        // Same value: no notification.
        assert_eq!(cell.set(Phase::Busy), Phase::Busy);
        assert!(
            tokio::time::timeout(Duration::from_millis(20), states.next()).await.is_err(),
            "unchanged value should not wake observers"
        );
    }
}
