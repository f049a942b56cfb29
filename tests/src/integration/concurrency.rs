//! # Concurrency Flows
//!
//! Application threads register and unregister while network threads
//! dispatch. Nothing may be lost, and no lock may be held across a handler.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    use parking_lot::Mutex;
    use pyrpc_bridge::{EventKey, PacketReceiver, Payload, PyRpcApi, SessionHandler};

    use crate::fixtures::{client_packet, enabled_bridge, TestSession};

    const REGISTRARS: usize = 4;
    const PER_REGISTRAR: usize = 250;

    #[test]
    fn test_registration_during_dispatch_loses_nothing() {
        let (bridge, _) = enabled_bridge().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let packet = client_packet("ns", "sys", "ev", &Payload::new()).unwrap();
        let player = TestSession::new(1, true).handle();

        thread::scope(|scope| {
            for _ in 0..REGISTRARS {
                let bridge = Arc::clone(&bridge);
                let calls = Arc::clone(&calls);
                scope.spawn(move || {
                    for _ in 0..PER_REGISTRAR {
                        let calls = Arc::clone(&calls);
                        bridge.listen_for_event(
                            "ns",
                            "sys",
                            "ev",
                            SessionHandler::new(move |_, _| {
                                calls.fetch_add(1, Ordering::Relaxed);
                                Ok(())
                            }),
                        );
                    }
                });
            }

            let bridge = Arc::clone(&bridge);
            let observed = Arc::clone(&observed);
            let (player, packet) = (&player, &packet);
            scope.spawn(move || {
                for _ in 0..200 {
                    let outcome = bridge.on_packet_receive(player, packet);
                    if let Some(report) = outcome.report() {
                        observed.lock().push(report.invoked());
                    }
                }
            });
        });

        let key = EventKey::new("ns", "sys", "ev");
        assert_eq!(bridge.registry().handler_count(&key), REGISTRARS * PER_REGISTRAR);

        let observed = observed.lock();
        assert_eq!(observed.len(), 200);
        // Only registrations happen, so each snapshot is at least as large as the last.
        assert!(observed.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(calls.load(Ordering::Relaxed), observed.iter().sum::<usize>());

        // After the writers finish, one dispatch reaches every handler.
        let report = bridge.on_packet_receive(&player, &packet);
        assert_eq!(report.report().unwrap().invoked(), REGISTRARS * PER_REGISTRAR);
    }

    #[test]
    fn test_handler_may_register_during_its_own_dispatch() {
        let (bridge, _) = enabled_bridge().unwrap();
        let weak = Arc::downgrade(&bridge);
        bridge.listen_for_event(
            "ns",
            "sys",
            "ev",
            SessionHandler::new(move |_, _| {
                if let Some(bridge) = weak.upgrade() {
                    bridge.listen_for_event("ns", "sys", "ev", SessionHandler::new(|_, _| Ok(())));
                }
                Ok(())
            }),
        );

        let player = TestSession::new(1, true).handle();
        let packet = client_packet("ns", "sys", "ev", &Payload::new()).unwrap();

        // The snapshot taken for this dispatch holds only the first handler.
        let first = bridge.on_packet_receive(&player, &packet);
        assert_eq!(first.report().unwrap().invoked(), 1);

        let second = bridge.on_packet_receive(&player, &packet);
        assert_eq!(second.report().unwrap().invoked(), 2);
    }

    #[test]
    fn test_unregister_during_dispatch_does_not_affect_snapshot() {
        let (bridge, _) = enabled_bridge().unwrap();
        let log = Arc::new(Mutex::new(Vec::new()));
        let victim_log = Arc::clone(&log);
        let victim = SessionHandler::new(move |_, _| {
            victim_log.lock().push("victim");
            Ok(())
        });

        let weak = Arc::downgrade(&bridge);
        let target = victim.clone();
        bridge.listen_for_event(
            "ns",
            "sys",
            "ev",
            SessionHandler::new(move |_, _| {
                if let Some(bridge) = weak.upgrade() {
                    bridge.unlisten_for_event("ns", "sys", "ev", &target);
                }
                Ok(())
            }),
        );
        bridge.listen_for_event("ns", "sys", "ev", victim);

        let player = TestSession::new(1, true).handle();
        let packet = client_packet("ns", "sys", "ev", &Payload::new()).unwrap();

        bridge.on_packet_receive(&player, &packet);
        bridge.on_packet_receive(&player, &packet);

        // Ran in the first dispatch (already snapshotted), gone in the second.
        assert_eq!(*log.lock(), vec!["victim"]);
    }

    #[test]
    fn test_concurrent_dispatchers_each_run_every_handler() {
        let (bridge, _) = enabled_bridge().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            bridge.listen_for_event(
                "ns",
                "sys",
                "ev",
                SessionHandler::new(move |_, _| {
                    calls.fetch_add(1, Ordering::Relaxed);
                    Ok(())
                }),
            );
        }
        let packet = client_packet("ns", "sys", "ev", &Payload::new()).unwrap();

        thread::scope(|scope| {
            for id in 0..4 {
                let bridge = Arc::clone(&bridge);
                let packet = &packet;
                scope.spawn(move || {
                    let player = TestSession::new(id, true).handle();
                    for _ in 0..50 {
                        bridge.on_packet_receive(&player, packet);
                    }
                });
            }
        });

        assert_eq!(calls.load(Ordering::Relaxed), 4 * 50 * 3);
        assert_eq!(bridge.metrics().events_dispatched, 200);
    }
}
