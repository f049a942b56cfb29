//! # Send Path Flows
//!
//! Outbound events read back by a decoding client.

#[cfg(test)]
mod tests {
    use pyrpc_bridge::{
        BroadcastScope, DimensionId, NativeValue, Payload, Position, PyRpcApi, Recipients,
        SendOutcome, WorldId, LOCAL_PLAYER_ENTITY_ID,
    };
    use pyrpc_codec::Direction;

    use crate::fixtures::{enabled_bridge, TestSession};

    const OVERWORLD: DimensionId = DimensionId::new(WorldId(0), 0);

    fn spawn_particles(entity_id: i64) -> Payload {
        let mut payload = Payload::new();
        payload.insert("entityId".into(), NativeValue::from(entity_id));
        payload.insert("particle".into(), NativeValue::from("minecraft:heart"));
        payload
    }

    #[test]
    fn test_three_targets_one_ineligible() {
        let (bridge, _) = enabled_bridge().unwrap();
        let a = TestSession::new(1, true);
        let b = TestSession::new(2, false);
        let c = TestSession::new(3, true);
        let targets = [a.handle(), b.handle(), c.handle()];

        let delivered =
            bridge.notify_to_multi_clients(&targets, "Minecraft", "fx", "Spawn", &spawn_particles(9));

        assert_eq!(delivered, 2);
        assert_eq!(bridge.metrics().envelopes_encoded, 1);
        assert!(b.received().is_empty());
        assert_eq!(a.received()[0].data, c.received()[0].data);
    }

    #[test]
    fn test_client_decodes_server_event() {
        let (bridge, _) = enabled_bridge().unwrap();
        let player = TestSession::new(1, true);

        let sent = bridge.send(
            Recipients::One(&player.handle()),
            "Minecraft",
            "fx",
            "Spawn",
            &spawn_particles(LOCAL_PLAYER_ENTITY_ID),
        );
        assert_eq!(sent, SendOutcome::Single(true));

        let envelopes = player.received_envelopes();
        assert_eq!(envelopes.len(), 1);
        assert_eq!(envelopes[0].direction, Direction::ServerToClient);
        assert_eq!(envelopes[0].event_key().as_str(), "Minecraft:fx:Spawn");
        assert_eq!(envelopes[0].payload["entityId"], NativeValue::Int(-2));
    }

    #[test]
    fn test_sentinel_accepted_in_multi_target_send() {
        let (bridge, _) = enabled_bridge().unwrap();
        let players: Vec<_> = (0..3).map(|id| TestSession::new(id, true)).collect();
        let targets: Vec<_> = players.iter().map(|p| p.handle()).collect();

        let delivered = bridge.notify_to_multi_clients(
            &targets,
            "Minecraft",
            "fx",
            "Spawn",
            &spawn_particles(LOCAL_PLAYER_ENTITY_ID),
        );

        assert_eq!(delivered, 3);
        for player in &players {
            let envelopes = player.received_envelopes();
            assert_eq!(envelopes[0].payload["entityId"], NativeValue::Int(LOCAL_PLAYER_ENTITY_ID));
        }
    }

    #[test]
    fn test_binary_values_arrive_as_text() {
        let (bridge, _) = enabled_bridge().unwrap();
        let player = TestSession::new(1, true);
        let mut payload = Payload::new();
        payload.insert("blob".into(), NativeValue::bytes(b"hi".to_vec()));

        assert!(bridge.notify_to_client(&player.handle(), "a", "b", "c", &payload));

        let envelopes = player.received_envelopes();
        assert_eq!(envelopes[0].payload["blob"], NativeValue::from("hi"));
    }

    #[test]
    fn test_nearby_and_broadcast_through_directory() {
        let (bridge, directory) = enabled_bridge().unwrap();
        let origin = Position::new(OVERWORLD, 100.0, 70.0, 100.0);
        let speaker = TestSession::at(1, true, Some(origin));
        let listener = TestSession::at(2, true, Some(Position::new(OVERWORLD, 108.0, 70.0, 106.0)));
        let distant = TestSession::at(3, true, Some(Position::new(OVERWORLD, 500.0, 70.0, 500.0)));
        for s in [&speaker, &listener, &distant] {
            directory.add(s.handle());
        }

        let speaker_ref = speaker.handle();
        let nearby = Recipients::Nearby {
            except: Some(&speaker_ref),
            position: origin,
            distance: 10.0,
        };
        assert_eq!(bridge.send(nearby, "chat", "local", "Say", &Payload::new()).delivered(), 1);
        assert_eq!(listener.received().len(), 1);
        assert!(distant.received().is_empty());

        let everyone = Recipients::Broadcast {
            except: None,
            scope: BroadcastScope::Dimension(OVERWORLD),
        };
        assert_eq!(bridge.send(everyone, "chat", "global", "Say", &Payload::new()).delivered(), 3);
    }
}
