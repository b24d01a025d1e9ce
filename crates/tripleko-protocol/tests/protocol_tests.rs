//! Protocol layer tests: board ids, endpoint paths, event framing, replies.

#[cfg(test)]
mod tests {
    use tripleko_protocol::*;

    // ─────────────────────────────────────────────────────────────────────
    // Board ids
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn sanitize_examples() {
        assert_eq!(sanitize("go-game_42!"), "gogame42");
        assert_eq!(sanitize("abc123"), "abc123");
        assert_eq!(sanitize("/b/x/../y"), "bxy");
    }

    #[test]
    fn sanitized_ids_always_parse() {
        for input in ["go-game_42!", "My Board!", "A", "9z9"] {
            let cleaned = sanitize(input);
            let id = BoardId::parse(&cleaned).unwrap();
            assert_eq!(id.as_str(), cleaned);
        }
    }

    #[test]
    fn random_id_shape() {
        let id = BoardId::random();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f')));
        assert_eq!(BoardId::parse(id.as_str()).unwrap(), id);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Endpoints
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn endpoint_paths_share_board_prefix() {
        let id = BoardId::parse("room7").unwrap();
        for ep in [Endpoint::Events, Endpoint::Sgf, Endpoint::Sgfix] {
            assert!(ep.path(&id).starts_with("/b/room7"));
        }
        assert_eq!(Endpoint::Sgfix.name(), "sgfix");
    }

    // ─────────────────────────────────────────────────────────────────────
    // Framed events
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn request_sgf_wire_fixture() {
        // Bytes recorded from the reference client for
        // request_sgf("http://x/y.sgf").
        let mut expected = vec![51u8, 0, 0, 0];
        expected.extend_from_slice(br#"{"event": "request_sgf", "value": "http://x/y.sgf"}"#);

        let bytes = FramedEvent::request_sgf("http://x/y.sgf").to_bytes().unwrap();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn payload_is_valid_json_with_event_first() {
        let payload = FramedEvent::new(Events::REQUEST_SGF, "https://ogs/123").payload().unwrap();
        let text = String::from_utf8(payload.clone()).unwrap();
        assert!(text.find("\"event\"").unwrap() < text.find("\"value\"").unwrap());

        let parsed: serde_json::Value = serde_json::from_slice(&payload).unwrap();
        assert_eq!(parsed["event"], "request_sgf");
        assert_eq!(parsed["value"], "https://ogs/123");
    }

    #[test]
    fn non_ascii_values_travel_as_escapes() {
        let evt = FramedEvent::request_sgf("http://x/\u{68cb}.sgf");
        let (header, payload) = evt.encode().unwrap();
        assert!(payload.is_ascii());
        assert_eq!(payload.len(), 56);
        assert_eq!(u32::from_le_bytes(header) as usize, payload.len());
        assert_eq!(FramedEvent::decode(&header, &payload).unwrap(), evt);
    }

    #[test]
    fn decode_rejects_non_json_payload() {
        let payload = b"not json";
        let header = (payload.len() as u32).to_le_bytes();
        assert!(matches!(
            FramedEvent::decode(&header, payload),
            Err(ProtocolError::Json(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Replies
    // ─────────────────────────────────────────────────────────────────────

    #[test]
    fn reply_decodes_sgf_document() {
        let sgf = b"(;GM[1]FF[4]SZ[19];B[pd];W[dp])";
        let encoded = {
            use base64::Engine;
            base64::engine::general_purpose::STANDARD.encode(sgf)
        };
        assert_eq!(decode_reply(encoded.as_bytes()).unwrap(), sgf);
    }
}
