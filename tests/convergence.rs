//! Property tests for apply/transform convergence

use proptest::prelude::*;
use synckit_ot::{apply, buffer_len, conflict, transform, Operation, OtError, StateId};

// =============================================================================
// Strategies
// =============================================================================

/// Operation valid on a BMP-only buffer of `len` code units
fn arbitrary_op(len: usize, state: StateId) -> impl Strategy<Value = Operation> {
    let insert_state = state.clone();
    prop_oneof![
        (0..=len, "[A-Zé]{0,3}").prop_map(move |(pos, text)| {
            Operation::insert(pos as i64, text, insert_state.clone())
        }),
        (0..=len)
            .prop_flat_map(move |pos| (Just(pos), 0..=len - pos))
            .prop_map(move |(pos, num)| Operation::delete(pos as i64, num, state.clone())),
    ]
}

/// Base text plus a client and a server operation, both valid on it
fn concurrent_pair() -> impl Strategy<Value = (String, Operation, Operation)> {
    "[a-zñ ]{0,12}".prop_flat_map(|base| {
        let len = buffer_len(&base);
        let state = StateId::of(&base);
        (
            Just(base),
            arbitrary_op(len, state.clone()),
            arbitrary_op(len, state),
        )
    })
}

fn both_orders(
    base: &str,
    client: &Operation,
    server: &Operation,
) -> Result<(String, String), OtError> {
    let (client2, server2) = transform(client, server);
    let on_client = apply(&apply(base, client)?, &server2)?;
    let on_server = apply(&apply(base, server)?, &client2)?;
    Ok((on_client, on_server))
}

// =============================================================================
// Convergence
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Both application orders agree whenever the pair is not conflicting
    #[test]
    fn transformed_pair_converges((base, client, server) in concurrent_pair()) {
        if conflict(&client, &server).is_some() {
            return Ok(());
        }

        let (on_client, on_server) = both_orders(&base, &client, &server)
            .expect("non-conflicting pair must stay in bounds");
        prop_assert_eq!(on_client, on_server);
    }

    /// Pairs of inserts never conflict
    #[test]
    fn inserts_never_conflict(
        base in "[a-z]{0,10}",
        client_pct in 0.0..=1.0f64,
        server_pct in 0.0..=1.0f64,
        client_text in "[A-Z]{0,3}",
        server_text in "[a-z]{0,3}",
    ) {
        let len = buffer_len(&base) as f64;
        let state = StateId::of(&base);
        let client = Operation::insert((client_pct * len) as i64, client_text, state.clone());
        let server = Operation::insert((server_pct * len) as i64, server_text, state);

        prop_assert!(conflict(&client, &server).is_none());
        let (on_client, on_server) = both_orders(&base, &client, &server).unwrap();
        prop_assert_eq!(on_client, on_server);
    }

    /// Transform borrows its inputs and keeps identities and states
    #[test]
    fn transform_is_pure((_base, client, server) in concurrent_pair()) {
        let (client_before, server_before) = (client.clone(), server.clone());
        let (client2, server2) = transform(&client, &server);

        prop_assert_eq!(&client, &client_before);
        prop_assert_eq!(&server, &server_before);
        prop_assert_eq!(client2.identity(), client.identity());
        prop_assert_eq!(server2.identity(), server.identity());
        prop_assert_eq!(client2.state(), client.state());
        prop_assert_eq!(server2.state(), server.state());

        // Exactly one side moves, or neither when the other is a no-op
        let moved = (client2.position() != client.position()) as u8
            + (server2.position() != server.position()) as u8;
        prop_assert!(moved <= 1);

        // Same inputs, same outputs
        prop_assert_eq!(transform(&client, &server), (client2, server2));
    }

    /// Apply either succeeds with the expected length or reports the bounds
    #[test]
    fn apply_length_or_out_of_bounds(
        base in "[a-zé]{0,10}",
        position in -3i64..14,
        num in 0usize..6,
        text in "[A-Z]{0,4}",
    ) {
        let len = buffer_len(&base);
        let state = StateId::of(&base);

        let insert = Operation::insert(position, text.clone(), state.clone());
        match apply(&base, &insert) {
            Ok(out) => {
                prop_assert!(position >= 0 && position as usize <= len);
                prop_assert_eq!(buffer_len(&out), len + buffer_len(&text));
            }
            Err(err) => {
                prop_assert!(position < 0 || position as usize > len);
                prop_assert_eq!(err, OtError::OutOfBounds { position, num: 0, length: len });
            }
        }

        let delete = Operation::delete(position, num, state);
        match apply(&base, &delete) {
            Ok(out) => {
                prop_assert!(position >= 0 && position as usize + num <= len);
                prop_assert_eq!(buffer_len(&out), len - num);
            }
            Err(err) => {
                prop_assert!(position < 0 || position as usize + num > len);
                prop_assert_eq!(err, OtError::OutOfBounds { position, num, length: len });
            }
        }
    }

    /// Identities depend on every field and nothing else
    #[test]
    fn identity_is_deterministic(
        position in 0i64..100,
        text in ".{0,8}",
        state in "[a-f0-9]{1,16}",
    ) {
        let a = Operation::insert(position, text.clone(), StateId::new(state.clone()));
        let b = Operation::insert(position, text.clone(), StateId::new(state.clone()));
        prop_assert_eq!(a.identity(), b.identity());

        let moved = Operation::insert(position + 1, text.clone(), StateId::new(state.clone()));
        prop_assert_ne!(a.identity(), moved.identity());

        let other_state = Operation::insert(position, text.clone(), StateId::new(format!("{}x", state)));
        prop_assert_ne!(a.identity(), other_state.identity());

        let other_text = Operation::insert(position, format!("{}!", text), StateId::new(state));
        prop_assert_ne!(a.identity(), other_text.identity());
    }
}

// =============================================================================
// Worked examples
// =============================================================================

#[test]
fn tie_break_gives_server_priority() {
    let base = "xy";
    let state = StateId::of(base);
    let client = Operation::insert(2, "A", state.clone());
    let server = Operation::insert(2, "B", state);

    let (client2, server2) = transform(&client, &server);
    assert_eq!(server2, server);
    assert_eq!(client2.position(), 3);

    let (on_client, on_server) = both_orders(base, &client, &server).unwrap();
    assert_eq!(on_client, "xyBA");
    assert_eq!(on_server, "xyBA");
}

#[test]
fn delete_before_insert_converges() {
    let base = "hello";
    let state = StateId::of(base);
    let client = Operation::insert(5, "!", state.clone());
    let server = Operation::delete(0, 1, state);

    let (on_client, on_server) = both_orders(base, &client, &server).unwrap();
    assert_eq!(on_client, "ello!");
    assert_eq!(on_server, "ello!");
}

#[test]
fn overlapping_deletes_are_flagged() {
    let base = "hello";
    let state = StateId::of(base);
    let client = Operation::delete(0, 3, state.clone());
    let server = Operation::delete(1, 1, state);

    assert!(conflict(&client, &server).is_some());
    assert!(matches!(
        both_orders(base, &client, &server),
        Err(OtError::OutOfBounds { .. })
    ));
}

#[test]
fn wire_round_trip_preserves_transform_result() {
    let state = StateId::of("hello");
    let client = Operation::insert(3, "abc", state.clone());
    let server = Operation::delete(0, 2, state);

    let decoded_client = Operation::from_json(&client.to_json().unwrap()).unwrap();
    let decoded_server = Operation::from_json(&server.to_json().unwrap()).unwrap();

    assert_eq!(
        transform(&decoded_client, &decoded_server),
        transform(&client, &server)
    );
}
