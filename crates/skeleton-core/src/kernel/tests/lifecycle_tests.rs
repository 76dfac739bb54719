use crate::kernel::error::Error;
use crate::kernel::lifecycle::LifecycleState;

const ORDER: [LifecycleState; 7] = [
    LifecycleState::Created,
    LifecycleState::Configured,
    LifecycleState::Registered,
    LifecycleState::Booted,
    LifecycleState::Started,
    LifecycleState::ShuttingDown,
    LifecycleState::Stopped,
];

#[test]
fn test_forward_chain_is_accepted() {
    let mut state = LifecycleState::Created;
    for next in &ORDER[1..] {
        state = state.advance(*next).unwrap();
    }
    assert_eq!(state, LifecycleState::Stopped);
    assert!(state.is_terminal());
    assert!(state.successor().is_none());
}

#[test]
fn test_skipping_a_state_is_rejected() {
    let err = LifecycleState::Configured
        .advance(LifecycleState::Booted)
        .unwrap_err();
    match err {
        Error::InvalidTransition { from, to } => {
            assert_eq!(from, LifecycleState::Configured);
            assert_eq!(to, LifecycleState::Booted);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_going_back_or_staying_is_rejected() {
    assert!(
        LifecycleState::Started
            .advance(LifecycleState::Booted)
            .is_err()
    );
    assert!(
        LifecycleState::Booted
            .advance(LifecycleState::Booted)
            .is_err()
    );
    assert!(
        LifecycleState::Stopped
            .advance(LifecycleState::Created)
            .is_err()
    );
}

#[test]
fn test_states_are_ordered() {
    for pair in ORDER.windows(2) {
        assert!(pair[0] < pair[1]);
        assert_eq!(pair[0].successor(), Some(pair[1]));
    }
}

#[test]
fn test_display() {
    assert_eq!(LifecycleState::ShuttingDown.to_string(), "shutting-down");
    assert_eq!(LifecycleState::Created.to_string(), "created");
}
