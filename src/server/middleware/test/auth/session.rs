use super::*;

/// Tests a token presented from the address it was issued to.
///
/// Expected: TokenAuthenticated carrying the claims' identity
#[test]
fn accepts_valid_token() {
    let token = token_for(REMOTE_IP);
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        api_key: None,
        session_token: Some(&token),
    };

    let decision = decide(AccessPolicy::Session, &registry(), &request, now());

    let AccessDecision::TokenAuthenticated(identity) = decision else {
        panic!("expected token authentication, got {decision:?}");
    };
    assert_eq!(identity.uid, "u7");
    assert_eq!(identity.role(), Some("admin"));
}

#[test]
fn rejects_missing_cookie() {
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        ..Default::default()
    };

    assert_eq!(
        decide(AccessPolicy::Session, &registry(), &request, now()),
        AccessDecision::Rejected(AuthError::Forbidden)
    );
}

/// Tests a token replayed from another address.
///
/// Expected: Rejected(InvalidSignature)
#[test]
fn rejects_token_from_other_ip() {
    let token = token_for(REMOTE_IP);
    let request = AccessRequest {
        client_ip: "10.0.0.8",
        api_key: None,
        session_token: Some(&token),
    };

    assert_eq!(
        decide(AccessPolicy::Session, &registry(), &request, now()),
        AccessDecision::Rejected(AuthError::InvalidSignature)
    );
}

#[test]
fn rejects_garbage_token() {
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        api_key: None,
        session_token: Some("not-a-token"),
    };

    assert_eq!(
        decide(AccessPolicy::Session, &registry(), &request, now()),
        AccessDecision::Rejected(AuthError::Malformed)
    );
}

/// Tests that an API key does not open a session-only route.
///
/// Expected: Rejected(Forbidden)
#[test]
fn ignores_api_key() {
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        api_key: Some("abc123"),
        session_token: None,
    };

    assert_eq!(
        decide(AccessPolicy::Session, &registry(), &request, now()),
        AccessDecision::Rejected(AuthError::Forbidden)
    );
}

/// Tests loopback callers holding a token for someone else.
///
/// Expected: LocalhostBypass, the bypass runs before the cookie
#[test]
fn bypasses_loopback_before_cookie() {
    let token = token_for(REMOTE_IP);
    let request = AccessRequest {
        client_ip: "127.0.0.1",
        api_key: None,
        session_token: Some(&token),
    };

    assert_eq!(
        decide(AccessPolicy::Session, &registry(), &request, now()),
        AccessDecision::LocalhostBypass(CallerIdentity::localhost())
    );
}
