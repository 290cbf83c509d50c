use super::*;

/// Tests a registered key from a remote address.
///
/// Expected: ApiKeyAuthenticated with the registered subject and no user
#[test]
fn accepts_registered_key() {
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        api_key: Some("abc123"),
        session_token: None,
    };

    let decision = decide(AccessPolicy::ApiKey, &registry(), &request, now());

    assert_eq!(
        decision,
        AccessDecision::ApiKeyAuthenticated(CallerIdentity::api_key("u1"))
    );
}

/// Tests loopback callers without any credentials.
///
/// Expected: LocalhostBypass with the superadmin identity
#[test]
fn bypasses_loopback() {
    for ip in ["127.0.0.1", "::1", "::ffff:127.0.0.1"] {
        let request = AccessRequest {
            client_ip: ip,
            ..Default::default()
        };

        let identity = decide(AccessPolicy::ApiKey, &registry(), &request, now())
            .into_result()
            .unwrap();

        assert_eq!(identity.uid, LOCALHOST_UID);
        assert_eq!(identity.role(), Some(LOCALHOST_ROLE));
    }
}

/// Tests a key on a loopback request.
///
/// Expected: the key wins over the bypass
#[test]
fn prefers_key_over_loopback() {
    let request = AccessRequest {
        client_ip: "127.0.0.1",
        api_key: Some("abc123"),
        session_token: None,
    };

    assert!(matches!(
        decide(AccessPolicy::ApiKey, &registry(), &request, now()),
        AccessDecision::ApiKeyAuthenticated(_)
    ));
}

/// Tests missing, empty and unknown keys from a remote address.
///
/// Expected: Rejected(Unauthorized) every time
#[test]
fn rejects_bad_keys() {
    for key in [None, Some(""), Some("nope")] {
        let request = AccessRequest {
            client_ip: REMOTE_IP,
            api_key: key,
            session_token: None,
        };

        assert_eq!(
            decide(AccessPolicy::ApiKey, &registry(), &request, now()),
            AccessDecision::Rejected(AuthError::Unauthorized)
        );
    }
}

/// Tests that a valid session cookie does not open a key-only route.
///
/// Expected: Rejected(Unauthorized)
#[test]
fn ignores_session_cookie() {
    let token = token_for(REMOTE_IP);
    let request = AccessRequest {
        client_ip: REMOTE_IP,
        api_key: None,
        session_token: Some(&token),
    };

    assert_eq!(
        decide(AccessPolicy::ApiKey, &registry(), &request, now()),
        AccessDecision::Rejected(AuthError::Unauthorized)
    );
}
