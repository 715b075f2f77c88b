//! Tests for the credential resolver

use super::*;
use crate::credential::{FileCredentialStore, MemoryCredentialStore, NoPrompt, StaticPrompt};
use tempfile::tempdir;

const REALM: &str = "https://www.example.com/api/";
const TOKEN: &str = "WTJ3G8XWO9G8V1BB4K8N81KNGRPFJOVL";
const SECRET_ONLY: &[CredentialField] = &[CredentialField::Secret];

fn resolver_with(
    store: Arc<MemoryCredentialStore>,
    prompt: Arc<StaticPrompt>,
) -> CredentialResolver {
    CredentialResolver::new(store, prompt)
}

#[test]
fn test_prompts_when_store_is_empty() {
    let store = Arc::new(MemoryCredentialStore::new());
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let resolver = resolver_with(store.clone(), prompt.clone());

    let obtained = resolver.obtain(None, "https://x/api/", SECRET_ONLY).unwrap();
    assert!(obtained.prompted);
    assert_eq!(obtained.secret(), TOKEN);
    assert_eq!(obtained.name, None);
    assert_eq!(obtained.credential.realm.as_deref(), Some("https://x/api/"));
    assert_eq!(obtained.credential.kind.as_deref(), Some("token"));
    assert_eq!(prompt.calls(), 1);
    assert!(store.is_empty(), "obtain must not write");

    resolver.update(&obtained);
    let stored = store.get("redcap-https://x/api/").unwrap().unwrap();
    assert_eq!(stored.secret.as_deref(), Some(TOKEN));
    assert!(stored.last_used.is_some());
}

#[test]
fn test_repeated_use_keeps_one_record() {
    let store = Arc::new(MemoryCredentialStore::new());
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let resolver = resolver_with(store.clone(), prompt.clone());

    let first = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    resolver.update(&first);
    let first_stamp = store
        .get(&default_credential_name(Some(REALM)))
        .unwrap()
        .unwrap()
        .last_used;

    let second = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    assert!(!second.prompted);
    assert_eq!(second.name, Some(default_credential_name(Some(REALM))));
    resolver.update(&second);

    assert_eq!(prompt.calls(), 1);
    assert_eq!(store.len(), 1);
    let stored = store
        .get(&default_credential_name(Some(REALM)))
        .unwrap()
        .unwrap();
    assert_eq!(stored.secret.as_deref(), Some(TOKEN));
    assert!(stored.last_used >= first_stamp);
}

#[test]
fn test_named_credential_used_without_prompt() {
    let store = Arc::new(
        MemoryCredentialStore::new().with_credential("mycred", Credential::token(TOKEN, REALM)),
    );
    let prompt = Arc::new(StaticPrompt::new("unused"));
    let resolver = resolver_with(store, prompt.clone());

    let obtained = resolver
        .obtain(
            Some("mycred"),
            REALM,
            &[CredentialField::Secret, CredentialField::Realm],
        )
        .unwrap();
    assert!(!obtained.prompted);
    assert_eq!(obtained.name.as_deref(), Some("mycred"));
    assert_eq!(obtained.secret(), TOKEN);
    assert_eq!(prompt.calls(), 0);
}

#[test]
fn test_named_lookup_ignores_realm_matches() {
    let store = Arc::new(
        MemoryCredentialStore::new().with_credential("other", Credential::token(TOKEN, REALM)),
    );
    let prompt = Arc::new(StaticPrompt::new("typed-in"));
    let resolver = resolver_with(store.clone(), prompt.clone());

    let obtained = resolver.obtain(Some("mycred"), REALM, SECRET_ONLY).unwrap();
    assert!(obtained.prompted);
    assert_eq!(obtained.secret(), "typed-in");
    assert_eq!(prompt.requests()[0].name.as_deref(), Some("mycred"));

    resolver.update(&obtained);
    assert_eq!(store.names(), vec!["mycred", "other"]);
}

#[test]
fn test_most_recent_realm_match_wins() {
    let now = Utc::now();
    let mut old = Credential::token("old-token", REALM);
    old.last_used = Some(now - chrono::Duration::days(3));
    let mut recent = Credential::token("recent-token", REALM);
    recent.last_used = Some(now);

    let store = Arc::new(
        MemoryCredentialStore::new()
            .with_credential("a-old", old)
            .with_credential("b-recent", recent),
    );
    let resolver = resolver_with(store, Arc::new(StaticPrompt::new("unused")));

    let obtained = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    assert_eq!(obtained.name.as_deref(), Some("b-recent"));
    assert_eq!(obtained.secret(), "recent-token");
}

#[test]
fn test_incomplete_stored_credential_fills_realm_without_prompt() {
    let partial = Credential {
        secret: Some(TOKEN.to_string()),
        ..Default::default()
    };
    let store = Arc::new(MemoryCredentialStore::new().with_credential("partial", partial));
    let prompt = Arc::new(StaticPrompt::new("unused"));
    let resolver = resolver_with(store, prompt.clone());

    let obtained = resolver
        .obtain(
            Some("partial"),
            REALM,
            &[CredentialField::Secret, CredentialField::Realm],
        )
        .unwrap();
    assert_eq!(obtained.credential.realm.as_deref(), Some(REALM));
    assert_eq!(obtained.secret(), TOKEN);
    assert!(!obtained.prompted);
    assert_eq!(prompt.calls(), 0);
}

#[test]
fn test_stored_credential_without_secret_prompts() {
    let partial = Credential {
        realm: Some(REALM.to_string()),
        ..Default::default()
    };
    let store = Arc::new(MemoryCredentialStore::new().with_credential("partial", partial));
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let resolver = resolver_with(store, prompt.clone());

    let obtained = resolver.obtain(Some("partial"), REALM, SECRET_ONLY).unwrap();
    assert!(obtained.prompted);
    assert_eq!(obtained.secret(), TOKEN);
    assert_eq!(obtained.name.as_deref(), Some("partial"));
    assert_eq!(prompt.calls(), 1);
    assert_eq!(prompt.requests()[0].missing, vec![CredentialField::Secret]);
}

#[test]
fn test_prompt_refusal_is_an_error() {
    let resolver = CredentialResolver::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(NoPrompt),
    );
    let err = resolver.obtain(None, REALM, SECRET_ONLY).unwrap_err();
    assert!(matches!(err, RedcapError::Credential { .. }));
}

#[test]
fn test_empty_answer_is_an_error() {
    let resolver = CredentialResolver::new(
        Arc::new(MemoryCredentialStore::new()),
        Arc::new(StaticPrompt::new("")),
    );
    assert!(resolver.obtain(None, REALM, SECRET_ONLY).is_err());
}

#[test]
fn test_update_keeps_stored_secret_on_collision() {
    let store = Arc::new(
        MemoryCredentialStore::new().with_credential("mycred", Credential::token(TOKEN, REALM)),
    );
    let resolver = resolver_with(store.clone(), Arc::new(StaticPrompt::new("unused")));

    let used = ObtainedCredential {
        name: Some("mycred".to_string()),
        credential: Credential::token("a-different-token", REALM),
        prompted: true,
    };
    resolver.update(&used);

    let stored = store.get("mycred").unwrap().unwrap();
    assert_eq!(stored.secret.as_deref(), Some(TOKEN));
    assert!(stored.last_used.is_some());
}

#[test]
fn test_update_failure_is_not_fatal() {
    let store = Arc::new(MemoryCredentialStore::new().with_failing_writes());
    let resolver = resolver_with(store.clone(), Arc::new(StaticPrompt::new(TOKEN)));

    let obtained = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    resolver.update(&obtained);
    assert!(store.is_empty());
}

#[test]
fn test_unreadable_store_is_treated_as_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "not json").unwrap();

    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let resolver =
        CredentialResolver::new(Arc::new(FileCredentialStore::new(&path)), prompt.clone());

    let obtained = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    assert!(obtained.prompted);
    assert_eq!(prompt.calls(), 1);

    // the broken file is left alone
    resolver.update(&obtained);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn test_file_store_roundtrip_through_resolver() {
    let dir = tempdir().unwrap();
    let store = Arc::new(FileCredentialStore::new(dir.path().join("credentials.json")));
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let resolver = CredentialResolver::new(store.clone(), prompt.clone());

    let obtained = resolver.obtain(None, REALM, SECRET_ONLY).unwrap();
    resolver.update(&obtained);

    let again = CredentialResolver::new(store, prompt.clone())
        .obtain(None, REALM, SECRET_ONLY)
        .unwrap();
    assert_eq!(again.secret(), TOKEN);
    assert_eq!(prompt.calls(), 1);
}
