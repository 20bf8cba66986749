//! Connection resolution.
//!
//! Given the endpoints a resource or device advertises, build a
//! deterministic preference order, probe every candidate concurrently, and
//! return a session for the best-preference endpoint that answered.
//!
//! Selection never depends on which probe finished first: all probes run
//! to completion (one tokio task each, join-all barrier), then results are
//! scanned in the precomputed order. Individual probe failures are captured
//! as absences; only total exhaustion surfaces, as [`Error::NotFound`].

use crate::error::{Error, Result};
use crate::models::{Device, Resource, ResourceConnection};
use crate::session::{ConnectedSession, Probe};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// TLS filter applied when planning resource candidates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SslPreference {
    /// Only probe advertised TLS URIs
    RequireTls,
    /// Only probe the synthesized plain-HTTP URIs
    RequirePlain,
    /// Probe TLS candidates first, then the plain fallbacks
    #[default]
    Either,
}

/// Build the ordered candidate URL list for a resource.
///
/// Connections the caller does not trust are dropped first: unless the
/// resource is owned, only local endpoints are eligible. The eligible list
/// is stably sorted local-first, then split into a TLS bucket (advertised
/// URIs) and a plain bucket (synthesized HTTP URIs); `preference` picks the
/// bucket(s) and their concatenation order.
pub fn plan_candidates(
    connections: &[ResourceConnection],
    owned: bool,
    preference: SslPreference,
) -> Vec<String> {
    let mut eligible: Vec<&ResourceConnection> = connections
        .iter()
        .filter(|conn| owned || conn.local)
        .collect();
    eligible.sort_by_key(|conn| !conn.local);

    let tls: Vec<String> = eligible
        .iter()
        .map(|conn| conn.uri.clone())
        .filter(|uri| !uri.is_empty())
        .collect();
    let plain: Vec<String> = eligible.iter().map(|conn| conn.http_uri()).collect();

    match preference {
        SslPreference::RequireTls => tls,
        SslPreference::RequirePlain => plain,
        SslPreference::Either => tls.into_iter().chain(plain).collect(),
    }
}

/// Probe every candidate concurrently and return the first success in
/// candidate order.
///
/// One task is spawned per URL; all of them run to completion before
/// selection (a winner does not cancel its siblings). Each probed candidate
/// is logged with its outcome, with registered tokens redacted.
pub async fn resolve(
    label: &str,
    candidates: Vec<String>,
    token: &str,
    probe: Arc<dyn Probe>,
) -> Result<ConnectedSession> {
    if candidates.is_empty() {
        return Err(Error::not_found(format!(
            "Unable to connect to {label}: no eligible connection"
        )));
    }

    let mut handles = Vec::with_capacity(candidates.len());
    for url in &candidates {
        let probe = Arc::clone(&probe);
        let url = url.clone();
        let token = token.to_string();
        handles.push(tokio::spawn(async move {
            probe.probe(&url, &token).await.ok()
        }));
    }
    let outcomes = join_all(handles).await;

    let mut chosen: Option<ConnectedSession> = None;
    for (url, joined) in candidates.iter().zip(outcomes) {
        let outcome = joined.unwrap_or(None);
        let okerr = if outcome.is_some() { "OK" } else { "ERR" };
        info!(
            "{}",
            mhutils::redact(&format!("Testing connection: {url}?token={token} {okerr}"))
        );
        if chosen.is_none() {
            chosen = outcome;
        }
    }

    match chosen {
        Some(session) => {
            info!(
                "{}",
                mhutils::redact(&format!(
                    "Connecting to {}: {}?token={}",
                    label,
                    session.base_url(),
                    session.token()
                ))
            );
            Ok(session)
        }
        None => Err(Error::not_found(format!("Unable to connect to {label}"))),
    }
}

impl Resource {
    /// Connect to the best-reachable endpoint of this resource.
    ///
    /// Candidates are planned with [`plan_candidates`] from the advertised
    /// connections, then probed concurrently. Fails with
    /// [`Error::NotFound`] when no eligible endpoint answers.
    pub async fn connect(
        &self,
        preference: SslPreference,
        probe: Arc<dyn Probe>,
    ) -> Result<ConnectedSession> {
        let candidates = plan_candidates(&self.connections, self.owned, preference);
        let token = self.access_token.clone().unwrap_or_default();
        resolve(&self.name, candidates, &token, probe).await
    }
}

impl Device {
    /// Connect to the best-reachable endpoint of this device.
    ///
    /// The flat URI list carries no locality or protocol metadata, so it is
    /// probed as a single bucket in document order.
    pub async fn connect(&self, probe: Arc<dyn Probe>) -> Result<ConnectedSession> {
        let token = self.token.clone().unwrap_or_default();
        resolve(&self.name, self.connections.clone(), &token, probe).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn conn(local: bool, address: &str, uri: &str) -> ResourceConnection {
        ResourceConnection {
            protocol: Some("https".to_string()),
            address: address.to_string(),
            port: Some(32400),
            uri: uri.to_string(),
            local,
        }
    }

    /// Probe stub: succeeds only for configured URLs, optionally after a
    /// per-URL delay, and counts every invocation.
    struct StubProbe {
        reachable: Vec<String>,
        delays_ms: HashMap<String, u64>,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn reaching(urls: &[&str]) -> Self {
            Self {
                reachable: urls.iter().map(|u| u.to_string()).collect(),
                delays_ms: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with_delay(mut self, url: &str, ms: u64) -> Self {
            self.delays_ms.insert(url.to_string(), ms);
            self
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Probe for StubProbe {
        async fn probe(&self, url: &str, token: &str) -> Result<ConnectedSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(url) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            if self.reachable.iter().any(|r| r == url) {
                Ok(ConnectedSession::new(url, token))
            } else {
                Err(Error::not_found(format!("unreachable: {url}")))
            }
        }
    }

    #[test]
    fn test_plan_drops_remote_candidates_when_not_owned() {
        let conns = [
            conn(true, "192.168.1.10", "https://local.example:32400"),
            conn(false, "88.44.11.2", "https://remote.example:32400"),
        ];
        let urls = plan_candidates(&conns, false, SslPreference::Either);
        assert_eq!(
            urls,
            ["https://local.example:32400", "http://192.168.1.10:32400"]
        );
    }

    #[test]
    fn test_plan_keeps_all_candidates_when_owned() {
        let conns = [
            conn(true, "192.168.1.10", "https://local.example:32400"),
            conn(false, "88.44.11.2", "https://remote.example:32400"),
        ];
        let urls = plan_candidates(&conns, true, SslPreference::Either);
        assert_eq!(urls.len(), 4);
    }

    #[test]
    fn test_plan_orders_tls_before_plain_and_local_first() {
        let conns = [
            conn(false, "88.44.11.2", "https://remote.example:32400"),
            conn(true, "192.168.1.10", "https://local-a.example:32400"),
            conn(true, "192.168.1.11", "https://local-b.example:32400"),
        ];
        let urls = plan_candidates(&conns, true, SslPreference::Either);
        assert_eq!(
            urls,
            [
                // TLS bucket, local first, ties in input order
                "https://local-a.example:32400",
                "https://local-b.example:32400",
                "https://remote.example:32400",
                // plain bucket, same ordering
                "http://192.168.1.10:32400",
                "http://192.168.1.11:32400",
                "http://88.44.11.2:32400",
            ]
        );
    }

    #[test]
    fn test_plan_require_tls_and_require_plain() {
        let conns = [conn(true, "192.168.1.10", "https://local.example:32400")];
        assert_eq!(
            plan_candidates(&conns, true, SslPreference::RequireTls),
            ["https://local.example:32400"]
        );
        assert_eq!(
            plan_candidates(&conns, true, SslPreference::RequirePlain),
            ["http://192.168.1.10:32400"]
        );
    }

    #[test]
    fn test_plan_skips_connections_without_tls_uri() {
        let mut no_uri = conn(true, "192.168.1.12", "");
        no_uri.protocol = None;
        let urls = plan_candidates(&[no_uri], true, SslPreference::Either);
        assert_eq!(urls, ["http://192.168.1.12:32400"]);
    }

    #[tokio::test]
    async fn test_resolve_empty_candidates_probes_nothing() {
        let probe = Arc::new(StubProbe::reaching(&[]));
        let err = resolve("empty", Vec::new(), "tok", probe.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_returns_only_reachable_candidate() {
        let urls = vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            "https://c.example".to_string(),
        ];
        let probe = Arc::new(StubProbe::reaching(&["https://c.example"]));
        let session = resolve("res", urls, "tok", probe.clone()).await.unwrap();
        assert_eq!(session.base_url(), "https://c.example");
        assert_eq!(probe.call_count(), 3);
    }

    #[tokio::test]
    async fn test_resolve_prefers_order_not_completion_speed() {
        let urls = vec![
            "https://slow-preferred.example".to_string(),
            "https://fast-fallback.example".to_string(),
        ];
        // Both reachable; the preferred one answers much later.
        let probe = Arc::new(
            StubProbe::reaching(&[
                "https://slow-preferred.example",
                "https://fast-fallback.example",
            ])
            .with_delay("https://slow-preferred.example", 80),
        );
        let session = resolve("res", urls, "tok", probe).await.unwrap();
        assert_eq!(session.base_url(), "https://slow-preferred.example");
    }

    #[tokio::test]
    async fn test_resolve_all_probes_failing_is_not_found() {
        let urls = vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
        ];
        let probe = Arc::new(StubProbe::reaching(&[]));
        let err = resolve("office", urls, "tok", probe.clone())
            .await
            .unwrap_err();
        match err {
            Error::NotFound(msg) => assert!(msg.contains("office")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(probe.call_count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_single_candidate_goes_through_concurrent_path() {
        let urls = vec!["https://only.example".to_string()];
        let probe = Arc::new(StubProbe::reaching(&["https://only.example"]));
        let session = resolve("res", urls, "tok", probe.clone()).await.unwrap();
        assert_eq!(session.base_url(), "https://only.example");
        assert_eq!(probe.call_count(), 1);
    }

    #[tokio::test]
    async fn test_resource_connect_falls_back_to_reachable_remote() {
        // [{local,https},{remote,https},{local,http}] with only the remote
        // TLS endpoint answering: unreachable-but-preferred candidates must
        // not block the fallback.
        let resource = Resource {
            name: "office".to_string(),
            client_identifier: None,
            access_token: Some("tok-res".to_string()),
            product: None,
            product_version: None,
            platform: None,
            platform_version: None,
            device: None,
            provides: None,
            owned: true,
            home: false,
            synced: false,
            presence: true,
            created_at: None,
            last_seen_at: None,
            connections: vec![
                conn(true, "192.168.1.10", "https://local.example:32400"),
                conn(false, "88.44.11.2", "https://remote.example:32400"),
                {
                    let mut plain_only = conn(true, "192.168.1.11", "");
                    plain_only.protocol = Some("http".to_string());
                    plain_only
                },
            ],
        };
        let probe = Arc::new(StubProbe::reaching(&["https://remote.example:32400"]));
        let session = resource
            .connect(SslPreference::Either, probe)
            .await
            .unwrap();
        assert_eq!(session.base_url(), "https://remote.example:32400");
        assert_eq!(session.token(), "tok-res");
    }

    #[tokio::test]
    async fn test_resource_connect_empty_connections_is_not_found() {
        let resource = Resource {
            name: "ghost".to_string(),
            client_identifier: None,
            access_token: None,
            product: None,
            product_version: None,
            platform: None,
            platform_version: None,
            device: None,
            provides: None,
            owned: true,
            home: false,
            synced: false,
            presence: false,
            created_at: None,
            last_seen_at: None,
            connections: Vec::new(),
        };
        let probe = Arc::new(StubProbe::reaching(&[]));
        let err = resource
            .connect(SslPreference::Either, probe.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(probe.call_count(), 0);
    }

    #[tokio::test]
    async fn test_device_connect_uses_flat_uri_list() {
        let device = Device {
            name: "tablet".to_string(),
            id: None,
            token: Some("tok-dev".to_string()),
            product: None,
            product_version: None,
            platform: None,
            platform_version: None,
            device: None,
            model: None,
            vendor: None,
            version: None,
            provides: None,
            client_identifier: None,
            public_address: None,
            screen_resolution: None,
            screen_density: None,
            connections: vec![
                "http://192.168.1.23:32500".to_string(),
                "http://88.44.11.2:32500".to_string(),
            ],
        };
        let probe = Arc::new(StubProbe::reaching(&["http://88.44.11.2:32500"]));
        let session = device.connect(probe).await.unwrap();
        assert_eq!(session.base_url(), "http://88.44.11.2:32500");
        assert_eq!(session.token(), "tok-dev");
    }
}
