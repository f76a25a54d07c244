use std::time::Duration;

use tokio::runtime::{Builder, Runtime};

use crate::client::AsyncSignalRgbClient;
use crate::error::{Result, SignalRgbError};
use crate::model::{CurrentStateHolder, Effect, EffectPreset, Layout};
use crate::transport::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};

/// Blocking client for the SignalRGB API.
///
/// Wraps [`AsyncSignalRgbClient`] and drives it to completion on a
/// current-thread runtime owned by this instance, so exactly one operation
/// runs at a time per client. Dropping the client releases the runtime and
/// the underlying connection pool.
#[derive(Debug)]
pub struct SignalRgbClient {
    inner: AsyncSignalRgbClient,
    runtime: Runtime,
}

impl SignalRgbClient {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        SignalRgbClient::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Creates a client against the default `localhost:16038` endpoint.
    pub fn localhost() -> Result<Self> {
        SignalRgbClient::new(DEFAULT_HOST, DEFAULT_PORT)
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SignalRgbError::unexpected(format!("Failed to build client runtime: {e}")))?;
        Ok(SignalRgbClient {
            inner: AsyncSignalRgbClient::with_timeout(host, port, timeout),
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn list_effects(&self) -> Result<Vec<Effect>> {
        self.runtime.block_on(self.inner.list_effects())
    }

    /// Clears the cached effect list and eagerly fetches a fresh one.
    pub fn refresh_effects(&self) -> Result<()> {
        self.inner.refresh_effects();
        self.runtime.block_on(self.inner.list_effects())?;
        Ok(())
    }

    pub fn get_effect(&self, effect_id: &str) -> Result<Effect> {
        self.runtime.block_on(self.inner.get_effect(effect_id))
    }

    pub fn get_effect_by_name(&self, effect_name: &str) -> Result<Effect> {
        self.runtime
            .block_on(self.inner.get_effect_by_name(effect_name))
    }

    pub fn get_current_state(&self) -> Result<CurrentStateHolder> {
        self.runtime.block_on(self.inner.get_current_state())
    }

    pub fn get_current_effect(&self) -> Result<Effect> {
        self.runtime.block_on(self.inner.get_current_effect())
    }

    pub fn get_brightness(&self) -> Result<u8> {
        self.runtime.block_on(self.inner.get_brightness())
    }

    pub fn set_brightness(&self, value: u8) -> Result<()> {
        self.runtime.block_on(self.inner.set_brightness(value))
    }

    pub fn get_enabled(&self) -> Result<bool> {
        self.runtime.block_on(self.inner.get_enabled())
    }

    pub fn set_enabled(&self, value: bool) -> Result<()> {
        self.runtime.block_on(self.inner.set_enabled(value))
    }

    pub fn apply_effect(&self, effect_id: &str) -> Result<()> {
        self.runtime.block_on(self.inner.apply_effect(effect_id))
    }

    pub fn apply_effect_by_name(&self, effect_name: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.apply_effect_by_name(effect_name))
    }

    pub fn get_effect_presets(&self, effect_id: &str) -> Result<Vec<EffectPreset>> {
        self.runtime
            .block_on(self.inner.get_effect_presets(effect_id))
    }

    pub fn apply_effect_preset(&self, effect_id: &str, preset_id: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.apply_effect_preset(effect_id, preset_id))
    }

    pub fn get_next_effect(&self) -> Result<Option<Effect>> {
        self.runtime.block_on(self.inner.get_next_effect())
    }

    pub fn apply_next_effect(&self) -> Result<Effect> {
        self.runtime.block_on(self.inner.apply_next_effect())
    }

    pub fn get_previous_effect(&self) -> Result<Option<Effect>> {
        self.runtime.block_on(self.inner.get_previous_effect())
    }

    pub fn apply_previous_effect(&self) -> Result<Effect> {
        self.runtime.block_on(self.inner.apply_previous_effect())
    }

    pub fn apply_random_effect(&self) -> Result<Effect> {
        self.runtime.block_on(self.inner.apply_random_effect())
    }

    pub fn get_current_layout(&self) -> Result<Layout> {
        self.runtime.block_on(self.inner.get_current_layout())
    }

    pub fn set_current_layout(&self, layout_id: &str) -> Result<()> {
        self.runtime
            .block_on(self.inner.set_current_layout(layout_id))
    }

    pub fn list_layouts(&self) -> Result<Vec<Layout>> {
        self.runtime.block_on(self.inner.list_layouts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{StubResponse, StubServer};
    use serde_json::{json, Value};

    fn envelope(data: Value) -> String {
        json!({
            "api_version": "1.0",
            "id": 1,
            "method": "GET",
            "params": {},
            "status": "ok",
            "errors": [],
            "data": data
        })
        .to_string()
    }

    fn effect_json(id: &str, name: &str) -> Value {
        json!({"id": id, "type": "effect", "attributes": {"name": name}, "links": {}})
    }

    fn client_for(server: &StubServer) -> SignalRgbClient {
        SignalRgbClient::with_timeout("127.0.0.1", server.port(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_blocking_list_effects() {
        let server = StubServer::start(vec![StubResponse::ok(&envelope(json!({
            "items": [effect_json("e1", "Rainbow")]
        })))]);
        let client = client_for(&server);

        let effects = client.list_effects().unwrap();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].attributes.name, "Rainbow");
    }

    #[test]
    fn test_blocking_cache_hit_skips_transport() {
        let server = StubServer::start(vec![StubResponse::ok(&envelope(json!({
            "items": [effect_json("e1", "Rainbow")]
        })))]);
        let client = client_for(&server);

        client.list_effects().unwrap();
        client.list_effects().unwrap();
        assert_eq!(server.hits(), 1);
    }

    #[test]
    fn test_blocking_refresh_repopulates_eagerly() {
        let body = envelope(json!({"items": [effect_json("e1", "Rainbow")]}));
        let server = StubServer::start(vec![StubResponse::ok(&body), StubResponse::ok(&body)]);
        let client = client_for(&server);

        client.list_effects().unwrap();
        client.refresh_effects().unwrap();
        assert_eq!(server.hits(), 2);

        // The refreshed list is already cached again.
        client.list_effects().unwrap();
        assert_eq!(server.hits(), 2);
    }

    #[test]
    fn test_blocking_set_brightness_patches_value() {
        let server = StubServer::start(vec![StubResponse::ok(&envelope(json!({})))]);
        let client = client_for(&server);

        client.set_brightness(75).unwrap();
        let request = &server.requests()[0];
        assert_eq!(request.method, "PATCH");
        let body: Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body, json!({"global_brightness": 75}));
    }

    #[test]
    fn test_blocking_propagates_typed_errors() {
        let server = StubServer::start(vec![StubResponse::ok(
            &json!({
                "status": "error",
                "errors": [{"code": "not_found", "title": "Not Found"}]
            })
            .to_string(),
        )]);
        let client = client_for(&server);

        let err = client.get_effect("missing").unwrap_err();
        assert!(matches!(err, SignalRgbError::NotFound { .. }));
    }
}
