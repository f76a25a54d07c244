use std::time::Duration;

use parking_lot::Mutex;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{Result, SignalRgbError};
use crate::model::{
    ApiResponse, CurrentLayoutHolder, CurrentStateHolder, Effect, EffectList, EffectPreset,
    EffectPresetList, Layout, LayoutList,
};
use crate::transport::{Transport, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_TIMEOUT};

pub mod blocking;

pub(crate) const LIGHTING_V1: &str = "/api/v1/lighting";
pub(crate) const SCENES_V1: &str = "/api/v1/scenes";

/// Asynchronous client for the SignalRGB API.
///
/// All methods borrow `&self`; the client serializes nothing itself and
/// assumes one operation in flight at a time per instance. The effect list
/// is cached in a single slot that is replaced wholesale or cleared, never
/// mutated in place.
#[derive(Debug)]
pub struct AsyncSignalRgbClient {
    transport: Transport,
    effects_cache: Mutex<Option<Vec<Effect>>>,
}

impl Default for AsyncSignalRgbClient {
    fn default() -> Self {
        AsyncSignalRgbClient::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl AsyncSignalRgbClient {
    pub fn new(host: &str, port: u16) -> Self {
        AsyncSignalRgbClient::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom per-request timeout.
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        AsyncSignalRgbClient {
            transport: Transport::new(host, port, timeout),
            effects_cache: Mutex::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Sends a request and decodes the envelope, failing unless the
    /// envelope status is `ok`.
    async fn request_api<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse<T>> {
        let raw = self.transport.request(method, endpoint, body.as_ref()).await?;
        let response: ApiResponse<T> = serde_json::from_value(raw)
            .map_err(|e| SignalRgbError::unexpected(format!("An unexpected error occurred: {e}")))?;
        ensure_response_ok(&response)?;
        Ok(response)
    }

    /// Lists available effects, serving the cached list when present.
    ///
    /// Item order is preserved from the wire payload.
    pub async fn list_effects(&self) -> Result<Vec<Effect>> {
        if let Some(effects) = self.effects_cache.lock().clone() {
            return Ok(effects);
        }
        let effects = self.fetch_effects().await?;
        *self.effects_cache.lock() = Some(effects.clone());
        Ok(effects)
    }

    async fn fetch_effects(&self) -> Result<Vec<Effect>> {
        let response = self
            .request_api::<EffectList>(Method::GET, &format!("{LIGHTING_V1}/effects"), None)
            .await?;
        response
            .data
            .and_then(|list| list.items)
            .ok_or_else(|| SignalRgbError::api("No effects data in the response", None))
    }

    /// Clears the cached effect list; the next [`Self::list_effects`] call
    /// fetches fresh data.
    pub fn refresh_effects(&self) {
        *self.effects_cache.lock() = None;
    }

    /// Fetches the details of a specific effect.
    pub async fn get_effect(&self, effect_id: &str) -> Result<Effect> {
        let result = self
            .request_api::<Effect>(
                Method::GET,
                &format!("{LIGHTING_V1}/effects/{effect_id}"),
                None,
            )
            .await;
        match result {
            Ok(response) => response
                .data
                .ok_or_else(|| SignalRgbError::api("No effect data in the response", None)),
            Err(err) => Err(remap_not_found(
                err,
                format!("Effect with ID '{effect_id}' not found"),
            )),
        }
    }

    /// Fetches the details of the first effect whose name matches exactly.
    ///
    /// Names are not unique, so the first match in list order wins. This is
    /// two logical round-trips: the (possibly cached) list resolves the id,
    /// then the detail endpoint is queried for the full record.
    pub async fn get_effect_by_name(&self, effect_name: &str) -> Result<Effect> {
        let effects = self.list_effects().await?;
        let effect = effects
            .iter()
            .find(|e| e.attributes.name == effect_name)
            .ok_or_else(|| {
                SignalRgbError::not_found(format!("Effect '{effect_name}' not found"), None)
            })?;
        self.get_effect(&effect.id).await
    }

    /// Fetches the live canvas settings and active effect id.
    pub async fn get_current_state(&self) -> Result<CurrentStateHolder> {
        let response = self
            .request_api::<CurrentStateHolder>(Method::GET, LIGHTING_V1, None)
            .await?;
        response
            .data
            .ok_or_else(|| SignalRgbError::api("No current state data in the response", None))
    }

    /// Fetches the details of the currently active effect.
    pub async fn get_current_effect(&self) -> Result<Effect> {
        let state = self.get_current_state().await?;
        self.get_effect(&state.id).await
    }

    /// The current global brightness (0-100).
    pub async fn get_brightness(&self) -> Result<u8> {
        Ok(self.get_current_state().await?.attributes.global_brightness)
    }

    /// Sets the global brightness. The value is sent as-is; the server is
    /// authoritative about the valid range.
    pub async fn set_brightness(&self, value: u8) -> Result<()> {
        self.request_api::<Value>(
            Method::PATCH,
            &format!("{LIGHTING_V1}/global_brightness"),
            Some(json!({ "global_brightness": value })),
        )
        .await?;
        Ok(())
    }

    /// Whether the canvas is currently enabled.
    pub async fn get_enabled(&self) -> Result<bool> {
        Ok(self.get_current_state().await?.attributes.enabled)
    }

    pub async fn set_enabled(&self, value: bool) -> Result<()> {
        self.request_api::<Value>(
            Method::PATCH,
            &format!("{LIGHTING_V1}/enabled"),
            Some(json!({ "enabled": value })),
        )
        .await?;
        Ok(())
    }

    /// Applies an effect by id via the canonical apply endpoint.
    pub async fn apply_effect(&self, effect_id: &str) -> Result<()> {
        self.request_api::<Value>(
            Method::POST,
            &format!("{LIGHTING_V1}/effects/{effect_id}/apply"),
            None,
        )
        .await?;
        Ok(())
    }

    /// Resolves an effect by name and applies it, preferring the effect's
    /// own apply link and falling back to the canonical endpoint when the
    /// link is missing.
    pub async fn apply_effect_by_name(&self, effect_name: &str) -> Result<()> {
        let effect = self.get_effect_by_name(effect_name).await?;
        match effect.links.apply {
            Some(apply_url) => {
                self.request_api::<Value>(Method::POST, &apply_url, None).await?;
                Ok(())
            }
            None => self.apply_effect(&effect.id).await,
        }
    }

    /// Lists the presets of an effect.
    pub async fn get_effect_presets(&self, effect_id: &str) -> Result<Vec<EffectPreset>> {
        let result = self
            .request_api::<EffectPresetList>(
                Method::GET,
                &format!("{LIGHTING_V1}/effects/{effect_id}/presets"),
                None,
            )
            .await;
        match result {
            Ok(response) => response
                .data
                .and_then(|list| list.items)
                .ok_or_else(|| SignalRgbError::api("No preset data in the response", None)),
            Err(err) => Err(remap_not_found(
                err,
                format!("Effect with ID '{effect_id}' not found"),
            )),
        }
    }

    /// Selects a preset for an effect.
    pub async fn apply_effect_preset(&self, effect_id: &str, preset_id: &str) -> Result<()> {
        let result = self
            .request_api::<EffectPreset>(
                Method::PATCH,
                &format!("{LIGHTING_V1}/effects/{effect_id}/presets"),
                Some(json!({ "preset": preset_id })),
            )
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(remap_not_found(
                err,
                format!("Effect with ID '{effect_id}' or preset '{preset_id}' not found"),
            )),
        }
    }

    /// Peeks at the next effect in history. `None` when the server reports
    /// there is nothing to move to.
    pub async fn get_next_effect(&self) -> Result<Option<Effect>> {
        self.peek_history(&format!("{LIGHTING_V1}/next")).await
    }

    /// Applies the next effect in history and returns it.
    pub async fn apply_next_effect(&self) -> Result<Effect> {
        self.apply_from_history(&format!("{LIGHTING_V1}/next")).await
    }

    /// Peeks at the previous effect in history. `None` when the server
    /// reports there is nothing to move to.
    pub async fn get_previous_effect(&self) -> Result<Option<Effect>> {
        self.peek_history(&format!("{LIGHTING_V1}/previous")).await
    }

    /// Applies the previous effect in history and returns it.
    pub async fn apply_previous_effect(&self) -> Result<Effect> {
        self.apply_from_history(&format!("{LIGHTING_V1}/previous"))
            .await
    }

    /// Applies a random effect and returns it.
    pub async fn apply_random_effect(&self) -> Result<Effect> {
        self.apply_from_history(&format!("{LIGHTING_V1}/shuffle"))
            .await
    }

    async fn peek_history(&self, endpoint: &str) -> Result<Option<Effect>> {
        match self.request_api::<Effect>(Method::GET, endpoint, None).await {
            Ok(response) => Ok(response.data),
            // "409" means there is no effect in that direction, not a failure.
            Err(err) if is_conflict(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn apply_from_history(&self, endpoint: &str) -> Result<Effect> {
        let response = self.request_api::<Effect>(Method::POST, endpoint, None).await?;
        response
            .data
            .ok_or_else(|| SignalRgbError::api("No effect data in the response", None))
    }

    /// Fetches the currently active layout.
    pub async fn get_current_layout(&self) -> Result<Layout> {
        let response = self
            .request_api::<CurrentLayoutHolder>(
                Method::GET,
                &format!("{SCENES_V1}/current_layout"),
                None,
            )
            .await?;
        response
            .data
            .and_then(|holder| holder.current_layout)
            .ok_or_else(|| SignalRgbError::api("No current layout data in the response", None))
    }

    /// Makes a layout current. The server echoes the resulting layout; a
    /// mismatch against the requested id is an error even on HTTP success.
    pub async fn set_current_layout(&self, layout_id: &str) -> Result<()> {
        let response = self
            .request_api::<CurrentLayoutHolder>(
                Method::PATCH,
                &format!("{SCENES_V1}/current_layout"),
                Some(json!({ "layout": layout_id })),
            )
            .await?;
        let current = response
            .data
            .and_then(|holder| holder.current_layout)
            .ok_or_else(|| SignalRgbError::api("No current layout data in the response", None))?;
        if current.id != layout_id {
            return Err(SignalRgbError::api(
                format!("Failed to set layout to '{layout_id}'"),
                None,
            ));
        }
        Ok(())
    }

    /// Lists all available layouts.
    pub async fn list_layouts(&self) -> Result<Vec<Layout>> {
        let response = self
            .request_api::<LayoutList>(Method::GET, &format!("{SCENES_V1}/layouts"), None)
            .await?;
        response
            .data
            .and_then(|list| list.items)
            .ok_or_else(|| SignalRgbError::api("No layouts data in the response", None))
    }
}

fn ensure_response_ok<T>(response: &ApiResponse<T>) -> Result<()> {
    if response.status != "ok" {
        return Err(SignalRgbError::api(
            format!("API returned non-OK status: {}", response.status),
            response.errors.first().cloned(),
        ));
    }
    Ok(())
}

/// Narrows an API error carrying the `not_found` code into [`SignalRgbError::NotFound`].
fn remap_not_found(err: SignalRgbError, message: String) -> SignalRgbError {
    match err {
        SignalRgbError::Api { error, .. }
            if error.as_ref().and_then(|e| e.code.as_deref()) == Some("not_found") =>
        {
            SignalRgbError::NotFound { message, error }
        }
        other => other,
    }
}

fn is_conflict(err: &SignalRgbError) -> bool {
    matches!(err, SignalRgbError::Api { .. }) && err.code() == Some("409")
}
