//! Named backend operations.
//!
//! Each method shapes one request (path, query, form body) and forwards
//! the caller's callbacks. Success callbacks get the decoded JSON envelope;
//! error callbacks get the raw [`Response`] so the caller can classify it
//! with [`crate::error::Failure`].

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::ajax::{self, encode_component, AjaxRequest, Params, Response, Transport};

/// Untyped `Data` payload.
pub type Empty = serde_json::Value;

/// `{Code, Message, Data}` as sent by the server.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Envelope<D> {
    #[serde(rename = "Code", default)]
    pub code: Option<i64>,
    #[serde(rename = "Message", default)]
    pub message: String,
    #[serde(rename = "Data")]
    pub data: Option<D>,
}

impl<D> Default for Envelope<D> {
    fn default() -> Self {
        Envelope {
            code: None,
            message: String::new(),
            data: None,
        }
    }
}

impl<D: DeserializeOwned> Envelope<D> {
    /// Empty bodies (204) and undecodable ones give the default envelope.
    pub fn parse(body: &str) -> Self {
        if body.trim().is_empty() {
            return Envelope::default();
        }
        match serde_json::from_str(body) {
            Ok(env) => env,
            Err(e) => {
                log::warn!("[api] undecodable response body: {e}");
                Envelope::default()
            }
        }
    }
}

/// A successful reply: decoded envelope plus the HTTP status.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiReply<D> {
    pub status: u16,
    pub envelope: Envelope<D>,
}

impl<D> ApiReply<D> {
    pub fn message(&self) -> &str {
        &self.envelope.message
    }

    pub fn data(&self) -> Option<&D> {
        self.envelope.data.as_ref()
    }

    /// 2xx only. The transport layer also passes 3xx through as success;
    /// pages that care check this.
    pub fn is_clean(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeviceExpirationData {
    #[serde(rename = "newExpiration", default)]
    pub new_expiration: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeviceRegisterData {
    #[serde(rename = "Location", default)]
    pub location: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl LoginInput {
    fn params(&self) -> Params {
        Params::new()
            .with("username", &self.username)
            .with("password", &self.password)
    }
}

/// User edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveUserInput {
    pub username: String,
    pub password: String,
    /// -1 global default, 0 unlimited, otherwise the limit.
    pub device_limit: i64,
    pub expiration_type: i32,
    pub device_expiration: String,
    pub valid_start: String,
    pub valid_end: String,
    pub can_manage: bool,
    pub can_autoreg: bool,
    pub allow_status_api: bool,
    pub ui_group: String,
    pub api_group: String,
}

impl SaveUserInput {
    fn params(&self) -> Params {
        Params::new()
            .with("username", &self.username)
            .with("password", &self.password)
            .with("device_limit", self.device_limit)
            .with("expiration_type", self.expiration_type)
            .with("device_expiration", &self.device_expiration)
            .with("valid_start", &self.valid_start)
            .with("valid_end", &self.valid_end)
            .with("can_manage", u8::from(self.can_manage))
            .with("can_autoreg", u8::from(self.can_autoreg))
            .with("allow_status_api", u8::from(self.allow_status_api))
            .with("ui_group", &self.ui_group)
            .with("api_group", &self.api_group)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterDeviceInput {
    pub username: String,
    pub mac_address: String,
    pub description: String,
    pub platform: Option<String>,
}

impl RegisterDeviceInput {
    fn params(&self) -> Params {
        Params::new()
            .with("username", &self.username)
            .with("mac-address", &self.mac_address)
            .with("description", &self.description)
            .with("platform", self.platform.as_deref().unwrap_or_default())
    }
}

/// Error callback that drops the response.
pub fn ignore_error(_: &Response) {}

/// Success callback that drops the reply.
pub fn ignore_reply<D>(_: ApiReply<D>) {}

/// The backend's operations over one transport.
pub struct ApiClient<T: ?Sized> {
    transport: Rc<T>,
}

impl<T: ?Sized> Clone for ApiClient<T> {
    fn clone(&self) -> Self {
        ApiClient {
            transport: self.transport.clone(),
        }
    }
}

impl<T: Transport + ?Sized + 'static> ApiClient<T> {
    pub fn new(transport: Rc<T>) -> Self {
        ApiClient { transport }
    }

    fn call<D: DeserializeOwned + 'static>(
        &self,
        request: AjaxRequest,
        on_ok: impl FnOnce(ApiReply<D>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let request = request
            .on_success(move |body, resp| {
                on_ok(ApiReply {
                    status: resp.status,
                    envelope: Envelope::parse(body),
                })
            })
            .on_error(on_err);
        ajax::send(&*self.transport, request);
    }

    pub fn login(
        &self,
        input: &LoginInput,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        self.call(AjaxRequest::post("/login").form(input.params()), on_ok, on_err);
    }

    pub fn logout(
        &self,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        self.call(AjaxRequest::get("/logout?noredirect"), on_ok, on_err);
    }

    pub fn save_user(
        &self,
        input: &SaveUserInput,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        self.call(AjaxRequest::post("/api/user").form(input.params()), on_ok, on_err);
    }

    pub fn delete_user(
        &self,
        username: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::delete("/api/user").params(Params::new().with("username", username));
        self.call(req, on_ok, on_err);
    }

    pub fn blacklist_user(
        &self,
        username: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/blacklist/user/{}", encode_component(username));
        self.call(AjaxRequest::post(url), on_ok, on_err);
    }

    pub fn unblacklist_user(
        &self,
        username: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/blacklist/user/{}", encode_component(username));
        self.call(AjaxRequest::delete(url), on_ok, on_err);
    }

    pub fn save_device_description(
        &self,
        mac: &str,
        description: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/device/mac/{}/description", encode_component(mac));
        let req = AjaxRequest::post(url).form(Params::new().with("description", description));
        self.call(req, on_ok, on_err);
    }

    pub fn save_device_expiration(
        &self,
        mac: &str,
        kind: &str,
        value: &str,
        on_ok: impl FnOnce(ApiReply<DeviceExpirationData>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/device/mac/{}/expiration", encode_component(mac));
        let req =
            AjaxRequest::post(url).form(Params::new().with("type", kind).with("value", value));
        self.call(req, on_ok, on_err);
    }

    pub fn flag_device(
        &self,
        mac: &str,
        flagged: bool,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/device/mac/{}/flag", encode_component(mac));
        let req = AjaxRequest::post(url).form(Params::new().with("flagged", flagged));
        self.call(req, on_ok, on_err);
    }

    pub fn delete_devices(
        &self,
        username: &str,
        macs: &[String],
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let url = format!("/api/device/user/{}", encode_component(username));
        let req = AjaxRequest::delete(url).params(Params::new().with("mac", macs.join(",")));
        self.call(req, on_ok, on_err);
    }

    pub fn blacklist_devices(
        &self,
        macs: &[String],
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::post("/api/blacklist/device")
            .form(Params::new().with("mac", macs.join(",")));
        self.call(req, on_ok, on_err);
    }

    pub fn blacklist_all_devices(
        &self,
        username: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::post("/api/blacklist/device")
            .form(Params::new().with("username", username));
        self.call(req, on_ok, on_err);
    }

    pub fn unblacklist_devices(
        &self,
        macs: &[String],
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::delete("/api/blacklist/device")
            .params(Params::new().with("mac", macs.join(",")));
        self.call(req, on_ok, on_err);
    }

    pub fn unblacklist_all_devices(
        &self,
        username: &str,
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::delete("/api/blacklist/device")
            .params(Params::new().with("username", username));
        self.call(req, on_ok, on_err);
    }

    pub fn reassign_devices(
        &self,
        username: &str,
        macs: &[String],
        on_ok: impl FnOnce(ApiReply<Empty>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        let req = AjaxRequest::post("/api/device/reassign").form(
            Params::new()
                .with("username", username)
                .with("macs", macs.join(",")),
        );
        self.call(req, on_ok, on_err);
    }

    pub fn register_device(
        &self,
        input: &RegisterDeviceInput,
        on_ok: impl FnOnce(ApiReply<DeviceRegisterData>) + 'static,
        on_err: impl FnOnce(&Response) + 'static,
    ) {
        self.call(AjaxRequest::post("/api/device").form(input.params()), on_ok, on_err);
    }
}
