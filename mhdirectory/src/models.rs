//! Typed records for directory responses.
//!
//! Each record is an immutable snapshot of one element of a directory
//! response. Construction goes through `from_element`, which coerces the
//! attribute bag into fixed fields and registers any authentication token
//! with the process-wide secret filter before the record is handed out.

use crate::xml::{attr, attr_bool, attr_datetime, attr_parse, child_elements};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use xmltree::Element;

/// The signed-in account and its profile attributes.
///
/// Built from a successful sign-in response. The `auth_token` is the bearer
/// secret used for every subsequent directory call; it is registered with
/// the secret filter at parse time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    /// Bearer token for directory calls (redacted in logs)
    pub auth_token: String,
    pub id: Option<String>,
    pub uuid: Option<String>,
    pub username: String,
    /// Alias of `username` in current responses
    pub title: Option<String>,
    pub email: Option<String>,
    pub locale: Option<String>,
    pub thumb: Option<String>,
    pub guest: bool,
    pub home: bool,
    pub restricted: bool,
    pub secure: bool,
    pub home_size: Option<u32>,
    pub max_home_size: Option<u32>,
    pub queue_email: Option<String>,
    pub queue_uid: Option<String>,
    pub mailing_list_status: Option<String>,
    pub certificate_version: Option<String>,
    pub cloud_sync_device: Option<String>,
    pub subscription_active: bool,
    pub subscription_status: Option<String>,
    pub subscription_plan: Option<String>,
}

impl Account {
    pub(crate) fn from_element(elem: &Element) -> Self {
        let auth_token = attr(elem, "authenticationToken").unwrap_or_default();
        mhutils::add_secret(auth_token.clone());
        Self {
            auth_token,
            id: attr(elem, "id"),
            uuid: attr(elem, "uuid"),
            username: attr(elem, "username").unwrap_or_default(),
            title: attr(elem, "title"),
            email: attr(elem, "email"),
            locale: attr(elem, "locale"),
            thumb: attr(elem, "thumb"),
            guest: attr_bool(elem, "guest"),
            home: attr_bool(elem, "home"),
            restricted: attr_bool(elem, "restricted"),
            secure: attr_bool(elem, "secure"),
            home_size: attr_parse(elem, "homeSize"),
            max_home_size: attr_parse(elem, "maxHomeSize"),
            queue_email: attr(elem, "queueEmail"),
            queue_uid: attr(elem, "queueUid"),
            mailing_list_status: attr(elem, "mailing_list_status"),
            certificate_version: attr(elem, "certificateVersion"),
            cloud_sync_device: attr(elem, "cloudSyncDevice"),
            subscription_active: attr_bool(elem, "subscriptionActive"),
            subscription_status: attr(elem, "subscriptionStatus"),
            subscription_plan: attr(elem, "subscriptionPlan"),
        }
    }
}

/// A friend or sub-account linked to the signed-in account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkedUser {
    pub id: Option<u32>,
    pub username: String,
    pub title: Option<String>,
    pub email: String,
    pub thumb: Option<String>,
    pub home: bool,
    pub protected: bool,
    pub restricted: Option<String>,
    pub allow_sync: bool,
    pub allow_channels: bool,
    pub allow_camera_upload: bool,
    pub filter_all: Option<String>,
    pub filter_movies: Option<String>,
    pub filter_music: Option<String>,
    pub filter_photos: Option<String>,
    pub filter_television: Option<String>,
    pub recommendations_playlist_id: Option<String>,
}

impl LinkedUser {
    pub(crate) fn from_element(elem: &Element) -> Self {
        Self {
            id: attr_parse(elem, "id"),
            username: attr(elem, "username").unwrap_or_default(),
            title: attr(elem, "title"),
            email: attr(elem, "email").unwrap_or_default(),
            thumb: attr(elem, "thumb"),
            home: attr_bool(elem, "home"),
            protected: attr_bool(elem, "protected"),
            restricted: attr(elem, "restricted"),
            allow_sync: attr_bool(elem, "allowSync"),
            allow_channels: attr_bool(elem, "allowChannels"),
            allow_camera_upload: attr_bool(elem, "allowCameraUpload"),
            filter_all: attr(elem, "filterAll"),
            filter_movies: attr(elem, "filterMovies"),
            filter_music: attr(elem, "filterMusic"),
            filter_photos: attr(elem, "filterPhotos"),
            filter_television: attr(elem, "filterTelevision"),
            recommendations_playlist_id: attr(elem, "recommendationsPlaylistId"),
        }
    }
}

/// One advertised endpoint of a [`Resource`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceConnection {
    /// Advertised protocol ("http" or "https")
    pub protocol: Option<String>,
    /// Address, usually a LAN IP
    pub address: String,
    pub port: Option<u16>,
    /// Externally-routable URI, the TLS candidate
    pub uri: String,
    /// True if the address is on the local network
    pub local: bool,
}

impl ResourceConnection {
    pub(crate) fn from_element(elem: &Element) -> Self {
        Self {
            protocol: attr(elem, "protocol"),
            address: attr(elem, "address").unwrap_or_default(),
            port: attr_parse(elem, "port"),
            uri: attr(elem, "uri").unwrap_or_default(),
            local: attr_bool(elem, "local"),
        }
    }

    /// Plain-HTTP URI synthesized from address and port, regardless of the
    /// advertised protocol. Used as the non-TLS fallback candidate.
    pub fn http_uri(&self) -> String {
        match self.port {
            Some(port) => format!("http://{}:{}", self.address, port),
            None => format!("http://{}", self.address),
        }
    }
}

/// A server or player reachable over the network.
///
/// Resources advertise an ordered list of [`ResourceConnection`]s. The list
/// may be empty, in which case `connect` fails without probing anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub name: String,
    pub client_identifier: Option<String>,
    /// Access token for this resource (redacted in logs)
    pub access_token: Option<String>,
    pub product: Option<String>,
    pub product_version: Option<String>,
    pub platform: Option<String>,
    pub platform_version: Option<String>,
    pub device: Option<String>,
    /// Services this resource provides ("server", "client", "player", ...)
    pub provides: Option<String>,
    /// True if the signed-in account owns this resource
    pub owned: bool,
    pub home: bool,
    pub synced: bool,
    /// True if the resource is currently online
    pub presence: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub connections: Vec<ResourceConnection>,
}

impl Resource {
    pub(crate) fn from_element(elem: &Element) -> Self {
        let access_token = attr(elem, "accessToken");
        if let Some(token) = &access_token {
            mhutils::add_secret(token.clone());
        }
        Self {
            name: attr(elem, "name").unwrap_or_default(),
            client_identifier: attr(elem, "clientIdentifier"),
            access_token,
            product: attr(elem, "product"),
            product_version: attr(elem, "productVersion"),
            platform: attr(elem, "platform"),
            platform_version: attr(elem, "platformVersion"),
            device: attr(elem, "device"),
            provides: attr(elem, "provides"),
            owned: attr_bool(elem, "owned"),
            home: attr_bool(elem, "home"),
            synced: attr_bool(elem, "synced"),
            presence: attr_bool(elem, "presence"),
            created_at: attr_datetime(elem, "createdAt"),
            last_seen_at: attr_datetime(elem, "lastSeenAt"),
            connections: child_elements(elem, "Connection")
                .into_iter()
                .map(ResourceConnection::from_element)
                .collect(),
        }
    }
}

/// A peer device linked to the account.
///
/// Devices expose a flat list of connection URIs without locality or
/// protocol metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub name: String,
    pub id: Option<String>,
    /// Access token for this device (redacted in logs)
    pub token: Option<String>,
    pub product: Option<String>,
    pub product_version: Option<String>,
    pub platform: Option<String>,
    pub platform_version: Option<String>,
    pub device: Option<String>,
    pub model: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub provides: Option<String>,
    pub client_identifier: Option<String>,
    pub public_address: Option<String>,
    pub screen_resolution: Option<String>,
    pub screen_density: Option<String>,
    /// Advertised connection URIs, in document order
    pub connections: Vec<String>,
}

impl Device {
    pub(crate) fn from_element(elem: &Element) -> Self {
        let token = attr(elem, "token");
        if let Some(token) = &token {
            mhutils::add_secret(token.clone());
        }
        Self {
            name: attr(elem, "name").unwrap_or_default(),
            id: attr(elem, "id"),
            token,
            product: attr(elem, "product"),
            product_version: attr(elem, "productVersion"),
            platform: attr(elem, "platform"),
            platform_version: attr(elem, "platformVersion"),
            device: attr(elem, "device"),
            model: attr(elem, "model"),
            vendor: attr(elem, "vendor"),
            version: attr(elem, "version"),
            provides: attr(elem, "provides"),
            client_identifier: attr(elem, "clientIdentifier"),
            public_address: attr(elem, "publicAddress"),
            screen_resolution: attr(elem, "screenResolution"),
            screen_density: attr(elem, "screenDensity"),
            connections: child_elements(elem, "Connection")
                .into_iter()
                .filter_map(|conn| attr(conn, "uri"))
                .collect(),
        }
    }
}
