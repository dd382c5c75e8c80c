//! Calendar data model.
//!
//! Wire types for the AdventRunner API plus the empty constructors the
//! store seeds itself with before the first load. Field names follow the
//! server's camelCase JSON; tagged fields use [`TaggedOption`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::wire::TaggedOption;

/// Sentinel period used by [`UserData::empty`] before the first load.
pub const SENTINEL_PERIOD: i32 = 0;

/// Identifies a calendar's creator for display. Immutable after creation
/// from the server record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub name: String,
}

/// Progress state of a single door.
///
/// Encoded by symbolic case name (`{"case": "Open"}`), never by ordinal, so
/// the wire stays stable if members are reordered. Unknown names fail
/// decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "case")]
pub enum DoorState {
    Closed,
    Open,
    Done,
    Failed,
}

/// One door per calendar day.
///
/// Day values are unique within a calendar and densely numbered from 1;
/// the door list is ordered so that index = day - 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Door {
    /// 1-based day number.
    pub day: u32,
    /// Target distance for the day.
    pub distance: f64,
    pub state: DoorState,
}

/// Per-calendar settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Scales displayed distances. Positive after normalization.
    pub distance_factor: f64,
    /// Present only once the calendar has been published.
    #[serde(default)]
    pub shared_link_id: TaggedOption<String>,
}

/// One year's tracking sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calendar {
    /// Opaque compatibility tag set by the server.
    pub version: String,
    pub settings: Settings,
    pub doors: Vec<Door>,
    pub owner: Owner,
    #[serde(default)]
    pub verified_distance: TaggedOption<f64>,
}

impl Calendar {
    /// Placeholder calendar used before the first load and as the seed for
    /// brand-new periods.
    pub fn empty() -> Self {
        Self {
            version: String::new(),
            settings: Settings {
                distance_factor: 1.0,
                shared_link_id: TaggedOption::none(),
            },
            doors: Vec::new(),
            owner: Owner {
                name: String::new(),
            },
            verified_distance: TaggedOption::none(),
        }
    }
}

/// How the calendar is rendered.
///
/// Enum-style union: the server tags it `{"Case": "Monthly"}`. Legacy
/// records omit the field entirely; the store's derived view treats that
/// as [`DisplayType::Door`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "Case")]
pub enum DisplayType {
    Monthly,
    Door,
}

/// Top-level aggregate for a signed-in user.
///
/// `calendars` is ordered by period so listing known periods is
/// deterministic regardless of insertion order. Once loaded it always
/// contains at least one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub version: String,
    pub calendars: BTreeMap<i32, Calendar>,
    pub owner: Owner,
    #[serde(default)]
    pub display_name: TaggedOption<String>,
    /// Period shown by default after a load.
    pub latest_period: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<DisplayType>,
}

impl UserData {
    /// Well-formed pre-load value: a single empty calendar at the sentinel
    /// period. Never sent to the server.
    pub fn empty() -> Self {
        let mut calendars = BTreeMap::new();
        calendars.insert(SENTINEL_PERIOD, Calendar::empty());
        Self {
            version: String::new(),
            calendars,
            owner: Owner {
                name: String::new(),
            },
            display_name: TaggedOption::none(),
            latest_period: SENTINEL_PERIOD,
            display_type: None,
        }
    }
}

/// Read-only snapshot returned by the public shared-link endpoint.
///
/// Never merged into [`UserData`]; the store keeps it in a separate
/// single-slot cache keyed by link id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedLinkResponse {
    pub calendar: Calendar,
    pub period: i32,
    #[serde(default)]
    pub display_name: TaggedOption<String>,
}
