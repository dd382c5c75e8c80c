//! Calendar data model and wire codec.

pub mod model;
pub mod wire;

pub use model::{
    Calendar, DisplayType, Door, DoorState, Owner, Settings, SharedLinkResponse, UserData,
    SENTINEL_PERIOD,
};
pub use wire::TaggedOption;
