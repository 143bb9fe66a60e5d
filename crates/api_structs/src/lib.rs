mod error;
mod reminder;
mod schedule;
mod status;
mod timezone;

pub mod dtos {
    pub use crate::reminder::dtos::*;
    pub use crate::schedule::dtos::*;
    pub use crate::status::dtos::*;
    pub use crate::timezone::dtos::*;
}

pub use crate::error::ErrorBody;
pub use crate::reminder::api::*;
pub use crate::schedule::api::*;
pub use crate::status::api::*;
pub use crate::timezone::api::*;
