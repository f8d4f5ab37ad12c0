//! Value types shared by the `waymark` crates: points on the globe ([`geo`]), points on the screen
//! ([`screen`]), shapes returned by hit-testing ([`geometry`]) and the data attached to them
//! ([`ElementId`], [`PropertyValue`]).

pub mod error;
pub mod geo;
pub mod geometry;
pub mod screen;

mod element_id;
mod property;

pub use element_id::ElementId;
pub use property::{Properties, PropertyValue};
