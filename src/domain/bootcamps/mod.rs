pub mod bootcamp;

pub use bootcamp::{Bootcamp, Location, slugify, validate_careers};
