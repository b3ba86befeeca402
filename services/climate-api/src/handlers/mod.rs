//! HTTP request handlers for the climate API.

pub mod climate;
pub mod health;
pub mod landing;
