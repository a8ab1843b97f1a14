//! Core data models for the guide backend.

pub mod guide;
pub mod place;
pub mod settings;
pub mod user;
pub mod venue;

pub use guide::{
    AudioResponse, ChatRequest, ChatResponse, PlanRequest, PlanResponse, TranslationRequest,
    TranslationResponse,
};
pub use place::{Place, PlaceCreate, PlaceUpdate, PlaceView};
pub use settings::{ConfigEntry, ConfigUpdate};
pub use user::User;
pub use venue::{Hotel, HotelInput, Restaurant, RestaurantInput, Shop, ShopInput};
