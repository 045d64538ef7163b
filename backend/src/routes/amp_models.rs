use common::{AmpModel, ALL_MODELS};
use rocket::serde::json::Json;

/// The fixed hardware model catalog the editor builds its knob forms from
#[get("/models")]
pub fn get_models() -> Json<&'static [AmpModel]> { Json(&ALL_MODELS[..]) }
