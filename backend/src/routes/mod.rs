pub mod amp_models;
pub mod login;
pub mod preset;
pub mod profile;

#[get("/")]
pub fn index() -> &'static str { "Application successfully started!" }
