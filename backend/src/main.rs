#[macro_use]
extern crate diesel;
#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate log;
#[macro_use]
extern crate lazy_static;

pub mod conf;
pub mod db_util;
pub mod models;
pub mod routes;
pub mod schema;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[rocket_sync_db_pools::database("amp_presets")]
pub struct AmpPresetsDbConn(diesel::MysqlConnection);

#[launch]
fn rocket() -> _ {
  dotenv::dotenv().ok();

  let figment = rocket::Config::figment().merge((
    "databases.amp_presets",
    rocket_sync_db_pools::Config {
      url: conf::CONF.db_url.clone(),
      pool_size: 4,
      timeout: 5,
    },
  ));

  rocket::custom(figment)
    .attach(AmpPresetsDbConn::fairing())
    .attach(rocket_async_compression::Compression::fairing())
    .mount("/", routes![
      routes::index,
      routes::amp_models::get_models,
      routes::preset::get_presets,
      routes::preset::get_preset_by_id,
      routes::preset::create_preset,
      routes::preset::update_preset,
      routes::preset::delete_preset,
      routes::login::login,
      routes::login::register,
      routes::login::logout,
      routes::login::get_logged_in_user,
      routes::profile::get_profile,
    ])
}
