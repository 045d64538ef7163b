use diesel::prelude::*;
use rocket::serde::json::Json;

use crate::{models::user::Profile, AmpPresetsDbConn};

#[get("/profile/<user_id>")]
pub async fn get_profile(
  conn: AmpPresetsDbConn,
  user_id: i64,
) -> Result<Option<Json<Profile>>, String> {
  use crate::schema::users;

  let profile: Option<Profile> = conn
    .run(move |conn| -> QueryResult<Option<_>> {
      users::table
        .filter(users::dsl::id.eq(user_id))
        .select((users::dsl::id, users::dsl::username))
        .first(conn)
        .optional()
    })
    .await
    .map_err(|err| {
      error!("DB error loading profile from DB: {}", err);
      String::from("DB error loading profile from DB")
    })?;

  Ok(profile.map(Json))
}
