use chrono::NaiveDateTime;
use diesel::{prelude::*, QueryResult};
use itertools::Itertools;
use rocket::serde::json::Json;

use common::{validate_preset, FieldError, ModelId, PresetPayload};

use crate::{
  db_util::{build_username_map, last_insert_id, login::get_logged_in_user_id},
  models::{
    preset::{NewPreset, PresetDescriptor, PresetResponse, QueryablePreset},
    user::MaybeLoginToken,
  },
  AmpPresetsDbConn,
};

#[derive(Responder)]
pub enum PresetWriteError {
  #[response(status = 400)]
  Invalid(Json<Vec<FieldError>>),
  #[response(status = 401)]
  Unauthorized(String),
  #[response(status = 403)]
  Forbidden(String),
  #[response(status = 404)]
  NotFound(String),
  #[response(status = 500)]
  Internal(String),
}

#[get("/presets?<user_id>")]
pub async fn get_presets(
  conn0: AmpPresetsDbConn,
  conn1: AmpPresetsDbConn,
  user_id: Option<i64>,
) -> Result<Json<Vec<PresetDescriptor>>, String> {
  let (preset_rows, user_rows): (
    Vec<(i64, String, String, String, bool, i64, Option<NaiveDateTime>)>,
    Vec<(i64, String)>,
  ) = tokio::try_join!(
    conn0.run(move |conn| {
      use crate::schema::presets;

      let mut query = presets::table
        .select((
          presets::dsl::id,
          presets::dsl::name,
          presets::dsl::description,
          presets::dsl::model_id,
          presets::dsl::published,
          presets::dsl::user_id,
          presets::dsl::created_at,
        ))
        .into_boxed();
      if let Some(user_id) = user_id {
        query = query.filter(presets::dsl::user_id.eq(user_id));
      }
      query.load(conn).map_err(|err| {
        error!("Error querying presets: {:?}", err);
        "Error querying presets from the database".to_string()
      })
    }),
    conn1.run(|conn| {
      use crate::schema::users;

      users::table
        .select((users::dsl::id, users::dsl::username))
        .load(conn)
        .map_err(|err| {
          error!("Error querying users: {:?}", err);
          "Error querying users from the database".to_string()
        })
    }),
  )?;

  let usernames_by_id = build_username_map(user_rows);

  let descriptors = preset_rows
    .into_iter()
    .map(
      |(id, name, description, model_id, published, user_id, created_at)| -> Result<PresetDescriptor, String> {
        let model_id: ModelId = model_id.parse().map_err(|()| {
          error!("Unknown model id `{}` stored for preset {}", model_id, id);
          String::from("Invalid model id found in DB")
        })?;
        let user_name = usernames_by_id.get(&user_id).cloned().unwrap_or_default();
        Ok(PresetDescriptor {
          id,
          name,
          description,
          model_id,
          user_id,
          user_name,
          published,
          created_at,
        })
      },
    )
    .collect::<Result<Vec<_>, String>>()?
    .into_iter()
    .sorted_by_key(|descriptor| std::cmp::Reverse(descriptor.created_at))
    .collect_vec();

  Ok(Json(descriptors))
}

#[get("/preset/<preset_id>")]
pub async fn get_preset_by_id(
  conn: AmpPresetsDbConn,
  preset_id: i64,
) -> Result<Option<Json<PresetResponse>>, String> {
  let row: Option<(QueryablePreset, String)> = conn
    .run(move |conn| -> QueryResult<Option<_>> {
      use crate::schema::{presets, users};

      presets::table
        .inner_join(users::table)
        .select((presets::all_columns, users::dsl::username))
        .filter(presets::dsl::id.eq(preset_id))
        .first(conn)
        .optional()
    })
    .await
    .map_err(|err| {
      error!("DB error loading preset from DB: {}", err);
      String::from("DB error loading preset from DB")
    })?;

  let (preset, user_name) = match row {
    Some(row) => row,
    None => return Ok(None),
  };
  Ok(Some(Json(preset.into_response(user_name)?)))
}

#[post("/preset", data = "<preset>")]
pub async fn create_preset(
  conn: AmpPresetsDbConn,
  preset: Json<PresetPayload>,
  login_token: MaybeLoginToken,
) -> Result<Json<i64>, PresetWriteError> {
  let user_id = match get_logged_in_user_id(&conn, login_token).await {
    Some(user_id) => user_id,
    None =>
      return Err(PresetWriteError::Unauthorized(String::from(
        "Must be logged in to create presets",
      ))),
  };

  let payload = preset.into_inner();
  validate_preset(&payload).map_err(|errors| PresetWriteError::Invalid(Json(errors)))?;

  let new_preset = NewPreset::from_payload(&payload, user_id);
  let created_preset_id = conn
    .run(move |conn| -> QueryResult<i64> {
      use crate::schema::presets;

      conn.transaction(move |conn| {
        diesel::insert_into(presets::table)
          .values(&new_preset)
          .execute(conn)?;
        diesel::select(last_insert_id()).first(conn)
      })
    })
    .await
    .map_err(|err| {
      error!("DB error inserting preset into DB: {}", err);
      PresetWriteError::Internal(String::from("DB error inserting preset into DB"))
    })?;

  Ok(Json(created_preset_id))
}

/// Loads the owner of a preset, or `None` if the preset doesn't exist
async fn get_preset_owner(
  conn: &AmpPresetsDbConn,
  preset_id: i64,
) -> Result<Option<i64>, PresetWriteError> {
  conn
    .run(move |conn| -> QueryResult<Option<i64>> {
      use crate::schema::presets;

      presets::table
        .find(preset_id)
        .select(presets::dsl::user_id)
        .first(conn)
        .optional()
    })
    .await
    .map_err(|err| {
      error!("DB error loading preset owner from DB: {}", err);
      PresetWriteError::Internal(String::from("DB error loading preset from DB"))
    })
}

#[patch("/preset/<preset_id>", data = "<preset>")]
pub async fn update_preset(
  conn: AmpPresetsDbConn,
  preset_id: i64,
  preset: Json<PresetPayload>,
  login_token: MaybeLoginToken,
) -> Result<Json<PresetResponse>, PresetWriteError> {
  let user_id = match get_logged_in_user_id(&conn, login_token).await {
    Some(user_id) => user_id,
    None =>
      return Err(PresetWriteError::Unauthorized(String::from(
        "Must be logged in to edit presets",
      ))),
  };

  let payload = preset.into_inner();
  validate_preset(&payload).map_err(|errors| PresetWriteError::Invalid(Json(errors)))?;

  let owner_id = match get_preset_owner(&conn, preset_id).await? {
    Some(owner_id) => owner_id,
    None =>
      return Err(PresetWriteError::NotFound(String::from(
        "No preset found with the supplied id",
      ))),
  };
  if owner_id != user_id {
    return Err(PresetWriteError::Forbidden(String::from(
      "Only the preset's owner can edit it",
    )));
  }

  let changes = NewPreset::from_payload(&payload, user_id);
  let (updated_preset, user_name): (QueryablePreset, String) = conn
    .run(move |conn| -> QueryResult<(QueryablePreset, String)> {
      use crate::schema::{presets, users};

      diesel::update(presets::table.find(preset_id))
        .set(&changes)
        .execute(conn)?;

      presets::table
        .inner_join(users::table)
        .select((presets::all_columns, users::dsl::username))
        .filter(presets::dsl::id.eq(preset_id))
        .first(conn)
    })
    .await
    .map_err(|err| {
      error!("DB error updating preset in DB: {}", err);
      PresetWriteError::Internal(String::from("DB error updating preset in DB"))
    })?;

  updated_preset
    .into_response(user_name)
    .map(Json)
    .map_err(PresetWriteError::Internal)
}

#[delete("/preset/<preset_id>")]
pub async fn delete_preset(
  conn: AmpPresetsDbConn,
  preset_id: i64,
  login_token: MaybeLoginToken,
) -> Result<(), PresetWriteError> {
  let user_id = match get_logged_in_user_id(&conn, login_token).await {
    Some(user_id) => user_id,
    None =>
      return Err(PresetWriteError::Unauthorized(String::from(
        "Must be logged in to delete presets",
      ))),
  };

  let owner_id = match get_preset_owner(&conn, preset_id).await? {
    Some(owner_id) => owner_id,
    None =>
      return Err(PresetWriteError::NotFound(String::from(
        "No preset found with the supplied id",
      ))),
  };
  if owner_id != user_id {
    return Err(PresetWriteError::Forbidden(String::from(
      "Only the preset's owner can delete it",
    )));
  }

  conn
    .run(move |conn| {
      use crate::schema::presets;

      diesel::delete(presets::table.find(preset_id)).execute(conn)
    })
    .await
    .map_err(|err| {
      error!("DB error deleting preset from DB: {}", err);
      PresetWriteError::Internal(String::from("DB error deleting preset from DB"))
    })?;

  Ok(())
}
