use rocket::{http::Status, response::status::Custom, serde::json::Json};

use crate::{
  db_util::login::{
    delete_login_token, generate_login_token, get_user_by_email, get_user_by_username,
    insert_new_login_token, insert_new_user, touch_last_login, verify_password,
  },
  models::user::{LoginRequest, MaybeLoginToken, Profile, RegisterRequest},
  AmpPresetsDbConn,
};

#[post("/login", data = "<login_request>")]
pub async fn login(
  conn: AmpPresetsDbConn,
  login_request: Json<LoginRequest>,
) -> Result<String, Custom<String>> {
  let login_request = login_request.into_inner();
  let user = match get_user_by_email(&conn, login_request.email)
    .await
    .map_err(|err| Custom(Status::InternalServerError, err))?
  {
    Some(user) => user,
    None =>
      return Err(Custom(
        Status::Unauthorized,
        String::from("Invalid email or password"),
      )),
  };

  if !verify_password(&login_request.password, &user.hashed_password) {
    return Err(Custom(
      Status::Unauthorized,
      String::from("Invalid email or password"),
    ));
  }

  if let Err(err) = touch_last_login(&conn, user.id).await {
    warn!("DB error updating last login for user {}: {}", user.id, err);
  }

  let login_token = generate_login_token();
  insert_new_login_token(&conn, user.id, login_token.clone())
    .await
    .map_err(|err| {
      error!("DB error inserting login token: {}", err);
      Custom(Status::InternalServerError, String::from("DB error"))
    })?;

  Ok(login_token)
}

#[post("/register", data = "<register_request>")]
pub async fn register(
  conn: AmpPresetsDbConn,
  register_request: Json<RegisterRequest>,
) -> Result<String, Custom<String>> {
  let register_request = register_request.into_inner();
  if register_request.username.trim().is_empty() || !register_request.email.contains('@') {
    return Err(Custom(
      Status::BadRequest,
      String::from("A username and a valid email are required"),
    ));
  }

  if get_user_by_username(&conn, register_request.username.clone())
    .await
    .map_err(|err| Custom(Status::InternalServerError, err))?
    .is_some()
  {
    return Err(Custom(
      Status::BadRequest,
      String::from("Username already exists"),
    ));
  }
  if get_user_by_email(&conn, register_request.email.clone())
    .await
    .map_err(|err| Custom(Status::InternalServerError, err))?
    .is_some()
  {
    return Err(Custom(
      Status::BadRequest,
      String::from("An account already exists for that email"),
    ));
  }

  let user_id = insert_new_user(
    &conn,
    register_request.username,
    register_request.email,
    register_request.password,
  )
  .await
  .map_err(|err| {
    error!("DB error inserting new user: {}", err);
    Custom(Status::InternalServerError, String::from("DB error"))
  })?;

  let login_token = generate_login_token();
  insert_new_login_token(&conn, user_id, login_token.clone())
    .await
    .map_err(|err| {
      error!("DB error inserting login token: {}", err);
      Custom(Status::InternalServerError, String::from("DB error"))
    })?;

  Ok(login_token)
}

#[post("/logout")]
pub async fn logout(
  conn: AmpPresetsDbConn,
  login_token: MaybeLoginToken,
) -> Result<(), Custom<String>> {
  let token = match login_token.0 {
    Some(token) => token,
    // signing out without a session is a no-op, not an error
    None => return Ok(()),
  };

  delete_login_token(&conn, token).await.map_err(|err| {
    error!("DB error deleting login token: {}", err);
    Custom(Status::InternalServerError, String::from("DB error"))
  })
}

#[get("/logged_in_user")]
pub async fn get_logged_in_user(
  conn: AmpPresetsDbConn,
  login_token: MaybeLoginToken,
) -> Result<Json<Profile>, Custom<String>> {
  let user = match crate::db_util::login::get_user_by_login_token(&conn, login_token).await {
    Some(user) => user,
    None =>
      return Err(Custom(
        Status::Unauthorized,
        String::from("Invalid login token"),
      )),
  };

  Ok(Json(Profile {
    id: user.id,
    username: user.username,
  }))
}
