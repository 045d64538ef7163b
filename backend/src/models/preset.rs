use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use common::{CustomIr, KnobParam, ModelId, PresetPayload};

use crate::schema::presets;

/// Raw row shape of the `presets` table.  `knob_values` holds a JSON object
/// keyed by parameter name; it's parsed against the typed catalog on the way
/// out.
#[derive(Queryable)]
pub struct QueryablePreset {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub model_id: String,
  pub knob_values: String,
  pub custom_ir_url: Option<String>,
  pub custom_ir_distance: Option<i32>,
  pub published: bool,
  pub user_id: i64,
  pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = presets, treat_none_as_null = true)]
pub struct NewPreset {
  pub name: String,
  pub description: String,
  pub model_id: String,
  pub knob_values: String,
  pub custom_ir_url: Option<String>,
  pub custom_ir_distance: Option<i32>,
  pub published: bool,
  pub user_id: i64,
}

impl NewPreset {
  /// Row shape for a payload that already passed validation
  pub fn from_payload(payload: &PresetPayload, user_id: i64) -> Self {
    NewPreset {
      name: payload.name.clone(),
      description: payload.description.clone(),
      model_id: payload.model_id.as_str().to_string(),
      knob_values: serde_json::to_string(&payload.knob_values).unwrap(),
      custom_ir_url: payload.custom_ir.as_ref().map(|ir| ir.url.clone()),
      custom_ir_distance: payload.custom_ir.as_ref().map(|ir| ir.distance),
      published: payload.published,
      user_id,
    }
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetDescriptor {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub model_id: ModelId,
  pub user_id: i64,
  pub user_name: String,
  pub published: bool,
  pub created_at: Option<NaiveDateTime>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetResponse {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub model_id: ModelId,
  pub knob_values: BTreeMap<KnobParam, i32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub custom_ir: Option<CustomIr>,
  pub user_id: i64,
  pub user_name: String,
  pub published: bool,
  pub created_at: Option<NaiveDateTime>,
}

impl QueryablePreset {
  pub fn into_response(self, user_name: String) -> Result<PresetResponse, String> {
    let model_id: ModelId = self.model_id.parse().map_err(|()| {
      error!("Unknown model id `{}` stored for preset {}", self.model_id, self.id);
      String::from("Invalid model id found in DB")
    })?;
    let knob_values: BTreeMap<KnobParam, i32> =
      serde_json::from_str(&self.knob_values).map_err(|err| {
        error!("Invalid knob values stored for preset {}: {}", self.id, err);
        String::from("Invalid knob values found in DB")
      })?;
    let custom_ir = self.custom_ir_url.map(|url| CustomIr {
      url,
      distance: self.custom_ir_distance.unwrap_or(0),
    });

    Ok(PresetResponse {
      id: self.id,
      name: self.name,
      description: self.description,
      model_id,
      knob_values,
      custom_ir,
      user_id: self.user_id,
      user_name,
      published: self.published,
      created_at: self.created_at,
    })
  }
}
