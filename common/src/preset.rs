use std::collections::BTreeMap;

use crate::amp_models::{KnobParam, ModelId};

/// Reference to an external impulse response overriding the model's built-in
/// cabinet simulation.  `distance` is the mic distance in percent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomIr {
  pub url: String,
  pub distance: i32,
}

/// The validated body of a preset create/update request, produced by the
/// editor form and consumed by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetPayload {
  pub name: String,
  pub description: String,
  pub model_id: ModelId,
  pub knob_values: BTreeMap<KnobParam, i32>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub custom_ir: Option<CustomIr>,
  #[serde(default)]
  pub published: bool,
}

/// A persisted preset as fetched from the store, used to seed the editor
/// form.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetRecord {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub model_id: ModelId,
  pub knob_values: BTreeMap<KnobParam, i32>,
  #[serde(default)]
  pub custom_ir: Option<CustomIr>,
  pub user_id: i64,
  #[serde(default)]
  pub published: bool,
}

#[test]
fn test_payload_round_trip() {
  let payload = PresetPayload {
    name: "Lead".into(),
    description: "Tight high-gain lead".into(),
    model_id: ModelId::CubeBaby,
    knob_values: [(KnobParam::Volume, 100), (KnobParam::Gain, 7)].into_iter().collect(),
    custom_ir: Some(CustomIr {
      url: "https://irs.example.com/412.wav".into(),
      distance: 30,
    }),
    published: false,
  };

  let serialized = serde_json::to_string(&payload).unwrap();
  assert!(serialized.contains("\"modelId\":\"cube-baby\""));
  assert!(serialized.contains("\"gain\":7"));
  let deserialized: PresetPayload = serde_json::from_str(&serialized).unwrap();
  assert_eq!(deserialized, payload);
}

#[test]
fn test_unknown_knob_param_rejected_by_serde() {
  let res = serde_json::from_str::<PresetPayload>(
    r#"{"name":"x","description":"y","modelId":"cube-baby","knobValues":{"wah":3}}"#,
  );
  assert!(res.is_err());
}
