//! State machine backing the preset create/edit form.
//!
//! The central contract is the model-change reconciliation: the knob value
//! mapping is zeroed for the new model's parameter set *only* when the user
//! changes the selector.  Seeding the form from a persisted record sets the
//! model field without touching the record's stored values.

use std::{collections::BTreeMap, str::FromStr};

use fxhash::FxHashMap;

use common::{
  get_model, validate_custom_ir_distance, validate_custom_ir_url, validate_description,
  validate_knob, validate_name, CustomIr, FieldError, KnobParam, ModelId, PresetPayload,
  PresetRecord,
};
use wasm_bindgen::prelude::*;

/// Why the model field changed.  The two cases deliberately carry different
/// knob-value semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelTransition {
  /// The user picked a model in the selector; discards edited knob values.
  ChangedByUser,
  /// The field was filled while seeding the form from a persisted record;
  /// stored values stay.
  PopulatedFromRecord,
}

#[wasm_bindgen]
pub struct PresetForm {
  preset_id: Option<i64>,
  name: String,
  description: String,
  custom_ir_url: String,
  custom_ir_distance: i32,
  model_id: Option<ModelId>,
  knob_values: BTreeMap<KnobParam, i32>,
  errors: FxHashMap<String, String>,
  published: bool,
}

impl Default for PresetForm {
  fn default() -> Self {
    PresetForm {
      preset_id: None,
      name: String::new(),
      description: String::new(),
      custom_ir_url: String::new(),
      custom_ir_distance: 0,
      model_id: None,
      knob_values: BTreeMap::new(),
      errors: FxHashMap::default(),
      published: false,
    }
  }
}

impl PresetForm {
  pub fn set_model(&mut self, model_id: ModelId, transition: ModelTransition) {
    self.model_id = Some(model_id);
    if transition == ModelTransition::ChangedByUser {
      self.knob_values = get_model(model_id).zeroed_knob_values();
    }
  }

  /// Seeds every field from a fetched preset.  The knob values come straight
  /// from the record; nothing is reset until the user touches the selector.
  pub fn populate_from_record(&mut self, record: PresetRecord) {
    self.preset_id = Some(record.id);
    self.name = record.name;
    self.description = record.description;
    match record.custom_ir {
      Some(custom_ir) => {
        self.custom_ir_url = custom_ir.url;
        self.custom_ir_distance = custom_ir.distance;
      },
      None => {
        self.custom_ir_url = String::new();
        self.custom_ir_distance = 0;
      },
    }
    self.published = record.published;
    self.set_model(record.model_id, ModelTransition::PopulatedFromRecord);
    self.knob_values = record.knob_values;
  }

  pub fn model(&self) -> Option<ModelId> { self.model_id }

  pub fn preset_id(&self) -> Option<i64> { self.preset_id }

  pub fn knob_values(&self) -> &BTreeMap<KnobParam, i32> { &self.knob_values }

  pub fn set_knob_value(&mut self, param: KnobParam, value: i32) {
    self.knob_values.insert(param, value);
  }

  pub fn errors(&self) -> &FxHashMap<String, String> { &self.errors }

  /// Error message for one field, or `None` once the field is valid.  Knob
  /// fields are keyed by parameter name.
  fn field_error(&self, field: &str) -> Option<String> {
    match field {
      "name" => validate_name(&self.name),
      "description" => validate_description(&self.description),
      "customIr" =>
        if self.custom_ir_url.is_empty() {
          None
        } else {
          validate_custom_ir_url(&self.custom_ir_url)
        },
      "customIrDistance" =>
        if self.custom_ir_url.is_empty() {
          None
        } else {
          validate_custom_ir_distance(self.custom_ir_distance)
        },
      knob => {
        let (model_id, param) = match (self.model_id, KnobParam::from_str(knob)) {
          (Some(model_id), Ok(param)) => (model_id, param),
          _ => return None,
        };
        let value = match self.knob_values.get(&param) {
          Some(&value) => value,
          None => return None,
        };
        validate_knob(get_model(model_id), param, value)
      },
    }
  }

  /// Blur handler: re-validates one field and updates the error map entry
  /// rendered beside it.
  pub fn blur_field(&mut self, field: &str) -> Option<String> {
    let error = self.field_error(field);
    match &error {
      Some(message) => {
        self.errors.insert(field.to_string(), message.clone());
      },
      None => {
        self.errors.remove(field);
      },
    }
    error
  }

  /// When a custom IR URL is set the model's own cabinet-sim knob is
  /// presented disabled (no drags, de-emphasized).  Its stored value is
  /// intentionally left alone.
  pub fn ir_cab_disabled(&self) -> bool { !self.custom_ir_url.is_empty() }

  pub fn build_payload(&self) -> Result<PresetPayload, Vec<FieldError>> {
    let model_id = match self.model_id {
      Some(model_id) => model_id,
      None => return Err(vec![FieldError::new("model", "Select a model")]),
    };

    let payload = PresetPayload {
      name: self.name.clone(),
      description: self.description.clone(),
      model_id,
      knob_values: self.knob_values.clone(),
      custom_ir: if self.custom_ir_url.is_empty() {
        None
      } else {
        Some(CustomIr {
          url: self.custom_ir_url.clone(),
          distance: self.custom_ir_distance,
        })
      },
      published: self.published,
    };
    common::validate_preset(&payload)?;
    Ok(payload)
  }

  /// Full validation pass, refreshing the error map.  Returns whether the
  /// form is submittable.
  pub fn validate(&mut self) -> bool {
    match self.build_payload() {
      Ok(_) => {
        self.errors.clear();
        true
      },
      Err(field_errors) => {
        self.errors = field_errors
          .into_iter()
          .map(|err| (err.field, err.message))
          .collect();
        false
      },
    }
  }

  /// Validates and, if clean, hands back the payload for the store's create
  /// or update call.
  pub fn submit(&mut self) -> Result<PresetPayload, Vec<FieldError>> {
    match self.build_payload() {
      Ok(payload) => {
        self.errors.clear();
        Ok(payload)
      },
      Err(field_errors) => {
        self.errors = field_errors
          .iter()
          .map(|err| (err.field.clone(), err.message.clone()))
          .collect();
        Err(field_errors)
      },
    }
  }
}

#[wasm_bindgen]
impl PresetForm {
  #[wasm_bindgen(constructor)]
  pub fn new() -> PresetForm { PresetForm::default() }

  /// Seeds the form from a preset fetched for editing, as JSON
  pub fn load_record(&mut self, preset_json: &str) -> Result<(), String> {
    let record: PresetRecord = serde_json::from_str(preset_json).map_err(|err| {
      error!("Invalid preset record passed to form: {}", err);
      format!("Invalid preset record: {}", err)
    })?;
    self.populate_from_record(record);
    Ok(())
  }

  /// User-initiated model selection; zeroes the knob values for the new
  /// model's parameter set.
  pub fn select_model(&mut self, model_id: &str) -> Result<(), String> {
    let model_id = ModelId::from_str(model_id).map_err(|()| {
      warn!("Unknown model id selected: {}", model_id);
      format!("Unknown model: {}", model_id)
    })?;
    self.set_model(model_id, ModelTransition::ChangedByUser);
    Ok(())
  }

  pub fn set_name(&mut self, name: &str) { self.name = name.to_string(); }

  pub fn set_description(&mut self, description: &str) {
    self.description = description.to_string();
  }

  pub fn set_custom_ir_url(&mut self, url: &str) { self.custom_ir_url = url.to_string(); }

  pub fn set_custom_ir_distance(&mut self, distance: i32) { self.custom_ir_distance = distance; }

  pub fn set_knob(&mut self, param: &str, value: i32) -> Result<(), String> {
    let param = KnobParam::from_str(param).map_err(|()| format!("Unknown knob: {}", param))?;
    self.set_knob_value(param, value);
    Ok(())
  }

  pub fn knob_value(&self, param: &str) -> Option<i32> {
    let param = KnobParam::from_str(param).ok()?;
    self.knob_values.get(&param).copied()
  }

  pub fn handle_blur(&mut self, field: &str) -> Option<String> { self.blur_field(field) }

  #[wasm_bindgen(js_name = ir_cab_disabled)]
  pub fn ir_cab_disabled_js(&self) -> bool { self.ir_cab_disabled() }

  /// Current field errors as a `{field: message}` JSON object
  pub fn errors_json(&self) -> String { serde_json::to_string(&self.errors).unwrap() }

  /// Validates and returns the serialized payload for the store, or the
  /// serialized `{field: message}` error map.
  pub fn submit_json(&mut self) -> Result<String, String> {
    match self.submit() {
      Ok(payload) => Ok(serde_json::to_string(&payload).unwrap()),
      Err(_) => Err(self.errors_json()),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record() -> PresetRecord {
    PresetRecord {
      id: 42,
      name: "Garage fuzz".into(),
      description: "All knobs up".into(),
      model_id: ModelId::CubeBaby,
      knob_values: get_model(ModelId::CubeBaby)
        .params()
        .map(|param| (param, 5))
        .collect(),
      custom_ir: None,
      user_id: 7,
      published: false,
    }
  }

  #[test]
  fn user_model_change_zeroes_values_for_new_param_set() {
    let mut form = PresetForm::default();
    form.set_model(ModelId::CubeBaby, ModelTransition::ChangedByUser);
    form.set_knob_value(KnobParam::Gain, 6);

    form.set_model(ModelId::CubeBabyBass, ModelTransition::ChangedByUser);

    let expected: Vec<KnobParam> = get_model(ModelId::CubeBabyBass).params().collect();
    let actual: Vec<KnobParam> = form.knob_values().keys().copied().collect();
    let mut expected_sorted = expected;
    expected_sorted.sort();
    assert_eq!(actual, expected_sorted);
    assert!(form.knob_values().values().all(|&v| v == 0));
  }

  #[test]
  fn loading_a_record_seeds_values_without_reset() {
    let mut form = PresetForm::default();
    form.populate_from_record(record());

    assert_eq!(form.model(), Some(ModelId::CubeBaby));
    assert_eq!(form.preset_id(), Some(42));
    assert!(form.knob_values().values().all(|&v| v == 5));

    // only a subsequent user-initiated change resets
    form.set_model(ModelId::CubeBaby, ModelTransition::ChangedByUser);
    assert!(form.knob_values().values().all(|&v| v == 0));
  }

  #[test]
  fn blur_validation_sets_and_clears_field_errors() {
    let mut form = PresetForm::default();
    form.set_model(ModelId::CubeBaby, ModelTransition::ChangedByUser);

    assert!(form.blur_field("name").is_some());
    assert_eq!(form.errors().len(), 1);
    form.set_name("Crunch");
    assert!(form.blur_field("name").is_none());
    assert!(form.errors().is_empty());

    form.set_knob_value(KnobParam::Gain, 8);
    let err = form.blur_field("gain").unwrap();
    assert!(err.contains("GAIN"));
    form.set_knob_value(KnobParam::Gain, 7);
    assert!(form.blur_field("gain").is_none());
  }

  #[test]
  fn custom_ir_disables_ir_cab_without_clearing_it() {
    let mut form = PresetForm::default();
    form.populate_from_record(record());
    assert!(!form.ir_cab_disabled());

    form.set_custom_ir_url("https://irs.example.com/cab.wav");
    assert!(form.ir_cab_disabled());
    assert_eq!(form.knob_values()[&KnobParam::IrCab], 5);

    form.set_custom_ir_url("");
    assert!(!form.ir_cab_disabled());
  }

  #[test]
  fn submit_produces_validated_payload() {
    let mut form = PresetForm::default();
    assert!(form.submit().is_err());

    form.set_model(ModelId::CubeBabyAc, ModelTransition::ChangedByUser);
    form.set_name("Busker");
    form.set_description("Anti-feedback cranked for outdoor sets");
    form.set_knob_value(KnobParam::AntiFb, 8);

    let payload = form.submit().expect("form should be valid");
    assert_eq!(payload.model_id, ModelId::CubeBabyAc);
    assert_eq!(payload.knob_values[&KnobParam::AntiFb], 8);
    assert_eq!(payload.custom_ir, None);
    assert!(form.errors().is_empty());
  }

  #[test]
  fn submit_collects_field_errors() {
    let mut form = PresetForm::default();
    form.set_model(ModelId::CubeBaby, ModelTransition::ChangedByUser);
    form.set_name("Over the top");
    form.set_description("gain past the stop");
    form.set_knob_value(KnobParam::Gain, 8);
    form.set_custom_ir_url("not a url");

    let errors = form.submit().unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["gain", "customIr"]);
    assert_eq!(form.errors().len(), 2);
  }

  #[test]
  fn load_record_json_round_trip() {
    let serialized = serde_json::to_string(&record()).unwrap();
    let mut form = PresetForm::new();
    form.load_record(&serialized).unwrap();
    assert_eq!(form.knob_value("ir_cab"), Some(5));
    assert!(form.load_record("{not json").is_err());
  }
}
