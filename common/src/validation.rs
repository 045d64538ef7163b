//! Preset validation rules.  The editor form runs these per-field on blur and
//! in full on submit; the backend runs the full pass again before any write so
//! a hand-built request can't break the range invariants.

use crate::{
  amp_models::{get_model, AmpModel, KnobParam},
  preset::PresetPayload,
};

/// A validation failure scoped to one form field.  Knob violations use the
/// parameter name (`ir_cab`, ...) as the field key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
    FieldError {
      field: field.into(),
      message: message.into(),
    }
  }
}

pub fn validate_name(name: &str) -> Option<String> {
  if name.trim().is_empty() {
    Some(String::from("Name is required"))
  } else {
    None
  }
}

pub fn validate_description(description: &str) -> Option<String> {
  if description.trim().is_empty() {
    Some(String::from("Description is required"))
  } else {
    None
  }
}

/// Accepts `http(s)://` URLs with a dotted host.  Deliberately shallow; the
/// store treats the URL as an opaque reference.
pub fn is_basic_url(s: &str) -> bool {
  let rest = match s.strip_prefix("https://").or_else(|| s.strip_prefix("http://")) {
    Some(rest) => rest,
    None => return false,
  };
  if rest.chars().any(char::is_whitespace) {
    return false;
  }
  let host = rest.split(['/', '?', '#']).next().unwrap_or("");
  let host = host.split(':').next().unwrap_or(host);
  !host.is_empty() && host.contains('.') && !host.starts_with('.') && !host.ends_with('.')
}

pub fn validate_custom_ir_url(url: &str) -> Option<String> {
  if is_basic_url(url) {
    None
  } else {
    Some(String::from("Custom IR must be a valid URL"))
  }
}

pub fn validate_custom_ir_distance(distance: i32) -> Option<String> {
  if (0..=100).contains(&distance) {
    None
  } else {
    Some(String::from("Custom IR distance must be between 0 and 100"))
  }
}

pub fn validate_knob(model: &AmpModel, param: KnobParam, value: i32) -> Option<String> {
  match model.knob_range(param) {
    Some((min, max)) =>
      if value < min || value > max {
        Some(format!("{} must be between {} and {}", param.label(), min, max))
      } else {
        None
      },
    None => Some(format!("{} is not a parameter of {}", param.label(), model.name)),
  }
}

/// Full validation pass over a preset payload.  Returns every failure at once
/// so the caller can render them all beside their fields.
pub fn validate_preset(payload: &PresetPayload) -> Result<(), Vec<FieldError>> {
  let mut errors: Vec<FieldError> = Vec::new();

  if let Some(msg) = validate_name(&payload.name) {
    errors.push(FieldError::new("name", msg));
  }
  if let Some(msg) = validate_description(&payload.description) {
    errors.push(FieldError::new("description", msg));
  }

  let model = get_model(payload.model_id);
  for (&param, &value) in &payload.knob_values {
    if let Some(msg) = validate_knob(model, param, value) {
      errors.push(FieldError::new(param.as_str(), msg));
    }
  }
  // the value mapping must carry one entry per model parameter
  for param in model.params() {
    if !payload.knob_values.contains_key(&param) {
      errors.push(FieldError::new(param.as_str(), format!("{} is required", param.label())));
    }
  }

  if let Some(custom_ir) = &payload.custom_ir {
    if let Some(msg) = validate_custom_ir_url(&custom_ir.url) {
      errors.push(FieldError::new("customIr", msg));
    }
    if let Some(msg) = validate_custom_ir_distance(custom_ir.distance) {
      errors.push(FieldError::new("customIrDistance", msg));
    }
  }

  if errors.is_empty() {
    Ok(())
  } else {
    Err(errors)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{amp_models::ModelId, preset::CustomIr};

  fn valid_payload() -> PresetPayload {
    PresetPayload {
      name: "Warm clean".into(),
      description: "Scooped mids, long reverb tail".into(),
      model_id: ModelId::CubeBaby,
      knob_values: get_model(ModelId::CubeBaby).zeroed_knob_values(),
      custom_ir: None,
      published: false,
    }
  }

  #[test]
  fn accepts_values_exactly_at_bounds() {
    let mut payload = valid_payload();
    payload.knob_values.insert(KnobParam::Mix, 118);
    payload.knob_values.insert(KnobParam::Gain, 0);
    assert!(validate_preset(&payload).is_ok());
  }

  #[test]
  fn rejects_one_unit_outside_either_bound() {
    for (param, value) in [(KnobParam::Mix, 119), (KnobParam::Gain, -1)] {
      let mut payload = valid_payload();
      payload.knob_values.insert(param, value);
      let errors = validate_preset(&payload).unwrap_err();
      assert_eq!(errors.len(), 1);
      assert_eq!(errors[0].field, param.as_str());
      assert!(errors[0].message.contains(&param.label()));
    }
  }

  #[test]
  fn rejects_param_from_another_model() {
    let mut payload = valid_payload();
    // `space` belongs to the bass/AC variants, not the base Cube Baby
    payload.knob_values.insert(KnobParam::Space, 3);
    let errors = validate_preset(&payload).unwrap_err();
    assert_eq!(errors[0].field, "space");
    assert!(errors[0].message.contains("not a parameter"));
  }

  #[test]
  fn rejects_missing_param() {
    let mut payload = valid_payload();
    payload.knob_values.remove(&KnobParam::Tone);
    let errors = validate_preset(&payload).unwrap_err();
    assert_eq!(errors[0].field, "tone");
  }

  #[test]
  fn rejects_empty_name_and_description() {
    let mut payload = valid_payload();
    payload.name = "  ".into();
    payload.description = String::new();
    let errors = validate_preset(&payload).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["name", "description"]);
  }

  #[test]
  fn custom_ir_checks() {
    let mut payload = valid_payload();
    payload.custom_ir = Some(CustomIr {
      url: "ftp://irs.example.com/412.wav".into(),
      distance: 101,
    });
    let errors = validate_preset(&payload).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["customIr", "customIrDistance"]);

    payload.custom_ir = Some(CustomIr {
      url: "https://irs.example.com/412.wav".into(),
      distance: 100,
    });
    assert!(validate_preset(&payload).is_ok());
  }

  #[test]
  fn basic_url_pattern() {
    assert!(is_basic_url("https://example.com"));
    assert!(is_basic_url("http://files.example.co.uk/a/b.wav?x=1"));
    assert!(is_basic_url("https://example.com:8080/ir.wav"));
    assert!(!is_basic_url(""));
    assert!(!is_basic_url("example.com"));
    assert!(!is_basic_url("https://"));
    assert!(!is_basic_url("https://nodot"));
    assert!(!is_basic_url("https://exa mple.com"));
    assert!(!is_basic_url("https://.com"));
  }
}
