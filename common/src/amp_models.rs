//! The static hardware amplifier model catalog.
//!
//! Parameter identifiers are a closed enumeration rather than free-form
//! strings; an unknown parameter name in a payload fails deserialization
//! instead of flowing through to range checks.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{ser::SerializeMap, Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelId {
  CubeBaby,
  CubeBabyBass,
  CubeBabyAc,
}

impl ModelId {
  pub fn as_str(&self) -> &'static str {
    match self {
      ModelId::CubeBaby => "cube-baby",
      ModelId::CubeBabyBass => "cube-baby-bass",
      ModelId::CubeBabyAc => "cube-baby-ac",
    }
  }
}

impl fmt::Display for ModelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ModelId {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "cube-baby" => Ok(ModelId::CubeBaby),
      "cube-baby-bass" => Ok(ModelId::CubeBabyBass),
      "cube-baby-ac" => Ok(ModelId::CubeBabyAc),
      _ => Err(()),
    }
  }
}

/// One knob on some amp model.  The wire spellings (`ir_cab`, `anti_fb`, ...)
/// match the hardware editor's parameter names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnobParam {
  Volume,
  IrCab,
  Reverb,
  Mix,
  Fb,
  Time,
  Mod,
  Tone,
  Gain,
  Type,
  Space,
  Comp,
  Bass,
  Mid,
  Treb,
  Boost,
  AntiFb,
}

impl KnobParam {
  pub fn as_str(&self) -> &'static str {
    match self {
      KnobParam::Volume => "volume",
      KnobParam::IrCab => "ir_cab",
      KnobParam::Reverb => "reverb",
      KnobParam::Mix => "mix",
      KnobParam::Fb => "fb",
      KnobParam::Time => "time",
      KnobParam::Mod => "mod",
      KnobParam::Tone => "tone",
      KnobParam::Gain => "gain",
      KnobParam::Type => "type",
      KnobParam::Space => "space",
      KnobParam::Comp => "comp",
      KnobParam::Bass => "bass",
      KnobParam::Mid => "mid",
      KnobParam::Treb => "treb",
      KnobParam::Boost => "boost",
      KnobParam::AntiFb => "anti_fb",
    }
  }

  /// Human-facing label rendered next to the knob, like "IR CAB"
  pub fn label(&self) -> String { self.as_str().replace('_', " ").to_uppercase() }
}

impl fmt::Display for KnobParam {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for KnobParam {
  type Err = ();

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "volume" => Ok(KnobParam::Volume),
      "ir_cab" => Ok(KnobParam::IrCab),
      "reverb" => Ok(KnobParam::Reverb),
      "mix" => Ok(KnobParam::Mix),
      "fb" => Ok(KnobParam::Fb),
      "time" => Ok(KnobParam::Time),
      "mod" => Ok(KnobParam::Mod),
      "tone" => Ok(KnobParam::Tone),
      "gain" => Ok(KnobParam::Gain),
      "type" => Ok(KnobParam::Type),
      "space" => Ok(KnobParam::Space),
      "comp" => Ok(KnobParam::Comp),
      "bass" => Ok(KnobParam::Bass),
      "mid" => Ok(KnobParam::Mid),
      "treb" => Ok(KnobParam::Treb),
      "boost" => Ok(KnobParam::Boost),
      "anti_fb" => Ok(KnobParam::AntiFb),
      _ => Err(()),
    }
  }
}

#[derive(Clone, Copy, Debug)]
pub struct KnobSpec {
  pub param: KnobParam,
  pub min: i32,
  pub max: i32,
}

const fn knob(param: KnobParam, min: i32, max: i32) -> KnobSpec { KnobSpec { param, min, max } }

#[derive(Clone, Copy, Debug)]
pub struct AmpModel {
  pub id: ModelId,
  pub name: &'static str,
  pub knobs: &'static [KnobSpec],
}

impl AmpModel {
  pub fn knob_range(&self, param: KnobParam) -> Option<(i32, i32)> {
    self
      .knobs
      .iter()
      .find(|spec| spec.param == param)
      .map(|spec| (spec.min, spec.max))
  }

  pub fn params(&self) -> impl Iterator<Item = KnobParam> + '_ {
    self.knobs.iter().map(|spec| spec.param)
  }

  /// Fresh value mapping for this model with every knob at zero
  pub fn zeroed_knob_values(&self) -> BTreeMap<KnobParam, i32> {
    self.params().map(|param| (param, 0)).collect()
  }
}

// Serialized as `{id, name, knobs: {param: [min, max]}}`, the shape the
// editor UI consumes from `GET /models`.
impl Serialize for AmpModel {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    struct KnobRanges(&'static [KnobSpec]);

    impl Serialize for KnobRanges {
      fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for spec in self.0 {
          map.serialize_entry(spec.param.as_str(), &[spec.min, spec.max])?;
        }
        map.end()
      }
    }

    let mut s = serializer.serialize_struct("AmpModel", 3)?;
    s.serialize_field("id", &self.id)?;
    s.serialize_field("name", self.name)?;
    s.serialize_field("knobs", &KnobRanges(self.knobs))?;
    s.end()
  }
}

pub static ALL_MODELS: [AmpModel; 3] = [
  AmpModel {
    id: ModelId::CubeBaby,
    name: "Cube Baby",
    knobs: &[
      knob(KnobParam::Volume, 0, 127),
      knob(KnobParam::IrCab, 0, 8),
      knob(KnobParam::Reverb, 0, 15),
      knob(KnobParam::Mix, 0, 118),
      knob(KnobParam::Fb, 0, 127),
      knob(KnobParam::Time, 0, 31),
      knob(KnobParam::Mod, 0, 15),
      knob(KnobParam::Tone, 0, 15),
      knob(KnobParam::Gain, 0, 7),
      knob(KnobParam::Type, 0, 8),
    ],
  },
  AmpModel {
    id: ModelId::CubeBabyBass,
    name: "Cube Baby Bass",
    knobs: &[
      knob(KnobParam::Volume, 0, 127),
      knob(KnobParam::IrCab, 0, 8),
      knob(KnobParam::Time, 0, 127),
      knob(KnobParam::Space, 0, 30),
      knob(KnobParam::Mod, 0, 14),
      knob(KnobParam::Comp, 0, 8),
      knob(KnobParam::Bass, 0, 127),
      knob(KnobParam::Mid, 0, 127),
      knob(KnobParam::Treb, 0, 127),
      knob(KnobParam::Boost, 0, 127),
    ],
  },
  AmpModel {
    id: ModelId::CubeBabyAc,
    name: "Cube Baby AC",
    knobs: &[
      knob(KnobParam::Volume, 0, 127),
      knob(KnobParam::IrCab, 0, 8),
      knob(KnobParam::Time, 0, 127),
      knob(KnobParam::Space, 0, 31),
      knob(KnobParam::Mod, 0, 15),
      knob(KnobParam::AntiFb, 0, 8),
      knob(KnobParam::Comp, 0, 8),
      knob(KnobParam::Bass, 0, 127),
      knob(KnobParam::Mid, 0, 127),
      knob(KnobParam::Treb, 0, 127),
    ],
  },
];

pub fn get_model(id: ModelId) -> &'static AmpModel {
  ALL_MODELS
    .iter()
    .find(|model| model.id == id)
    .expect("every `ModelId` variant has a catalog entry")
}

#[test]
fn test_catalog_integrity() {
  for model in &ALL_MODELS {
    assert!(!model.knobs.is_empty());
    for spec in model.knobs {
      assert!(spec.min <= spec.max, "{} {}", model.id, spec.param);
    }
    // no duplicate params within one model
    let zeroed = model.zeroed_knob_values();
    assert_eq!(zeroed.len(), model.knobs.len());
  }

  assert_eq!(get_model(ModelId::CubeBaby).knob_range(KnobParam::IrCab), Some((0, 8)));
  assert_eq!(get_model(ModelId::CubeBabyBass).knob_range(KnobParam::Reverb), None);
}

#[test]
fn test_wire_spellings() {
  assert_eq!(serde_json::to_string(&ModelId::CubeBabyAc).unwrap(), "\"cube-baby-ac\"");
  assert_eq!(serde_json::to_string(&KnobParam::IrCab).unwrap(), "\"ir_cab\"");
  assert_eq!(serde_json::to_string(&KnobParam::AntiFb).unwrap(), "\"anti_fb\"");
  assert_eq!(serde_json::to_string(&KnobParam::Type).unwrap(), "\"type\"");

  for model in &ALL_MODELS {
    assert_eq!(model.id.as_str().parse::<ModelId>(), Ok(model.id));
    for spec in model.knobs {
      assert_eq!(spec.param.as_str().parse::<KnobParam>(), Ok(spec.param));
    }
  }

  assert_eq!(KnobParam::IrCab.label(), "IR CAB");
  assert!("wah".parse::<KnobParam>().is_err());
}

#[test]
fn test_model_serialization_shape() {
  let serialized = serde_json::to_value(get_model(ModelId::CubeBaby)).unwrap();
  assert_eq!(serialized["id"], "cube-baby");
  assert_eq!(serialized["name"], "Cube Baby");
  assert_eq!(serialized["knobs"]["mix"], serde_json::json!([0, 118]));
  assert_eq!(serialized["knobs"].as_object().unwrap().len(), 10);
}
