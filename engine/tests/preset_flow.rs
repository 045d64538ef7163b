//! End-to-end exercises of the editor flows: seed a form from a fetched
//! preset, edit it, swap models, submit, and push the result through the
//! list filters.

use common::{get_model, KnobParam, ModelId, PresetRecord};
use engine::{
  filter::{remove_by_id, PresetFilters, PresetListItem},
  preset_form::PresetForm,
};

fn stored_preset() -> PresetRecord {
  PresetRecord {
    id: 9,
    name: "Bedroom crunch".into(),
    description: "Low volume, high gain".into(),
    model_id: ModelId::CubeBaby,
    knob_values: get_model(ModelId::CubeBaby)
      .params()
      .map(|param| (param, 3))
      .collect(),
    custom_ir: None,
    user_id: 4,
    published: true,
  }
}

#[test]
fn edit_flow_keeps_stored_values_until_user_swaps_models() {
  let mut form = PresetForm::new();
  form.load_record(&serde_json::to_string(&stored_preset()).unwrap()).unwrap();

  // seeded, not reset
  assert_eq!(form.knob_value("gain"), Some(3));

  // an edit within range submits cleanly
  form.set_knob("gain", 7).unwrap();
  let payload = form.submit().expect("edited form should validate");
  assert_eq!(payload.knob_values[&KnobParam::Gain], 7);
  assert!(payload.published);

  // the user swapping models discards the edits for the new parameter set
  form.select_model("cube-baby-bass").unwrap();
  assert_eq!(form.knob_value("gain"), None);
  assert_eq!(form.knob_value("boost"), Some(0));
  let keys: Vec<KnobParam> = form.knob_values().keys().copied().collect();
  let mut expected: Vec<KnobParam> = get_model(ModelId::CubeBabyBass).params().collect();
  expected.sort();
  assert_eq!(keys, expected);
}

#[test]
fn submit_payload_matches_what_the_filter_consumes() {
  let mut form = PresetForm::new();
  form.select_model("cube-baby-ac").unwrap();
  form.set_name("Street corner");
  form.set_description("Acoustic with room IR");
  form.set_custom_ir_url("https://irs.example.com/room.wav");
  form.set_custom_ir_distance(55);

  let payload = form.submit().expect("form should validate");

  // pretend the store assigned id 11 and echo it into the list view
  let listed = PresetListItem {
    id: 11,
    name: payload.name.clone(),
    description: payload.description.clone(),
    model_id: payload.model_id,
    user_id: 4,
    user_name: "maria".into(),
    published: payload.published,
  };
  let others = PresetListItem {
    id: 12,
    name: "Doom bass".into(),
    description: "Wall of fuzz".into(),
    model_id: ModelId::CubeBabyBass,
    user_id: 5,
    user_name: "jo".into(),
    published: false,
  };
  let mut presets = vec![listed, others];

  let filters = PresetFilters::from_query_string("search=street&modelId=cube-baby-ac");
  let narrowed = filters.apply(&presets);
  assert_eq!(narrowed.len(), 1);
  assert_eq!(narrowed[0].id, 11);
  assert_eq!(filters.to_query_string(), "search=street&modelId=cube-baby-ac");

  // deleting drops it from the view without a refetch
  assert!(remove_by_id(&mut presets, 11));
  assert!(filters.apply(&presets).is_empty());
}
