//! Client-side narrowing of the fetched preset list, plus query-string
//! round-tripping so filtered views stay shareable.

use std::borrow::Cow;

use common::ModelId;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Sentinel for the model/user selectors meaning "don't narrow"
pub const FILTER_ALL: &str = "all";

fn default_all() -> String { FILTER_ALL.to_string() }

/// One row of the preset list as fetched from the store, owner username
/// denormalized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetListItem {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub model_id: ModelId,
  pub user_id: i64,
  pub user_name: String,
  #[serde(default)]
  pub published: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetFilters {
  #[serde(default)]
  pub search: String,
  #[serde(default = "default_all")]
  pub model_id: String,
  #[serde(default = "default_all")]
  pub user_id: String,
}

impl Default for PresetFilters {
  fn default() -> Self {
    PresetFilters {
      search: String::new(),
      model_id: default_all(),
      user_id: default_all(),
    }
  }
}

fn is_all(selection: &str) -> bool { selection.is_empty() || selection == FILTER_ALL }

impl PresetFilters {
  /// Applies the three filters by sequential narrowing; each one sees only
  /// the previous filter's output.  They're independent predicates, so the
  /// order doesn't change the result.
  pub fn apply<'a>(&self, presets: &'a [PresetListItem]) -> Vec<&'a PresetListItem> {
    let needle = self.search.to_lowercase();

    let by_search: Vec<&PresetListItem> = presets
      .iter()
      .filter(|preset| {
        needle.is_empty()
          || preset.name.to_lowercase().contains(&needle)
          || preset.description.to_lowercase().contains(&needle)
      })
      .collect();

    let by_model: Vec<&PresetListItem> = by_search
      .into_iter()
      .filter(|preset| is_all(&self.model_id) || preset.model_id.as_str() == self.model_id)
      .collect();

    by_model
      .into_iter()
      .filter(|preset| is_all(&self.user_id) || preset.user_id.to_string() == self.user_id)
      .collect()
  }

  /// Query-string rendering of the filter state.  Empty/"all" selections are
  /// omitted so default views produce a clean address.
  pub fn to_query_string(&self) -> String {
    let mut pairs: Vec<String> = Vec::new();
    if !self.search.is_empty() {
      pairs.push(format!("search={}", urlencoding::encode(&self.search)));
    }
    if !is_all(&self.model_id) {
      pairs.push(format!("modelId={}", urlencoding::encode(&self.model_id)));
    }
    if !is_all(&self.user_id) {
      pairs.push(format!("userId={}", urlencoding::encode(&self.user_id)));
    }
    pairs.join("&")
  }

  /// Lenient inverse of [`Self::to_query_string`]: unknown keys and
  /// undecodable values are ignored, missing keys take their defaults.
  pub fn from_query_string(query: &str) -> PresetFilters {
    let mut filters = PresetFilters::default();
    for pair in query.trim_start_matches('?').split('&') {
      if pair.is_empty() {
        continue;
      }
      let (key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
      let value = match urlencoding::decode(raw_value) {
        Ok(value) => Cow::into_owned(value),
        Err(_) => continue,
      };
      if value.is_empty() {
        continue;
      }
      match key {
        "search" => filters.search = value,
        "modelId" => filters.model_id = value,
        "userId" => filters.user_id = value,
        _ => (),
      }
    }
    filters
  }
}

/// Drops a deleted preset from an already-fetched list so the view updates
/// without a refetch.  Returns whether anything was removed.
pub fn remove_by_id(presets: &mut Vec<PresetListItem>, id: i64) -> bool {
  let len_before = presets.len();
  presets.retain(|preset| preset.id != id);
  presets.len() != len_before
}

#[wasm_bindgen]
pub fn filter_presets(presets_json: &str, filters_json: &str) -> Result<String, String> {
  let presets: Vec<PresetListItem> = serde_json::from_str(presets_json).map_err(|err| {
    error!("Invalid preset list passed to filter: {}", err);
    format!("Invalid preset list: {}", err)
  })?;
  let filters: PresetFilters =
    serde_json::from_str(filters_json).map_err(|err| format!("Invalid filters: {}", err))?;
  Ok(serde_json::to_string(&filters.apply(&presets)).unwrap())
}

#[wasm_bindgen]
pub fn filters_to_query(filters_json: &str) -> Result<String, String> {
  let filters: PresetFilters =
    serde_json::from_str(filters_json).map_err(|err| format!("Invalid filters: {}", err))?;
  Ok(filters.to_query_string())
}

#[wasm_bindgen]
pub fn filters_from_query(query: &str) -> String {
  serde_json::to_string(&PresetFilters::from_query_string(query)).unwrap()
}

#[wasm_bindgen]
pub fn remove_preset_from_list(presets_json: &str, preset_id: f64) -> Result<String, String> {
  let mut presets: Vec<PresetListItem> =
    serde_json::from_str(presets_json).map_err(|err| format!("Invalid preset list: {}", err))?;
  remove_by_id(&mut presets, preset_id as i64);
  Ok(serde_json::to_string(&presets).unwrap())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn preset(id: i64, model_id: ModelId, user_id: i64, text: &str) -> PresetListItem {
    PresetListItem {
      id,
      name: text.to_string(),
      description: format!("{} description", text),
      model_id,
      user_id,
      user_name: format!("user{}", user_id),
      published: false,
    }
  }

  fn fixtures() -> Vec<PresetListItem> {
    vec![
      preset(1, ModelId::CubeBaby, 1, "foo"),
      preset(2, ModelId::CubeBabyBass, 2, "bar"),
    ]
  }

  #[test]
  fn each_filter_narrows_independently() {
    let presets = fixtures();

    let by_model = PresetFilters {
      model_id: "cube-baby".into(),
      ..Default::default()
    };
    let result = by_model.apply(&presets);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 1);

    let by_search = PresetFilters {
      search: "bar".into(),
      ..Default::default()
    };
    let result = by_search.apply(&presets);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 2);

    let passthrough = PresetFilters {
      search: String::new(),
      model_id: "all".into(),
      user_id: "all".into(),
    };
    assert_eq!(passthrough.apply(&presets).len(), 2);
  }

  #[test]
  fn search_is_case_insensitive_across_name_and_description() {
    let presets = vec![preset(1, ModelId::CubeBaby, 1, "Warm Clean")];
    for needle in ["warm", "WARM", "clean desc"] {
      let filters = PresetFilters {
        search: needle.into(),
        ..Default::default()
      };
      assert_eq!(filters.apply(&presets).len(), 1, "search {:?}", needle);
    }
  }

  #[test]
  fn filters_compose_by_sequential_narrowing() {
    let mut presets = fixtures();
    presets.push(preset(3, ModelId::CubeBaby, 2, "foo"));

    let filters = PresetFilters {
      search: "foo".into(),
      model_id: "cube-baby".into(),
      user_id: "2".into(),
    };
    let result = filters.apply(&presets);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].id, 3);
  }

  #[test]
  fn query_string_round_trip() {
    let filters = PresetFilters {
      search: "warm clean".into(),
      model_id: "cube-baby".into(),
      user_id: "7".into(),
    };
    let query = filters.to_query_string();
    assert_eq!(query, "search=warm%20clean&modelId=cube-baby&userId=7");
    assert_eq!(PresetFilters::from_query_string(&query), filters);
  }

  #[test]
  fn defaults_produce_an_empty_query() {
    let filters = PresetFilters::default();
    assert_eq!(filters.to_query_string(), "");
    assert_eq!(PresetFilters::from_query_string(""), filters);
  }

  #[test]
  fn query_parsing_is_lenient() {
    let filters = PresetFilters::from_query_string("?modelId=cube-baby-ac&page=3&bogus");
    assert_eq!(filters.model_id, "cube-baby-ac");
    assert_eq!(filters.search, "");
    assert_eq!(filters.user_id, "all");
  }

  #[test]
  fn removing_a_deleted_preset_updates_the_list_in_place() {
    let mut presets = fixtures();
    assert!(remove_by_id(&mut presets, 1));
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0].id, 2);
    assert!(!remove_by_id(&mut presets, 1));
  }
}
