use fxhash::FxHashMap;

pub mod login;

// Facilitate getting the primary key of the last inserted item
//
// https://github.com/diesel-rs/diesel/issues/1011#issuecomment-315536931
define_sql_function! {
  fn last_insert_id() -> BigInt;
}

/// Lookup table for denormalizing preset owners into list responses
pub fn build_username_map(users: Vec<(i64, String)>) -> FxHashMap<i64, String> {
  let mut usernames_by_id: FxHashMap<i64, String> = FxHashMap::default();
  for (id, username) in users {
    usernames_by_id.insert(id, username);
  }
  usernames_by_id
}
