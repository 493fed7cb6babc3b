use std::collections::BTreeMap;

use crate::error::PreferenceError;

/// Key holding the active theme id.
pub const SELECTED_THEME_KEY: &str =
  "selectedTheme";
/// Key holding the date string of the
/// last automatic daily message.
pub const WORD_OF_DAY_LAST_SHOWN_KEY:
  &str = "wordOfDayLastShown";

/// String key/value storage that
/// survives reloads.
pub trait PreferenceStore {
  fn get(
    &self,
    key: &str
  ) -> Option<String>;

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), PreferenceError>;
}

impl<T> PreferenceStore for &mut T
where
  T: PreferenceStore + ?Sized
{
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    (**self).get(key)
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), PreferenceError> {
    (**self).set(key, value)
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct MemoryStore {
  values: BTreeMap<String, String>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_value(
    mut self,
    key: &str,
    value: &str
  ) -> Self {
    self.values.insert(
      key.to_string(),
      value.to_string()
    );
    self
  }

  pub fn values(
    &self
  ) -> &BTreeMap<String, String> {
    &self.values
  }
}

impl PreferenceStore for MemoryStore {
  fn get(
    &self,
    key: &str
  ) -> Option<String> {
    self.values.get(key).cloned()
  }

  fn set(
    &mut self,
    key: &str,
    value: &str
  ) -> Result<(), PreferenceError> {
    self.values.insert(
      key.to_string(),
      value.to_string()
    );
    Ok(())
  }
}
